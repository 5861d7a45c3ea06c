//! Font discovery for the PDF reports and the chart rasterizer.
//!
//! Fonts are looked up once per process. The bundled Roboto family is
//! preferred; when it is missing the search falls back to common system sans
//! families so the programs still work on a bare server.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Directory holding `Roboto-{Regular,Bold,Italic,BoldItalic}.ttf`.
pub const FONTS_DIR_ENV: &str = "GEO_REPORT_FONTS_DIR";

/// Set to `0` to disable the system font fallback.
pub const SYSTEM_FONTS_ENV: &str = "GEO_REPORT_SYSTEM_FONTS";

/// File names of the four faces of a family.
#[derive(Clone, Copy, Debug)]
struct FaceNames {
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const BUNDLED_FACES: FaceNames = FaceNames {
    regular: "Roboto-Regular.ttf",
    bold: "Roboto-Bold.ttf",
    italic: "Roboto-Italic.ttf",
    bold_italic: "Roboto-BoldItalic.ttf",
};

struct SystemFamily {
    name: &'static str,
    directories: &'static [&'static str],
    faces: FaceNames,
}

const SYSTEM_FAMILIES: &[SystemFamily] = &[
    SystemFamily {
        name: "DejaVu Sans",
        directories: &["/usr/share/fonts/truetype/dejavu", "/usr/share/fonts/dejavu"],
        faces: FaceNames {
            regular: "DejaVuSans.ttf",
            bold: "DejaVuSans-Bold.ttf",
            italic: "DejaVuSans-Oblique.ttf",
            bold_italic: "DejaVuSans-BoldOblique.ttf",
        },
    },
    SystemFamily {
        name: "Liberation Sans",
        directories: &[
            "/usr/share/fonts/truetype/liberation",
            "/usr/share/fonts/liberation-sans",
        ],
        faces: FaceNames {
            regular: "LiberationSans-Regular.ttf",
            bold: "LiberationSans-Bold.ttf",
            italic: "LiberationSans-Italic.ttf",
            bold_italic: "LiberationSans-BoldItalic.ttf",
        },
    },
    SystemFamily {
        name: "Arial",
        directories: &["C:\\Windows\\Fonts"],
        faces: FaceNames {
            regular: "arial.ttf",
            bold: "arialbd.ttf",
            italic: "ariali.ttf",
            bold_italic: "arialbi.ttf",
        },
    },
];

/// Paths of the four faces of a resolved font family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFiles {
    pub family: String,
    pub regular: PathBuf,
    pub bold: PathBuf,
    pub italic: PathBuf,
    pub bold_italic: PathBuf,
}

impl FontFiles {
    fn in_directory(family: &str, directory: &Path, faces: FaceNames) -> Self {
        Self {
            family: family.to_owned(),
            regular: directory.join(faces.regular),
            bold: directory.join(faces.bold),
            italic: directory.join(faces.italic),
            bold_italic: directory.join(faces.bold_italic),
        }
    }

    fn paths(&self) -> [&Path; 4] {
        [&self.regular, &self.bold, &self.italic, &self.bold_italic]
    }

    fn missing(&self) -> Vec<String> {
        self.paths()
            .iter()
            .filter(|path| !path.is_file())
            .map(|path| path.file_name().unwrap_or_default().to_string_lossy().into_owned())
            .collect()
    }

    /// Loads the family for `genpdf`.
    pub fn load_family(&self) -> Result<FontFamily<FontData>, Error> {
        Ok(FontFamily {
            regular: load_face(&self.regular, "regular")?,
            bold: load_face(&self.bold, "bold")?,
            italic: load_face(&self.italic, "italic")?,
            bold_italic: load_face(&self.bold_italic, "bold italic")?,
        })
    }

    /// Raw bytes of the regular and bold faces, for the chart rasterizer.
    pub fn read_chart_faces(&self) -> io::Result<(Vec<u8>, Vec<u8>)> {
        Ok((fs::read(&self.regular)?, fs::read(&self.bold)?))
    }
}

fn load_face(path: &Path, style: &str) -> Result<FontData, Error> {
    FontData::load(path, None).map_err(|err| {
        Error::new(
            format!("Failed to load {} font at {}: {}", style, path.display(), err),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn bundled_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn system_fonts_enabled() -> bool {
    env::var(SYSTEM_FONTS_ENV).map_or(true, |value| value.trim() != "0")
}

fn system_candidates() -> Vec<FontFiles> {
    SYSTEM_FAMILIES
        .iter()
        .flat_map(|family| {
            family.directories.iter().map(move |directory| {
                FontFiles::in_directory(family.name, Path::new(directory), family.faces)
            })
        })
        .collect()
}

/// Finds the first complete font family, bundled fonts first.
pub fn resolve_font_files() -> Result<FontFiles, Error> {
    let mut attempts = Vec::new();

    for directory in bundled_directory_candidates() {
        let files = FontFiles::in_directory(DEFAULT_FONT_FAMILY_NAME, &directory, BUNDLED_FACES);
        let missing = files.missing();
        if missing.is_empty() {
            debug!("Using bundled fonts from {}", directory.display());
            return Ok(files);
        }
        attempts.push(format!("{} (missing [{}])", directory.display(), missing.join(", ")));
    }

    if system_fonts_enabled() {
        for files in system_candidates() {
            if files.missing().is_empty() {
                warn!(
                    "Bundled fonts unavailable; falling back to system '{}' family.",
                    files.family
                );
                return Ok(files);
            }
        }
        attempts.push("no system sans family found".to_owned());
    }

    Err(Error::new(
        format!(
            "Unable to locate a font family. Checked: {}. Set {} to a directory with the Roboto fonts.",
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "fonts not found"),
    ))
}

/// Resolves and loads the default font family.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    resolve_font_files()?.load_family()
}

/// Whether [`resolve_font_files`] would succeed.
pub fn default_fonts_available() -> bool {
    resolve_font_files().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_candidates_cover_every_family() {
        let candidates = system_candidates();
        for family in SYSTEM_FAMILIES {
            assert!(candidates.iter().any(|files| files.family == family.name));
        }
    }

    #[test]
    fn missing_lists_absent_faces() {
        let files = FontFiles::in_directory("Roboto", Path::new("/nowhere"), BUNDLED_FACES);
        assert_eq!(files.missing().len(), 4);
        assert!(files.missing().contains(&"Roboto-Bold.ttf".to_owned()));
    }
}
