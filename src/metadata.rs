//! Document information dictionary post-processing built on top of `lopdf`.

use lopdf::{Dictionary, Document, Object};

/// Author recorded in every generated report.
pub const AUTHOR: &str = "GEO Tracker";

/// Values written to the PDF `/Info` dictionary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
}

impl DocumentInfo {
    /// Info for a report titled `title`, authored by [`AUTHOR`].
    pub fn new(title: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: AUTHOR.to_owned(),
            subject: subject.into(),
            creator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("Title", self.title.as_str()),
            ("Author", self.author.as_str()),
            ("Subject", self.subject.as_str()),
            ("Creator", self.creator.as_str()),
        ]
    }
}

/// Errors that can occur while rewriting the document information.
#[derive(Debug)]
pub enum MetadataError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    Parse(lopdf::Error),
    /// The trailer references an info object that is not a dictionary.
    InvalidInfo,
}

impl From<lopdf::Error> for MetadataError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for MetadataError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to process PDF bytes: {err}"),
            Self::InvalidInfo => write!(f, "PDF info entry is not a dictionary"),
        }
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidInfo => None,
        }
    }
}

/// Rewrites the `/Info` dictionary of `pdf_bytes` with `info`.
///
/// Existing keys such as `/Producer` or `/CreationDate` are kept; a fresh
/// dictionary is added when the trailer has none.
pub fn apply_document_info(pdf_bytes: &[u8], info: &DocumentInfo) -> Result<Vec<u8>, MetadataError> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let existing = document
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|object| object.as_reference().ok());

    match existing {
        Some(info_id) => {
            let dictionary = document
                .get_object_mut(info_id)?
                .as_dict_mut()
                .map_err(|_| MetadataError::InvalidInfo)?;
            write_entries(dictionary, info);
        }
        None => {
            let mut dictionary = Dictionary::new();
            write_entries(&mut dictionary, info);
            let info_id = document.add_object(dictionary);
            document.trailer.set("Info", Object::Reference(info_id));
        }
    }

    let mut buffer = Vec::new();
    document.save_to(&mut buffer).map_err(MetadataError::from)?;
    Ok(buffer)
}

fn write_entries(dictionary: &mut Dictionary, info: &DocumentInfo) {
    for (key, value) in info.entries() {
        dictionary.set(key, Object::string_literal(value));
    }
}

/// Reads a string entry back from the `/Info` dictionary.
pub fn read_info_entry(pdf_bytes: &[u8], key: &str) -> Result<Option<String>, MetadataError> {
    let document = Document::load_mem(pdf_bytes)?;
    let Some(info_id) = document
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|object| object.as_reference().ok())
    else {
        return Ok(None);
    };
    let dictionary = document
        .get_object(info_id)?
        .as_dict()
        .map_err(|_| MetadataError::InvalidInfo)?;
    Ok(dictionary
        .get(key.as_bytes())
        .ok()
        .and_then(|object| object.as_str().ok())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn minimal_pdf() -> Vec<u8> {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        let mut buffer = Vec::new();
        document.save_to(&mut buffer).expect("save minimal pdf");
        buffer
    }

    #[test]
    fn adds_info_dictionary_when_missing() {
        let info = DocumentInfo::new("GEO Score Audit Report", "https://example.com");
        let bytes = apply_document_info(&minimal_pdf(), &info).expect("apply info");
        assert_eq!(
            read_info_entry(&bytes, "Title").expect("read title").as_deref(),
            Some("GEO Score Audit Report")
        );
        assert_eq!(
            read_info_entry(&bytes, "Author").expect("read author").as_deref(),
            Some(AUTHOR)
        );
    }

    #[test]
    fn overwrites_existing_entries() {
        let first = apply_document_info(&minimal_pdf(), &DocumentInfo::new("Draft", "a"))
            .expect("apply info");
        let second =
            apply_document_info(&first, &DocumentInfo::new("Final", "b")).expect("apply info");
        assert_eq!(
            read_info_entry(&second, "Title").expect("read title").as_deref(),
            Some("Final")
        );
        assert_eq!(
            read_info_entry(&second, "Subject").expect("read subject").as_deref(),
            Some("b")
        );
    }

    #[test]
    fn write_failures_are_reported_as_pdf_errors() {
        let err = MetadataError::from(std::io::Error::new(std::io::ErrorKind::WriteZero, "full"));
        assert!(matches!(err, MetadataError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to process PDF bytes"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            apply_document_info(b"not a pdf", &DocumentInfo::new("t", "s")),
            Err(MetadataError::Parse(_))
        ));
    }
}
