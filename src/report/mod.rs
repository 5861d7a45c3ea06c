//! Report assemblers.
//!
//! Each submodule turns one input model into a [`Report`]: a flat fragment
//! sequence plus the values written to the PDF info dictionary. The helpers
//! here hold the pieces every report shares (masthead, document header,
//! two-column sections and footer lines).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use genpdf::fonts::{FontData, FontFamily};
use log::debug;

use crate::error::ReportError;
use crate::fonts;
use crate::format;
use crate::layout::{DataTable, Fragment, SectionBlock, SectionBody};
use crate::metadata::DocumentInfo;
use crate::render::{render_pdf, write_pdf};
use crate::theme::{StyleName, Theme};

pub mod insights;
pub mod score;
pub mod visibility;

/// Space below the document header and between top-level blocks, in mm.
const BLOCK_GAP_MM: f64 = 7.0;

/// Everything a builder needs besides its input.
#[derive(Clone, Debug)]
pub struct RenderContext {
    pub theme: Theme,
    /// Time stamped into footers and document identifiers.
    pub generated_at: DateTime<Local>,
}

impl RenderContext {
    pub fn new(theme: Theme) -> Self {
        Self::at(theme, Local::now())
    }

    /// A context with a fixed generation time.
    pub fn at(theme: Theme, generated_at: DateTime<Local>) -> Self {
        Self {
            theme,
            generated_at,
        }
    }

    /// The analysis date shown in a subtitle, falling back to today.
    pub(crate) fn display_date(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            self.generated_at.format("%Y-%m-%d").to_string()
        } else {
            format::date(raw)
        }
    }

    pub(crate) fn timestamp(&self) -> String {
        format::timestamp(&self.generated_at)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Theme::audit())
    }
}

/// An assembled report, ready to render.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub info: DocumentInfo,
    pub fragments: Vec<Fragment>,
}

impl Report {
    /// Renders the report with an explicit font family.
    pub fn render(&self, theme: &Theme, fonts: FontFamily<FontData>) -> Result<Vec<u8>, ReportError> {
        render_pdf(&self.fragments, &self.info, theme, fonts)
    }

    /// Resolves the default fonts, renders the report and writes it to `output`.
    pub fn write_to(&self, theme: &Theme, output: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let output = output.as_ref();
        let family = fonts::default_font_family()?;
        let bytes = self.render(theme, family)?;
        write_pdf(output, &bytes)?;
        debug!(
            "Wrote {} ({} bytes, {} fragments)",
            output.display(),
            bytes.len(),
            self.fragments.len()
        );
        Ok(output.to_path_buf())
    }
}

/// Masthead, title and subtitle opening the first page.
pub(crate) fn document_header(
    theme: &Theme,
    masthead: (&str, &str),
    title: &str,
    subtitle: String,
) -> Vec<Fragment> {
    vec![
        Fragment::masthead(masthead.0, masthead.1),
        Fragment::Spacer(BLOCK_GAP_MM),
        Fragment::text(title, theme.style(StyleName::DocTitle)),
        Fragment::text(subtitle, theme.style(StyleName::DocSubtitle)),
        Fragment::Spacer(BLOCK_GAP_MM),
    ]
}

/// A page break followed by the repeated masthead.
pub(crate) fn page_break(masthead: (&str, &str)) -> Vec<Fragment> {
    vec![
        Fragment::PageBreak,
        Fragment::masthead(masthead.0, masthead.1),
        Fragment::Spacer(BLOCK_GAP_MM),
    ]
}

pub(crate) fn table_section(
    id: impl Into<String>,
    title: impl Into<String>,
    description: impl Into<String>,
    table: DataTable,
) -> Fragment {
    Fragment::section(SectionBlock::new(
        id,
        title,
        description,
        SectionBody::Table(table),
    ))
}

/// Centred footer lines closing the document, optionally under a divider.
pub(crate) fn footer_lines(theme: &Theme, divider: bool, lines: &[String]) -> Vec<Fragment> {
    let mut fragments = vec![Fragment::Spacer(10.0)];
    if divider {
        fragments.push(Fragment::Divider);
    }
    let style = theme.style(StyleName::Footer);
    fragments.extend(lines.iter().map(|line| Fragment::text(line.clone(), style)));
    fragments
}

/// `01`, `02`, ... as used by the numbered tables.
pub(crate) fn ordinal(index: usize) -> String {
    format!("{:02}", index + 1)
}
