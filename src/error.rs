//! Error types shared by the report and chart pipelines.

use thiserror::Error;

/// The two ways a report invocation can fail.
///
/// Both kinds are converted into the JSON error envelope at the CLI boundary;
/// the `Display` output is the message that ends up in the `error` field.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The input file is missing, unreadable, or not valid JSON.
    #[error("Error loading JSON: {0}")]
    Load(String),

    /// Building or writing the document, or one of its charts, failed.
    #[error("{0}")]
    Render(String),
}

impl ReportError {
    /// Creates a render error from anything printable.
    pub fn render(err: impl std::fmt::Display) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<genpdf::error::Error> for ReportError {
    fn from(err: genpdf::error::Error) -> Self {
        Self::render(err)
    }
}

impl From<crate::metadata::MetadataError> for ReportError {
    fn from(err: crate::metadata::MetadataError) -> Self {
        Self::render(err)
    }
}

impl From<image::ImageError> for ReportError {
    fn from(err: image::ImageError) -> Self {
        Self::render(err)
    }
}

#[cfg(test)]
mod tests {
    use super::ReportError;

    #[test]
    fn load_errors_carry_the_loader_prefix() {
        let err = ReportError::Load("expected value at line 1 column 1".into());
        assert_eq!(
            err.to_string(),
            "Error loading JSON: expected value at line 1 column 1"
        );
    }

    #[test]
    fn render_errors_are_passed_through_verbatim() {
        let err = ReportError::render("Footer element does not fit into the reserved space");
        assert_eq!(
            err.to_string(),
            "Footer element does not fit into the reserved space"
        );
    }
}
