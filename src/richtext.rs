//! Styled text fragments.
//!
//! A [`Span`] is a run of text carrying the inline attributes the reports use
//! (weight, colour and an optional font size). Spans stay plain data so
//! the fragment model can be inspected in tests; the conversion helpers turn
//! them into [`genpdf`] strings and paragraphs at render time.

use genpdf::elements::Paragraph;
use genpdf::style::{Color, Style, StyledString};
use genpdf::Alignment;

use crate::theme::{Swatch, TextStyle};

/// A run of text with its inline attributes. Unset attributes inherit from
/// the enclosing element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    color: Option<Color>,
    size: Option<u8>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A span carrying the weight, size and colour of a named text style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            bold: style.bold,
            color: Some(style.color.pdf()),
            size: Some(style.size),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Font size override in points.
    pub fn size(&self) -> Option<u8> {
        self.size
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: Option<u8>) -> Self {
        self.size = size;
        self
    }

    pub fn colored(self, swatch: Swatch) -> Self {
        self.with_color(Some(swatch.pdf()))
    }

    fn style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if let Some(size) = self.size {
            style.set_font_size(size);
        }
        if self.bold {
            style.set_bold();
        }
        style
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        StyledString::new(span.text.clone(), span.style())
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        let style = span.style();
        StyledString::new(span.text, style)
    }
}

/// Concatenated text of a span sequence.
pub fn plain_text<'a, I>(spans: I) -> String
where
    I: IntoIterator<Item = &'a Span>,
{
    spans.into_iter().map(Span::text).collect()
}

/// Builds a wrapped paragraph from a sequence of spans.
pub fn paragraph<'a, I>(spans: I, alignment: Alignment) -> Paragraph
where
    I: IntoIterator<Item = &'a Span>,
{
    let mut paragraph = Paragraph::default();
    for span in spans {
        paragraph.push(StyledString::from(span));
    }
    paragraph.aligned(alignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{StyleName, Theme};

    #[test]
    fn styled_string_carries_span_attributes() {
        let span = Span::new("Grade: B+")
            .bold()
            .with_size(Some(14))
            .with_color(Some(Color::Rgb(10, 20, 30)));
        let styled = StyledString::from(&span);
        assert_eq!(styled.s, "Grade: B+");
        assert!(styled.style.is_bold());
        assert!(!styled.style.is_italic());
        assert_eq!(styled.style.font_size(), 14);
        assert_eq!(styled.style.color(), Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn styled_span_copies_named_style() {
        let theme = Theme::audit();
        let header = theme.style(StyleName::TableHeader);
        let span = Span::styled("SCORE", header);
        assert!(span.is_bold());
        assert_eq!(span.size(), Some(8));
        assert_eq!(span.color(), Some(theme.palette.white.pdf()));
    }

    #[test]
    fn plain_text_joins_spans() {
        let spans = [Span::new("82"), Span::new(" / 100").bold()];
        assert_eq!(plain_text(&spans), "82 / 100");
    }
}
