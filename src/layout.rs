//! Inspectable description of a report's layout.
//!
//! Report builders produce a flat sequence of [`Fragment`] values. The
//! sequence holds plain data only; [`crate::render`] maps it onto `genpdf`
//! elements. Keeping the two apart lets tests assert on the structure of a
//! report (which sections exist, how many rows a table has) without fonts.

use std::path::PathBuf;

use crate::richtext::{plain_text, Span};
use crate::theme::{StyleName, Swatch, TextStyle, Theme};

/// Horizontal placement of text within its cell or line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// One or more spans laid out as a wrapped paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextBlock {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
    space_after: u8,
}

impl TextBlock {
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    /// A single-span paragraph carrying a named style, its alignment and leading.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self::new(vec![Span::styled(text, style)])
            .with_alignment(style.alignment)
            .with_space_after(style.spacing())
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Space below the paragraph, in points.
    pub fn space_after(&self) -> u8 {
        self.space_after
    }

    pub fn text(&self) -> String {
        plain_text(&self.spans)
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_space_after(mut self, points: u8) -> Self {
        self.space_after = points;
        self
    }
}

/// A table cell. Text wraps within the column width.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
}

impl Cell {
    pub fn new(spans: impl Into<Vec<Span>>, alignment: HorizontalAlignment) -> Self {
        Self {
            spans: spans.into(),
            alignment,
        }
    }

    /// A cell rendered with a named style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self::new(vec![Span::styled(text, style)], style.alignment)
    }

    /// A cell in the named style but painted with `color`.
    pub fn colored(text: impl Into<String>, style: TextStyle, color: Swatch) -> Self {
        Self::styled(text, TextStyle { color, ..style })
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn text(&self) -> String {
        plain_text(&self.spans)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub title: String,
    /// Nominal width in centimetres; columns share the available width in
    /// proportion to it.
    pub width_cm: f64,
    pub alignment: HorizontalAlignment,
    /// Header fill overriding the table's default.
    pub fill: Option<Swatch>,
}

/// How cell borders are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Frame {
    /// Outer border plus every inner rule.
    #[default]
    Grid,
    /// Outer border only.
    Box,
}

/// A table with a filled header row.
#[derive(Clone, Debug, PartialEq)]
pub struct DataTable {
    columns: Vec<Column>,
    header_fill: Swatch,
    header_style: TextStyle,
    rows: Vec<Vec<Cell>>,
    frame: Frame,
    border: Swatch,
}

impl DataTable {
    /// Starts a table whose header row is painted in `header_fill`.
    pub fn new(theme: &Theme, header_fill: Swatch) -> Self {
        Self {
            columns: Vec::new(),
            header_fill,
            header_style: theme.style(StyleName::TableHeader),
            rows: Vec::new(),
            frame: Frame::Grid,
            border: theme.palette.gray_lighter,
        }
    }

    pub fn column(
        mut self,
        title: impl Into<String>,
        width_cm: f64,
        alignment: HorizontalAlignment,
    ) -> Self {
        self.columns.push(Column {
            title: title.into(),
            width_cm,
            alignment,
            fill: None,
        });
        self
    }

    /// Adds a column whose header cell is painted in `fill`.
    pub fn column_filled(
        self,
        title: impl Into<String>,
        width_cm: f64,
        alignment: HorizontalAlignment,
        fill: Swatch,
    ) -> Self {
        let mut table = self.column(title, width_cm, alignment);
        if let Some(column) = table.columns.last_mut() {
            column.fill = Some(fill);
        }
        table
    }

    pub fn framed(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Appends a row; missing trailing cells are left blank.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        let width = self.columns.len();
        while cells.len() < width {
            cells.push(Cell::default());
        }
        cells.truncate(width.max(1));
        self.rows.push(cells);
    }

    pub fn with_row(mut self, cells: Vec<Cell>) -> Self {
        self.push_row(cells);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn header_fill(&self) -> Swatch {
        self.header_fill
    }

    pub fn header_style(&self) -> TextStyle {
        self.header_style
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn border(&self) -> Swatch {
        self.border
    }

    /// Column weights for the renderer, derived from the nominal widths.
    pub fn weights(&self) -> Vec<usize> {
        self.columns
            .iter()
            .map(|column| ((column.width_cm * 10.0).round() as usize).max(1))
            .collect()
    }

    /// Plain text of the cell at `row`, `column`.
    pub fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        self.rows.get(row)?.get(column).map(Cell::text)
    }
}

/// A PNG chart placed in a section, scaled to `width_mm`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartImage {
    pub path: PathBuf,
    pub width_mm: f64,
}

/// Right-hand content of a two-column section.
#[derive(Clone, Debug, PartialEq)]
pub enum SectionBody {
    Table(DataTable),
    Notes(Vec<TextBlock>),
    Chart(ChartImage),
}

/// A titled two-column section: title and description on the left, body on
/// the right.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionBlock {
    /// Stable identifier such as `categories` or `detail:schema`.
    pub id: String,
    pub title: String,
    pub description: String,
    pub body: SectionBody,
}

impl SectionBlock {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        body: SectionBody,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            body,
        }
    }

    pub fn table(&self) -> Option<&DataTable> {
        match &self.body {
            SectionBody::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// The small left/right line opening every page of a report.
#[derive(Clone, Debug, PartialEq)]
pub struct Masthead {
    pub left: String,
    pub right: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Masthead(Masthead),
    Text(TextBlock),
    Section(SectionBlock),
    /// Vertical gap in millimetres.
    Spacer(f64),
    /// Full-width horizontal rule.
    Divider,
    PageBreak,
}

impl Fragment {
    pub fn masthead(left: impl Into<String>, right: impl Into<String>) -> Self {
        Fragment::Masthead(Masthead {
            left: left.into(),
            right: right.into(),
        })
    }

    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Fragment::Text(TextBlock::styled(text, style))
    }

    pub fn section(section: SectionBlock) -> Self {
        Fragment::Section(section)
    }

    pub fn as_section(&self) -> Option<&SectionBlock> {
        match self {
            Fragment::Section(section) => Some(section),
            _ => None,
        }
    }
}

/// Identifiers of every section in `fragments`, in order.
pub fn section_ids(fragments: &[Fragment]) -> Vec<&str> {
    fragments
        .iter()
        .filter_map(Fragment::as_section)
        .map(|section| section.id.as_str())
        .collect()
}

/// Looks up a section by identifier.
pub fn find_section<'a>(fragments: &'a [Fragment], id: &str) -> Option<&'a SectionBlock> {
    fragments
        .iter()
        .filter_map(Fragment::as_section)
        .find(|section| section.id == id)
}

/// Whether any text fragment or table cell contains `needle`.
pub fn contains_text(fragments: &[Fragment], needle: &str) -> bool {
    fragments.iter().any(|fragment| match fragment {
        Fragment::Masthead(masthead) => {
            masthead.left.contains(needle) || masthead.right.contains(needle)
        }
        Fragment::Text(block) => block.text().contains(needle),
        Fragment::Section(section) => {
            section.title.contains(needle)
                || match &section.body {
                    SectionBody::Table(table) => table
                        .rows()
                        .iter()
                        .flatten()
                        .any(|cell| cell.text().contains(needle)),
                    SectionBody::Notes(notes) => {
                        notes.iter().any(|note| note.text().contains(needle))
                    }
                    SectionBody::Chart(_) => false,
                }
        }
        Fragment::Spacer(_) | Fragment::Divider | Fragment::PageBreak => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table(theme: &Theme) -> DataTable {
        let cell = theme.style(StyleName::TableCell);
        DataTable::new(theme, theme.palette.black)
            .column("ITEM", 4.0, HorizontalAlignment::Left)
            .column("SCORE", 2.5, HorizontalAlignment::Center)
            .with_row(vec![Cell::styled("Title tag", cell), Cell::styled("8/10", cell)])
            .with_row(vec![Cell::styled("Alt text", cell)])
    }

    #[test]
    fn short_rows_are_padded_to_column_count() {
        let theme = Theme::audit();
        let table = sample_table(&theme);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1].len(), 2);
        assert_eq!(table.cell_text(1, 1).as_deref(), Some(""));
        assert_eq!(table.weights(), vec![40, 25]);
    }

    #[test]
    fn sections_are_found_by_id() {
        let theme = Theme::audit();
        let fragments = vec![
            Fragment::masthead("GEO SCORE", "AUDIT"),
            Fragment::section(SectionBlock::new(
                "categories",
                "Category Analysis",
                "Scores per category",
                SectionBody::Table(sample_table(&theme)),
            )),
            Fragment::PageBreak,
        ];
        assert_eq!(section_ids(&fragments), ["categories"]);
        let section = find_section(&fragments, "categories").expect("section present");
        assert_eq!(section.table().map(DataTable::row_count), Some(2));
        assert!(contains_text(&fragments, "Alt text"));
        assert!(contains_text(&fragments, "AUDIT"));
        assert!(!contains_text(&fragments, "missing"));
    }
}
