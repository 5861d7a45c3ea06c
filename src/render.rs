//! Conversion of a fragment sequence into PDF bytes.

use std::fs;
use std::path::Path;

use genpdf::elements::{LinearLayout, PageBreak, Paragraph, TableLayout};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::StyledString;
use genpdf::{Alignment, Element, Margins, Mm};

use crate::builder::DocumentBuilder;
use crate::elements::{mm_from_f64, mm_from_pt, ChartFigure, ColoredFrame, FilledCell, Gap, Rule};
use crate::error::ReportError;
use crate::layout::{
    Cell, DataTable, Frame, Fragment, HorizontalAlignment, Masthead, SectionBlock, SectionBody,
    TextBlock,
};
use crate::metadata::{apply_document_info, DocumentInfo};
use crate::richtext::{paragraph, Span};
use crate::theme::{StyleName, Theme};

/// Relative widths of the description and body columns of a section.
const SECTION_WEIGHTS: [usize; 2] = [50, 115];
const CELL_PADDING_MM: f64 = 1.5;
const FOOTER_HEIGHT_MM: i32 = 8;

impl From<HorizontalAlignment> for Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => Alignment::Left,
            HorizontalAlignment::Center => Alignment::Center,
            HorizontalAlignment::Right => Alignment::Right,
        }
    }
}

/// Renders `fragments` into a finished PDF, including its info dictionary.
pub fn render_pdf(
    fragments: &[Fragment],
    info: &DocumentInfo,
    theme: &Theme,
    fonts: FontFamily<FontData>,
) -> Result<Vec<u8>, ReportError> {
    let footer_style = theme.style(StyleName::Footer);
    let mut document = DocumentBuilder::new(fonts)
        .with_title(info.title.clone())
        .with_footer(FOOTER_HEIGHT_MM, move |page| {
            Paragraph::new(Span::styled(format!("Page {}", page), footer_style))
                .aligned(Alignment::Center)
        })
        .build();

    for fragment in fragments {
        push_fragment(&mut document, fragment, theme)?;
    }

    let mut bytes = Vec::new();
    document.render(&mut bytes)?;
    Ok(apply_document_info(&bytes, info)?)
}

/// Writes finished PDF bytes to `path`.
pub fn write_pdf(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), ReportError> {
    let path = path.as_ref();
    fs::write(path, bytes)
        .map_err(|err| ReportError::render(format!("Failed to write {}: {}", path.display(), err)))
}

fn push_fragment(
    document: &mut genpdf::Document,
    fragment: &Fragment,
    theme: &Theme,
) -> Result<(), ReportError> {
    match fragment {
        Fragment::Masthead(masthead) => document.push(masthead_element(masthead, theme)?),
        Fragment::Text(block) => document.push(text_element(block)),
        Fragment::Section(section) => {
            document.push(section_element(section, theme)?);
            document.push(Gap(mm_from_f64(4.0)));
        }
        Fragment::Spacer(height) => document.push(Gap(mm_from_f64(*height))),
        Fragment::Divider => document.push(Rule::new(
            theme.palette.gray_lighter.pdf(),
            mm_from_f64(0.3),
            mm_from_f64(3.0),
        )),
        Fragment::PageBreak => document.push(PageBreak::new()),
    }
    Ok(())
}

fn text_element(block: &TextBlock) -> impl Element {
    paragraph(block.spans(), block.alignment().into()).padded(Margins::trbl(
        Mm::default(),
        Mm::default(),
        mm_from_pt(f64::from(block.space_after())),
        Mm::default(),
    ))
}

fn masthead_element(masthead: &Masthead, theme: &Theme) -> Result<impl Element, ReportError> {
    let style = theme.style(StyleName::Masthead);
    let mut table = TableLayout::new(vec![1, 1]);
    table
        .row()
        .element(Paragraph::new(Span::styled(masthead.left.clone(), style)))
        .element(
            Paragraph::new(Span::styled(masthead.right.clone(), style))
                .aligned(Alignment::Right),
        )
        .push()?;

    let mut layout = LinearLayout::vertical();
    layout.push(table);
    layout.push(Rule::new(
        theme.palette.black.pdf(),
        mm_from_f64(0.6),
        mm_from_f64(4.0),
    ));
    Ok(layout)
}

fn section_element(section: &SectionBlock, theme: &Theme) -> Result<impl Element, ReportError> {
    let mut left = LinearLayout::vertical();
    if !section.title.is_empty() {
        left.push(text_element(&TextBlock::styled(
            section.title.clone(),
            theme.style(StyleName::SectionTitle),
        )));
    }
    if !section.description.is_empty() {
        left.push(text_element(&TextBlock::styled(
            section.description.clone(),
            theme.style(StyleName::SectionDesc),
        )));
    }

    let mut table = TableLayout::new(SECTION_WEIGHTS.to_vec());
    let right: Box<dyn Element> = match &section.body {
        SectionBody::Table(data) => Box::new(data_table_element(data)?),
        SectionBody::Notes(notes) => {
            let mut layout = LinearLayout::vertical();
            for note in notes {
                layout.push(text_element(note));
            }
            Box::new(layout)
        }
        SectionBody::Chart(chart) => Box::new(ChartFigure::from_path(
            &chart.path,
            mm_from_f64(chart.width_mm),
        )?),
    };
    let left: Box<dyn Element> = Box::new(left.padded(Margins::trbl(
        Mm::default(),
        mm_from_f64(4.0),
        Mm::default(),
        Mm::default(),
    )));
    table.push_row(vec![left, right])?;
    Ok(table)
}

fn data_table_element(data: &DataTable) -> Result<TableLayout, ReportError> {
    let mut table = TableLayout::new(data.weights());
    let (inner, outer) = match data.frame() {
        Frame::Grid => (true, true),
        Frame::Box => (false, true),
    };
    table.set_cell_decorator(ColoredFrame::new(inner, outer, data.border().pdf()));

    let padding = mm_from_f64(CELL_PADDING_MM);
    let header_style = data.header_style();
    let header: Vec<Box<dyn Element>> = data
        .columns()
        .iter()
        .map(|column| {
            let title = Paragraph::new(StyledString::from(Span::styled(
                column.title.clone(),
                header_style,
            )))
            .aligned(header_style.alignment.into());
            let fill = column.fill.unwrap_or_else(|| data.header_fill());
            Box::new(FilledCell::new(title, fill.pdf(), padding))
                as Box<dyn Element>
        })
        .collect();
    if !header.is_empty() {
        table.push_row(header)?;
    }

    for row in data.rows() {
        let cells: Vec<Box<dyn Element>> = row
            .iter()
            .map(|cell| Box::new(cell_element(cell, padding)) as Box<dyn Element>)
            .collect();
        table.push_row(cells)?;
    }
    Ok(table)
}

fn cell_element(cell: &Cell, padding: Mm) -> impl Element {
    paragraph(cell.spans(), cell.alignment().into()).padded(Margins::all(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts;
    use crate::layout::ChartImage;
    use crate::metadata::read_info_entry;

    fn sample_fragments(theme: &Theme) -> Vec<Fragment> {
        let cell = theme.style(StyleName::TableCell);
        let table = DataTable::new(theme, theme.palette.black)
            .column("ITEM", 4.0, HorizontalAlignment::Left)
            .column("RESULT", 2.0, HorizontalAlignment::Center)
            .with_row(vec![Cell::styled("Title tag", cell), Cell::styled("PASS", cell)]);
        vec![
            Fragment::masthead("GEO SCORE", "SITE OPTIMIZATION AUDIT"),
            Fragment::text("Render check", theme.style(StyleName::DocTitle)),
            Fragment::section(SectionBlock::new(
                "checks",
                "Checks",
                "Rendered through the table path",
                SectionBody::Table(table),
            )),
            Fragment::Divider,
            Fragment::PageBreak,
            Fragment::Spacer(5.0),
            Fragment::section(SectionBlock::new(
                "notes",
                "Notes",
                "",
                SectionBody::Notes(vec![TextBlock::styled(
                    "Body text",
                    theme.style(StyleName::Body),
                )]),
            )),
        ]
    }

    #[test]
    fn renders_every_fragment_kind() {
        let Ok(family) = fonts::default_font_family() else {
            eprintln!("Skipping renders_every_fragment_kind: no font family available.");
            return;
        };
        let theme = Theme::audit();
        let info = DocumentInfo::new("Render check", "fragments");
        let bytes = render_pdf(&sample_fragments(&theme), &info, &theme, family).expect("render");
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(
            read_info_entry(&bytes, "Author").expect("read author").as_deref(),
            Some("GEO Tracker")
        );
    }

    #[test]
    fn missing_chart_is_a_render_error() {
        let Ok(family) = fonts::default_font_family() else {
            eprintln!("Skipping missing_chart_is_a_render_error: no font family available.");
            return;
        };
        let theme = Theme::audit();
        let fragments = vec![Fragment::section(SectionBlock::new(
            "chart",
            "Chart",
            "",
            SectionBody::Chart(ChartImage {
                path: "/no/such/chart.png".into(),
                width_mm: 100.0,
            }),
        ))];
        let info = DocumentInfo::new("Chart", "missing");
        let err = render_pdf(&fragments, &info, &theme, family).unwrap_err();
        assert!(matches!(err, ReportError::Render(_)));
    }
}
