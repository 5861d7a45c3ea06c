//! genpdf document setup shared by the three reports.
//!
//! Every report is A4 with 15 mm margins and a page-number footer reserved at
//! the bottom of each page; only the title and the footer content vary.

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::render::Area;
use genpdf::style::Style;
use genpdf::{Context, Document, Element, Margins, Mm, PageDecorator, PaperSize, Position};

const MARGIN_MM: i32 = 15;
const BASE_FONT_SIZE: u8 = 9;

type FooterFactory = dyn Fn(usize) -> Box<dyn Element>;

pub struct DocumentBuilder {
    fonts: FontFamily<FontData>,
    title: String,
    footer: Option<PageFooter>,
}

impl DocumentBuilder {
    pub fn new(fonts: FontFamily<FontData>) -> Self {
        Self {
            fonts,
            title: String::new(),
            footer: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Reserves `height` at the bottom of every page for the element built by
    /// `footer` from the 1-based page number.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(PageFooter {
            height: height.into(),
            factory: Box::new(move |page| Box::new(footer(page)) as Box<dyn Element>),
        });
        self
    }

    pub fn build(self) -> Document {
        let mut document = Document::new(self.fonts);
        document.set_title(self.title);
        document.set_paper_size(PaperSize::A4);
        document.set_font_size(BASE_FONT_SIZE);
        document.set_page_decorator(ReportPages {
            page: 0,
            margins: Margins::all(MARGIN_MM),
            footer: self.footer,
        });
        document
    }
}

struct PageFooter {
    height: Mm,
    factory: Box<FooterFactory>,
}

impl PageFooter {
    /// Renders the footer into the bottom band of `area` and returns the
    /// height left for content.
    fn render(&self, page: usize, context: &Context, area: &Area<'_>, style: Style) -> Result<Mm, Error> {
        let available = area.size().height;
        if self.height > available {
            return Err(Error::new(
                "Footer height exceeds available space",
                ErrorKind::InvalidData,
            ));
        }

        let mut band = area.clone();
        band.add_offset(Position::new(0, available - self.height));
        let mut element = (self.factory)(page);
        if element.render(context, band, style)?.has_more {
            return Err(Error::new(
                "Footer element does not fit into the reserved space",
                ErrorKind::PageSizeExceeded,
            ));
        }
        Ok(available - self.height)
    }
}

/// Applies the report margins and draws the footer on every new page.
struct ReportPages {
    page: usize,
    margins: Margins,
    footer: Option<PageFooter>,
}

impl PageDecorator for ReportPages {
    fn decorate_page<'a>(
        &mut self,
        context: &Context,
        mut area: Area<'a>,
        style: Style,
    ) -> Result<Area<'a>, Error> {
        self.page += 1;
        area.add_margins(self.margins);
        if let Some(footer) = &self.footer {
            let content_height = footer.render(self.page, context, &area, style)?;
            area.set_height(content_height);
        }
        Ok(area)
    }
}
