//! Custom element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` only strokes hairlines and has no filled shapes, so header cells
//! and rules paint their bands as stacks of hairlines spaced closer than the
//! stroke width. The module also carries the image helpers used to embed
//! chart PNGs.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::{CellDecorator, FrameCellDecorator, Image, Paragraph};
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style};
use genpdf::{render, Element, Margins, Mm, Position, RenderResult, Scale, Size};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
/// Distance between the hairlines of a filled band; below the 1pt stroke width.
const FILL_STROKE_SPACING_MM: f64 = 0.2;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts typographic points to millimetres.
pub(crate) fn mm_from_pt(points: f64) -> Mm {
    mm_from_f64(points * MM_PER_INCH / 72.0)
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Vertical offsets of the hairlines that paint a band `height` tall.
///
/// The first stroke sits on the top edge and the last on the bottom edge.
pub(crate) fn fill_offsets(height: Mm) -> Vec<Mm> {
    let height = mm_to_f64(height);
    if height <= 0.0 {
        return Vec::new();
    }
    let steps = (height / FILL_STROKE_SPACING_MM).ceil() as usize;
    let mut offsets: Vec<Mm> = (0..=steps)
        .map(|step| mm_from_f64((step as f64 * FILL_STROKE_SPACING_MM).min(height)))
        .collect();
    offsets.dedup_by(|next, previous| mm_to_f64(*next) - mm_to_f64(*previous) < 1e-9);
    offsets
}

fn fill_band(area: &render::Area<'_>, width: Mm, height: Mm, color: Color) {
    let style = Style::new().with_color(color);
    for y in fill_offsets(height) {
        area.draw_line(vec![Position::new(0, y), Position::new(width, y)], style);
    }
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
///
/// The result is converted to RGB since the PDF backend rejects alpha channels.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    let decoded = reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))?;
    Ok(image::DynamicImage::ImageRgb8(decoded.to_rgb8()))
}

/// A background band painted behind a paragraph, used for table header cells.
pub struct FilledCell {
    text: Paragraph,
    fill: Color,
    padding: Mm,
}

impl FilledCell {
    pub fn new(text: Paragraph, fill: Color, padding: Mm) -> Self {
        Self {
            text,
            fill,
            padding,
        }
    }
}

impl Element for FilledCell {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let band = style.line_height(&context.font_cache) + self.padding * 2.0;
        let width = area.size().width;
        if band > area.size().height {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }

        fill_band(&area, width, band, self.fill);

        let mut inner = area.clone();
        inner.add_margins(Margins::trbl(
            self.padding,
            self.padding,
            Mm::default(),
            self.padding,
        ));
        let text = self.text.render(context, inner, style)?;

        let mut result = RenderResult::default();
        result.size = Size::new(width, band.max(text.size.height + self.padding * 2.0));
        result.has_more = text.has_more;
        Ok(result)
    }
}

/// A full-width horizontal rule with space below it.
pub struct Rule {
    color: Color,
    thickness: Mm,
    space_after: Mm,
}

impl Rule {
    pub fn new(color: Color, thickness: Mm, space_after: Mm) -> Self {
        Self {
            color,
            thickness,
            space_after,
        }
    }
}

impl Element for Rule {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let height = self.thickness + self.space_after;
        let width = area.size().width;
        if height > area.size().height {
            let mut result = RenderResult::default();
            result.has_more = true;
            return Ok(result);
        }
        fill_band(&area, width, self.thickness, self.color);
        let mut result = RenderResult::default();
        result.size = Size::new(width, height);
        Ok(result)
    }
}

/// Table frame drawn in a fixed colour instead of the table's text colour.
pub struct ColoredFrame {
    frame: FrameCellDecorator,
    color: Color,
}

impl ColoredFrame {
    pub fn new(inner: bool, outer: bool, color: Color) -> Self {
        Self {
            frame: FrameCellDecorator::new(inner, outer, false),
            color,
        }
    }
}

impl CellDecorator for ColoredFrame {
    fn set_table_size(&mut self, num_columns: usize, num_rows: usize) {
        self.frame.set_table_size(num_columns, num_rows);
    }

    fn decorate_cell(
        &mut self,
        column: usize,
        row: usize,
        has_more: bool,
        area: render::Area<'_>,
        style: Style,
    ) {
        self.frame
            .decorate_cell(column, row, has_more, area, style.with_color(self.color));
    }
}

/// Fixed vertical gap.
pub struct Gap(pub Mm);

impl Element for Gap {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let height = if self.0 > area.size().height {
            area.size().height
        } else {
            self.0
        };
        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// A chart image scaled to a fixed width.
pub struct ChartFigure {
    image: Image,
    natural_size: Size,
    width: Mm,
}

impl ChartFigure {
    /// Loads the chart at `path` and scales it to `width`, keeping the aspect ratio.
    pub fn from_path(path: impl AsRef<Path>, width: Mm) -> Result<Self, Error> {
        let dynamic = decode_image_from_path(path)?;
        let natural_size = estimated_image_size(&dynamic, DEFAULT_IMAGE_DPI);
        let image = Image::from_dynamic_image(dynamic)?;
        Ok(Self {
            image,
            natural_size,
            width,
        })
    }

    fn apply_width(&mut self) {
        let natural = mm_to_f64(self.natural_size.width);
        if natural > f64::EPSILON {
            let scale = mm_to_f64(self.width) / natural;
            self.image.set_scale(Scale::new(scale, scale));
        }
    }
}

impl Element for ChartFigure {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.apply_width();
        self.image.render(context, area, style)
    }
}
