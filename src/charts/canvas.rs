//! Raster drawing surface for the charts.
//!
//! Shapes go through `imageproc`; text is laid out with `rusttype` and blended
//! onto the canvas by glyph coverage. A canvas without fonts still draws every
//! shape and silently skips text.

use std::f32::consts::PI;
use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use log::warn;
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::error::ReportError;
use crate::fonts;
use crate::theme::Swatch;

/// Regular and bold faces used for chart text.
pub struct ChartFonts {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl ChartFonts {
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> Option<Self> {
        Some(Self {
            regular: Font::try_from_vec(regular)?,
            bold: Font::try_from_vec(bold)?,
        })
    }

    /// Loads the faces of the resolved font family, if there is one.
    pub fn discover() -> Option<Self> {
        let files = match fonts::resolve_font_files() {
            Ok(files) => files,
            Err(err) => {
                warn!("Charts will be drawn without text: {}", err);
                return None;
            }
        };
        match files.read_chart_faces() {
            Ok((regular, bold)) => {
                let faces = Self::from_bytes(regular, bold);
                if faces.is_none() {
                    warn!("Font family '{}' could not be parsed for charts", files.family);
                }
                faces
            }
            Err(err) => {
                warn!("Failed to read chart fonts: {}", err);
                None
            }
        }
    }

    fn face(&self, weight: Weight) -> &Font<'static> {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// Horizontal anchor of a text run relative to its x coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Font size, weight and colour of a text run. Sizes are in pixels.
#[derive(Clone, Copy, Debug)]
pub struct Ink {
    pub size: f32,
    pub weight: Weight,
    pub color: Swatch,
}

impl Ink {
    pub fn new(size: f32, weight: Weight, color: Swatch) -> Self {
        Self {
            size,
            weight,
            color,
        }
    }
}

/// One arc of a ring, in degrees clockwise from twelve o'clock.
#[derive(Clone, Copy, Debug)]
pub struct Arc {
    pub start: f32,
    pub sweep: f32,
    pub color: Swatch,
}

pub struct Canvas<'f> {
    image: RgbImage,
    fonts: Option<&'f ChartFonts>,
}

impl<'f> Canvas<'f> {
    pub fn new(width: u32, height: u32, background: Swatch, fonts: Option<&'f ChartFonts>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background.pixel()),
            fonts,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Axis-aligned rectangle; degenerate sizes draw nothing.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Swatch) {
        let (w, h) = (width.round() as i64, height.round() as i64);
        if w <= 0 || h <= 0 {
            return;
        }
        let rect = Rect::at(x.round() as i32, y.round() as i32).of_size(w as u32, h as u32);
        draw_filled_rect_mut(&mut self.image, rect, color.pixel());
    }

    /// A straight stroke `thickness` pixels wide.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), thickness: f32, color: Swatch) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return;
        }
        let (nx, ny) = (-dy / length, dx / length);
        let strokes = thickness.round().max(1.0) as i32;
        for step in 0..strokes {
            let offset = step as f32 - (strokes - 1) as f32 / 2.0;
            draw_line_segment_mut(
                &mut self.image,
                (from.0 + nx * offset, from.1 + ny * offset),
                (to.0 + nx * offset, to.1 + ny * offset),
                color.pixel(),
            );
        }
    }

    /// A dashed stroke made of `dash`-long segments separated by `gap`.
    pub fn dashed_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: Swatch,
        dash: f32,
        gap: f32,
    ) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON || dash <= 0.0 {
            return;
        }
        let (ux, uy) = (dx / length, dy / length);
        let mut travelled = 0.0;
        while travelled < length {
            let end = (travelled + dash).min(length);
            self.line(
                (from.0 + ux * travelled, from.1 + uy * travelled),
                (from.0 + ux * end, from.1 + uy * end),
                thickness,
                color,
            );
            travelled = end + gap.max(0.0);
        }
    }

    /// Filled polygon; consecutive duplicates and a closing point are dropped.
    pub fn polygon(&mut self, points: &[(f32, f32)], color: Swatch) {
        let mut vertices: Vec<Point<i32>> = Vec::with_capacity(points.len());
        for &(x, y) in points {
            let vertex = Point::new(x.round() as i32, y.round() as i32);
            if vertices.last() != Some(&vertex) {
                vertices.push(vertex);
            }
        }
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() >= 3 {
            draw_polygon_mut(&mut self.image, &vertices, color.pixel());
        }
    }

    pub fn circle(&mut self, center: (f32, f32), radius: f32, color: Swatch) {
        if radius < 0.5 {
            return;
        }
        draw_filled_circle_mut(
            &mut self.image,
            (center.0.round() as i32, center.1.round() as i32),
            radius.round() as i32,
            color.pixel(),
        );
    }

    /// Paints the annulus between `inner` and `outer` radius with `arcs`.
    pub fn ring(&mut self, center: (f32, f32), outer: f32, inner: f32, arcs: &[Arc]) {
        let (cx, cy) = center;
        let x0 = (cx - outer).floor().max(0.0) as u32;
        let y0 = (cy - outer).floor().max(0.0) as u32;
        let x1 = ((cx + outer).ceil() as u32).min(self.width());
        let y1 = ((cy + outer).ceil() as u32).min(self.height());
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let radius = (dx * dx + dy * dy).sqrt();
                if radius > outer || radius < inner {
                    continue;
                }
                let angle = clock_angle(dx, dy);
                if let Some(arc) = arcs
                    .iter()
                    .find(|arc| angle >= arc.start && angle < arc.start + arc.sweep)
                {
                    self.image.put_pixel(x, y, arc.color.pixel());
                }
            }
        }
    }

    fn layout(&self, text: &str, ink: Ink, x: f32, baseline: f32) -> Vec<PositionedGlyph<'f>> {
        match self.fonts {
            Some(fonts) => fonts
                .face(ink.weight)
                .layout(text, Scale::uniform(ink.size), point(x, baseline))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Advance width of `text` in pixels; zero without fonts.
    pub fn text_width(&self, text: &str, ink: Ink) -> f32 {
        self.layout(text, ink, 0.0, 0.0)
            .last()
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Draws `text` vertically centred on `y`.
    pub fn text(&mut self, x: f32, y: f32, text: &str, ink: Ink, anchor: Anchor) {
        let Some(fonts) = self.fonts else {
            return;
        };
        let metrics = fonts.face(ink.weight).v_metrics(Scale::uniform(ink.size));
        let baseline = y + (metrics.ascent + metrics.descent) / 2.0;
        let width = self.text_width(text, ink);
        let start = match anchor {
            Anchor::Start => x,
            Anchor::Middle => x - width / 2.0,
            Anchor::End => x - width,
        };

        let color = ink.color.pixel();
        let (canvas_width, canvas_height) = (self.width() as i32, self.height() as i32);
        for glyph in self.layout(text, ink, start, baseline) {
            let Some(bounds) = glyph.pixel_bounding_box() else {
                continue;
            };
            let image = &mut self.image;
            glyph.draw(|gx, gy, coverage| {
                let px = bounds.min.x + gx as i32;
                let py = bounds.min.y + gy as i32;
                if px < 0 || py < 0 || px >= canvas_width || py >= canvas_height {
                    return;
                }
                let pixel = image.get_pixel_mut(px as u32, py as u32);
                *pixel = blend(*pixel, color, coverage);
            });
        }
    }

    /// Draws `text` reading bottom to top, centred on column `x`.
    ///
    /// `Anchor::End` puts the end of the text at `y`, `Anchor::Start` its
    /// beginning. Only inked pixels are copied, so the background must match.
    pub fn vertical_text(&mut self, x: f32, y: f32, text: &str, ink: Ink, anchor: Anchor, background: Swatch) {
        let width = self.text_width(text, ink).ceil() as u32 + 2;
        let height = (ink.size * 1.4).ceil() as u32;
        if width <= 2 || height == 0 {
            return;
        }
        let mut strip = Canvas::new(width, height, background, self.fonts);
        strip.text(1.0, height as f32 / 2.0, text, ink, Anchor::Start);
        let rotated = image::imageops::rotate270(strip.image());

        let left = (x - rotated.width() as f32 / 2.0).round() as i64;
        let top = match anchor {
            Anchor::Start => y - rotated.height() as f32,
            Anchor::Middle => y - rotated.height() as f32 / 2.0,
            Anchor::End => y,
        }
        .round() as i64;
        let paper = background.pixel();
        for (rx, ry, pixel) in rotated.enumerate_pixels() {
            if *pixel == paper {
                continue;
            }
            let (px, py) = (left + i64::from(rx), top + i64::from(ry));
            if px >= 0 && py >= 0 && px < i64::from(self.width()) && py < i64::from(self.height()) {
                self.image.put_pixel(px as u32, py as u32, *pixel);
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        self.image
            .save(path)
            .map_err(|err| ReportError::render(format!("Failed to write {}: {}", path.display(), err)))
    }
}

/// Angle of `(dx, dy)` in degrees clockwise from twelve o'clock, in `[0, 360)`.
fn clock_angle(dx: f32, dy: f32) -> f32 {
    let degrees = dx.atan2(-dy) * 180.0 / PI;
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

fn blend(base: Rgb<u8>, ink: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let coverage = coverage.clamp(0.0, 1.0);
    let mix = |b: u8, i: u8| {
        (f32::from(b) * (1.0 - coverage) + f32::from(i) * coverage).round() as u8
    };
    Rgb([
        mix(base[0], ink[0]),
        mix(base[1], ink[1]),
        mix(base[2], ink[2]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Swatch = Swatch::rgb(255, 255, 255);
    const RED: Swatch = Swatch::rgb(220, 53, 69);

    #[test]
    fn clock_angles_start_at_twelve() {
        assert!(clock_angle(0.0, -1.0).abs() < 1e-4);
        assert!((clock_angle(1.0, 0.0) - 90.0).abs() < 1e-4);
        assert!((clock_angle(0.0, 1.0) - 180.0).abs() < 1e-4);
        assert!((clock_angle(-1.0, 0.0) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn rect_and_degenerate_rect() {
        let mut canvas = Canvas::new(10, 10, WHITE, None);
        canvas.fill_rect(2.0, 2.0, 3.0, 3.0, RED);
        canvas.fill_rect(0.0, 0.0, 0.0, 5.0, RED);
        assert_eq!(*canvas.image().get_pixel(3, 3), RED.pixel());
        assert_eq!(*canvas.image().get_pixel(0, 0), WHITE.pixel());
    }

    #[test]
    fn ring_respects_sweep_and_hole() {
        let mut canvas = Canvas::new(100, 100, WHITE, None);
        let arcs = [Arc {
            start: 0.0,
            sweep: 90.0,
            color: RED,
        }];
        canvas.ring((50.0, 50.0), 40.0, 20.0, &arcs);
        // Upper right quadrant, inside the band.
        assert_eq!(*canvas.image().get_pixel(70, 30), RED.pixel());
        // Lower left quadrant is outside the sweep.
        assert_eq!(*canvas.image().get_pixel(30, 70), WHITE.pixel());
        // Centre is the hole.
        assert_eq!(*canvas.image().get_pixel(50, 50), WHITE.pixel());
    }

    #[test]
    fn text_without_fonts_is_skipped() {
        let mut canvas = Canvas::new(20, 20, WHITE, None);
        let ink = Ink::new(12.0, Weight::Bold, RED);
        canvas.text(10.0, 10.0, "42%", ink, Anchor::Middle);
        assert_eq!(canvas.text_width("42%", ink), 0.0);
        assert!(canvas.image().pixels().all(|pixel| *pixel == WHITE.pixel()));
    }

    #[test]
    fn degenerate_polygons_are_ignored() {
        let mut canvas = Canvas::new(10, 10, WHITE, None);
        canvas.polygon(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)], RED);
        canvas.polygon(&[(0.0, 0.0), (9.0, 0.0), (9.0, 9.0), (0.0, 0.0)], RED);
        assert_eq!(*canvas.image().get_pixel(8, 1), RED.pixel());
    }

    #[test]
    fn blend_mixes_by_coverage() {
        let base = Rgb([255, 255, 255]);
        let ink = Rgb([0, 0, 0]);
        assert_eq!(blend(base, ink, 0.0), base);
        assert_eq!(blend(base, ink, 1.0), ink);
        assert_eq!(blend(base, ink, 0.5), Rgb([128, 128, 128]));
    }
}
