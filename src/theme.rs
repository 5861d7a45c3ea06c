//! Visual theme shared by every report and chart.
//!
//! A [`Theme`] is built once per process and passed to every section builder.
//! It carries the colour palette, the named text styles and nothing else; the
//! verdict thresholds are constants since they never vary per run.

use genpdf::style::{Color, Style};

use crate::layout::HorizontalAlignment;

/// An sRGB colour usable by both the PDF and the PNG renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Swatch(pub [u8; 3]);

impl Swatch {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn pdf(self) -> Color {
        let [r, g, b] = self.0;
        Color::Rgb(r, g, b)
    }

    pub fn pixel(self) -> image::Rgb<u8> {
        image::Rgb(self.0)
    }

    /// Mixes the swatch towards white; `amount` 0 keeps it, 1 yields white.
    pub fn tint(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (f32::from(c) + (255.0 - f32::from(c)) * amount).round() as u8;
        let [r, g, b] = self.0;
        Self([mix(r), mix(g), mix(b)])
    }
}

impl From<Swatch> for Color {
    fn from(swatch: Swatch) -> Self {
        swatch.pdf()
    }
}

/// Monochrome audit palette; colour is reserved for verdict signals.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub black: Swatch,
    pub dark: Swatch,
    pub gray_dark: Swatch,
    pub gray: Swatch,
    pub gray_light: Swatch,
    pub gray_lighter: Swatch,
    pub gray_lightest: Swatch,
    pub white: Swatch,
    pub pass: Swatch,
    pub fail: Swatch,
    pub warning: Swatch,
    pub info: Swatch,
    /// Header fill of the AI category insight table.
    pub insight_header: Swatch,
    /// Header fill of the AI action item table.
    pub action_header: Swatch,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            black: Swatch::rgb(0x00, 0x00, 0x00),
            dark: Swatch::rgb(0x1a, 0x1a, 0x1a),
            gray_dark: Swatch::rgb(0x34, 0x3a, 0x40),
            gray: Swatch::rgb(0x6c, 0x75, 0x7d),
            gray_light: Swatch::rgb(0xad, 0xb5, 0xbd),
            gray_lighter: Swatch::rgb(0xde, 0xe2, 0xe6),
            gray_lightest: Swatch::rgb(0xf8, 0xf9, 0xfa),
            white: Swatch::rgb(0xff, 0xff, 0xff),
            pass: Swatch::rgb(0x28, 0xa7, 0x45),
            fail: Swatch::rgb(0xdc, 0x35, 0x45),
            warning: Swatch::rgb(0xff, 0xc1, 0x07),
            info: Swatch::rgb(0x17, 0xa2, 0xb8),
            insight_header: Swatch::rgb(0x4c, 0x1d, 0x95),
            action_header: Swatch::rgb(0x06, 0x5f, 0x46),
        }
    }
}

/// Names of the text styles used across the reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleName {
    DocTitle,
    DocSubtitle,
    Masthead,
    SectionTitle,
    SectionDesc,
    Body,
    TableHeader,
    TableCell,
    TableCellCenter,
    MetricValue,
    GradeValue,
    Verdict,
    Footer,
    Certification,
}

/// A resolved paragraph style: font size and leading in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: u8,
    pub leading: u8,
    pub bold: bool,
    pub color: Swatch,
    pub alignment: HorizontalAlignment,
}

impl TextStyle {
    /// The genpdf character style; alignment and leading are applied by the
    /// enclosing element.
    pub fn font_style(&self) -> Style {
        let mut style = Style::new().with_font_size(self.size).with_color(self.color.pdf());
        if self.bold {
            style.set_bold();
        }
        style
    }

    /// Extra space below a line, in points.
    pub fn spacing(&self) -> u8 {
        self.leading.saturating_sub(self.size)
    }
}

/// Three-tier judgement of a score against two thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verdict {
    Fail,
    Warn,
    Pass,
}

/// Lower bounds (inclusive) of the `Pass` and `Warn` tiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub pass: f64,
    pub warn: f64,
}

impl Thresholds {
    /// Score audit scale.
    pub const AUDIT: Thresholds = Thresholds {
        pass: 70.0,
        warn: 50.0,
    };
    /// Citation-rate scale used by the visibility report and charts.
    pub const VISIBILITY: Thresholds = Thresholds {
        pass: 50.0,
        warn: 30.0,
    };
}

impl Verdict {
    pub fn classify(score: f64, thresholds: Thresholds) -> Self {
        if score >= thresholds.pass {
            Verdict::Pass
        } else if score >= thresholds.warn {
            Verdict::Warn
        } else {
            Verdict::Fail
        }
    }

    /// Collapses the middle tier: anything below `Pass` reads as a failure.
    pub fn two_tier(self) -> Self {
        match self {
            Verdict::Pass => Verdict::Pass,
            Verdict::Warn | Verdict::Fail => Verdict::Fail,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Warn => "WARN",
            Verdict::Fail => "FAIL",
        }
    }
}

/// The scale a priority keyword is coloured on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriorityScale {
    /// high/medium/low as fail/warning/pass.
    Audit,
    /// high/medium/low as fail/warning/info.
    Insights,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::audit()
    }
}

impl Theme {
    /// The monochrome audit-document theme.
    pub fn audit() -> Self {
        Self {
            palette: Palette::default(),
        }
    }

    /// Looks up a named text style.
    pub fn style(&self, name: StyleName) -> TextStyle {
        let p = &self.palette;
        let text = |size, leading, color| TextStyle {
            size,
            leading,
            bold: false,
            color,
            alignment: HorizontalAlignment::Left,
        };
        match name {
            StyleName::DocTitle => TextStyle {
                bold: true,
                ..text(18, 22, p.black)
            },
            StyleName::DocSubtitle => text(9, 12, p.gray),
            StyleName::Masthead => TextStyle {
                bold: true,
                ..text(8, 10, p.gray)
            },
            StyleName::SectionTitle => TextStyle {
                bold: true,
                ..text(12, 16, p.black)
            },
            StyleName::SectionDesc => text(8, 12, p.gray),
            StyleName::Body => text(9, 13, p.dark),
            StyleName::TableHeader => TextStyle {
                bold: true,
                alignment: HorizontalAlignment::Center,
                ..text(8, 11, p.white)
            },
            StyleName::TableCell => text(8, 11, p.dark),
            StyleName::TableCellCenter => TextStyle {
                alignment: HorizontalAlignment::Center,
                ..text(8, 11, p.dark)
            },
            StyleName::MetricValue => TextStyle {
                bold: true,
                alignment: HorizontalAlignment::Center,
                ..text(20, 24, p.black)
            },
            StyleName::GradeValue => TextStyle {
                bold: true,
                alignment: HorizontalAlignment::Center,
                ..text(18, 22, p.black)
            },
            StyleName::Verdict => TextStyle {
                bold: true,
                alignment: HorizontalAlignment::Center,
                ..text(9, 12, p.black)
            },
            StyleName::Footer => TextStyle {
                alignment: HorizontalAlignment::Center,
                ..text(7, 10, p.gray_light)
            },
            StyleName::Certification => TextStyle {
                alignment: HorizontalAlignment::Center,
                ..text(9, 13, p.gray_dark)
            },
        }
    }

    pub fn verdict_color(&self, verdict: Verdict) -> Swatch {
        match verdict {
            Verdict::Pass => self.palette.pass,
            Verdict::Warn => self.palette.warning,
            Verdict::Fail => self.palette.fail,
        }
    }

    pub fn grade_color(&self, grade: &str) -> Swatch {
        match grade {
            "A+" | "A" | "B+" => self.palette.pass,
            "B" | "C+" | "C" => self.palette.warning,
            "D" | "F" => self.palette.fail,
            _ => self.palette.gray,
        }
    }

    /// Colour of a priority keyword; matching ignores case.
    pub fn priority_color(&self, priority: &str, scale: PriorityScale) -> Swatch {
        match priority.to_ascii_lowercase().as_str() {
            "high" => self.palette.fail,
            "medium" => self.palette.warning,
            "low" => match scale {
                PriorityScale::Audit => self.palette.pass,
                PriorityScale::Insights => self.palette.info,
            },
            _ => self.palette.gray,
        }
    }

    /// Green for growth, red for decline, gray when flat.
    pub fn change_color(&self, change: f64) -> Swatch {
        if change > 0.0 {
            self.palette.pass
        } else if change < 0.0 {
            self.palette.fail
        } else {
            self.palette.gray
        }
    }
}
