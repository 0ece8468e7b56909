//! Brand palette and per-element styling shared by both renderers.

use crate::layout::{ElementKind, SlideBackground};

pub const FONT_FACE: &str = "Arial";

pub mod palette {
    pub const DARK_NAVY: &str = "0F1B2D";
    pub const NAVY: &str = "1A2744";
    pub const TEAL: &str = "00C8C8";
    pub const WHITE: &str = "FFFFFF";
    pub const LIGHT_GRAY: &str = "F0F2F5";
    pub const MID_GRAY: &str = "8B95A5";
    pub const TEXT_DARK: &str = "1E293B";
    pub const TEXT_LIGHT: &str = "94A3B8";
    pub const ACCENT: &str = "3B82F6";
}

use palette::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Rect,
    RoundRect,
    Ellipse,
    Line,
    Picture,
}

impl Shape {
    /// DrawingML preset geometry name.
    pub fn preset(&self) -> &'static str {
        match self {
            Self::RoundRect => "roundRect",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Rect | Self::Picture => "rect",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
}

/// Visual treatment of one element. Colors are 6-digit hex without `#`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStyle {
    pub shape: Shape,
    pub fill: Option<String>,
    pub stroke: Option<&'static str>,
    pub color: &'static str,
    pub size_pt: f64,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub valign: VAlign,
}

impl ElementStyle {
    fn shape(shape: Shape, fill: &str) -> Self {
        Self {
            shape,
            fill: Some(fill.to_string()),
            ..Self::text(TEXT_DARK, 12.0)
        }
    }

    fn text(color: &'static str, size_pt: f64) -> Self {
        Self {
            shape: Shape::Rect,
            fill: None,
            stroke: None,
            color,
            size_pt,
            bold: false,
            italic: false,
            align: Align::Left,
            valign: VAlign::Middle,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    fn top(mut self) -> Self {
        self.valign = VAlign::Top;
        self
    }

    fn with_text(mut self, color: &'static str, size_pt: f64) -> Self {
        self.color = color;
        self.size_pt = size_pt;
        self
    }
}

pub fn background_color(background: SlideBackground) -> &'static str {
    match background {
        SlideBackground::Dark => DARK_NAVY,
        SlideBackground::Light => WHITE,
    }
}

/// Phase colors arrive from user data; anything that is not 6-digit hex
/// falls back to the brand teal.
pub fn phase_color(color: &str) -> &str {
    let hex = color.trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        hex
    } else {
        TEAL
    }
}

pub fn style_for(kind: &ElementKind) -> ElementStyle {
    use self::ElementStyle as S;

    match kind {
        ElementKind::SlideTitle => S::text(TEXT_DARK, 28.0).bold(),
        ElementKind::TitleAccent => S::shape(Shape::Rect, TEAL),

        ElementKind::BrandMark => S::text(TEAL, 16.0).bold(),
        ElementKind::CoverTitle => S::text(WHITE, 44.0).bold(),
        ElementKind::CoverDescription => S::text(TEXT_LIGHT, 18.0),
        ElementKind::CoverClient => S::text(TEAL, 20.0).bold(),
        ElementKind::ClientLogo { .. } => S {
            shape: Shape::Picture,
            ..S::text(WHITE, 12.0)
        },
        ElementKind::FooterRule => S::shape(Shape::Rect, TEAL),

        ElementKind::Card => S::shape(Shape::RoundRect, LIGHT_GRAY),
        ElementKind::NumberBadge => S::shape(Shape::Ellipse, TEAL)
            .with_text(WHITE, 16.0)
            .bold()
            .centered(),
        ElementKind::CardTitle => S::text(TEXT_DARK, 16.0).bold(),
        ElementKind::CardBody => S::text(MID_GRAY, 12.0).top(),
        ElementKind::StatementBanner => S::shape(Shape::RoundRect, NAVY),
        ElementKind::StatementText => S::text(WHITE, 14.0).italic(),

        ElementKind::CheckBadge => S::shape(Shape::Ellipse, TEAL)
            .with_text(WHITE, 12.0)
            .bold()
            .centered(),
        ElementKind::PointText => S::text(TEXT_DARK, 14.0),

        ElementKind::FeatureAccent => S::shape(Shape::Rect, TEAL),
        ElementKind::FeatureHeader => S::text(TEXT_DARK, 16.0).bold(),
        ElementKind::FeatureBody => S::text(MID_GRAY, 12.0).top(),

        ElementKind::RoleHeader => S::text(NAVY, 16.0).bold(),
        ElementKind::MemberCard => S::shape(Shape::RoundRect, LIGHT_GRAY),
        ElementKind::MemberIcon => S::text(TEXT_DARK, 24.0).centered(),
        ElementKind::MemberSeniority => S::text(ACCENT, 11.0).bold().centered(),
        ElementKind::MemberRole => S::text(TEXT_DARK, 12.0).centered(),
        ElementKind::CountBadge => S::shape(Shape::RoundRect, ACCENT)
            .with_text(WHITE, 11.0)
            .bold()
            .centered(),

        ElementKind::MonthLabel => S::text(MID_GRAY, 11.0).bold().centered(),
        ElementKind::MonthDivider => S::shape(Shape::Rect, LIGHT_GRAY),
        ElementKind::HeaderRule => S::shape(Shape::Rect, NAVY),
        ElementKind::PhaseLabel => S::text(TEXT_DARK, 12.0).bold(),
        ElementKind::RowShade => S::shape(Shape::Rect, LIGHT_GRAY),
        ElementKind::PhaseBar { color } => S::shape(Shape::RoundRect, phase_color(color))
            .with_text(WHITE, 10.0)
            .bold()
            .centered(),
        ElementKind::LegendSwatch { color } => S::shape(Shape::RoundRect, phase_color(color)),
        ElementKind::LegendLabel => S::text(TEXT_DARK, 10.0),

        ElementKind::Connector { .. } => S {
            shape: Shape::Line,
            stroke: Some(MID_GRAY),
            ..S::text(MID_GRAY, 9.0)
        },
        ElementKind::ConnectorLabel => S::shape(Shape::Rect, WHITE)
            .with_text(MID_GRAY, 9.0)
            .italic()
            .centered(),
        ElementKind::Node { root: true } => S::shape(Shape::RoundRect, NAVY),
        ElementKind::Node { root: false } => S {
            stroke: Some(NAVY),
            ..S::shape(Shape::RoundRect, WHITE)
        },
        ElementKind::NodeRole { root } => {
            S::text(if *root { WHITE } else { TEXT_DARK }, 13.0).bold().centered()
        }
        ElementKind::NodeName { root } => {
            S::text(if *root { TEAL } else { MID_GRAY }, 11.0).centered()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_color_accepts_hash_prefix() {
        assert_eq!(phase_color("#10B981"), "10B981");
        assert_eq!(phase_color("10b981"), "10b981");
    }

    #[test]
    fn phase_color_falls_back_to_teal() {
        assert_eq!(phase_color(""), TEAL);
        assert_eq!(phase_color("green"), TEAL);
    }

    #[test]
    fn root_nodes_are_filled() {
        let root = style_for(&ElementKind::Node { root: true });
        let child = style_for(&ElementKind::Node { root: false });
        assert_eq!(root.fill.as_deref(), Some(NAVY));
        assert_eq!(child.stroke, Some(NAVY));
    }
}
