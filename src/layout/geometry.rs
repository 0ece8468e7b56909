//! Slide-space geometry shared by every layout function and both renderers.
//!
//! Positions are fractions of the slide (0.0 is the left/top edge, 1.0 the
//! right/bottom edge). Layout code works in inches against
//! [`SlideDimensions`] and converts through [`SlideFrame`]; renderers scale
//! the fractions to their own units.

use serde::{Deserialize, Serialize};

/// Nominal physical slide size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for SlideDimensions {
    /// 16:9 widescreen.
    fn default() -> Self {
        Self {
            width: 13.33,
            height: 7.5,
            margin: 0.6,
        }
    }
}

impl SlideDimensions {
    /// Width available between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.width - self.margin * 2.0
    }
}

/// An axis-aligned rectangle in slide-space fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// A line segment in slide-space fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    pub fn midpoint(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Bounding box of the segment.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            (self.x2 - self.x1).abs(),
            (self.y2 - self.y1).abs(),
        )
    }
}

/// What an element depicts. Renderers choose colors, fonts and shapes per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    SlideTitle,
    TitleAccent,

    BrandMark,
    CoverTitle,
    CoverDescription,
    CoverClient,
    ClientLogo { data_uri: String },
    FooterRule,

    Card,
    NumberBadge,
    CardTitle,
    CardBody,
    StatementBanner,
    StatementText,

    CheckBadge,
    PointText,

    FeatureAccent,
    FeatureHeader,
    FeatureBody,

    RoleHeader,
    MemberCard,
    MemberIcon,
    MemberSeniority,
    MemberRole,
    CountBadge,

    MonthLabel,
    MonthDivider,
    HeaderRule,
    PhaseLabel,
    RowShade,
    PhaseBar { color: String },
    LegendSwatch { color: String },
    LegendLabel,

    Connector { segment: Segment },
    ConnectorLabel,
    Node { root: bool },
    NodeRole { root: bool },
    NodeName { root: bool },
}

impl ElementKind {
    /// Stable snake_case name, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SlideTitle => "slide_title",
            Self::TitleAccent => "title_accent",
            Self::BrandMark => "brand_mark",
            Self::CoverTitle => "cover_title",
            Self::CoverDescription => "cover_description",
            Self::CoverClient => "cover_client",
            Self::ClientLogo { .. } => "client_logo",
            Self::FooterRule => "footer_rule",
            Self::Card => "card",
            Self::NumberBadge => "number_badge",
            Self::CardTitle => "card_title",
            Self::CardBody => "card_body",
            Self::StatementBanner => "statement_banner",
            Self::StatementText => "statement_text",
            Self::CheckBadge => "check_badge",
            Self::PointText => "point_text",
            Self::FeatureAccent => "feature_accent",
            Self::FeatureHeader => "feature_header",
            Self::FeatureBody => "feature_body",
            Self::RoleHeader => "role_header",
            Self::MemberCard => "member_card",
            Self::MemberIcon => "member_icon",
            Self::MemberSeniority => "member_seniority",
            Self::MemberRole => "member_role",
            Self::CountBadge => "count_badge",
            Self::MonthLabel => "month_label",
            Self::MonthDivider => "month_divider",
            Self::HeaderRule => "header_rule",
            Self::PhaseLabel => "phase_label",
            Self::RowShade => "row_shade",
            Self::PhaseBar { .. } => "phase_bar",
            Self::LegendSwatch { .. } => "legend_swatch",
            Self::LegendLabel => "legend_label",
            Self::Connector { .. } => "connector",
            Self::ConnectorLabel => "connector_label",
            Self::Node { .. } => "node",
            Self::NodeRole { .. } => "node_role",
            Self::NodeName { .. } => "node_name",
        }
    }
}

/// One positioned item on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub rect: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Element {
    pub fn shape(kind: ElementKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            label: None,
        }
    }

    pub fn text(kind: ElementKind, rect: Rect, label: impl Into<String>) -> Self {
        Self {
            kind,
            rect,
            label: Some(label.into()),
        }
    }
}

/// Converts inch-based placement into slide-space fractions.
#[derive(Debug, Clone, Copy)]
pub struct SlideFrame {
    pub dims: SlideDimensions,
}

impl SlideFrame {
    pub fn new(dims: SlideDimensions) -> Self {
        Self { dims }
    }

    pub fn x(&self, inches: f64) -> f64 {
        inches / self.dims.width
    }

    pub fn y(&self, inches: f64) -> f64 {
        inches / self.dims.height
    }

    pub fn rect(&self, x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(self.x(x), self.y(y), self.x(w), self.y(h))
    }

    /// A rect offset by `dx`/`dy` inches from `origin`'s top-left corner.
    pub fn within(&self, origin: &Rect, dx: f64, dy: f64, w: f64, h: f64) -> Rect {
        Rect::new(
            origin.left + self.x(dx),
            origin.top + self.y(dy),
            self.x(w),
            self.y(h),
        )
    }

    /// Width of `rect` in inches.
    pub fn width_of(&self, rect: &Rect) -> f64 {
        rect.width * self.dims.width
    }

    /// Height of `rect` in inches.
    pub fn height_of(&self, rect: &Rect) -> f64 {
        rect.height * self.dims.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_converts_inches_to_fractions() {
        let frame = SlideFrame::new(SlideDimensions {
            width: 10.0,
            height: 5.0,
            margin: 0.5,
        });
        let rect = frame.rect(1.0, 1.0, 5.0, 2.5);
        assert_eq!(rect, Rect::new(0.1, 0.2, 0.5, 0.5));
        assert!((rect.center_x() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn kind_name_matches_serialized_tag() {
        let kind = ElementKind::PhaseBar {
            color: "10B981".to_string(),
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], kind.name());
        let json = serde_json::to_value(ElementKind::CountBadge).unwrap();
        assert_eq!(json["type"], "count_badge");
    }

    #[test]
    fn segment_bounds_are_normalized() {
        let segment = Segment {
            x1: 0.6,
            y1: 0.2,
            x2: 0.4,
            y2: 0.5,
        };
        let bounds = segment.bounds();
        assert!((bounds.left - 0.4).abs() < 1e-12);
        assert!((bounds.width - 0.2).abs() < 1e-12);
        assert!((bounds.height - 0.3).abs() < 1e-12);
    }
}
