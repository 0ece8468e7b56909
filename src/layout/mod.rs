//! Backend-neutral layout engine.
//!
//! Every function here is pure: it takes model values and returns geometry in
//! slide-space fractions (see [`geometry`]). [`assemble_deck`] combines the
//! per-section layouts into a [`Deck`] that both the HTML preview and the
//! PPTX exporter render without further placement decisions.

pub mod deck;
pub mod geometry;
pub mod hierarchy;
pub mod pagination;
pub mod team;
pub mod timeline;

pub use deck::{assemble_deck, placeholder_slide, Deck, LayoutOptions, Slide, SlideBackground};
pub use geometry::{Element, ElementKind, Rect, Segment, SlideDimensions, SlideFrame};
pub use hierarchy::{layout_hierarchy, HierarchyGeometry, HierarchyLayout};
pub use pagination::{paginate, FeaturePage, FEATURES_PER_PAGE};
pub use team::{group_by_role, layout_team, OrderedGroups, TeamGroup, TeamLayout};
pub use timeline::{layout_timeline, TimelineLayout, WEEKS_PER_MONTH};
