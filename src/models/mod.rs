//! Domain models for a proposal deck.
//!
//! # Core Concepts
//!
//! Every entity is an immutable value object. The layout engine only ever
//! reads them and derives new geometry; nothing here carries behavior beyond
//! constructors and JSON mapping.
//!
//! - [`ProposalData`]: the full proposal, one field per deck [`Section`].
//! - [`Timeline`] / [`Phase`]: phased project plan measured in weeks.
//! - [`Hierarchy`] / [`EscalationNode`] / [`EscalationLink`]: the risk
//!   escalation graph, where a link means "`from_id` reports to `to_id`".
//! - [`ScopeFeature`]: an unbounded list of features, paginated across slides.
//! - [`TeamMember`]: team composition entries grouped by [`RoleType`].
//!
//! JSON field names follow camelCase (`startWeek`, `clientName`, ...) and
//! missing collections default to empty, so half-edited proposals still load.

mod cover;
mod proposal;
mod risk;
mod scope;
mod team;
mod timeline;

pub use cover::*;
pub use proposal::*;
pub use risk::*;
pub use scope::*;
pub use team::*;
pub use timeline::*;

/// Generate a fresh opaque identifier for constructed entities.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
