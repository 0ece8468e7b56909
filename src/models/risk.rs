use serde::{Deserialize, Serialize};

use super::new_id;

/// A person or role in the escalation matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EscalationNode {
    pub id: String,
    pub role: String,
    pub name: String,
}

impl EscalationNode {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role: role.into(),
            name: name.into(),
        }
    }

    /// Text shown as the node's main line: the name, or the role when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.role
        } else {
            &self.name
        }
    }
}

/// Directed edge: `from_id` reports (or escalates) to `to_id`.
///
/// Endpoints are expected to reference existing node ids, but dangling links
/// are tolerated since they are a normal mid-editing state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EscalationLink {
    pub from_id: String,
    pub to_id: String,
    /// Connector caption, e.g. "Reports to".
    pub label: String,
}

impl EscalationLink {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            label: label.into(),
        }
    }
}

/// The reporting graph drawn on the risk escalation slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hierarchy {
    pub nodes: Vec<EscalationNode>,
    pub links: Vec<EscalationLink>,
}
