use serde::{Deserialize, Serialize};

use super::new_id;

/// A deliverable feature listed in the scope section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeFeature {
    pub id: String,
    pub header: String,
    pub description: String,
}

impl ScopeFeature {
    pub fn new(header: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            header: header.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeData {
    pub features: Vec<ScopeFeature>,
}
