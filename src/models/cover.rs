use serde::{Deserialize, Serialize};

use super::new_id;

/// Content of the opening slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverData {
    pub title: String,
    pub description: String,
    pub client_name: String,
    /// Client logo as a `data:` URL (e.g. `data:image/png;base64,...`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_logo_base64: Option<String>,
}

/// A single challenge card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeItem {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl ChallengeItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Challenge overview. Only the first [`ChallengeData::MAX_ITEMS`] items are laid out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeData {
    pub items: Vec<ChallengeItem>,
    /// Closing statement shown in a banner at the bottom of the slide.
    pub additional_statement: String,
}

impl ChallengeData {
    pub const MAX_ITEMS: usize = 4;
}

/// Solution overview. Only the first [`SolutionData::MAX_POINTS`] points are laid out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolutionData {
    pub points: Vec<String>,
}

impl SolutionData {
    pub const MAX_POINTS: usize = 10;
}
