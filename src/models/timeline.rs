use serde::{Deserialize, Serialize};

use super::new_id;

/// Phase colors used by the preset phase names.
pub const PRESET_PHASE_COLORS: [(&str, &str); 4] = [
    ("Discovery", "6366F1"),
    ("MVP", "10B981"),
    ("Post-MVP", "F59E0B"),
    ("Maintenance", "EF4444"),
];

/// Color assigned to phases with a custom name.
pub const CUSTOM_PHASE_COLOR: &str = "8B5CF6";

/// Length of the plan when the input leaves `total_weeks` at zero.
pub const DEFAULT_TOTAL_WEEKS: u32 = 20;

/// A contiguous, inclusive range of weeks in the project plan.
///
/// Weeks are 1-based: `1 <= start_week <= end_week <= total_weeks` is the
/// expected shape, though overlapping phases are allowed (each gets its own row).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub start_week: u32,
    pub end_week: u32,
    /// Hex color token without the leading `#`.
    #[serde(alias = "colorToken")]
    pub color: String,
}

impl Phase {
    /// Create a phase, picking the preset color when `name` matches a preset.
    pub fn new(name: impl Into<String>, start_week: u32, end_week: u32) -> Self {
        let name = name.into();
        let color = preset_color(&name).unwrap_or(CUSTOM_PHASE_COLOR).to_string();
        Self {
            id: new_id(),
            name,
            start_week,
            end_week,
            color,
        }
    }
}

/// Look up the preset color for a phase name.
pub fn preset_color(name: &str) -> Option<&'static str> {
    PRESET_PHASE_COLORS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, color)| *color)
}

/// The project plan. Phase order is row order on the slide, not chronology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeline {
    pub total_weeks: u32,
    pub phases: Vec<Phase>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            total_weeks: DEFAULT_TOTAL_WEEKS,
            phases: Vec::new(),
        }
    }
}
