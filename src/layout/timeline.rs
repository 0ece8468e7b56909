//! Proportional placement of timeline phases and month columns.
//!
//! All spans are fractions of the chart track (the area right of the phase
//! name column), so the same numbers drive a percentage-based preview and an
//! inch-based export.

use serde::Serialize;

use crate::models::{Timeline, DEFAULT_TOTAL_WEEKS};

/// Weeks represented by one month column.
pub const WEEKS_PER_MONTH: u32 = 4;

/// A month column header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthMarker {
    pub index: usize,
    pub label: String,
    pub left: f64,
    pub width: f64,
}

/// Horizontal span of one phase row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseBar {
    pub phase_id: String,
    pub row: usize,
    pub left: f64,
    pub width: f64,
    pub label: String,
    /// Even rows get a background band. Purely a rendering hint.
    pub shaded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub total_weeks: u32,
    pub month_markers: Vec<MonthMarker>,
    pub phase_bars: Vec<PhaseBar>,
}

/// Compute month columns and phase bars for `timeline`.
///
/// A zero `total_weeks` falls back to [`DEFAULT_TOTAL_WEEKS`]. Bars are not
/// clamped: a phase ending past the last week extends past the track.
pub fn layout_timeline(timeline: &Timeline) -> TimelineLayout {
    let total_weeks = if timeline.total_weeks == 0 {
        DEFAULT_TOTAL_WEEKS
    } else {
        timeline.total_weeks
    };
    let total = f64::from(total_weeks);

    let month_markers = (0..total_weeks.div_ceil(WEEKS_PER_MONTH))
        .map(|i| {
            let first_week = i * WEEKS_PER_MONTH;
            let span = WEEKS_PER_MONTH.min(total_weeks - first_week);
            MonthMarker {
                index: i as usize,
                label: format!("Month {}", i + 1),
                left: f64::from(first_week) / total,
                width: f64::from(span) / total,
            }
        })
        .collect();

    let phase_bars = timeline
        .phases
        .iter()
        .enumerate()
        .map(|(row, phase)| {
            let start = f64::from(phase.start_week);
            let end = f64::from(phase.end_week);
            PhaseBar {
                phase_id: phase.id.clone(),
                row,
                left: (start - 1.0) / total,
                width: (end - start + 1.0) / total,
                label: format!("W{}\u{2013}W{}", phase.start_week, phase.end_week),
                shaded: row % 2 == 0,
            }
        })
        .collect();

    TimelineLayout {
        total_weeks,
        month_markers,
        phase_bars,
    }
}
