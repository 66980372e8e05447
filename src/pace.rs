use crate::schedule::Session;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tolerance applied when comparing completed hours against hours scheduled to date.
pub const PACE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaceSnapshot {
    pub scheduled_to_date: f64,
    pub pct_actual: f64,
    pub pct_expected: f64,
    pub on_track: bool,
}

impl PaceSnapshot {
    pub fn status_label(&self) -> &'static str {
        if self.on_track {
            "on/above pace"
        } else {
            "behind pace"
        }
    }

    pub fn to_cli_summary(&self, completed_hours: f64) -> String {
        format!(
            "scheduled_to_date={:.2}, completed={:.2}, expected={:.1}%, actual={:.1}%, {}",
            self.scheduled_to_date,
            completed_hours,
            self.pct_expected,
            self.pct_actual,
            self.status_label()
        )
    }
}

/// Compare the hours the schedule expected by `reference_date` with the hours reported complete.
///
/// `completed_hours` is taken as given; clamping is the caller's job.
pub fn evaluate_pace(
    sessions: &[Session],
    total_hours: f64,
    completed_hours: f64,
    reference_date: NaiveDate,
) -> PaceSnapshot {
    let scheduled_to_date: f64 = sessions
        .iter()
        .filter(|session| session.date <= reference_date)
        .map(|session| session.hours)
        .sum();

    PaceSnapshot {
        scheduled_to_date,
        pct_actual: percent_of(completed_hours, total_hours),
        pct_expected: percent_of(scheduled_to_date, total_hours),
        on_track: completed_hours + PACE_EPSILON >= scheduled_to_date,
    }
}

fn percent_of(hours: f64, total_hours: f64) -> f64 {
    if total_hours > 0.0 {
        hours / total_hours * 100.0
    } else {
        0.0
    }
}
