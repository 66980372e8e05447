use crate::calendar::{ExclusionSet, weekday_as_number};
use crate::plan::WeeklyPlan;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Three years of calendar days.
pub const DEFAULT_HORIZON_DAYS: u32 = 3 * 365;

/// Remaining hours at or below this are treated as fully scheduled.
pub const HOURS_EPSILON: f64 = 1e-9;

/// One dated session produced by the [`Scheduler`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    #[serde(with = "weekday_as_number")]
    pub weekday: Weekday,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub sessions: Vec<Session>,
    pub total_hours: f64,
    pub cumulative: f64,
}

impl ScheduleResult {
    /// True once the course requirement is covered. A result that ran out of
    /// horizon first is degenerate and reports `false`.
    pub fn is_complete(&self) -> bool {
        self.cumulative >= self.total_hours - HOURS_EPSILON
    }

    pub fn remaining_hours(&self) -> f64 {
        (self.total_hours - self.cumulative).max(0.0)
    }

    pub fn projected_finish(&self) -> Option<NaiveDate> {
        self.sessions.last().map(|session| session.date)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            session_count: self.session_count(),
            first_session: self.sessions.first().map(|session| session.date),
            projected_finish: self.projected_finish(),
            total_hours: self.total_hours,
            cumulative: self.cumulative,
            complete: self.is_complete(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub session_count: usize,
    pub first_session: Option<NaiveDate>,
    pub projected_finish: Option<NaiveDate>,
    pub total_hours: f64,
    pub cumulative: f64,
    pub complete: bool,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("sessions={}", self.session_count));
        if let Some(date) = self.first_session {
            parts.push(format!("start={}", date));
        }
        if let Some(date) = self.projected_finish {
            parts.push(format!("finish={}", date));
        }
        parts.push(format!(
            "hours={:.2}/{:.2}",
            self.cumulative, self.total_hours
        ));
        if !self.complete {
            parts.push("incomplete".to_string());
        }
        parts.join(", ")
    }
}

/// Day-stepping session allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    horizon_days: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_horizon(DEFAULT_HORIZON_DAYS)
    }

    /// Scheduler that examines at most `horizon_days` calendar days starting at the start date.
    pub fn with_horizon(horizon_days: u32) -> Self {
        Self { horizon_days }
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// Walk the calendar one day at a time from `start`, placing a session on every
    /// allowed, planned and non-excluded day until `total_hours` is covered or the
    /// horizon runs out. The final session is clipped to the remaining hours.
    pub fn schedule(
        &self,
        start: NaiveDate,
        total_hours: f64,
        allowed_days: &[Weekday],
        plan: &WeeklyPlan,
        exclusions: &ExclusionSet,
    ) -> ScheduleResult {
        let mut sessions = Vec::new();
        let mut cumulative = 0.0_f64;
        let mut date = start;

        for _ in 0..self.horizon_days {
            if cumulative >= total_hours {
                break;
            }
            if let Some(planned) = Self::planned_hours(date, allowed_days, plan, exclusions) {
                let remaining = total_hours - cumulative;
                let hours = if planned >= remaining - HOURS_EPSILON {
                    cumulative = total_hours;
                    remaining
                } else {
                    cumulative += planned;
                    planned
                };
                sessions.push(Session {
                    date,
                    weekday: date.weekday(),
                    hours,
                });
            }
            // The last representable date ends the walk like an exhausted horizon.
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        let result = ScheduleResult {
            sessions,
            total_hours,
            cumulative,
        };
        debug!(
            start = %start,
            total_hours,
            sessions = result.sessions.len(),
            cumulative = result.cumulative,
            "schedule built"
        );
        if !result.is_complete() {
            warn!(
                start = %start,
                horizon_days = self.horizon_days,
                scheduled = result.cumulative,
                total_hours,
                "horizon exhausted before course hours were covered"
            );
        }
        result
    }

    fn planned_hours(
        date: NaiveDate,
        allowed_days: &[Weekday],
        plan: &WeeklyPlan,
        exclusions: &ExclusionSet,
    ) -> Option<f64> {
        let weekday = date.weekday();
        if !allowed_days.contains(&weekday) || exclusions.contains(date) {
            return None;
        }
        plan.hours_for(weekday)
    }
}
