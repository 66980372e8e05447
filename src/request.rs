use crate::calendar::{self, CalendarError, ExclusionSet};
use crate::config::{AppConfig, ConfigError};
use crate::course::Course;
use crate::export::{self, BatchUidSource, CalendarEvent, EventOptions, ExportResult, TableRow};
use crate::pace::{PaceSnapshot, evaluate_pace};
use crate::plan::{PlanError, WeeklyPlan};
use crate::schedule::{ScheduleResult, ScheduleSummary, Scheduler};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("please choose a start date")]
    MissingStartDate,
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What the form layer submits: raw strings for dates and times, plus the weekly plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub program: String,
    pub course: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub weekly_plan: WeeklyPlan,
    #[serde(default)]
    pub blackouts: Vec<String>,
    #[serde(default)]
    pub completed_hours: Option<f64>,
    #[serde(default)]
    pub reference_date: Option<String>,
}

/// A request whose inputs have all been parsed and checked against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub program: String,
    pub course: Course,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub weekly_plan: WeeklyPlan,
    pub exclusions: ExclusionSet,
    pub completed_hours: f64,
    pub reference_date: Option<NaiveDate>,
}

impl PlanRequest {
    pub fn resolve(&self, config: &AppConfig) -> Result<ResolvedRequest, RequestError> {
        let course = config.find_course(&self.program, &self.course)?.clone();

        let start_date = match self.start_date.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => calendar::parse_iso_date(value)?,
            _ => return Err(RequestError::MissingStartDate),
        };
        let start_time = calendar::time_or_default(self.start_time.as_deref())?;

        self.weekly_plan.validate_for(&course)?;

        let blackouts = self
            .blackouts
            .iter()
            .map(|value| calendar::parse_iso_date(value))
            .collect::<Result<Vec<_>, _>>()?;

        let reference_date = match self.reference_date.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => Some(calendar::parse_iso_date(value)?),
            _ => None,
        };

        Ok(ResolvedRequest {
            program: self.program.clone(),
            course,
            start_date,
            start_time,
            weekly_plan: self.weekly_plan.clone(),
            exclusions: config.exclusions_with(&blackouts),
            completed_hours: clamp_completed(self.completed_hours),
            reference_date,
        })
    }
}

fn clamp_completed(value: Option<f64>) -> f64 {
    match value {
        Some(hours) if hours.is_finite() && hours > 0.0 => hours,
        _ => 0.0,
    }
}

impl ResolvedRequest {
    /// Schedule the course and measure pace. `today` is used when the request carries
    /// no explicit reference date.
    pub fn run(&self, scheduler: &Scheduler, today: NaiveDate) -> PlanOutcome {
        let schedule = scheduler.schedule(
            self.start_date,
            self.course.total_hours,
            &self.course.allowed_days,
            &self.weekly_plan,
            &self.exclusions,
        );
        let reference_date = self.reference_date.unwrap_or(today);
        let pace = evaluate_pace(
            &schedule.sessions,
            self.course.total_hours,
            self.completed_hours,
            reference_date,
        );
        let summary = schedule.summary();
        info!(
            program = %self.program,
            course = %self.course.name,
            sessions = summary.session_count,
            complete = summary.complete,
            on_track = pace.on_track,
            "plan generated"
        );
        PlanOutcome {
            program: self.program.clone(),
            course: self.course.clone(),
            start_time: self.start_time,
            completed_hours: self.completed_hours,
            reference_date,
            schedule,
            pace,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutcome {
    pub program: String,
    pub course: Course,
    pub start_time: NaiveTime,
    pub completed_hours: f64,
    pub reference_date: NaiveDate,
    pub schedule: ScheduleResult,
    pub pace: PaceSnapshot,
    pub summary: ScheduleSummary,
}

impl PlanOutcome {
    /// `Program – Course`, used as the calendar event title.
    pub fn event_summary(&self) -> String {
        format!("{} \u{2013} {}", self.program, self.course.name)
    }

    pub fn csv_file_name(&self) -> String {
        export::csv_file_name(&self.course.name)
    }

    pub fn ics_file_name(&self) -> String {
        export::ics_file_name(&self.course.name)
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        export::table_rows(&self.schedule.sessions)
    }

    pub fn csv(&self) -> ExportResult<String> {
        export::to_csv_string(&self.table_rows())
    }

    pub fn calendar_events(&self, batch: &str, dtstamp: NaiveDateTime) -> Vec<CalendarEvent> {
        let options = EventOptions {
            summary: self.event_summary(),
            location: String::new(),
            start_time: self.start_time,
            dtstamp,
        };
        let mut uids = BatchUidSource::new(batch);
        export::calendar_events(&self.schedule.sessions, &options, &mut uids)
    }

    pub fn ics(&self, batch: &str, dtstamp: NaiveDateTime) -> String {
        export::render_ics(&self.calendar_events(batch, dtstamp))
    }
}
