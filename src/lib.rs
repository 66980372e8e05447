pub mod calendar;
pub mod config;
pub mod course;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod pace;
pub mod plan;
pub mod request;
pub mod schedule;

pub use calendar::{CalendarError, DEFAULT_START_TIME, ExclusionSet};
pub use config::{AppConfig, ConfigError};
pub use course::{Course, Program};
pub use export::{
    BatchUidSource, CalendarEvent, EventOptions, ExportError, TableRow, UidSource,
};
pub use pace::{PACE_EPSILON, PaceSnapshot, evaluate_pace};
pub use plan::{PlanError, WeeklyPlan};
pub use request::{PlanOutcome, PlanRequest, RequestError, ResolvedRequest};
pub use schedule::{DEFAULT_HORIZON_DAYS, ScheduleResult, ScheduleSummary, Scheduler, Session};
