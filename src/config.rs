use crate::calendar::ExclusionSet;
use crate::course::{Course, Program};
use crate::schedule::{DEFAULT_HORIZON_DAYS, Scheduler};
use chrono::{NaiveDate, NaiveDateTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown time zone '{0}'")]
    InvalidTimezone(String),
    #[error("invalid course '{course}' in program '{program}': {reason}")]
    InvalidCourse {
        program: String,
        course: String,
        reason: String,
    },
    #[error("invalid program '{program}': {reason}")]
    InvalidProgram { program: String, reason: String },
    #[error("horizonDays must be at least 1")]
    InvalidHorizon,
    #[error("program '{0}' not found")]
    UnknownProgram(String),
    #[error("course '{course}' not found in program '{program}'")]
    UnknownCourse { program: String, course: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Administrator-maintained settings: zone, holidays and the course catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// IANA zone name. Scheduling itself works on naive dates; the zone only decides "today".
    pub timezone: String,
    #[serde(default)]
    pub global_holidays: Vec<NaiveDate>,
    #[serde(default)]
    pub programs: Vec<Program>,
    /// Overrides the scheduler's day-count ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_days: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        use Weekday::*;
        Self {
            timezone: "America/Denver".to_string(),
            global_holidays: NaiveDate::from_ymd_opt(2025, 10, 20).into_iter().collect(),
            programs: vec![
                Program::new(
                    "Automotive Tech",
                    vec![
                        Course::new("Basic Theory I", 135.0, [Mon, Thu]),
                        Course::new("Shop Practicum", 90.0, [Mon, Tue, Wed, Thu, Fri]),
                    ],
                ),
                Program::new(
                    "Welding",
                    vec![
                        Course::new("Intro Welding", 120.0, [Tue, Wed, Fri]),
                        Course::new("Adv Welding", 160.0, [Mon, Wed, Thu]),
                    ],
                ),
            ],
            horizon_days: None,
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let config: AppConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        info!(path = %path.display(), programs = config.programs.len(), "configuration loaded");
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        self.validate()?;
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.time_zone()?;
        if self.horizon_days == Some(0) {
            return Err(ConfigError::InvalidHorizon);
        }

        let mut program_names = HashSet::with_capacity(self.programs.len());
        for program in &self.programs {
            if program.name.trim().is_empty() {
                return Err(ConfigError::InvalidProgram {
                    program: program.name.clone(),
                    reason: "name must not be empty".into(),
                });
            }
            if !program_names.insert(program.name.as_str()) {
                return Err(ConfigError::InvalidProgram {
                    program: program.name.clone(),
                    reason: "duplicate program name".into(),
                });
            }

            let mut course_names = HashSet::with_capacity(program.courses.len());
            for course in &program.courses {
                let reason = if course.name.trim().is_empty() {
                    Some("name must not be empty".to_string())
                } else if !course.total_hours.is_finite() || course.total_hours <= 0.0 {
                    Some(format!(
                        "totalHours must be positive (got {})",
                        course.total_hours
                    ))
                } else if course.allowed_days.is_empty() {
                    Some("allowedDays must name at least one weekday".to_string())
                } else if !course_names.insert(course.name.as_str()) {
                    Some("duplicate course name".to_string())
                } else {
                    None
                };
                if let Some(reason) = reason {
                    return Err(ConfigError::InvalidCourse {
                        program: program.name.clone(),
                        course: course.name.clone(),
                        reason,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn time_zone(&self) -> ConfigResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn now_local(&self) -> ConfigResult<NaiveDateTime> {
        let tz = self.time_zone()?;
        Ok(Utc::now().with_timezone(&tz).naive_local())
    }

    pub fn today(&self) -> ConfigResult<NaiveDate> {
        Ok(self.now_local()?.date())
    }

    pub fn program(&self, name: &str) -> ConfigResult<&Program> {
        self.programs
            .iter()
            .find(|program| program.name == name)
            .ok_or_else(|| ConfigError::UnknownProgram(name.to_string()))
    }

    pub fn find_course(&self, program: &str, course: &str) -> ConfigResult<&Course> {
        self.program(program)?
            .course(course)
            .ok_or_else(|| ConfigError::UnknownCourse {
                program: program.to_string(),
                course: course.to_string(),
            })
    }

    /// Global holidays combined with a caller's blackout dates.
    pub fn exclusions_with(&self, blackouts: &[NaiveDate]) -> ExclusionSet {
        ExclusionSet::union(&self.global_holidays, blackouts)
    }

    pub fn scheduler(&self) -> Scheduler {
        Scheduler::with_horizon(self.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS))
    }
}
