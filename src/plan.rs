use crate::calendar::{self, ALL_WEEKDAYS};
use crate::course::Course;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("select at least one allowed day and set hours")]
    EmptyPlan,
    #[error("{weekday} is not an allowed day for course '{course}'")]
    DayNotAllowed { weekday: Weekday, course: String },
    #[error(transparent)]
    Calendar(#[from] calendar::CalendarError),
}

/// Hours per occurrence for each weekday the learner intends to attend.
///
/// Only positive, finite hours are stored; a weekday without an entry is simply
/// absent from the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u8, f64>", into = "BTreeMap<u8, f64>")]
pub struct WeeklyPlan {
    hours: [Option<f64>; 7],
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Weekday, f64)>,
    {
        let mut plan = Self::new();
        for (weekday, hours) in entries {
            plan.set(weekday, hours);
        }
        plan
    }

    /// Set the hours for `weekday`. Non-positive or non-finite hours clear the entry.
    pub fn set(&mut self, weekday: Weekday, hours: f64) {
        let slot = &mut self.hours[weekday.num_days_from_monday() as usize];
        *slot = if hours.is_finite() && hours > 0.0 {
            Some(hours)
        } else {
            None
        };
    }

    pub fn remove(&mut self, weekday: Weekday) {
        self.hours[weekday.num_days_from_monday() as usize] = None;
    }

    pub fn clear(&mut self) {
        self.hours = [None; 7];
    }

    pub fn hours_for(&self, weekday: Weekday) -> Option<f64> {
        self.hours[weekday.num_days_from_monday() as usize]
    }

    pub fn days(&self) -> Vec<Weekday> {
        ALL_WEEKDAYS
            .iter()
            .copied()
            .filter(|wd| self.hours_for(*wd).is_some())
            .collect()
    }

    pub fn entries(&self) -> Vec<(Weekday, f64)> {
        ALL_WEEKDAYS
            .iter()
            .filter_map(|wd| self.hours_for(*wd).map(|h| (*wd, h)))
            .collect()
    }

    pub fn weekly_total(&self) -> f64 {
        self.hours.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.iter().all(Option::is_none)
    }

    /// Reject plans that cannot drive a schedule for `course`.
    pub fn validate_for(&self, course: &Course) -> Result<(), PlanError> {
        if self.is_empty() {
            return Err(PlanError::EmptyPlan);
        }
        if let Some(weekday) = self.days().into_iter().find(|wd| !course.allows(*wd)) {
            return Err(PlanError::DayNotAllowed {
                weekday,
                course: course.name.clone(),
            });
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<u8, f64>> for WeeklyPlan {
    type Error = PlanError;

    fn try_from(value: BTreeMap<u8, f64>) -> Result<Self, Self::Error> {
        let mut plan = Self::new();
        for (number, hours) in value {
            plan.set(calendar::weekday_from_number(number)?, hours);
        }
        Ok(plan)
    }
}

impl From<WeeklyPlan> for BTreeMap<u8, f64> {
    fn from(plan: WeeklyPlan) -> Self {
        plan.entries()
            .into_iter()
            .map(|(wd, hours)| (calendar::weekday_number(wd), hours))
            .collect()
    }
}
