use crate::calendar::{self, weekdays_as_numbers};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// A course from the catalog: how many hours it requires and on which weekdays it may meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    /// Required contact hours. Positive.
    pub total_hours: f64,
    /// Weekdays on which sessions are permitted, stored as 1=Mon..7=Sun.
    #[serde(with = "weekdays_as_numbers")]
    pub allowed_days: Vec<Weekday>,
}

impl Course {
    pub fn new<I>(name: impl Into<String>, total_hours: f64, allowed_days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mut days: Vec<Weekday> = allowed_days.into_iter().collect();
        days.sort_by_key(|wd| wd.num_days_from_monday());
        days.dedup();
        Self {
            name: name.into(),
            total_hours,
            allowed_days: days,
        }
    }

    pub fn allows(&self, weekday: Weekday) -> bool {
        self.allowed_days.contains(&weekday)
    }

    pub fn allowed_day_names(&self) -> String {
        self.allowed_days
            .iter()
            .map(|wd| calendar::weekday_name(*wd))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Program {
    pub fn new(name: impl Into<String>, courses: Vec<Course>) -> Self {
        Self {
            name: name.into(),
            courses,
        }
    }

    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.name == name)
    }
}
