use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M";

/// Session start used when the caller leaves the time-of-day blank.
pub const DEFAULT_START_TIME: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(time) => time,
    None => panic!("09:00 is a valid time"),
};

pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid date '{input}' (expected YYYY-MM-DD)")]
    InvalidDate { input: String },
    #[error("invalid time '{input}' (expected HH:MM, 24-hour)")]
    InvalidTime { input: String },
    #[error("weekday number {0} is out of range (expected 1=Mon..7=Sun)")]
    WeekdayOutOfRange(u8),
}

pub fn parse_iso_date(input: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).map_err(|_| {
        CalendarError::InvalidDate {
            input: input.to_string(),
        }
    })
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, CalendarError> {
    NaiveTime::parse_from_str(input.trim(), TIME_OF_DAY_FORMAT).map_err(|_| {
        CalendarError::InvalidTime {
            input: input.to_string(),
        }
    })
}

/// Parse an optional `HH:MM` value, falling back to [`DEFAULT_START_TIME`] when absent or blank.
pub fn time_or_default(input: Option<&str>) -> Result<NaiveTime, CalendarError> {
    match input.map(str::trim) {
        Some(value) if !value.is_empty() => parse_time_of_day(value),
        _ => Ok(DEFAULT_START_TIME),
    }
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(TIME_OF_DAY_FORMAT).to_string()
}

pub fn weekday_from_number(number: u8) -> Result<Weekday, CalendarError> {
    match number {
        1..=7 => Ok(ALL_WEEKDAYS[usize::from(number - 1)]),
        other => Err(CalendarError::WeekdayOutOfRange(other)),
    }
}

pub fn weekday_number(weekday: Weekday) -> u8 {
    weekday.number_from_monday() as u8
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// `date` shifted by `days`, or `None` past the ends of the supported calendar.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

/// Weekday of `date` as 1=Mon..7=Sun.
pub fn iso_weekday(date: NaiveDate) -> u8 {
    weekday_number(date.weekday())
}

/// Dates on which no session may be placed: global holidays plus personal blackouts.
///
/// Built fresh for every scheduling call and never mutated while a schedule is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionSet {
    dates: HashSet<NaiveDate>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn from_iso_strings<I, S>(values: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for value in values {
            set.insert(parse_iso_date(value.as_ref())?);
        }
        Ok(set)
    }

    /// Union of global holidays and personal blackout dates.
    pub fn union(global: &[NaiveDate], personal: &[NaiveDate]) -> Self {
        Self::from_dates(global.iter().chain(personal.iter()).copied())
    }

    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.dates.remove(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn sorted(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.dates.iter().copied().collect();
        dates.sort();
        dates
    }
}

impl FromIterator<NaiveDate> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self::from_dates(iter)
    }
}

/// Serde adapter storing a `Weekday` as its 1..7 number.
pub mod weekday_as_number {
    use super::{weekday_from_number, weekday_number};
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(weekday_number(*weekday))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let number = u8::deserialize(deserializer)?;
        weekday_from_number(number).map_err(D::Error::custom)
    }
}

/// Serde adapter storing a list of weekdays as 1..7 numbers.
pub mod weekdays_as_numbers {
    use super::{weekday_from_number, weekday_number};
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error, ser::SerializeSeq};

    pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(days.len()))?;
        for day in days {
            seq.serialize_element(&weekday_number(*day))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Weekday>, D::Error> {
        let numbers = Vec::<u8>::deserialize(deserializer)?;
        numbers
            .into_iter()
            .map(|n| weekday_from_number(n).map_err(D::Error::custom))
            .collect()
    }
}
