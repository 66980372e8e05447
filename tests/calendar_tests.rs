use chrono::{NaiveDate, NaiveTime, Weekday};
use course_planner::calendar::{
    self, CalendarError, ExclusionSet, add_days, format_iso_date, iso_weekday, parse_iso_date,
    parse_time_of_day, weekday_name,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn iso_dates_parse_and_format() {
    assert_eq!(parse_iso_date("2025-01-06").unwrap(), d(2025, 1, 6));
    assert_eq!(parse_iso_date(" 2025-10-20 ").unwrap(), d(2025, 10, 20));
    assert_eq!(format_iso_date(d(2025, 3, 9)), "2025-03-09");
    assert!(matches!(
        parse_iso_date("01/06/2025"),
        Err(CalendarError::InvalidDate { .. })
    ));
    assert!(parse_iso_date("2025-02-30").is_err());
    assert!(parse_iso_date("").is_err());
}

#[test]
fn times_are_24_hour_hh_mm() {
    assert_eq!(
        parse_time_of_day("17:45").unwrap(),
        NaiveTime::from_hms_opt(17, 45, 0).unwrap()
    );
    assert!(matches!(
        parse_time_of_day("25:00"),
        Err(CalendarError::InvalidTime { .. })
    ));
    assert!(parse_time_of_day("9am").is_err());
    assert_eq!(calendar::DEFAULT_START_TIME, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
}

#[test]
fn weekdays_are_numbered_from_monday() {
    // 2025-01-06 is a Monday, 2025-01-12 a Sunday
    assert_eq!(iso_weekday(d(2025, 1, 6)), 1);
    assert_eq!(iso_weekday(d(2025, 1, 9)), 4);
    assert_eq!(iso_weekday(d(2025, 1, 12)), 7);
    assert_eq!(weekday_name(Weekday::Thu), "Thu");
    assert_eq!(calendar::weekday_from_number(7).unwrap(), Weekday::Sun);
    assert_eq!(
        calendar::weekday_from_number(9),
        Err(CalendarError::WeekdayOutOfRange(9))
    );
}

#[test]
fn add_days_crosses_month_and_year() {
    assert_eq!(add_days(d(2024, 12, 30), 3), Some(d(2025, 1, 2)));
    assert_eq!(add_days(d(2024, 2, 28), 1), Some(d(2024, 2, 29)));
    assert_eq!(add_days(d(2025, 1, 1), -1), Some(d(2024, 12, 31)));
}

#[test]
fn add_days_past_calendar_bounds_is_none() {
    assert_eq!(add_days(NaiveDate::MAX, 1), None);
    assert_eq!(add_days(NaiveDate::MIN, -1), None);
    assert_eq!(add_days(d(2025, 1, 1), i64::MAX), None);
}

#[test]
fn exclusion_set_is_union_of_holidays_and_blackouts() {
    let global = [d(2025, 10, 20), d(2025, 12, 25)];
    let personal = [d(2025, 11, 3), d(2025, 12, 25)];
    let set = ExclusionSet::union(&global, &personal);
    assert_eq!(set.len(), 3);
    assert!(set.contains(d(2025, 11, 3)));
    assert!(set.contains(d(2025, 10, 20)));
    assert!(!set.contains(d(2025, 10, 21)));
    assert_eq!(
        set.sorted(),
        vec![d(2025, 10, 20), d(2025, 11, 3), d(2025, 12, 25)]
    );
}

#[test]
fn exclusion_set_from_strings_rejects_bad_dates() {
    let set = ExclusionSet::from_iso_strings(["2025-01-09", "2025-01-09"]).unwrap();
    assert_eq!(set.len(), 1);
    assert!(ExclusionSet::from_iso_strings(["2025-13-01"]).is_err());
}
