use chrono::{Datelike, NaiveDate, Weekday};
use course_planner::{ExclusionSet, Scheduler, WeeklyPlan};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn mon_thu_plan(hours: f64) -> WeeklyPlan {
    WeeklyPlan::from_entries([(Weekday::Mon, hours), (Weekday::Thu, hours)])
}

const MON_THU: [Weekday; 2] = [Weekday::Mon, Weekday::Thu];

fn session_dates(result: &course_planner::ScheduleResult) -> Vec<(NaiveDate, f64)> {
    result.sessions.iter().map(|s| (s.date, s.hours)).collect()
}

#[test]
fn mon_thu_plan_covers_nine_hours_in_three_sessions() {
    let result = Scheduler::new().schedule(
        d(2025, 1, 6),
        9.0,
        &MON_THU,
        &mon_thu_plan(3.0),
        &ExclusionSet::new(),
    );
    assert_eq!(
        session_dates(&result),
        vec![(d(2025, 1, 6), 3.0), (d(2025, 1, 9), 3.0), (d(2025, 1, 13), 3.0)]
    );
    assert_eq!(result.cumulative, 9.0);
    assert!(result.is_complete());
    assert_eq!(result.projected_finish(), Some(d(2025, 1, 13)));
}

#[test]
fn excluded_date_pushes_session_to_next_planned_day() {
    let exclusions = ExclusionSet::from_dates([d(2025, 1, 9)]);
    let result = Scheduler::new().schedule(
        d(2025, 1, 6),
        9.0,
        &MON_THU,
        &mon_thu_plan(3.0),
        &exclusions,
    );
    assert_eq!(
        session_dates(&result),
        vec![(d(2025, 1, 6), 3.0), (d(2025, 1, 13), 3.0), (d(2025, 1, 16), 3.0)]
    );
    assert_eq!(result.cumulative, 9.0);
    assert!(result.sessions.iter().all(|s| !exclusions.contains(s.date)));
}

#[test]
fn final_session_is_clipped_to_remaining_hours() {
    let result = Scheduler::new().schedule(
        d(2025, 1, 6),
        7.0,
        &MON_THU,
        &mon_thu_plan(3.0),
        &ExclusionSet::new(),
    );
    assert_eq!(
        session_dates(&result),
        vec![(d(2025, 1, 6), 3.0), (d(2025, 1, 9), 3.0), (d(2025, 1, 13), 1.0)]
    );
    assert_eq!(result.cumulative, 7.0);

    let before_last: f64 = result.sessions[..2].iter().map(|s| s.hours).sum();
    let last = result.sessions.last().unwrap();
    assert_eq!(last.hours, 7.0 - before_last);
    assert!(last.hours < 3.0);
}

#[test]
fn plan_without_allowed_days_yields_no_sessions() {
    let plan = WeeklyPlan::from_entries([(Weekday::Tue, 2.0)]);
    let result = Scheduler::new().schedule(
        d(2025, 1, 6),
        9.0,
        &MON_THU,
        &plan,
        &ExclusionSet::new(),
    );
    assert!(result.sessions.is_empty());
    assert_eq!(result.cumulative, 0.0);
    assert!(!result.is_complete());
    assert_eq!(result.remaining_hours(), 9.0);
}

#[test]
fn horizon_bounds_the_search_and_leaves_schedule_incomplete() {
    let result = Scheduler::with_horizon(14).schedule(
        d(2025, 1, 6),
        100.0,
        &MON_THU,
        &mon_thu_plan(3.0),
        &ExclusionSet::new(),
    );
    // Two weeks starting on a Monday hold four Mon/Thu sessions.
    assert_eq!(result.sessions.len(), 4);
    assert_eq!(result.cumulative, 12.0);
    assert!(result.cumulative < result.total_hours);
    assert!(!result.is_complete());
}

#[test]
fn default_horizon_is_three_years() {
    assert_eq!(Scheduler::new().horizon_days(), 1095);
    let result = Scheduler::new().schedule(
        d(2025, 1, 6),
        10_000.0,
        &[Weekday::Mon],
        &WeeklyPlan::from_entries([(Weekday::Mon, 1.0)]),
        &ExclusionSet::new(),
    );
    let last = result.projected_finish().unwrap();
    assert!((last - d(2025, 1, 6)).num_days() < 1095);
    assert_eq!(result.sessions.len(), 157);
}

#[test]
fn fractional_hours_accumulate_without_overshoot() {
    let allowed = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];
    let plan = WeeklyPlan::from_entries(allowed.iter().map(|wd| (*wd, 0.1)));
    let result = Scheduler::new().schedule(
        d(2025, 3, 3),
        2.3,
        &allowed,
        &plan,
        &ExclusionSet::new(),
    );
    assert_eq!(result.cumulative, 2.3);
    assert_eq!(result.sessions.len(), 23);
    let sum: f64 = result.sessions.iter().map(|s| s.hours).sum();
    assert!((sum - result.cumulative).abs() < 1e-9);
    assert!(result.sessions.iter().all(|s| s.hours > 0.0));
}

#[test]
fn sessions_are_strictly_ordered_and_respect_invariants() {
    let allowed = [Weekday::Mon, Weekday::Wed, Weekday::Thu];
    let plan = WeeklyPlan::from_entries([
        (Weekday::Mon, 2.5),
        (Weekday::Wed, 4.0),
        (Weekday::Thu, 1.75),
    ]);
    let exclusions = ExclusionSet::from_dates([d(2025, 10, 20), d(2025, 11, 27), d(2025, 12, 25)]);
    let result = Scheduler::new().schedule(d(2025, 10, 1), 160.0, &allowed, &plan, &exclusions);

    assert!(result.is_complete());
    assert!(result.cumulative <= result.total_hours);
    let sum: f64 = result.sessions.iter().map(|s| s.hours).sum();
    assert!((sum - result.cumulative).abs() < 1e-9);
    for pair in result.sessions.windows(2) {
        assert!(pair[0].date < pair[1].date);
    }
    for session in &result.sessions {
        assert!(!exclusions.contains(session.date));
        assert!(allowed.contains(&session.weekday));
        assert_eq!(session.weekday, session.date.weekday());
    }
}

#[test]
fn identical_inputs_produce_identical_schedules() {
    let exclusions = ExclusionSet::from_dates([d(2025, 2, 13)]);
    let first = Scheduler::new().schedule(
        d(2025, 2, 1),
        40.0,
        &MON_THU,
        &mon_thu_plan(2.5),
        &exclusions,
    );
    let second = Scheduler::new().schedule(
        d(2025, 2, 1),
        40.0,
        &MON_THU,
        &mon_thu_plan(2.5),
        &exclusions,
    );
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn start_date_itself_is_a_candidate() {
    let result = Scheduler::new().schedule(
        d(2025, 1, 9),
        3.0,
        &MON_THU,
        &mon_thu_plan(3.0),
        &ExclusionSet::new(),
    );
    assert_eq!(session_dates(&result), vec![(d(2025, 1, 9), 3.0)]);
}

#[test]
fn session_serializes_weekday_as_number() {
    let result = Scheduler::new().schedule(
        d(2025, 1, 6),
        3.0,
        &MON_THU,
        &mon_thu_plan(3.0),
        &ExclusionSet::new(),
    );
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["sessions"][0]["date"], "2025-01-06");
    assert_eq!(json["sessions"][0]["weekday"], 1);
    assert_eq!(json["totalHours"], 3.0);
}

#[test]
fn start_at_last_representable_date_returns_degenerate_result() {
    let all_days = course_planner::calendar::ALL_WEEKDAYS;
    let plan = WeeklyPlan::from_entries(all_days.map(|wd| (wd, 3.0)));
    let result =
        Scheduler::new().schedule(NaiveDate::MAX, 9.0, &all_days, &plan, &ExclusionSet::new());
    assert_eq!(session_dates(&result), vec![(NaiveDate::MAX, 3.0)]);
    assert!(!result.is_complete());
    assert_eq!(result.remaining_hours(), 6.0);
}
