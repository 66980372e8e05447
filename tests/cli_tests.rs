#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::fs;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

const BASIC_THEORY: &str = "use Automotive Tech | Basic Theory I\nstart 2025-01-06\nplan 1 3\nplan 4 3\n";

#[test]
fn cli_generates_schedule_table_and_pace() {
    let script = format!("{BASIC_THEORY}completed 6\ngenerate 2025-01-09\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("2025-01-06"))
        .stdout(str_contains("sessions=45"))
        .stdout(str_contains("on/above pace"));
}

#[test]
fn cli_rejects_generate_without_start_date() {
    run_cli("use Automotive Tech | Basic Theory I\nplan 1 3\ngenerate\nquit\n")
        .success()
        .stdout(str_contains("please choose a start date"));
}

#[test]
fn cli_rejects_plan_day_outside_course() {
    run_cli("use Automotive Tech | Basic Theory I\nstart 2025-01-06\nplan 6 4\ngenerate\nquit\n")
        .success()
        .stdout(str_contains("Sat is not an allowed day"));
}

#[test]
fn cli_blackout_moves_sessions() {
    let script = format!("{BASIC_THEORY}blackout add 2025-01-09\nblackout list\ngenerate 2025-01-20\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("Blackout 2025-01-09 added."))
        .stdout(str_contains("2025-01-16"));
}

#[test]
fn cli_exports_csv_and_ics() {
    let csv = NamedTempFile::new().expect("csv temp file");
    let ics = NamedTempFile::new().expect("ics temp file");
    let script = format!(
        "{BASIC_THEORY}time 18:30\ngenerate\nexport csv {}\nexport ics {}\nquit\n",
        csv.path().display(),
        ics.path().display()
    );
    run_cli(&script).success().stdout(str_contains("Exported csv"));

    let csv_text = fs::read_to_string(csv.path()).unwrap();
    assert!(csv_text.starts_with("\"#\",\"Date\",\"Weekday\",\"Hours\",\"Cumulative\"\n"));
    assert!(csv_text.contains("\"1\",\"2025-01-06\",\"Mon\",\"3.00\",\"3.00\""));

    let ics_text = fs::read_to_string(ics.path()).unwrap();
    assert!(ics_text.contains("DTSTART:20250106T183000"));
    assert!(ics_text.contains("SUMMARY:Automotive Tech \u{2013} Basic Theory I"));
}

#[test]
fn cli_loads_configuration_file() {
    let config = NamedTempFile::new().expect("config temp file");
    fs::write(
        config.path(),
        r#"{"timezone":"UTC","globalHolidays":[],"programs":[{"name":"Evening","courses":[{"name":"Short Course","totalHours":4,"allowedDays":[2]}]}]}"#,
    )
    .unwrap();
    let script = format!(
        "config load {}\ncourses\nstart 2025-01-07\nplan 2 3\ngenerate 2025-01-07\nquit\n",
        config.path().display()
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Configuration loaded from"))
        .stdout(str_contains("Short Course"))
        .stdout(str_contains("finish=2025-01-14"));
}

#[test]
fn cli_seeds_monday_and_thursday_where_allowed() {
    run_cli("use Automotive Tech | Basic Theory I\nplan 1 0\nplan show\nuse Welding | Intro Welding\nplan show\nquit\n")
        .success()
        .stdout(str_contains("Mon  3.00h"))
        .stdout(str_contains("Thu  3.00h"))
        .stdout(str_contains("total 6.00h/week"))
        .stdout(str_contains("total 3.00h/week"))
        .stdout(str_contains("Weekly plan is empty."));
}

#[test]
fn cli_seeded_plan_generates_without_plan_commands() {
    run_cli("use Automotive Tech | Basic Theory I\nstart 2025-01-06\ngenerate 2025-01-06\nblackout list\nquit\n")
        .success()
        .stdout(str_contains("sessions=45"))
        .stdout(str_contains("No blackout dates."));
}

#[test]
fn cli_blackout_list_counts_dates() {
    run_cli("blackout add 2025-01-09\nblackout add 2025-01-13\nblackout add 2025-01-09\nblackout list\nquit\n")
        .success()
        .stdout(str_contains("2 blackout date(s):"));
}
