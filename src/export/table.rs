use super::ExportResult;
use crate::calendar;
use crate::schedule::Session;
use chrono::{NaiveDate, Weekday};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// One line of the tabular view: 1-based index plus a running hour total.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub index: usize,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub hours: f64,
    pub cumulative: f64,
}

pub fn table_rows(sessions: &[Session]) -> Vec<TableRow> {
    let mut cumulative = 0.0;
    sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            cumulative += session.hours;
            TableRow {
                index: idx + 1,
                date: session.date,
                weekday: session.weekday,
                hours: session.hours,
                cumulative,
            }
        })
        .collect()
}

#[derive(Serialize)]
struct CsvRecord {
    #[serde(rename = "#")]
    index: usize,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Weekday")]
    weekday: &'static str,
    #[serde(rename = "Hours")]
    hours: String,
    #[serde(rename = "Cumulative")]
    cumulative: String,
}

impl From<&TableRow> for CsvRecord {
    fn from(row: &TableRow) -> Self {
        Self {
            index: row.index,
            date: calendar::format_iso_date(row.date),
            weekday: calendar::weekday_name(row.weekday),
            hours: format!("{:.2}", row.hours),
            cumulative: format!("{:.2}", row.cumulative),
        }
    }
}

fn csv_writer<W: std::io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn write_records<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    rows: &[TableRow],
) -> ExportResult<()> {
    if rows.is_empty() {
        writer.write_record(["#", "Date", "Weekday", "Hours", "Cumulative"])?;
    }
    for row in rows {
        writer.serialize(CsvRecord::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// CSV text with a `#,Date,Weekday,Hours,Cumulative` header and every field quoted.
pub fn to_csv_string(rows: &[TableRow]) -> ExportResult<String> {
    let mut writer = csv_writer(Vec::new());
    write_records(&mut writer, rows)?;
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[TableRow]) -> ExportResult<()> {
    let file = File::create(path)?;
    let mut writer = csv_writer(file);
    write_records(&mut writer, rows)
}

pub fn rows_to_dataframe(rows: &[TableRow]) -> PolarsResult<DataFrame> {
    let index: Vec<u32> = rows.iter().map(|row| row.index as u32).collect();
    let dates: Vec<i32> = rows.iter().map(|row| date_to_i32(row.date)).collect();
    let weekdays: Vec<&str> = rows
        .iter()
        .map(|row| calendar::weekday_name(row.weekday))
        .collect();
    let hours: Vec<f64> = rows.iter().map(|row| row.hours).collect();
    let cumulative: Vec<f64> = rows.iter().map(|row| row.cumulative).collect();

    let columns = vec![
        Series::new(PlSmallStr::from_static("#"), index).into_column(),
        Series::new(PlSmallStr::from_static("date"), dates)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("weekday"), weekdays).into_column(),
        Series::new(PlSmallStr::from_static("hours"), hours).into_column(),
        Series::new(PlSmallStr::from_static("cumulative"), cumulative).into_column(),
    ];
    DataFrame::new(columns)
}

/// Days since the Unix epoch, the physical representation of a polars `Date`.
pub fn date_to_i32(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

pub fn date_from_i32(days: i32) -> Option<NaiveDate> {
    calendar::add_days(unix_epoch(), i64::from(days))
}

// chrono's default date is 1970-01-01.
fn unix_epoch() -> NaiveDate {
    NaiveDate::default()
}
