use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

pub mod ics;
pub mod table;

pub use ics::{
    BatchUidSource, CalendarEvent, EventOptions, UidSource, batch_token, calendar_events, ics_duration,
    render_ics, write_ics,
};
pub use table::{TableRow, rows_to_dataframe, table_rows, to_csv_string, write_csv};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("exported text was not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// `Basic Theory I` becomes `Basic_Theory_I`.
pub fn file_stem(course_name: &str) -> String {
    course_name.replace(' ', "_")
}

pub fn csv_file_name(course_name: &str) -> String {
    format!("{}_schedule.csv", file_stem(course_name))
}

pub fn ics_file_name(course_name: &str) -> String {
    format!("{}.ics", file_stem(course_name))
}
