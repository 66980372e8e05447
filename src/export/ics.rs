use super::ExportResult;
use crate::schedule::Session;
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

pub const PRODID: &str = "-//Course Planner//EN";
pub const UID_DOMAIN: &str = "course-planner";
const ICS_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Source of event identifiers. Identifiers must not repeat within one export batch.
pub trait UidSource {
    fn next_uid(&mut self) -> String;
}

/// `{n}-{batch}@course-planner`, with `n` counting up from zero.
#[derive(Debug, Clone)]
pub struct BatchUidSource {
    batch: String,
    counter: usize,
}

impl BatchUidSource {
    pub fn new(batch: impl Into<String>) -> Self {
        Self {
            batch: batch.into(),
            counter: 0,
        }
    }
}

static BATCH_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Batch token for an export stamped at `dtstamp`: the millisecond timestamp plus a
/// process-wide sequence number, so two exports in the same instant never share UIDs.
pub fn batch_token(dtstamp: NaiveDateTime) -> String {
    let sequence = BATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", dtstamp.format("%Y%m%d%H%M%S%3f"), sequence)
}

impl UidSource for BatchUidSource {
    fn next_uid(&mut self) -> String {
        let uid = format!("{}-{}@{}", self.counter, self.batch, UID_DOMAIN);
        self.counter += 1;
        uid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOptions {
    pub summary: String,
    #[serde(default)]
    pub location: String,
    pub start_time: NaiveTime,
    /// Creation timestamp stamped on every event of the batch.
    pub dtstamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub dtstamp: NaiveDateTime,
    pub dtstart: NaiveDateTime,
    pub duration_minutes: i64,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

pub fn minutes_from_hours(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// `PT{h}H{m}M`, omitting zero parts. A zero-length duration becomes `PT1M`.
pub fn ics_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    if minutes == 0 {
        return "PT1M".to_string();
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    let mut out = String::from("PT");
    if hours > 0 {
        out.push_str(&format!("{hours}H"));
    }
    if rest > 0 {
        out.push_str(&format!("{rest}M"));
    }
    out
}

pub fn format_ics_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(ICS_TIMESTAMP_FORMAT).to_string()
}

pub fn calendar_events<U: UidSource>(
    sessions: &[Session],
    options: &EventOptions,
    uids: &mut U,
) -> Vec<CalendarEvent> {
    let location = Some(options.location.trim())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);
    sessions
        .iter()
        .map(|session| CalendarEvent {
            uid: uids.next_uid(),
            dtstamp: options.dtstamp,
            dtstart: session.date.and_time(options.start_time),
            duration_minutes: minutes_from_hours(session.hours),
            summary: options.summary.clone(),
            location: location.clone(),
        })
        .collect()
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

pub fn render_ics(events: &[CalendarEvent]) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
    ];
    for event in events {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", event.uid));
        lines.push(format!("DTSTAMP:{}", format_ics_timestamp(event.dtstamp)));
        lines.push(format!("DTSTART:{}", format_ics_timestamp(event.dtstart)));
        lines.push(format!("DURATION:{}", ics_duration(event.duration_minutes)));
        lines.push(format!("SUMMARY:{}", escape_text(&event.summary)));
        if let Some(location) = &event.location {
            lines.push(format!("LOCATION:{}", escape_text(location)));
        }
        lines.push("END:VEVENT".to_string());
    }
    lines.push("END:VCALENDAR".to_string());

    let mut text = lines.join("\r\n");
    text.push_str("\r\n");
    text
}

pub fn write_ics<P: AsRef<Path>>(path: P, events: &[CalendarEvent]) -> ExportResult<()> {
    fs::write(path, render_ics(events))?;
    Ok(())
}
