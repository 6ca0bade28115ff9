use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use pagecheck_core::domain::RecordStatus;
use pagecheck_store::repo::RecordId;
use std::path::Path;

use crate::error::invalid_input;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn parse_status(raw: &str) -> Result<RecordStatus> {
    RecordStatus::parse(raw).ok_or_else(|| {
        invalid_input(format!(
            "invalid status {raw:?}: expected not_processed|processing|processed|error"
        ))
    })
}

pub fn parse_record_id(raw: &str) -> Result<RecordId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("record id cannot be empty"));
    }
    trimmed
        .parse::<RecordId>()
        .map_err(|_| invalid_input(format!("invalid record id {raw:?}")))
}

pub fn found_label(found: bool) -> &'static str {
    if found {
        "yes"
    } else {
        "no"
    }
}

/// File name without directories or extension, for derived output names.
pub fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| invalid_input(format!("invalid file name: {}", path.display())))
}
