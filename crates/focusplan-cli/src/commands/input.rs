//! Request parsing shared by the commands.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use focusplan_core::{Event, Task, UserPreference, UserStatus};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A planning request as sent by a client.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub existing_events: Vec<Event>,
    #[serde(default)]
    pub preference: Option<UserPreference>,
    #[serde(default)]
    pub user_status: Option<UserStatus>,
    #[serde(default)]
    pub search_start: Option<NaiveDateTime>,
}

/// Read FILE, or stdin when no file (or "-") is given.
pub fn read_input(file: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()).into()),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

pub fn read_request(file: Option<PathBuf>) -> Result<PlanRequest, Box<dyn std::error::Error>> {
    let raw = read_input(file.as_deref())?;
    serde_json::from_str(&raw).map_err(|e| format!("invalid request: {e}").into())
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or ISO `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_instant(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(instant);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| format!("invalid date-time '{value}' (expected YYYY-MM-DD[THH:MM[:SS]])"))
}

/// Local wall-clock time, to the minute.
pub fn now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}
