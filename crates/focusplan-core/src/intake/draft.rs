//! Task drafts as returned by the text translator, and their normalisation.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tracing::debug;

use super::relative_date::resolve_relative_date;
use crate::error::IntakeError;
use crate::task::{Priority, Task, TaskKind, TaskStatus};
use crate::timeline::DayPart;

/// Duration given to flexible drafts that name none, minutes.
pub const DEFAULT_FLEXIBLE_MINUTES: u32 = 120;

/// Raw task fields extracted from free text.
///
/// Times arrive as keywords and clock parts; dates are resolved here, never
/// by the translator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    /// A list, or a single scalar
    #[serde(default)]
    pub tags: Option<serde_json::Value>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
    #[serde(default)]
    pub relative_date: Option<String>,
    #[serde(default)]
    pub start_hour: Option<u32>,
    #[serde(default)]
    pub start_minute: Option<u32>,
    #[serde(default)]
    pub end_hour: Option<u32>,
    #[serde(default)]
    pub end_minute: Option<u32>,
    #[serde(default)]
    pub time_period: Option<String>,
}

fn clock(date: NaiveDate, hour: u32, minute: u32) -> Result<NaiveDateTime, IntakeError> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .map(|time| date.and_time(time))
        .ok_or_else(|| IntakeError::InvalidClock(format!("{hour:02}:{minute:02}")))
}

fn tags_from(value: Option<serde_json::Value>) -> Vec<String> {
    match value {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Some(serde_json::Value::String(s)) => vec![s],
        Some(other) => vec![other.to_string()],
    }
}

impl TaskDraft {
    /// Turn the draft into a task, resolving dates against `now`.
    ///
    /// # Errors
    /// Fails on a missing title, an unknown type, a fixed draft without a
    /// start hour or with an unresolvable date, and out-of-range clock values.
    pub fn normalize(self, now: NaiveDateTime) -> Result<Task, IntakeError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(IntakeError::MissingField("title"))?;

        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => TaskKind::Flexible,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "fixed" => TaskKind::Fixed,
                "flexible" => TaskKind::Flexible,
                _ => return Err(IntakeError::InvalidType(raw.to_string())),
            },
        };

        let priority = self
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or_default();

        let today = now.date();
        let mut task = Task {
            id: None,
            title,
            description: self.description,
            kind,
            estimated_duration: None,
            start_time: None,
            end_time: None,
            deadline: None,
            priority,
            status: TaskStatus::Pending,
            location: self.location,
            tags: tags_from(self.tags),
        };

        match kind {
            TaskKind::Fixed => {
                let keyword = self.relative_date.as_deref().unwrap_or("today");
                let date = resolve_relative_date(keyword, today)
                    .ok_or_else(|| IntakeError::UnresolvedDate(keyword.to_string()))?;
                let start_hour = self.start_hour.ok_or(IntakeError::MissingField("startHour"))?;
                let start = clock(date, start_hour, self.start_minute.unwrap_or(0))?;

                let end = match (self.end_hour, self.estimated_duration) {
                    (Some(hour), _) => clock(date, hour, self.end_minute.unwrap_or(0))?,
                    (None, Some(minutes)) if minutes > 0 => start + Duration::minutes(i64::from(minutes)),
                    (None, _) => start + Duration::hours(1),
                };
                task.start_time = Some(start);
                task.end_time = Some(end);
            }
            TaskKind::Flexible => {
                let keyword = self.relative_date.as_deref().unwrap_or("today");
                let date = resolve_relative_date(keyword, today).unwrap_or_else(|| {
                    debug!(target: "focusplan::intake", keyword, "unresolved date, using tomorrow");
                    today.succ_opt().unwrap_or(today)
                });
                let part = self
                    .time_period
                    .as_deref()
                    .and_then(DayPart::from_keyword)
                    .unwrap_or(DayPart::FullDay);

                task.estimated_duration = Some(
                    self.estimated_duration
                        .filter(|m| *m > 0)
                        .unwrap_or(DEFAULT_FLEXIBLE_MINUTES),
                );
                task.deadline = Some(part.deadline_on(date));
            }
        }

        Ok(task)
    }
}

/// Heuristic confidence in a normalised task, in `[0, 1]`.
pub fn confidence(task: &Task) -> f64 {
    let mut score: f64 = 0.7;
    if task.description.as_deref().is_some_and(|d| !d.trim().is_empty()) {
        score += 0.1;
    }
    match task.kind {
        TaskKind::Fixed => {
            if task.start_time.is_some() && task.end_time.is_some() {
                score += 0.1;
            }
        }
        TaskKind::Flexible => {
            if task.estimated_duration.is_some() {
                score += 0.05;
            }
            if task.deadline.is_some() {
                score += 0.05;
            }
        }
    }
    if task.priority != Priority::P2 {
        score += 0.05;
    }
    score.clamp(0.0, 1.0)
}
