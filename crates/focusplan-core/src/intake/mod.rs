//! Turning translator output into validated records.
//!
//! The text-understanding service itself lives outside this crate. This
//! module fixes its contract ([`TaskTranslator`]) and does the deterministic
//! part: JSON extraction, keyword date resolution, defaults and validation.

mod draft;
mod json;
mod preference;
mod relative_date;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

pub use draft::{confidence, TaskDraft, DEFAULT_FLEXIBLE_MINUTES};
pub use json::extract_json_object;
pub use preference::{ParsedPreference, PreferenceDraft, SlotDraft};
pub use relative_date::{resolve_relative_date, RelativeDate};

use crate::error::{IntakeError, Result};
use crate::preference::UserPreference;
use crate::task::Task;
use crate::validation::{validate_preference, validate_task};

/// An external service that reads free text and answers with a JSON task.
pub trait TaskTranslator {
    /// Return the raw response text for `text`.
    ///
    /// `hint` carries the user's preference when known.
    fn translate(&self, text: &str, hint: Option<&UserPreference>) -> Result<String, IntakeError>;
}

/// A task read from free text, with how sure we are about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTask {
    pub task: Task,
    pub confidence: f64,
}

/// Normalise one raw translator response into a validated task.
pub fn parse_task_response(raw: &str, now: NaiveDateTime) -> Result<ParsedTask> {
    let object = extract_json_object(raw)?;
    let draft: TaskDraft =
        serde_json::from_str(object).map_err(|e| IntakeError::Malformed(e.to_string()))?;
    let task = draft.normalize(now)?;
    validate_task(0, &task)?;

    let confidence = confidence(&task);
    debug!(target: "focusplan::intake", title = %task.title, kind = ?task.kind, confidence, "task parsed");
    Ok(ParsedTask { task, confidence })
}

/// Normalise one raw translator response into a validated preference.
pub fn parse_preference_response(raw: &str) -> Result<ParsedPreference> {
    let object = extract_json_object(raw)?;
    let draft: PreferenceDraft =
        serde_json::from_str(object).map_err(|e| IntakeError::Malformed(e.to_string()))?;
    let parsed = draft.normalize()?;
    validate_preference(&parsed.preference)?;
    Ok(parsed)
}

/// Free text in, validated task out.
pub struct TaskIntake<T> {
    translator: T,
}

impl<T: TaskTranslator> TaskIntake<T> {
    pub fn new(translator: T) -> Self {
        Self { translator }
    }

    pub fn parse(
        &self,
        text: &str,
        hint: Option<&UserPreference>,
        now: NaiveDateTime,
    ) -> Result<ParsedTask> {
        let text = text.trim();
        if text.is_empty() {
            return Err(IntakeError::MissingField("text").into());
        }

        let raw = self.translator.translate(text, hint).map_err(|e| {
            warn!(target: "focusplan::intake", error = %e, "translator failed");
            e
        })?;
        parse_task_response(&raw, now)
    }
}
