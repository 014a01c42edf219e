//! Task model: the work items the planner places on the calendar.
//!
//! A task is either **fixed** (caller-specified `startTime`/`endTime`) or
//! **flexible** (`estimatedDuration` plus an optional `deadline`). The kind
//! decides which time fields are meaningful; the other set is ignored.

pub mod split;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use split::{TaskPart, TaskSplitter};

/// Task priority levels (P0 = highest).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Critical / urgent
    P0,
    /// High
    P1,
    /// Medium (default)
    P2,
    /// Low
    P3,
}

impl Priority {
    /// Sort rank, 0 for P0 through 3 for P3.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::P0 => 0,
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
        }
    }

    /// Parse a `"P0".."P3"` label, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "P0" => Some(Priority::P0),
            "P1" => Some(Priority::P1),
            "P2" => Some(Priority::P2),
            "P3" => Some(Priority::P3),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::P2
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.rank())
    }
}

/// Fixed (caller picks the time) or flexible (planner picks the time).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Fixed,
    Flexible,
}

impl Default for TaskKind {
    fn default() -> Self {
        TaskKind::Flexible
    }
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// A work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier, caller- or store-assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    /// Minutes of work, flexible tasks only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<u32>,
    /// Fixed tasks only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
    /// Fixed tasks only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    /// Latest allowed end, flexible tasks only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Ordered, duplicates allowed
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    /// Create a fixed task occupying `[start, end)`.
    pub fn fixed(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            kind: TaskKind::Fixed,
            start_time: Some(start),
            end_time: Some(end),
            ..Self::blank(title)
        }
    }

    /// Create a flexible task needing `minutes` of work.
    pub fn flexible(title: impl Into<String>, minutes: u32) -> Self {
        Self {
            kind: TaskKind::Flexible,
            estimated_duration: Some(minutes),
            ..Self::blank(title)
        }
    }

    fn blank(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            kind: TaskKind::default(),
            estimated_duration: None,
            start_time: None,
            end_time: None,
            deadline: None,
            priority: Priority::default(),
            status: TaskStatus::default(),
            location: None,
            tags: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDateTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_fixed(&self) -> bool {
        self.kind == TaskKind::Fixed
    }

    pub fn is_flexible(&self) -> bool {
        self.kind == TaskKind::Flexible
    }

    /// The committed window of a fixed task with both time fields set.
    pub fn fixed_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        if !self.is_fixed() {
            return None;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Identifier used in messages: the id when present, otherwise the title.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("'{}'", self.title),
        }
    }
}
