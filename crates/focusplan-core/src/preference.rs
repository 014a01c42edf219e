//! User scheduling preferences and current status.

use serde::{Deserialize, Serialize};

use crate::calendar::TimeSlot;

/// Allowed range for `maxFocusDuration` (minutes).
pub const MAX_FOCUS_RANGE: (u32, u32) = (1, 480);
/// Allowed range for `minBlockUnit` (minutes).
pub const MIN_BLOCK_RANGE: (u32, u32) = (1, 120);
/// Allowed range for `bufferBetweenEvents` (minutes).
pub const BUFFER_RANGE: (u32, u32) = (0, 60);

/// How the user wants their time carved up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    /// Daily windows where placement is allowed. Empty means unrestricted.
    #[serde(default = "default_working_hours")]
    pub working_hours: Vec<TimeSlot>,
    /// Daily windows where placement is forbidden.
    #[serde(default)]
    pub no_disturb_slots: Vec<TimeSlot>,
    /// Longest single contiguous block, minutes
    #[serde(default = "default_max_focus")]
    pub max_focus_duration: u32,
    /// Search stride, minutes
    #[serde(default = "default_min_block")]
    pub min_block_unit: u32,
    /// Gap enforced on both sides of any placed block, minutes
    #[serde(default = "default_buffer")]
    pub buffer_between_events: u32,
}

fn default_working_hours() -> Vec<TimeSlot> {
    TimeSlot::from_hm((9, 0), (18, 0)).into_iter().collect()
}
fn default_max_focus() -> u32 {
    120
}
fn default_min_block() -> u32 {
    30
}
fn default_buffer() -> u32 {
    15
}

impl Default for UserPreference {
    fn default() -> Self {
        Self {
            working_hours: default_working_hours(),
            no_disturb_slots: Vec::new(),
            max_focus_duration: default_max_focus(),
            min_block_unit: default_min_block(),
            buffer_between_events: default_buffer(),
        }
    }
}

impl UserPreference {
    /// One-line human summary, e.g. for echoing parsed preferences back.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.working_hours.is_empty() {
            parts.push("Working hours: unrestricted".to_string());
        } else {
            let hours: Vec<String> = self.working_hours.iter().map(ToString::to_string).collect();
            parts.push(format!("Working hours: {}", hours.join(", ")));
        }
        for slot in &self.no_disturb_slots {
            parts.push(format!("No disturb: {slot}"));
        }
        parts.push(format!("Max focus: {} min", self.max_focus_duration));
        parts.push(format!("Buffer: {} min", self.buffer_between_events));
        format!("{}.", parts.join("; "))
    }
}

/// Busy or idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Busy,
    Idle,
}

impl Default for StatusState {
    fn default() -> Self {
        StatusState::Idle
    }
}

/// What the user is doing right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    #[serde(rename = "status", default)]
    pub state: StatusState,
    /// Suppresses all automatic flexible-task placement
    #[serde(default)]
    pub rest_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_activity: Option<String>,
}

impl UserStatus {
    pub fn is_busy(&self) -> bool {
        self.state == StatusState::Busy
    }
}
