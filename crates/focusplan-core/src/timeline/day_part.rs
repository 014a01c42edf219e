//! Day-part inference from deadline clock values.
//!
//! Text intake encodes "do it in the afternoon" as a deadline at a canonical
//! clock time (18:00 for afternoon, 23:00 for evening, ...). The scheduler
//! turns such a deadline back into a time-of-day band that candidate slots
//! must also respect. The marker table lives here only, and the band is
//! derived once per task into a [`TaskConstraint`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// A named part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    Morning,
    Midday,
    Afternoon,
    Evening,
    FullDay,
}

impl DayPart {
    pub const ALL: [DayPart; 5] = [
        DayPart::Morning,
        DayPart::Midday,
        DayPart::Afternoon,
        DayPart::Evening,
        DayPart::FullDay,
    ];

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Clock time a deadline carries when it stands for this day part.
    pub fn deadline_marker(&self) -> NaiveTime {
        match self {
            DayPart::Morning => Self::hm(12, 0),
            DayPart::Midday => Self::hm(13, 0),
            DayPart::Afternoon => Self::hm(18, 0),
            DayPart::Evening => Self::hm(23, 0),
            DayPart::FullDay => Self::hm(23, 59),
        }
    }

    /// The band on `date` that placements must fall into.
    pub fn band_on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let (start, end) = match self {
            DayPart::Morning => (Self::hm(9, 0), Self::hm(12, 0)),
            DayPart::Midday => (Self::hm(12, 0), Self::hm(13, 0)),
            DayPart::Afternoon => (Self::hm(14, 0), Self::hm(18, 0)),
            DayPart::Evening => (Self::hm(18, 0), Self::hm(23, 0)),
            DayPart::FullDay => {
                let start = date.and_time(NaiveTime::MIN);
                return (start, start + Duration::days(1));
            }
        };
        (date.and_time(start), date.and_time(end))
    }

    /// Deadline on `date` for this day part.
    pub fn deadline_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.deadline_marker())
    }

    /// Day part whose marker is nearest to `time`, within `tolerance_minutes`.
    ///
    /// A tolerance of zero demands an exact match, seconds included.
    pub fn from_deadline(time: NaiveTime, tolerance_minutes: u32) -> Option<Self> {
        let tolerance = Duration::minutes(i64::from(tolerance_minutes));
        Self::ALL
            .iter()
            .map(|part| {
                let distance = part.deadline_marker() - time;
                (part, if distance < Duration::zero() { -distance } else { distance })
            })
            .filter(|(_, distance)| *distance <= tolerance)
            .min_by_key(|(_, distance)| *distance)
            .map(|(part, _)| *part)
    }

    /// Parse a period keyword such as `"afternoon"` or `"all day"`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "morning" | "am" => Some(DayPart::Morning),
            "midday" | "noon" | "lunch" | "lunchtime" => Some(DayPart::Midday),
            "afternoon" | "pm" => Some(DayPart::Afternoon),
            "evening" | "night" | "tonight" => Some(DayPart::Evening),
            "full day" | "full_day" | "all day" | "whole day" | "anytime" | "day" => {
                Some(DayPart::FullDay)
            }
            _ => None,
        }
    }
}

/// How deadline clock values are mapped to day parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPartInference {
    /// Deadlines never imply a band
    Disabled,
    /// Markers must match exactly
    Exact,
    /// Markers match within this many minutes
    Within(u32),
}

impl Default for DayPartInference {
    fn default() -> Self {
        DayPartInference::Exact
    }
}

impl DayPartInference {
    pub fn infer(&self, deadline: NaiveDateTime) -> Option<DayPart> {
        match self {
            DayPartInference::Disabled => None,
            DayPartInference::Exact => DayPart::from_deadline(deadline.time(), 0),
            DayPartInference::Within(minutes) => DayPart::from_deadline(deadline.time(), *minutes),
        }
    }
}

/// Placement limits of one flexible task, derived once before assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskConstraint {
    /// Task deadline, or the end of the search window
    pub deadline: NaiveDateTime,
    /// Band inferred from the task's own deadline
    pub day_part: Option<DayPart>,
}

impl TaskConstraint {
    pub fn derive(task: &Task, search_end: NaiveDateTime, inference: DayPartInference) -> Self {
        match task.deadline {
            Some(deadline) => Self {
                deadline,
                day_part: inference.infer(deadline),
            },
            None => Self {
                deadline: search_end,
                day_part: None,
            },
        }
    }

    /// Earliest start and latest end allowed on `date`.
    pub fn window_on(&self, date: NaiveDate) -> (Option<NaiveDateTime>, NaiveDateTime) {
        match self.day_part {
            Some(part) => {
                let (band_start, band_end) = part.band_on(date);
                (Some(band_start), band_end.min(self.deadline))
            }
            None => (None, self.deadline),
        }
    }
}
