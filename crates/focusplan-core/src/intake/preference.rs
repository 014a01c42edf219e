use serde::Deserialize;

use crate::calendar::{clock, TimeSlot};
use crate::error::IntakeError;
use crate::preference::UserPreference;
use crate::timeline::DayPart;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SlotDraft {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Working habits extracted from free text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceDraft {
    #[serde(default)]
    pub work_start: Option<String>,
    #[serde(default)]
    pub work_end: Option<String>,
    #[serde(default)]
    pub no_disturb_slots: Vec<SlotDraft>,
    #[serde(default)]
    pub max_focus_duration: Option<u32>,
    #[serde(default)]
    pub min_block_unit: Option<u32>,
    #[serde(default)]
    pub buffer_between_events: Option<u32>,
    /// "morning", "afternoon" or "evening"
    #[serde(default)]
    pub preferred_focus_time: Option<String>,
}

/// A normalised preference plus the hints it came with.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPreference {
    pub preference: UserPreference,
    pub preferred_focus: Option<DayPart>,
}

impl ParsedPreference {
    /// The preference summary, with the focus hint when there is one.
    pub fn summary(&self) -> String {
        let base = self.preference.summary();
        match self.preferred_focus {
            Some(part) => format!("{} Most productive: {}.", base, part_name(part)),
            None => base,
        }
    }
}

fn part_name(part: DayPart) -> &'static str {
    match part {
        DayPart::Morning => "morning",
        DayPart::Midday => "midday",
        DayPart::Afternoon => "afternoon",
        DayPart::Evening => "evening",
        DayPart::FullDay => "all day",
    }
}

fn time_of_day(raw: &str) -> Result<chrono::NaiveTime, IntakeError> {
    clock::parse(raw).ok_or_else(|| IntakeError::InvalidClock(raw.to_string()))
}

impl PreferenceDraft {
    /// Fill defaults and build a [`UserPreference`].
    ///
    /// No-disturb entries missing either bound are skipped. Range checks are
    /// left to validation.
    pub fn normalize(self) -> Result<ParsedPreference, IntakeError> {
        let defaults = UserPreference::default();

        let start = time_of_day(self.work_start.as_deref().unwrap_or("09:00"))?;
        let end = time_of_day(self.work_end.as_deref().unwrap_or("18:00"))?;

        let mut no_disturb_slots = Vec::new();
        for slot in self.no_disturb_slots {
            if let (Some(start), Some(end)) = (slot.start, slot.end) {
                no_disturb_slots.push(TimeSlot::new(time_of_day(&start)?, time_of_day(&end)?));
            }
        }

        Ok(ParsedPreference {
            preference: UserPreference {
                working_hours: vec![TimeSlot::new(start, end)],
                no_disturb_slots,
                max_focus_duration: self.max_focus_duration.unwrap_or(defaults.max_focus_duration),
                min_block_unit: self.min_block_unit.unwrap_or(defaults.min_block_unit),
                buffer_between_events: self
                    .buffer_between_events
                    .unwrap_or(defaults.buffer_between_events),
            },
            preferred_focus: self.preferred_focus_time.as_deref().and_then(DayPart::from_keyword),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_gets_defaults() {
        let parsed = PreferenceDraft::default().normalize().unwrap();
        assert_eq!(parsed.preference, UserPreference::default());
        assert_eq!(parsed.preferred_focus, None);
    }

    #[test]
    fn slots_and_hints_are_kept() {
        let draft: PreferenceDraft = serde_json::from_str(
            r#"{"workStart": "08:30", "workEnd": "17:00",
                "noDisturbSlots": [{"start": "12:00", "end": "13:00", "reason": "lunch"}, {"start": "15:00"}],
                "maxFocusDuration": 60, "preferredFocusTime": "morning"}"#,
        )
        .unwrap();
        let parsed = draft.normalize().unwrap();

        assert_eq!(parsed.preference.working_hours[0].to_string(), "08:30-17:00");
        assert_eq!(parsed.preference.no_disturb_slots.len(), 1);
        assert_eq!(parsed.preference.max_focus_duration, 60);
        assert_eq!(parsed.preference.min_block_unit, 30);
        assert_eq!(parsed.preferred_focus, Some(DayPart::Morning));
        assert_eq!(
            parsed.summary(),
            "Working hours: 08:30-17:00; No disturb: 12:00-13:00; Max focus: 60 min; Buffer: 15 min. Most productive: morning."
        );
    }

    #[test]
    fn bad_clock_values_fail() {
        let draft = PreferenceDraft {
            work_start: Some("9am".to_string()),
            ..PreferenceDraft::default()
        };
        assert!(matches!(draft.normalize(), Err(IntakeError::InvalidClock(_))));
    }
}
