//! Structural checks on caller input, run before the planner.

use crate::calendar::{Event, TimeSlot};
use crate::error::ValidationError;
use crate::plan::MAX_SEARCH_DAYS;
use crate::preference::{UserPreference, BUFFER_RANGE, MAX_FOCUS_RANGE, MIN_BLOCK_RANGE};
use crate::task::{Task, TaskKind};

/// Longest accepted task title, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

fn task_label(index: usize, task: &Task) -> String {
    format!("#{index} {}", task.label())
}

/// Check one task. `index` is its position in the request.
pub fn validate_task(index: usize, task: &Task) -> Result<(), ValidationError> {
    let label = || task_label(index, task);

    let chars = task.title.trim().chars().count();
    if chars == 0 || task.title.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::InvalidTitle {
            task: label(),
            max: MAX_TITLE_CHARS,
        });
    }

    match task.kind {
        TaskKind::Flexible => match task.estimated_duration {
            Some(minutes) if minutes > 0 => Ok(()),
            _ => Err(ValidationError::MissingDuration { task: label() }),
        },
        TaskKind::Fixed => match (task.start_time, task.end_time) {
            (Some(start), Some(end)) if end > start => Ok(()),
            (Some(start), Some(end)) => Err(ValidationError::InvalidTimeRange {
                item: format!("Task {}", label()),
                start,
                end,
            }),
            _ => Err(ValidationError::MissingFixedTimes { task: label() }),
        },
    }
}

pub fn validate_event(index: usize, event: &Event) -> Result<(), ValidationError> {
    if event.end_time > event.start_time {
        return Ok(());
    }
    let name = event.id.clone().unwrap_or_else(|| format!("'{}'", event.title));
    Err(ValidationError::InvalidTimeRange {
        item: format!("Event #{index} {name}"),
        start: event.start_time,
        end: event.end_time,
    })
}

fn validate_slot(kind: &str, index: usize, slot: &TimeSlot) -> Result<(), ValidationError> {
    if slot.end > slot.start {
        return Ok(());
    }
    Err(ValidationError::InvalidTimeSlot {
        item: format!("{kind} #{index}"),
        start: slot.start,
        end: slot.end,
    })
}

fn check_range(field: &str, value: u32, (min, max): (u32, u32)) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(ValidationError::OutOfRange {
        field: field.to_string(),
        value: i64::from(value),
        min: i64::from(min),
        max: i64::from(max),
    })
}

pub fn validate_preference(preference: &UserPreference) -> Result<(), ValidationError> {
    for (index, slot) in preference.working_hours.iter().enumerate() {
        validate_slot("workingHours", index, slot)?;
    }
    for (index, slot) in preference.no_disturb_slots.iter().enumerate() {
        validate_slot("noDisturbSlots", index, slot)?;
    }
    check_range("maxFocusDuration", preference.max_focus_duration, MAX_FOCUS_RANGE)?;
    check_range("minBlockUnit", preference.min_block_unit, MIN_BLOCK_RANGE)?;
    check_range("bufferBetweenEvents", preference.buffer_between_events, BUFFER_RANGE)
}

/// Planning horizon must be between one day and [`MAX_SEARCH_DAYS`].
pub fn validate_search_days(search_days: u32) -> Result<(), ValidationError> {
    check_range("searchDays", search_days, (1, MAX_SEARCH_DAYS))
}

/// Check a whole planning request. Stops at the first problem.
pub fn validate_request(
    tasks: &[Task],
    events: &[Event],
    preference: &UserPreference,
    search_days: u32,
) -> Result<(), ValidationError> {
    validate_search_days(search_days)?;
    for (index, task) in tasks.iter().enumerate() {
        validate_task(index, task)?;
    }
    for (index, event) in events.iter().enumerate() {
        validate_event(index, event)?;
    }
    validate_preference(preference)
}
