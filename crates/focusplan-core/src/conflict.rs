//! Conflict detection for fixed-time tasks.
//!
//! Only fixed tasks with both time fields set can conflict: flexible tasks
//! have no committed time yet. Each conflict carries the clipped overlap
//! `[max(starts), min(ends))`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calendar::{overlap, Event};
use crate::task::Task;

/// Placeholder id for a task that has none yet.
pub const UNSAVED_TASK_ID: &str = "new_task";

/// An overlap between a fixed task and another event or fixed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub task_id: String,
    /// Opposing item id, or a synthesized placeholder
    pub conflict_with: String,
    pub reason: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// A conflict together with the positions of the items involved.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedConflict {
    pub task_index: usize,
    /// Set when the opposing item is another task in the same list
    pub other_task_index: Option<usize>,
    pub conflict: Conflict,
}

fn task_id(task: &Task) -> String {
    task.id.clone().unwrap_or_else(|| UNSAVED_TASK_ID.to_string())
}

fn clipped(
    a: (NaiveDateTime, NaiveDateTime),
    b: (NaiveDateTime, NaiveDateTime),
) -> (NaiveDateTime, NaiveDateTime) {
    (a.0.max(b.0), a.1.min(b.1))
}

fn against_event(task: &Task, window: (NaiveDateTime, NaiveDateTime), event: &Event) -> Option<Conflict> {
    if !overlap(window.0, window.1, event.start_time, event.end_time) {
        return None;
    }
    let (start_time, end_time) = clipped(window, (event.start_time, event.end_time));
    Some(Conflict {
        task_id: task_id(task),
        conflict_with: event
            .id
            .clone()
            .unwrap_or_else(|| format!("event_{}", event.title)),
        reason: format!("overlaps with event '{}'", event.title),
        start_time,
        end_time,
    })
}

fn against_task(task: &Task, window: (NaiveDateTime, NaiveDateTime), other: &Task) -> Option<Conflict> {
    if let (Some(a), Some(b)) = (&task.id, &other.id) {
        if a == b {
            return None;
        }
    }
    let other_window = other.fixed_window()?;
    if !overlap(window.0, window.1, other_window.0, other_window.1) {
        return None;
    }
    let (start_time, end_time) = clipped(window, other_window);
    Some(Conflict {
        task_id: task_id(task),
        conflict_with: other
            .id
            .clone()
            .unwrap_or_else(|| format!("task_{}", other.title)),
        reason: format!("overlaps with task '{}'", other.title),
        start_time,
        end_time,
    })
}

/// All conflicts between `task` and the given events and other tasks.
///
/// Flexible tasks, and fixed tasks missing a time field, yield nothing.
/// Other tasks with the same id are skipped, as are non-fixed ones.
pub fn find_conflicts(task: &Task, events: &[Event], other_tasks: &[Task]) -> Vec<Conflict> {
    let Some(window) = task.fixed_window() else {
        return Vec::new();
    };

    events
        .iter()
        .filter_map(|event| against_event(task, window, event))
        .chain(
            other_tasks
                .iter()
                .filter_map(|other| against_task(task, window, other)),
        )
        .collect()
}

/// Pairwise scan over `tasks` (each unordered pair once) plus every task
/// against every event, keeping track of which list entries are involved.
pub fn scan_conflicts(tasks: &[Task], events: &[Event]) -> Vec<IndexedConflict> {
    let mut found = Vec::new();

    for (i, task) in tasks.iter().enumerate() {
        let Some(window) = task.fixed_window() else {
            continue;
        };

        for event in events {
            if let Some(conflict) = against_event(task, window, event) {
                found.push(IndexedConflict {
                    task_index: i,
                    other_task_index: None,
                    conflict,
                });
            }
        }

        for (offset, other) in tasks[i + 1..].iter().enumerate() {
            if let Some(conflict) = against_task(task, window, other) {
                found.push(IndexedConflict {
                    task_index: i,
                    other_task_index: Some(i + 1 + offset),
                    conflict,
                });
            }
        }
    }

    found
}

/// Every conflict in a task list and against a set of events.
pub fn find_all_conflicts(tasks: &[Task], events: &[Event]) -> Vec<Conflict> {
    scan_conflicts(tasks, events)
        .into_iter()
        .map(|indexed| indexed.conflict)
        .collect()
}

/// Does `[start, end)` overlap any event or any fixed task with both times?
pub fn has_conflict(start: NaiveDateTime, end: NaiveDateTime, events: &[Event], tasks: &[Task]) -> bool {
    events.iter().any(|event| event.overlaps(start, end))
        || tasks
            .iter()
            .filter_map(Task::fixed_window)
            .any(|(task_start, task_end)| overlap(start, end, task_start, task_end))
}
