//! Priority scheduler for fixed and flexible tasks.
//!
//! This module assigns tasks to the calendar:
//! - Fixed tasks keep their times unless they conflict
//! - Flexible tasks are ordered by a priority policy and placed greedily into
//!   the first free slot that fits, consuming capacity as they go
//! - Tasks longer than the focus cap are split, and the split is placed
//!   atomically: all parts or none

mod priority;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

pub use priority::PriorityPolicy;

use crate::calendar::Event;
use crate::conflict::{scan_conflicts, Conflict};
use crate::plan::ScheduledTask;
use crate::preference::UserPreference;
use crate::task::{Task, TaskSplitter};
use crate::timeline::{DayPartInference, FreeSlot, TaskConstraint};

/// Reason recorded for fixed tasks that keep their times.
pub const FIXED_REASON: &str = "fixed time task";

/// Result of the fixed-task pass.
#[derive(Debug, Clone, Default)]
pub struct FixedOutcome {
    pub scheduled: Vec<ScheduledTask>,
    pub conflicts: Vec<Conflict>,
    pub unscheduled: Vec<Task>,
}

/// Result of the flexible-task pass.
#[derive(Debug, Clone, Default)]
pub struct FlexibleOutcome {
    pub scheduled: Vec<ScheduledTask>,
    pub unscheduled: Vec<Task>,
}

/// Conflict-check fixed tasks against events and each other.
///
/// Conflict-free tasks are scheduled at their own times. Every task involved
/// in a conflict, on either side, goes to `unscheduled`; each overlapping
/// pair is reported once. Tasks missing a time field are unscheduled too.
pub fn schedule_fixed(fixed_tasks: &[Task], events: &[Event]) -> FixedOutcome {
    let scanned = scan_conflicts(fixed_tasks, events);

    let mut involved = vec![false; fixed_tasks.len()];
    for hit in &scanned {
        involved[hit.task_index] = true;
        if let Some(other) = hit.other_task_index {
            involved[other] = true;
        }
    }

    let mut outcome = FixedOutcome {
        conflicts: scanned.into_iter().map(|hit| hit.conflict).collect(),
        ..FixedOutcome::default()
    };

    for (task, conflicted) in fixed_tasks.iter().zip(involved) {
        match task.fixed_window() {
            Some((start, end)) if !conflicted => outcome.scheduled.push(ScheduledTask {
                task: task.clone(),
                scheduled_start: start,
                scheduled_end: end,
                reason: FIXED_REASON.to_string(),
            }),
            _ => outcome.unscheduled.push(task.clone()),
        }
    }

    debug!(
        target: "focusplan::scheduler",
        fixed = fixed_tasks.len(),
        conflicts = outcome.conflicts.len(),
        "fixed task pass finished"
    );
    outcome
}

/// Greedy first-fit scheduler for flexible tasks.
pub struct PriorityScheduler<'a> {
    preference: &'a UserPreference,
    policy: PriorityPolicy,
    inference: DayPartInference,
    search_end: NaiveDateTime,
}

impl<'a> PriorityScheduler<'a> {
    /// Create a scheduler; tasks without a deadline must end by `search_end`.
    pub fn new(preference: &'a UserPreference, policy: PriorityPolicy, search_end: NaiveDateTime) -> Self {
        Self {
            preference,
            policy,
            inference: DayPartInference::default(),
            search_end,
        }
    }

    pub fn with_inference(mut self, inference: DayPartInference) -> Self {
        self.inference = inference;
        self
    }

    fn reason(&self) -> String {
        format!("assigned to free slot by {} policy", self.policy)
    }

    /// Tasks in the order they will claim capacity.
    pub fn order(&self, tasks: &[Task]) -> Vec<Task> {
        let mut ordered = tasks.to_vec();
        self.policy.sort(&mut ordered);
        ordered
    }

    /// Order flexible tasks and place each into `slots`.
    ///
    /// `slots` is consumed in place: whatever one task takes is gone for the
    /// tasks after it.
    pub fn schedule(&self, tasks: &[Task], slots: &mut Vec<FreeSlot>) -> FlexibleOutcome {
        let splitter = TaskSplitter::new(self.preference.max_focus_duration);
        let mut outcome = FlexibleOutcome::default();

        for task in self.order(tasks) {
            if !matches!(task.estimated_duration, Some(minutes) if minutes > 0) {
                debug!(target: "focusplan::scheduler", task = %task.label(), "no estimated duration");
                outcome.unscheduled.push(task);
                continue;
            }

            let constraint = TaskConstraint::derive(&task, self.search_end, self.inference);
            let placed = if splitter.needs_split(&task) {
                self.assign_split(&task, &splitter, &constraint, slots)
            } else {
                self.assign_single_task(&task, &constraint, slots)
                    .map(|(start, end)| {
                        vec![ScheduledTask {
                            task: task.clone(),
                            scheduled_start: start,
                            scheduled_end: end,
                            reason: self.reason(),
                        }]
                    })
            };

            match placed {
                Some(blocks) => {
                    debug!(
                        target: "focusplan::scheduler",
                        task = %task.label(),
                        blocks = blocks.len(),
                        start = %blocks[0].scheduled_start,
                        "task placed"
                    );
                    outcome.scheduled.extend(blocks);
                }
                None => {
                    info!(target: "focusplan::scheduler", task = %task.label(), "no slot before deadline");
                    outcome.unscheduled.push(task);
                }
            }
        }

        outcome
    }

    /// Place every part of a split task against a scratch copy of the pool.
    ///
    /// The copy replaces the pool only when all parts found a slot.
    fn assign_split(
        &self,
        task: &Task,
        splitter: &TaskSplitter,
        constraint: &TaskConstraint,
        slots: &mut Vec<FreeSlot>,
    ) -> Option<Vec<ScheduledTask>> {
        let mut trial = slots.clone();
        let mut placed = Vec::new();

        for part in splitter.split(task) {
            let Some((start, end)) = self.assign_single_task(&part.task, constraint, &mut trial) else {
                debug!(
                    target: "focusplan::scheduler",
                    task = %task.label(),
                    part = %part.marker(),
                    "split rolled back"
                );
                return None;
            };
            placed.push(ScheduledTask {
                reason: format!("{} ({})", self.reason(), part.marker()),
                task: part.task,
                scheduled_start: start,
                scheduled_end: end,
            });
        }

        *slots = trial;
        Some(placed)
    }

    /// Claim the first slot that fits one task and shrink the pool.
    ///
    /// A slot fits when, starting at the later of the slot start and the
    /// day-part band start, the task ends inside the slot, inside the band and
    /// no later than the deadline. The used part plus the buffer on each side
    /// is cut out; leftovers shorter than `minBlockUnit` are dropped.
    pub fn assign_single_task(
        &self,
        task: &Task,
        constraint: &TaskConstraint,
        slots: &mut Vec<FreeSlot>,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let minutes = task.estimated_duration.filter(|m| *m > 0)?;
        let duration = Duration::minutes(i64::from(minutes));
        let buffer = Duration::minutes(i64::from(self.preference.buffer_between_events));
        let min_block = Duration::minutes(i64::from(self.preference.min_block_unit));

        let (index, start, end) = slots.iter().enumerate().find_map(|(index, slot)| {
            if slot.start > constraint.deadline {
                return None;
            }
            let (earliest, latest_end) = constraint.window_on(slot.start.date());
            let start = earliest.map_or(slot.start, |band_start| band_start.max(slot.start));
            let end = start + duration;
            (end <= slot.end && end <= latest_end).then_some((index, start, end))
        })?;

        let slot = slots[index];
        let remainders: Vec<FreeSlot> = [
            FreeSlot::new(slot.start, start - buffer),
            FreeSlot::new(end + buffer, slot.end),
        ]
        .into_iter()
        .filter(|rest| rest.end - rest.start >= min_block)
        .collect();
        slots.splice(index..=index, remainders);

        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use crate::timeline::find_free_slots;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn pool(pref: &UserPreference) -> Vec<FreeSlot> {
        find_free_slots(at(6, 0, 0), at(6, 23, 0), &[], &[], pref, pref.min_block_unit)
    }

    #[test]
    fn fixed_pass_reports_each_pair_once() {
        let a = Task::fixed("A", at(6, 10, 0), at(6, 11, 0)).with_id("a");
        let b = Task::fixed("B", at(6, 10, 30), at(6, 11, 30)).with_id("b");
        let c = Task::fixed("C", at(6, 14, 0), at(6, 15, 0)).with_id("c");

        let outcome = schedule_fixed(&[a, b, c], &[]);
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.unscheduled.len(), 2);
        assert_eq!(outcome.scheduled.len(), 1);
        assert_eq!(outcome.scheduled[0].reason, FIXED_REASON);
        assert_eq!(outcome.scheduled[0].scheduled_start, at(6, 14, 0));
    }

    #[test]
    fn single_task_consumes_front_of_slot() {
        let pref = UserPreference::default();
        let mut slots = pool(&pref);
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Eisenhower, at(6, 23, 0));
        let task = Task::flexible("Write", 60);
        let constraint = TaskConstraint::derive(&task, at(6, 23, 0), DayPartInference::Exact);

        let placed = scheduler.assign_single_task(&task, &constraint, &mut slots);
        assert_eq!(placed, Some((at(6, 9, 0), at(6, 10, 0))));
        // 10:15-11:00 is left of the 09:00-11:00 slot
        assert_eq!(slots[0], FreeSlot::new(at(6, 10, 15), at(6, 11, 0)));
    }

    #[test]
    fn short_remainder_is_dropped() {
        let pref = UserPreference::default();
        let mut slots = pool(&pref);
        let before = slots.len();
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Eisenhower, at(6, 23, 0));
        let task = Task::flexible("Write", 90);
        let constraint = TaskConstraint::derive(&task, at(6, 23, 0), DayPartInference::Exact);

        scheduler.assign_single_task(&task, &constraint, &mut slots);
        assert_eq!(slots.len(), before - 1);
        assert_eq!(slots[0].start, at(6, 11, 30));
    }

    #[test]
    fn deadline_is_respected() {
        let pref = UserPreference::default();
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Eisenhower, at(6, 23, 0));
        let mut slots = pool(&pref);

        let task = Task::flexible("Early", 60).with_deadline(at(6, 9, 30));
        let constraint = TaskConstraint::derive(&task, at(6, 23, 0), DayPartInference::Exact);
        assert_eq!(scheduler.assign_single_task(&task, &constraint, &mut slots), None);
        assert_eq!(slots, pool(&pref));
    }

    #[test]
    fn afternoon_marker_restricts_band() {
        let pref = UserPreference::default();
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Eisenhower, at(6, 23, 0));
        let mut slots = pool(&pref);

        let task = Task::flexible("Report", 60).with_deadline(at(6, 18, 0));
        let constraint = TaskConstraint::derive(&task, at(6, 23, 0), DayPartInference::Exact);
        let (start, end) = scheduler.assign_single_task(&task, &constraint, &mut slots).unwrap();
        assert_eq!(start, at(6, 14, 0));
        assert_eq!(end, at(6, 15, 0));
    }

    #[test]
    fn band_start_inside_slot_keeps_leading_remainder() {
        let mut pref = UserPreference::default();
        pref.max_focus_duration = 480;
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Eisenhower, at(6, 23, 0));
        let mut slots = pool(&pref);
        assert_eq!(slots[0], FreeSlot::new(at(6, 9, 0), at(6, 17, 0)));

        let task = Task::flexible("Report", 60).with_deadline(at(6, 18, 0));
        let constraint = TaskConstraint::derive(&task, at(6, 23, 0), DayPartInference::Exact);
        let placed = scheduler.assign_single_task(&task, &constraint, &mut slots);
        assert_eq!(placed, Some((at(6, 14, 0), at(6, 15, 0))));
        assert_eq!(slots[0], FreeSlot::new(at(6, 9, 0), at(6, 13, 45)));
        assert_eq!(slots[1], FreeSlot::new(at(6, 15, 15), at(6, 17, 0)));
    }

    #[test]
    fn priority_decides_who_gets_the_first_slot() {
        let pref = UserPreference::default();
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Eisenhower, at(6, 23, 0));
        let mut slots = pool(&pref);
        let tasks = vec![
            Task::flexible("Later", 120).with_id("p3").with_priority(Priority::P3),
            Task::flexible("Now", 120).with_id("p0").with_priority(Priority::P0),
        ];

        let outcome = scheduler.schedule(&tasks, &mut slots);
        assert_eq!(outcome.scheduled[0].task.id.as_deref(), Some("p0"));
        assert_eq!(outcome.scheduled[0].scheduled_start, at(6, 9, 0));
        assert_eq!(outcome.scheduled[1].scheduled_start, at(6, 11, 30));
    }

    #[test]
    fn split_parts_are_committed_together() {
        let mut pref = UserPreference::default();
        pref.max_focus_duration = 60;
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Eisenhower, at(6, 23, 0));
        let mut slots = pool(&pref);

        let outcome = scheduler.schedule(&[Task::flexible("Thesis", 150).with_id("t")], &mut slots);
        assert!(outcome.unscheduled.is_empty());
        let minutes: i64 = outcome
            .scheduled
            .iter()
            .map(|s| (s.scheduled_end - s.scheduled_start).num_minutes())
            .sum();
        assert_eq!(minutes, 150);
        assert!(outcome.scheduled[2].reason.ends_with("(part 3/3)"));
    }

    #[test]
    fn failed_split_leaves_pool_untouched() {
        let mut pref = UserPreference::default();
        pref.max_focus_duration = 60;
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Eisenhower, at(6, 23, 0));
        let mut slots = pool(&pref);
        let original = slots.clone();

        // Morning band holds two 60-minute parts at most (09:00-10:00, 10:30-11:30)
        let task = Task::flexible("Thesis", 180).with_deadline(at(6, 12, 0));
        let outcome = scheduler.schedule(&[task.clone()], &mut slots);

        assert!(outcome.scheduled.is_empty());
        assert_eq!(outcome.unscheduled, vec![task]);
        assert_eq!(slots, original);
    }

    #[test]
    fn missing_duration_is_unscheduled() {
        let pref = UserPreference::default();
        let scheduler = PriorityScheduler::new(&pref, PriorityPolicy::Fifo, at(6, 23, 0));
        let mut slots = pool(&pref);
        let mut task = Task::flexible("Vague", 30);
        task.estimated_duration = None;

        let outcome = scheduler.schedule(&[task], &mut slots);
        assert_eq!(outcome.unscheduled.len(), 1);
    }
}
