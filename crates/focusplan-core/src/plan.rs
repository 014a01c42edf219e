//! Planning entry point and plan assembly.
//!
//! One call to [`plan`] runs the whole pipeline over caller-owned inputs:
//! fixed-task conflict check, free-slot search, flexible assignment, and
//! assembly of the final [`SchedulePlan`]. Nothing here reads the clock or
//! touches storage.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::Event;
use crate::conflict::Conflict;
use crate::preference::{UserPreference, UserStatus};
use crate::scheduler::{schedule_fixed, PriorityPolicy, PriorityScheduler};
use crate::task::Task;
use crate::timeline::{find_free_slots, DayPartInference};

/// Default planning horizon in days.
pub const DEFAULT_SEARCH_DAYS: u32 = 7;

/// Longest accepted planning horizon in days.
pub const MAX_SEARCH_DAYS: u32 = 366;

/// A task with the concrete window chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub task: Task,
    pub scheduled_start: NaiveDateTime,
    pub scheduled_end: NaiveDateTime,
    pub reason: String,
}

impl ScheduledTask {
    pub fn duration_minutes(&self) -> i64 {
        (self.scheduled_end - self.scheduled_start).num_minutes()
    }
}

/// Complete output of one planning call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePlan {
    pub scheduled_tasks: Vec<ScheduledTask>,
    pub conflicts: Vec<Conflict>,
    pub unscheduled_tasks: Vec<Task>,
    pub explanation: String,
}

/// Knobs of one planning call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanOptions {
    pub policy: PriorityPolicy,
    /// Earliest instant a flexible task may start
    pub search_start: NaiveDateTime,
    pub search_days: u32,
    pub day_part_inference: DayPartInference,
}

impl PlanOptions {
    pub fn new(search_start: NaiveDateTime) -> Self {
        Self {
            policy: PriorityPolicy::default(),
            search_start,
            search_days: DEFAULT_SEARCH_DAYS,
            day_part_inference: DayPartInference::default(),
        }
    }

    pub fn with_policy(mut self, policy: PriorityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_search_days(mut self, days: u32) -> Self {
        self.search_days = days;
        self
    }

    pub fn with_day_part_inference(mut self, inference: DayPartInference) -> Self {
        self.day_part_inference = inference;
        self
    }

    /// End of the search window. Horizons past [`MAX_SEARCH_DAYS`] are clamped.
    pub fn search_end(&self) -> NaiveDateTime {
        let days = self.search_days.min(MAX_SEARCH_DAYS);
        self.search_start
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// Collects pass results and writes the summary.
#[derive(Debug, Default)]
pub struct PlanAssembler {
    scheduled: Vec<ScheduledTask>,
    conflicts: Vec<Conflict>,
    unscheduled: Vec<Task>,
    rest_mode: bool,
    busy: bool,
}

impl PlanAssembler {
    pub fn new(status: &UserStatus) -> Self {
        Self {
            rest_mode: status.rest_mode,
            busy: status.is_busy(),
            ..Self::default()
        }
    }

    pub fn scheduled(&mut self, tasks: impl IntoIterator<Item = ScheduledTask>) -> &mut Self {
        self.scheduled.extend(tasks);
        self
    }

    pub fn conflicts(&mut self, conflicts: impl IntoIterator<Item = Conflict>) -> &mut Self {
        self.conflicts.extend(conflicts);
        self
    }

    pub fn unscheduled(&mut self, tasks: impl IntoIterator<Item = Task>) -> &mut Self {
        self.unscheduled.extend(tasks);
        self
    }

    fn explanation(&self) -> String {
        let mut parts = Vec::new();
        if self.rest_mode {
            parts.push("Rest mode is on: flexible tasks were not placed automatically".to_string());
        }
        parts.push(format!("Scheduled {}", count(self.scheduled.len(), "task")));
        if !self.conflicts.is_empty() {
            parts.push(format!("found {}", count(self.conflicts.len(), "conflict")));
        }
        if !self.unscheduled.is_empty() {
            parts.push(format!(
                "{} could not be scheduled (insufficient time or past deadline)",
                count(self.unscheduled.len(), "task")
            ));
        }
        if self.busy {
            parts.push("user is busy, flexible placement deferred accordingly".to_string());
        }
        format!("{}.", parts.join("; "))
    }

    pub fn finish(self) -> SchedulePlan {
        let explanation = self.explanation();
        SchedulePlan {
            scheduled_tasks: self.scheduled,
            conflicts: self.conflicts,
            unscheduled_tasks: self.unscheduled,
            explanation,
        }
    }
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Build a schedule plan.
///
/// Inputs are assumed valid (see [`crate::validation::validate_request`]);
/// malformed records still end up in `unscheduled_tasks` instead of failing.
pub fn plan(
    tasks: &[Task],
    events: &[Event],
    preference: &UserPreference,
    status: &UserStatus,
    options: &PlanOptions,
) -> SchedulePlan {
    let (fixed, flexible): (Vec<Task>, Vec<Task>) = tasks.iter().cloned().partition(Task::is_fixed);

    let mut assembler = PlanAssembler::new(status);
    let fixed_outcome = schedule_fixed(&fixed, events);
    let committed: Vec<Task> = fixed_outcome.scheduled.iter().map(|s| s.task.clone()).collect();
    assembler
        .scheduled(fixed_outcome.scheduled)
        .conflicts(fixed_outcome.conflicts)
        .unscheduled(fixed_outcome.unscheduled);

    if status.rest_mode {
        info!(
            target: "focusplan::plan",
            flexible = flexible.len(),
            "rest mode on, skipping flexible placement"
        );
        assembler.unscheduled(flexible);
        return assembler.finish();
    }

    let search_end = options.search_end();
    let mut slots = find_free_slots(
        options.search_start,
        search_end,
        events,
        &committed,
        preference,
        preference.min_block_unit,
    );

    let outcome = PriorityScheduler::new(preference, options.policy, search_end)
        .with_inference(options.day_part_inference)
        .schedule(&flexible, &mut slots);
    assembler.scheduled(outcome.scheduled).unscheduled(outcome.unscheduled);

    let plan = assembler.finish();
    info!(
        target: "focusplan::plan",
        scheduled = plan.scheduled_tasks.len(),
        conflicts = plan.conflicts.len(),
        unscheduled = plan.unscheduled_tasks.len(),
        policy = %options.policy,
        "plan assembled"
    );
    plan
}
