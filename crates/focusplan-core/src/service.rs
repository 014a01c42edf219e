//! Planning over stored records.

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::Result;
use crate::plan::{plan, SchedulePlan};
use crate::storage::{Config, MemoryStore};
use crate::validation::validate_request;

/// Runs the planner on a snapshot of a [`MemoryStore`] with configured defaults.
pub struct PlanningService<'a> {
    store: &'a MemoryStore,
    config: Config,
}

impl<'a> PlanningService<'a> {
    pub fn new(store: &'a MemoryStore, config: Config) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Plan everything in the store, searching from `search_start`.
    ///
    /// A stored preference wins over the configured default.
    ///
    /// # Errors
    /// Returns a validation error if any stored record is malformed.
    pub fn plan_at(&self, search_start: NaiveDateTime) -> Result<SchedulePlan> {
        let snapshot = self.store.snapshot();
        let preference = snapshot
            .preference
            .unwrap_or_else(|| self.config.preference.clone());
        let options = self.config.plan_options(search_start);

        validate_request(&snapshot.tasks, &snapshot.events, &preference, options.search_days)?;

        info!(
            target: "focusplan::service",
            tasks = snapshot.tasks.len(),
            events = snapshot.events.len(),
            %search_start,
            "planning stored records"
        );
        Ok(plan(
            &snapshot.tasks,
            &snapshot.events,
            &preference,
            &snapshot.status,
            &options,
        ))
    }
}
