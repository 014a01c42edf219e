//! # Focusplan Core Library
//!
//! This library provides the scheduling engine behind focusplan: it assigns
//! time to work items on a calendar. Fixed tasks keep their caller-given
//! windows; flexible tasks are placed into free time, honoring working hours,
//! no-disturb windows, deadlines, priority and a maximum focus length. The
//! `focusplan` CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Conflicts**: half-open interval overlap and conflict records
//! - **Timeline**: free slot discovery and day-part bands
//! - **Scheduler**: priority ordering, first-fit assignment and task splitting
//! - **Plan**: the `plan` entry point and summary assembly
//! - **Storage**: in-memory records and TOML-based configuration
//! - **Intake**: normalisation of text-translator output
//!
//! ## Key Components
//!
//! - [`plan()`]: one planning call over caller-owned inputs
//! - [`PriorityScheduler`]: greedy flexible-task assignment
//! - [`FreeSlotFinder`]: multi-day free time search
//! - [`Config`]: Application configuration management
//! - [`MemoryStore`]: thread-safe record store

pub mod calendar;
pub mod conflict;
pub mod error;
pub mod intake;
pub mod plan;
pub mod preference;
pub mod scheduler;
pub mod service;
pub mod storage;
pub mod task;
pub mod timeline;
pub mod validation;

pub use calendar::{overlap, Event, TimeSlot};
pub use conflict::{find_all_conflicts, find_conflicts, has_conflict, Conflict};
pub use error::{ConfigError, CoreError, IntakeError, StoreError, ValidationError};
pub use plan::{plan, PlanAssembler, PlanOptions, SchedulePlan, ScheduledTask};
pub use preference::{StatusState, UserPreference, UserStatus};
pub use scheduler::{PriorityPolicy, PriorityScheduler};
pub use service::PlanningService;
pub use storage::{Config, MemoryStore, SchedulingConfig};
pub use task::{Priority, Task, TaskKind, TaskSplitter, TaskStatus};
pub use timeline::{find_free_slots, DayPart, DayPartInference, FreeSlot, FreeSlotFinder};
pub use validation::validate_request;
