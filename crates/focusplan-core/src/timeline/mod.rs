//! Free-time discovery on the calendar.
//!
//! This module provides:
//! - Free slot search across days, working-hour and no-disturb windows
//! - Day-part bands inferred from deadline clock values

mod day_part;
mod free_slot;

pub use day_part::{DayPart, DayPartInference, TaskConstraint};
pub use free_slot::{find_free_slots, FreeSlot, FreeSlotFinder};
