//! Free-time discovery across a multi-day, multi-window calendar.
//!
//! The finder walks each calendar day of the search window and, inside each
//! working-hour window, moves a cursor in `minBlockUnit` strides. A candidate
//! block must stay clear of no-disturb windows and must not touch any event or
//! fixed task once widened by the buffer on both sides. A clear candidate is
//! grown stride by stride into the longest clear region, capped at
//! `maxFocusDuration`.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::calendar::Event;
use crate::conflict::has_conflict;
use crate::preference::UserPreference;
use crate::task::Task;

/// A contiguous free interval, transient to one planning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FreeSlot {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this slot can fit a block of given duration
    pub fn can_fit(&self, minutes: i64) -> bool {
        self.duration_minutes() >= minutes
    }
}

/// Finds free slots according to a user's preference.
pub struct FreeSlotFinder<'a> {
    preference: &'a UserPreference,
}

impl<'a> FreeSlotFinder<'a> {
    pub fn new(preference: &'a UserPreference) -> Self {
        Self { preference }
    }

    fn stride(&self) -> Duration {
        Duration::minutes(i64::from(self.preference.min_block_unit.max(1)))
    }

    fn buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.preference.buffer_between_events))
    }

    fn max_focus(&self) -> Duration {
        Duration::minutes(i64::from(self.preference.max_focus_duration.max(1)))
    }

    /// Working-hour windows of one calendar day, sorted with overlapping or
    /// touching windows merged. No windows means the whole day.
    fn windows_on(&self, date: NaiveDate) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        if self.preference.working_hours.is_empty() {
            let start = date.and_time(chrono::NaiveTime::MIN);
            return vec![(start, start + Duration::days(1))];
        }
        let mut windows: Vec<_> = self
            .preference
            .working_hours
            .iter()
            .map(|slot| slot.on(date))
            .collect();
        windows.sort();

        let mut merged: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::with_capacity(windows.len());
        for (start, end) in windows {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        merged
    }

    fn in_no_disturb(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.preference
            .no_disturb_slots
            .iter()
            .any(|slot| slot.overlaps_interval(start, end))
    }

    /// Find free slots between `search_start` and the last day of `search_end`.
    ///
    /// # Arguments
    /// * `events` - Existing events to avoid
    /// * `fixed_tasks` - Committed fixed tasks to avoid
    /// * `min_duration_minutes` - Shortest region worth recording
    ///
    /// # Returns
    /// Slots in chronological order per day and window. Slot starts are always
    /// on a stride boundary of their working-hour window and never before
    /// `search_start`.
    pub fn find(
        &self,
        search_start: NaiveDateTime,
        search_end: NaiveDateTime,
        events: &[Event],
        fixed_tasks: &[Task],
        min_duration_minutes: u32,
    ) -> Vec<FreeSlot> {
        let stride = self.stride();
        let buffer = self.buffer();
        let max_focus = self.max_focus();
        let min_len = Duration::minutes(i64::from(min_duration_minutes.max(1)));

        let blocked = |start: NaiveDateTime, end: NaiveDateTime| {
            self.in_no_disturb(start, end) || has_conflict(start - buffer, end + buffer, events, fixed_tasks)
        };

        let mut slots: Vec<FreeSlot> = Vec::new();
        let mut date = search_start.date();

        while date <= search_end.date() {
            for (window_start, window_end) in self.windows_on(date) {
                // keep the buffer after the previous window's last slot
                let floor = slots
                    .last()
                    .map_or(search_start, |last| search_start.max(last.end + buffer));
                let mut cursor = align_up(window_start.max(floor), window_start, stride);

                while cursor + min_len <= window_end {
                    let candidate_end = cursor + min_len;
                    if blocked(cursor, candidate_end) {
                        cursor += stride;
                        continue;
                    }

                    let mut region_end = candidate_end;
                    while region_end - cursor < max_focus {
                        let next = region_end + stride;
                        if next > window_end || blocked(cursor, next) {
                            break;
                        }
                        region_end = next;
                    }
                    if region_end - cursor > max_focus {
                        region_end = cursor + max_focus;
                    }

                    slots.push(FreeSlot::new(cursor, region_end));
                    cursor = align_up(region_end + buffer, window_start, stride);
                }
            }

            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        debug!(
            target: "focusplan::free_slots",
            slots = slots.len(),
            %search_start,
            %search_end,
            "free slot search finished"
        );
        slots
    }
}

/// Smallest `origin + k * stride` (k >= 0) at or after `at`.
fn align_up(at: NaiveDateTime, origin: NaiveDateTime, stride: Duration) -> NaiveDateTime {
    if at <= origin {
        return origin;
    }
    let stride_secs = stride.num_seconds().max(1);
    let offset = (at - origin).num_seconds();
    let steps = (offset + stride_secs - 1) / stride_secs;
    origin + Duration::seconds(steps * stride_secs)
}

/// Convenience wrapper around [`FreeSlotFinder::find`].
pub fn find_free_slots(
    search_start: NaiveDateTime,
    search_end: NaiveDateTime,
    events: &[Event],
    fixed_tasks: &[Task],
    preference: &UserPreference,
    min_duration_minutes: u32,
) -> Vec<FreeSlot> {
    FreeSlotFinder::new(preference).find(search_start, search_end, events, fixed_tasks, min_duration_minutes)
}
