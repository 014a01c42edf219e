//! Splitting of flexible tasks longer than the focus cap.
//!
//! A task needing more than `maxFocusDuration` minutes becomes
//! `ceil(duration / max_focus)` parts. Every part but the last is exactly
//! `max_focus` long; the last carries the remainder, so the parts always sum
//! to the original duration.

use super::Task;

/// One piece of a split task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPart {
    /// 1-based position
    pub index: u32,
    pub total: u32,
    pub task: Task,
}

impl TaskPart {
    /// `"part i/n"`, used as tag and in the scheduling reason.
    pub fn marker(&self) -> String {
        part_marker(self.index, self.total)
    }
}

fn part_marker(index: u32, total: u32) -> String {
    format!("part {index}/{total}")
}

/// Splits oversized flexible tasks into focus-sized chunks.
#[derive(Debug, Clone, Copy)]
pub struct TaskSplitter {
    max_focus: u32,
}

impl TaskSplitter {
    pub fn new(max_focus_minutes: u32) -> Self {
        Self {
            max_focus: max_focus_minutes.max(1),
        }
    }

    /// True when the task's duration exceeds the focus cap.
    pub fn needs_split(&self, task: &Task) -> bool {
        task.estimated_duration
            .map(|minutes| minutes > self.max_focus)
            .unwrap_or(false)
    }

    /// Partition a task into parts.
    ///
    /// Each part inherits priority, deadline and tags, gains a `"part i/n"`
    /// tag and a renamed title. Tasks that fit the cap (or carry no duration)
    /// come back as a single unchanged part.
    pub fn split(&self, task: &Task) -> Vec<TaskPart> {
        let duration = match task.estimated_duration {
            Some(minutes) if minutes > self.max_focus => minutes,
            _ => {
                return vec![TaskPart {
                    index: 1,
                    total: 1,
                    task: task.clone(),
                }]
            }
        };

        let total = duration.div_ceil(self.max_focus);
        (1..=total)
            .map(|index| {
                let consumed = (index - 1) * self.max_focus;
                let minutes = (duration - consumed).min(self.max_focus);
                let marker = part_marker(index, total);

                let mut part = task.clone();
                part.id = task.id.as_ref().map(|id| format!("{id}-part{index}"));
                part.title = format!("{} ({marker})", task.title);
                part.estimated_duration = Some(minutes);
                part.tags.push(marker);

                TaskPart {
                    index,
                    total,
                    task: part,
                }
            })
            .collect()
    }
}
