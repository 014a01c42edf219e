//! Priority policies for ordering flexible tasks before assignment.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::task::Task;

/// Strategy used to order flexible tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityPolicy {
    /// Priority rank first, then earliest deadline; no deadline sorts last
    Eisenhower,
    /// Caller-supplied order
    Fifo,
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        PriorityPolicy::Eisenhower
    }
}

impl PriorityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityPolicy::Eisenhower => "eisenhower",
            PriorityPolicy::Fifo => "fifo",
        }
    }

    /// Sort tasks in place. The sort is stable: ties keep input order.
    pub fn sort(&self, tasks: &mut [Task]) {
        match self {
            PriorityPolicy::Fifo => {}
            PriorityPolicy::Eisenhower => tasks.sort_by(eisenhower_order),
        }
    }
}

fn eisenhower_order(a: &Task, b: &Task) -> Ordering {
    a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

impl fmt::Display for PriorityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eisenhower" => Ok(PriorityPolicy::Eisenhower),
            "fifo" => Ok(PriorityPolicy::Fifo),
            other => Err(format!("unknown priority policy: {other} (expected eisenhower or fifo)")),
        }
    }
}
