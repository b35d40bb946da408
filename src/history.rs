// src/history.rs
//
// Bounded line history backing the send and receive views.

use serde::Serialize;
use std::collections::VecDeque;

use crate::transform::Direction;

pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// One rendered line as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLine {
    pub direction: Direction,
    /// Full display text: timestamp prefix, label and payload.
    pub text: String,
    /// Set for send attempts that never reached the port.
    pub failed: bool,
}

/// FIFO of lines; the oldest are evicted once `capacity` is reached.
#[derive(Clone, Debug)]
pub struct History {
    lines: VecDeque<HistoryLine>,
    capacity: usize,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    pub fn push(&mut self, line: HistoryLine) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryLine> {
        self.lines.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryLine> {
        self.lines.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryLine> {
        self.lines.iter().cloned().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}
