use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::DEFAULT_LOG_LINES;

/// Style class the page puts on error lines.
pub const ERROR_CLASS: &str = "v-errorText";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogLine {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub is_error: bool,
}

/// Operator-facing log shown under the console. Keeps only the most recent
/// `capacity` lines; every line is also emitted as a tracing event.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl ConsoleLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn debug(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(console = true, "{}", msg);
        self.push(msg, false);
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::warn!(console = true, "{}", msg);
        self.push(msg, true);
    }

    fn push(&mut self, message: String, is_error: bool) {
        self.lines.push_back(LogLine {
            timestamp: Utc::now(),
            message,
            is_error,
        });
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &LogLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_LINES)
    }
}
