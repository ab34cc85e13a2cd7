//! User-facing notices.
//!
//! Commit results and playback failures surface to the user through a small
//! queue the presentation layer drains each frame. Fetch failures stay in
//! the log stream only; they never produce a notice.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notices kept when nobody drains the queue; oldest entries drop first.
const MAX_PENDING: usize = 64;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Blocking notices must be acknowledged (commit failures); the rest
    /// may be shown transiently.
    pub blocking: bool,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            blocking: false,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            blocking: false,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// A non-blocking error, e.g. a playback failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            blocking: false,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// A blocking error the user must see, e.g. a failed commit.
    pub fn blocking_error(message: impl Into<String>) -> Self {
        Self {
            blocking: true,
            ..Self::error(message)
        }
    }
}

/// FIFO queue of pending notices.
#[derive(Debug, Clone, Default)]
pub struct NoticeQueue {
    pending: VecDeque<Notice>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        if self.pending.len() == MAX_PENDING {
            self.pending.pop_front();
        }
        self.pending.push_back(notice);
    }

    /// Remove and return all pending notices, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_oldest_first() {
        let mut queue = NoticeQueue::new();
        queue.push(Notice::info("first"));
        queue.push(Notice::error("second"));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].message, "second");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_blocking_error_flag() {
        assert!(Notice::blocking_error("save failed").blocking);
        assert!(!Notice::error("playback failed").blocking);
        assert_eq!(Notice::blocking_error("x").level, NoticeLevel::Error);
    }

    #[test]
    fn test_queue_caps_pending_notices() {
        let mut queue = NoticeQueue::new();
        for n in 0..(MAX_PENDING + 10) {
            queue.push(Notice::info(format!("notice {n}")));
        }
        assert_eq!(queue.len(), MAX_PENDING);
        // Oldest entries dropped.
        assert_eq!(queue.drain()[0].message, "notice 10");
    }
}
