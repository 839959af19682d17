#![forbid(unsafe_code)]

//! Bounded queue of user-facing notices.
//!
//! The board pushes a warning here whenever it rolls back a failed commit;
//! the host drains the queue and shows the notices however it likes (toasts,
//! a status line). Nothing here blocks or renders.
//!
//! - FIFO order, bounded by `max_queued` (the oldest notice is dropped on
//!   overflow)
//! - Content-based deduplication within a configurable time window
//!
//! Notices raised for different commits never deduplicate against each
//! other: the commit ticket is part of the content key.

use std::collections::VecDeque;

use ahash::AHashMap;
use web_time::{Duration, Instant};

use crate::persistence::CommitTicket;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NoticeLevel {
    #[default]
    Info,
    Warning,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// The commit that caused this notice, if any.
    pub ticket: Option<CommitTicket>,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            ticket: None,
        }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
            ticket: None,
        }
    }

    #[must_use]
    pub fn for_commit(mut self, ticket: CommitTicket) -> Self {
        self.ticket = Some(ticket);
        self
    }
}

/// Configuration for the notice queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeConfig {
    /// Maximum number of notices waiting to be drained.
    pub max_queued: usize,
    /// Time window for deduplication (in ms). Zero disables it.
    pub dedup_window_ms: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            max_queued: 8,
            dedup_window_ms: 1000,
        }
    }
}

impl NoticeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_queued(mut self, max: usize) -> Self {
        self.max_queued = max;
        self
    }

    #[must_use]
    pub fn dedup_window_ms(mut self, ms: u64) -> Self {
        self.dedup_window_ms = ms;
        self
    }
}

/// Queue statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeStats {
    pub total_pushed: u64,
    /// Older notices dropped to make room.
    pub overflow_count: u64,
    pub dedup_count: u64,
}

/// FIFO of pending notices.
#[derive(Debug, Clone)]
pub struct NoticeQueue {
    queue: VecDeque<Notice>,
    config: NoticeConfig,
    dedup_window: Duration,
    recent: AHashMap<Notice, Instant>,
    stats: NoticeStats,
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new(NoticeConfig::default())
    }
}

impl NoticeQueue {
    #[must_use]
    pub fn new(config: NoticeConfig) -> Self {
        let dedup_window = Duration::from_millis(config.dedup_window_ms);
        Self {
            queue: VecDeque::with_capacity(config.max_queued),
            config,
            dedup_window,
            recent: AHashMap::new(),
            stats: NoticeStats::default(),
        }
    }

    /// Queue a notice. Returns `false` if it was deduplicated.
    pub fn push(&mut self, notice: Notice) -> bool {
        self.push_at(notice, Instant::now())
    }

    /// [`push`](Self::push) with an explicit clock, for deterministic tests.
    pub fn push_at(&mut self, notice: Notice, now: Instant) -> bool {
        self.stats.total_pushed += 1;

        if !self.dedup_window.is_zero() {
            let window = self.dedup_window;
            self.recent
                .retain(|_, seen| now.saturating_duration_since(*seen) < window);
            if self.recent.contains_key(&notice) {
                self.stats.dedup_count += 1;
                return false;
            }
            self.recent.insert(notice.clone(), now);
        }

        if self.config.max_queued == 0 {
            self.stats.overflow_count += 1;
            return true;
        }
        while self.queue.len() >= self.config.max_queued {
            self.queue.pop_front();
            self.stats.overflow_count += 1;
        }
        self.queue.push_back(notice);
        true
    }

    /// Take the oldest pending notice.
    pub fn pop(&mut self) -> Option<Notice> {
        self.queue.pop_front()
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> &NoticeStats {
        &self.stats
    }

    #[must_use]
    pub fn config(&self) -> &NoticeConfig {
        &self.config
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.recent.clear();
    }
}
