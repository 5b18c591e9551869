//! Priority-ordered scheduler of [`ExecutableEntry`] records, kept sorted
//! ascending by `next_due` so the head is always the earliest-due check.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which output dialect an executable's stdout should be parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    Native,
    CheckMk,
    Nagios,
    Script,
    Command,
}

/// A scheduler-owned descriptor for one runnable check.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableEntry {
    pub filename: String,
    pub arguments: Vec<String>,
    pub interval: Duration,
    pub dialect: Dialect,
    /// Overrides the check name exposed in observations; set for
    /// config-declared `command`/`nagios` entries.
    pub check_name: Option<String>,
    pub next_due: DateTime<Utc>,
}

/// The scheduler's priority queue. Backed by a `Vec` kept sorted by
/// insertion, mirroring the source agent's simple linear insert — the
/// queue is small (tens to low hundreds of checks), so this stays cheap
/// and keeps the ordering invariant obvious.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<ExecutableEntry>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `entry`, preserving ascending `next_due` order.
    pub fn insert(&mut self, entry: ExecutableEntry) {
        let position = self
            .entries
            .partition_point(|existing| existing.next_due <= entry.next_due);
        self.entries.insert(position, entry);
    }

    /// The earliest-due entry, if any.
    #[must_use]
    pub fn peek_head(&self) -> Option<&ExecutableEntry> {
        self.entries.first()
    }

    /// Remove the head entry, advance its `next_due` by `interval + jitter`
    /// (uniform in `[0, 1)` seconds), and reinsert it. Returns the entry as
    /// it was *before* rescheduling, for the caller to run.
    pub fn pop_and_reschedule(&mut self, now: DateTime<Utc>) -> Option<ExecutableEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let original = self.entries.remove(0);

        let jitter = Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..1.0));
        let mut rescheduled = original.clone();
        rescheduled.next_due = now
            + chrono::Duration::from_std(original.interval + jitter).unwrap_or(chrono::Duration::zero());
        self.insert(rescheduled);

        Some(original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(seconds_from_epoch: i64) -> ExecutableEntry {
        ExecutableEntry {
            filename: "check.sh".to_string(),
            arguments: vec![],
            interval: Duration::from_secs(60),
            dialect: Dialect::Script,
            check_name: None,
            next_due: DateTime::from_timestamp(seconds_from_epoch, 0).unwrap(),
        }
    }

    #[test]
    fn head_is_always_earliest_due() {
        let mut scheduler = Scheduler::new();
        scheduler.insert(entry_at(300));
        scheduler.insert(entry_at(100));
        scheduler.insert(entry_at(200));
        assert_eq!(scheduler.peek_head().unwrap().next_due, entry_at(100).next_due);
    }

    #[test]
    fn pop_and_reschedule_advances_past_interval() {
        let mut scheduler = Scheduler::new();
        scheduler.insert(entry_at(100));
        let now = DateTime::from_timestamp(1000, 0).unwrap();
        let popped = scheduler.pop_and_reschedule(now).unwrap();
        assert_eq!(popped.next_due, entry_at(100).next_due);

        let rescheduled = scheduler.peek_head().unwrap();
        assert!(rescheduled.next_due >= now + chrono::Duration::seconds(60));
        assert!(rescheduled.next_due < now + chrono::Duration::seconds(61));
    }

    #[test]
    fn empty_queue_pop_returns_none() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.pop_and_reschedule(Utc::now()).is_none());
    }

    #[test]
    fn reschedule_keeps_queue_sorted() {
        let mut scheduler = Scheduler::new();
        scheduler.insert(entry_at(100));
        scheduler.insert(entry_at(105));
        let now = DateTime::from_timestamp(100, 0).unwrap();
        scheduler.pop_and_reschedule(now);
        let mut previous = scheduler.entries[0].next_due;
        for entry in &scheduler.entries[1..] {
            assert!(entry.next_due >= previous);
            previous = entry.next_due;
        }
    }
}
