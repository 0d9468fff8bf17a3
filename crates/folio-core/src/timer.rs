//! Timers driven by an explicit clock.
//!
//! Folio never reads the wall clock on its own: every operation takes the
//! current [`Instant`] from the host. This keeps timers deterministic under
//! test and lets a browser host feed `performance.now()`-derived instants.
//!
//! - [`TimerManager`]: one-shot and repeating timers identified by [`TimerId`].
//! - [`Debouncer`]: fires once after a quiet period; re-triggering pushes the
//!   deadline back.
//! - [`Throttle`]: admits at most one request per interval.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

#[derive(Debug)]
struct TimerData {
    next_fire: Instant,
    interval: Duration,
    kind: TimerKind,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages a set of timers against a host-supplied clock.
#[derive(Debug, Default)]
pub struct TimerManager {
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer that fires `duration` after `now`.
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        self.insert(now + duration, duration, TimerKind::OneShot)
    }

    /// Start a repeating timer; the first fire occurs `interval` after `now`.
    ///
    /// Intervals shorter than one millisecond are rounded up to it.
    pub fn start_repeating(&mut self, now: Instant, interval: Duration) -> TimerId {
        let interval = interval.max(Duration::from_millis(1));
        self.insert(now + interval, interval, TimerKind::Repeating)
    }

    fn insert(&mut self, next_fire: Instant, interval: Duration, kind: TimerKind) -> TimerId {
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
        });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });
        tracing::trace!(target: "folio_core::timer", ?id, ?kind, "timer started");
        id
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            Ok(())
        } else {
            crate::folio_debug!(?id, "stop requested for unknown timer");
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Drop queue entries whose timer was stopped or rescheduled.
    fn discard_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            let live = self
                .timers
                .get(entry.id)
                .is_some_and(|t| t.next_fire == entry.fire_time);
            if live {
                break;
            }
            self.queue.pop();
        }
    }

    /// Process all timers due at `now`, returning the IDs that fired in
    /// fire-time order.
    #[tracing::instrument(skip(self), target = "folio_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get_mut(entry.id) else {
                continue;
            };
            if timer.next_fire != entry.fire_time {
                continue;
            }

            tracing::trace!(target: "folio_core::timer", id = ?entry.id, "timer fired");
            fired.push(entry.id);

            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(entry.id);
                }
                TimerKind::Repeating => {
                    timer.next_fire = now + timer.interval;
                    self.queue.push(TimerQueueEntry {
                        id: entry.id,
                        fire_time: timer.next_fire,
                    });
                }
            }
        }

        fired
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

/// Runs work once after a quiet period.
///
/// Every [`trigger`](Self::trigger) pushes the deadline to `now + wait`; the
/// debouncer fires from [`poll`](Self::poll) only when no trigger arrived for
/// the whole period. A pending debouncer is never double-scheduled.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    /// The quiet period.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Record activity at `now`, (re)arming the deadline.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    /// Whether a fire is outstanding.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time from `now` until the pending fire, if any.
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns `true` exactly once when the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending fire.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Admits at most one request per interval.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    open_at: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            open_at: None,
        }
    }

    /// Try to pass the throttle at `now`.
    ///
    /// Returns `true` and closes the throttle for one interval when open;
    /// returns `false` while closed.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        match self.open_at {
            Some(open_at) if now < open_at => false,
            _ => {
                self.open_at = Some(now + self.interval);
                true
            }
        }
    }

    /// Whether a request at `now` would be admitted.
    pub fn is_open(&self, now: Instant) -> bool {
        self.open_at.is_none_or(|open_at| now >= open_at)
    }
}
