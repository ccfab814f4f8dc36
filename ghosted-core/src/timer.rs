//! Deadline-ordered timer queue.
//!
//! All of the simulator's apparent concurrency is cooperative: delayed and
//! periodic events are queued here and drained by the host loop calling
//! [`TimerQueue::pop_due`] with the current time. Nothing runs on another
//! thread and no callback is ever invoked reentrantly.
//!
//! Ordering guarantee: expired entries pop in non-decreasing deadline
//! order. Entries with coincident deadlines pop in registration order,
//! though callers should not rely on more than the deadline ordering.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

use crate::types::ConversationId;

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What a timer belongs to, for bulk cancellation.
///
/// Timers that mutate a specific conversation (receipt transitions, typing
/// phases) are scoped to it, so superseding the conversation can cancel
/// them wholesale. Tickers and status reverts outlive any one conversation
/// and are `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerScope {
    Global,
    Conversation(ConversationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(Duration),
}

#[derive(Debug)]
struct TimerEntry<E> {
    deadline: Instant,
    /// Registration order, tie-break for coincident deadlines
    seq: u64,
    id: TimerId,
    scope: TimerScope,
    repeat: Repeat,
    event: E,
}

impl<E> PartialEq for TimerEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<E> Eq for TimerEntry<E> {}

impl<E> PartialOrd for TimerEntry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for TimerEntry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Single-threaded timer queue generic over the event type it carries.
///
/// Time is always passed in by the caller, never read from the system
/// clock, so tests (and the headless driver) can run on a virtual clock.
#[derive(Debug, Default)]
pub struct TimerQueue<E> {
    heap: BinaryHeap<Reverse<TimerEntry<E>>>,
    /// Ids cancelled while still queued; skipped lazily on pop
    cancelled: HashSet<TimerId>,
    next_id: u64,
    next_seq: u64,
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Schedule a one-shot event at `now + delay`.
    pub fn after(&mut self, now: Instant, delay: Duration, scope: TimerScope, event: E) -> TimerId {
        self.push(now + delay, scope, Repeat::Once, event)
    }

    /// Schedule a fixed-rate periodic event; first fire at `now + interval`.
    ///
    /// Re-armed from the previous deadline rather than the pop time, so a
    /// host that stalls observes catch-up ticks instead of drift.
    pub fn every(
        &mut self,
        now: Instant,
        interval: Duration,
        scope: TimerScope,
        event: E,
    ) -> TimerId {
        self.push(now + interval, scope, Repeat::Every(interval), event)
    }

    fn push(&mut self, deadline: Instant, scope: TimerScope, repeat: Repeat, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(TimerEntry {
            deadline,
            seq,
            id,
            scope,
            repeat,
            event,
        }));
        id
    }

    /// Cancel a pending timer. Returns false if the id is not queued.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let pending = self.heap.iter().any(|Reverse(e)| e.id == id) && !self.cancelled.contains(&id);
        if pending {
            self.cancelled.insert(id);
        }
        pending
    }

    /// Cancel every timer with the given scope.
    ///
    /// Returns the number of entries removed.
    pub fn cancel_scope(&mut self, scope: TimerScope) -> usize {
        let entries = std::mem::take(&mut self.heap).into_vec();
        let mut kept = BinaryHeap::with_capacity(entries.len());
        let mut removed = 0;
        for Reverse(entry) in entries {
            if entry.scope == scope {
                self.cancelled.remove(&entry.id);
                removed += 1;
            } else {
                kept.push(Reverse(entry));
            }
        }
        self.heap = kept;
        removed
    }

    /// Earliest pending deadline, if any.
    ///
    /// May report the deadline of an already-cancelled entry; hosts that
    /// sleep until it will simply wake and pop nothing.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(e)| e.deadline)
    }

    /// Number of pending (non-cancelled) timers.
    pub fn len(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Clone> TimerQueue<E> {
    /// Pop the next expired timer, if any.
    ///
    /// Call in a loop until `None` to drain everything due at `now`.
    /// Periodic entries re-arm themselves before being returned.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerId, E)> {
        loop {
            match self.heap.peek() {
                Some(Reverse(head)) if head.deadline <= now => {}
                _ => return None,
            }
            let Reverse(mut entry) = self.heap.pop()?;
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            let id = entry.id;
            let event = match entry.repeat {
                Repeat::Once => entry.event,
                Repeat::Every(interval) => {
                    let event = entry.event.clone();
                    entry.deadline += interval;
                    entry.seq = self.next_seq;
                    self.next_seq += 1;
                    self.heap.push(Reverse(entry));
                    event
                }
            };
            return Some((id, event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Instant {
        Instant::now()
    }

    #[test]
    fn test_pop_due_respects_deadline_order() {
        let t0 = base();
        let mut queue = TimerQueue::new();
        queue.after(t0, Duration::from_millis(300), TimerScope::Global, "c");
        queue.after(t0, Duration::from_millis(100), TimerScope::Global, "a");
        queue.after(t0, Duration::from_millis(200), TimerScope::Global, "b");

        let now = t0 + Duration::from_millis(500);
        let mut fired = Vec::new();
        while let Some((_, event)) = queue.pop_due(now) {
            fired.push(event);
        }
        assert_eq!(fired, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_nothing_pops_before_its_deadline() {
        let t0 = base();
        let mut queue = TimerQueue::new();
        queue.after(t0, Duration::from_millis(100), TimerScope::Global, "a");

        assert_eq!(queue.pop_due(t0), None);
        assert_eq!(queue.pop_due(t0 + Duration::from_millis(99)), None);
        assert!(queue.pop_due(t0 + Duration::from_millis(100)).is_some());
    }

    #[test]
    fn test_coincident_deadlines_pop_in_registration_order() {
        let t0 = base();
        let mut queue = TimerQueue::new();
        for event in ["first", "second", "third"] {
            queue.after(t0, Duration::from_millis(100), TimerScope::Global, event);
        }

        let now = t0 + Duration::from_millis(100);
        let mut fired = Vec::new();
        while let Some((_, event)) = queue.pop_due(now) {
            fired.push(event);
        }
        assert_eq!(fired, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_cancel_suppresses_a_pending_timer() {
        let t0 = base();
        let mut queue = TimerQueue::new();
        let keep = queue.after(t0, Duration::from_millis(100), TimerScope::Global, "keep");
        let victim = queue.after(t0, Duration::from_millis(100), TimerScope::Global, "drop");

        assert!(queue.cancel(victim));
        assert!(!queue.cancel(victim), "second cancel is a no-op");
        assert_eq!(queue.len(), 1);

        let now = t0 + Duration::from_millis(200);
        assert_eq!(queue.pop_due(now), Some((keep, "keep")));
        assert_eq!(queue.pop_due(now), None);
    }

    #[test]
    fn test_cancel_unknown_id_is_false() {
        let t0 = base();
        let mut queue: TimerQueue<&str> = TimerQueue::new();
        let id = queue.after(t0, Duration::from_millis(1), TimerScope::Global, "x");
        queue.pop_due(t0 + Duration::from_millis(1));
        assert!(!queue.cancel(id), "already fired");
    }

    #[test]
    fn test_cancel_scope_removes_only_that_scope() {
        let t0 = base();
        let old = ConversationId(1);
        let live = ConversationId(2);
        let mut queue = TimerQueue::new();
        queue.after(
            t0,
            Duration::from_millis(50),
            TimerScope::Conversation(old),
            "stale-read",
        );
        queue.after(
            t0,
            Duration::from_millis(60),
            TimerScope::Conversation(old),
            "stale-typing",
        );
        queue.after(
            t0,
            Duration::from_millis(70),
            TimerScope::Conversation(live),
            "live-read",
        );
        queue.every(t0, Duration::from_millis(40), TimerScope::Global, "tick");

        assert_eq!(queue.cancel_scope(TimerScope::Conversation(old)), 2);
        assert_eq!(queue.len(), 2);

        let now = t0 + Duration::from_millis(80);
        let mut fired = Vec::new();
        while let Some((_, event)) = queue.pop_due(now) {
            fired.push(event);
            if fired.len() > 10 {
                break; // periodic catch-up guard
            }
        }
        assert!(fired.contains(&"live-read"));
        assert!(!fired.iter().any(|e| e.starts_with("stale")));
    }

    #[test]
    fn test_every_rearms_at_a_fixed_rate() {
        let t0 = base();
        let mut queue = TimerQueue::new();
        queue.every(t0, Duration::from_millis(100), TimerScope::Global, "tick");

        // Not due at t0
        assert_eq!(queue.pop_due(t0), None);

        // A stalled host catches up: five intervals passed, five pops
        let now = t0 + Duration::from_millis(550);
        let mut count = 0;
        while queue.pop_due(now).is_some() {
            count += 1;
        }
        assert_eq!(count, 5);

        // Still armed for the next interval
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_cancelling_a_periodic_timer_stops_it_for_good() {
        let t0 = base();
        let mut queue = TimerQueue::new();
        let id = queue.every(t0, Duration::from_millis(100), TimerScope::Global, "tick");

        assert!(queue.cancel(id));
        assert_eq!(queue.pop_due(t0 + Duration::from_millis(1000)), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_next_deadline_tracks_the_earliest_entry() {
        let t0 = base();
        let mut queue = TimerQueue::new();
        assert_eq!(queue.next_deadline(), None);

        queue.after(t0, Duration::from_millis(500), TimerScope::Global, "late");
        queue.after(t0, Duration::from_millis(100), TimerScope::Global, "soon");
        assert_eq!(queue.next_deadline(), Some(t0 + Duration::from_millis(100)));
    }
}
