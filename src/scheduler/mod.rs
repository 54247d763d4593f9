//! Discrete-event scheduler.
//!
//! Single-threaded and cooperative: `dispatch_one` runs the earliest pending
//! event to completion before returning. Events with equal timestamps run in
//! the order they were enqueued.

use std::{cmp::Ordering, collections::BinaryHeap, fmt};

pub type Timestamp = f64;

/// Deferred unit of work. It may enqueue follow-up events on the scheduler
/// that runs it.
pub type Action = Box<dyn FnOnce(&mut Scheduler) + 'static>;

pub struct Event {
    timestamp: Timestamp,
    action: Action,
}

impl Event {
    pub fn new(timestamp: Timestamp, action: impl FnOnce(&mut Scheduler) + 'static) -> Self {
        Self {
            timestamp,
            action: Box::new(action),
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

/* private */
struct Pending {
    sequence: u64,
    event: Event,
}

impl Pending {
    /* private */
    fn key(&self) -> (Timestamp, u64) {
        (self.event.timestamp, self.sequence)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // Reversed so the max-heap pops the earliest (timestamp, sequence).
    fn cmp(&self, other: &Self) -> Ordering {
        let (time, sequence) = self.key();
        let (other_time, other_sequence) = other.key();
        other_time
            .total_cmp(&time)
            .then_with(|| other_sequence.cmp(&sequence))
    }
}

#[derive(Default)]
pub struct Scheduler {
    queue: BinaryHeap<Pending>,
    next_sequence: u64,
    now: Timestamp,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `event` until it runs or the queue is cleared.
    pub fn enqueue(&mut self, event: Event) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Pending { sequence, event });
    }

    pub fn schedule(&mut self, timestamp: Timestamp, action: impl FnOnce(&mut Scheduler) + 'static) {
        self.enqueue(Event::new(timestamp, action));
    }

    /// Runs the earliest pending event. Returns `false` if nothing was pending.
    pub fn dispatch_one(&mut self) -> bool {
        let Some(Pending { event, .. }) = self.queue.pop() else {
            return false;
        };

        self.now = event.timestamp;
        log::trace!("scheduler: dispatching event at t={}", self.now);
        (event.action)(self);
        true
    }

    /// Dispatches until no events remain, including ones enqueued meanwhile.
    /// Returns how many events ran.
    pub fn drain(&mut self) -> usize {
        let mut dispatched = 0;
        while self.dispatch_one() {
            dispatched += 1;
        }
        dispatched
    }

    /// Drops every pending event without running it.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Timestamp of the most recently dispatched event, `0.0` before any.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.queue.len())
            .field("now", &self.now)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce(&mut Scheduler)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = Rc::clone(&log);
        let make = move |label: &'static str| -> Box<dyn FnOnce(&mut Scheduler)> {
            let log = Rc::clone(&log_clone);
            Box::new(move |_: &mut Scheduler| log.borrow_mut().push(label))
        };
        (log, make)
    }

    #[test]
    fn dispatches_in_timestamp_order() {
        let (log, make) = recorder();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3.0, make("c"));
        scheduler.schedule(1.0, make("a"));
        scheduler.schedule(2.0, make("b"));

        assert!(scheduler.dispatch_one());
        assert_eq!(*log.borrow(), ["a"]);
        assert_eq!(scheduler.now(), 1.0);

        assert_eq!(scheduler.drain(), 2);
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
        assert!(!scheduler.dispatch_one());
    }

    #[test]
    fn equal_timestamps_run_in_insertion_order() {
        let (log, make) = recorder();
        let mut scheduler = Scheduler::new();
        for label in ["first", "second", "third"] {
            scheduler.schedule(5.0, make(label));
        }
        scheduler.drain();
        assert_eq!(*log.borrow(), ["first", "second", "third"]);
    }

    #[test]
    fn events_can_schedule_follow_ups() {
        let (log, make) = recorder();
        let mut scheduler = Scheduler::new();
        let follow_up = make("follow-up");
        let outer = make("outer");
        scheduler.schedule(1.0, move |scheduler: &mut Scheduler| {
            outer(scheduler);
            scheduler.schedule(scheduler.now() + 1.0, follow_up);
        });
        scheduler.schedule(1.5, make("between"));

        assert_eq!(scheduler.drain(), 3);
        assert_eq!(*log.borrow(), ["outer", "between", "follow-up"]);
        assert_eq!(scheduler.now(), 2.0);
    }

    #[test]
    fn clear_discards_without_running() {
        let (log, make) = recorder();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, make("never"));
        scheduler.schedule(2.0, make("never"));
        assert_eq!(scheduler.len(), 2);

        scheduler.clear();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.drain(), 0);
        assert!(log.borrow().is_empty());
    }
}
