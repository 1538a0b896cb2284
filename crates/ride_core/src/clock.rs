//! Event clock for the lifecycle engine.
//!
//! The engine is discrete-event: transitions that happen "later" (driver
//! confirmation, progress ticks) are scheduled here and drained in timestamp
//! order when the engine advances to a wall-clock reading.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    DriverConfirmed,
    DriverAccepted,
    ProgressTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    pub kind: EventKind,
    /// The ride this event belongs to. Events against rides that have since
    /// reached a terminal state are discarded by the receiving system.
    pub ride: Entity,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by timestamp.
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.kind.cmp(&self.kind))
            .then_with(|| other.ride.cmp(&self.ride))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being processed; inserted by the engine before each
/// schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct EngineClock {
    now: u64,
    events: BinaryHeap<Event>,
}

impl EngineClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, event: Event) {
        debug_assert!(
            event.timestamp >= self.now,
            "event timestamp must be >= current time"
        );
        self.events.push(event);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<u64> {
        self.events.peek().map(|event| event.timestamp)
    }

    /// Moves `now` forward without processing anything. Used after draining
    /// due events so later schedules land at or after the wall clock.
    pub fn fast_forward(&mut self, now_ms: u64) {
        if now_ms > self.now {
            self.now = now_ms;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pops_events_in_time_order() {
        let ride = Entity::from_raw(1);
        let mut clock = EngineClock::default();
        clock.schedule(Event {
            timestamp: 10,
            kind: EventKind::ProgressTick,
            ride,
        });
        clock.schedule(Event {
            timestamp: 5,
            kind: EventKind::DriverConfirmed,
            ride,
        });

        let first = clock.pop_next().expect("first event");
        assert_eq!(first.timestamp, 5);
        assert_eq!(clock.now(), 5);

        let second = clock.pop_next().expect("second event");
        assert_eq!(second.timestamp, 10);
        assert_eq!(clock.now(), 10);

        assert!(clock.pop_next().is_none());
        assert!(clock.is_empty());
    }

    #[test]
    fn fast_forward_never_rewinds() {
        let mut clock = EngineClock::default();
        clock.fast_forward(100);
        assert_eq!(clock.now(), 100);
        clock.fast_forward(50);
        assert_eq!(clock.now(), 100);
    }
}
