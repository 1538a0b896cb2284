//! The ride lifecycle engine.
//!
//! One bevy_ecs [World] holds every active booking as an entity, an
//! [EngineClock] holds the scheduled transitions, and a [Schedule] routes
//! the current event to the matching system. Callers drive the engine with
//! wall-clock readings: every public operation first drains the events that
//! are due at that reading, so a cancellation is always applied before any
//! later tick can be observed.

use bevy_ecs::prelude::{Entity, Res, Resource, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;
use serde::Serialize;

use crate::clock::{CurrentEvent, EngineClock, Event, EventKind};
use crate::ecs::{Progress, Ride, RideState, RideTiming};
use crate::error::CoreError;
use crate::fare::FareQuote;
use crate::matching::DriverProfile;
use crate::systems::driver_accepted::driver_accepted_system;
use crate::systems::driver_confirmed::driver_confirmed_system;
use crate::systems::progress_tick::progress_tick_system;
use crate::telemetry::EngineTelemetry;

/// Progress simulation parameters: +0.08 per 1200 ms tick by default, so a
/// ride completes after 13 ticks (~15.6 s).
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct ProgressConfig {
    pub tick_interval_ms: u64,
    pub increment: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_200,
            increment: 0.08,
        }
    }
}

/// Opaque handle to a booking inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RideId(Entity);

impl RideId {
    pub fn to_bits(self) -> u64 {
        self.0.to_bits()
    }
}

/// What pollers see: the current state and progress of one ride.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideSnapshot {
    pub state: RideState,
    pub progress: f64,
}

fn is_driver_confirmed(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DriverConfirmed)
        .unwrap_or(false)
}

fn is_driver_accepted(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DriverAccepted)
        .unwrap_or(false)
}

fn is_progress_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ProgressTick)
        .unwrap_or(false)
}

pub struct RideEngine {
    world: World,
    schedule: Schedule,
}

impl RideEngine {
    pub fn new(config: ProgressConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(EngineClock::default());
        world.insert_resource(EngineTelemetry::default());
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems((
            driver_confirmed_system.run_if(is_driver_confirmed),
            driver_accepted_system.run_if(is_driver_accepted),
            progress_tick_system.run_if(is_progress_tick),
        ));

        Self { world, schedule }
    }

    /// Creates a `Requested` booking carrying the frozen quote and chosen
    /// driver, and schedules the confirmation that moves it to `Matched`.
    pub fn confirm_ride(&mut self, now_ms: u64, quote: FareQuote, driver: DriverProfile) -> RideId {
        self.advance_until(now_ms);
        let mode = driver.mode;
        let entity = self
            .world
            .spawn((
                Ride {
                    state: RideState::Requested,
                    mode,
                    driver,
                    quote,
                },
                Progress(0.0),
                RideTiming::requested(now_ms),
            ))
            .id();
        self.world.resource_mut::<EngineClock>().schedule(Event {
            timestamp: now_ms,
            kind: EventKind::DriverConfirmed,
            ride: entity,
        });
        self.world.resource_mut::<EngineTelemetry>().rides_confirmed += 1;
        tracing::info!(ride = ?entity, "ride confirmed");
        RideId(entity)
    }

    /// `Assigned -> InProgress`; schedules the first progress tick.
    pub fn start_ride(&mut self, now_ms: u64, id: RideId) -> Result<(), CoreError> {
        self.advance_until(now_ms);
        let state = self.ride_state(id)?;
        if state != RideState::Assigned {
            return Err(CoreError::InvalidTransition { state });
        }

        let tick_interval = self.world.resource::<ProgressConfig>().tick_interval_ms;
        if let Some(mut ride) = self.world.get_mut::<Ride>(id.0) {
            ride.state = RideState::InProgress;
        }
        if let Some(mut timing) = self.world.get_mut::<RideTiming>(id.0) {
            timing.started_at = Some(now_ms);
        }
        self.world.resource_mut::<EngineClock>().schedule(Event {
            timestamp: now_ms + tick_interval,
            kind: EventKind::ProgressTick,
            ride: id.0,
        });
        self.world.resource_mut::<EngineTelemetry>().rides_started += 1;
        tracing::info!(ride = ?id.0, "ride started");
        Ok(())
    }

    /// Cancels a non-terminal ride. Takes effect synchronously: any tick
    /// still scheduled for this ride will find a terminal state and be
    /// discarded, so no progress is observable after this returns.
    pub fn cancel_ride(&mut self, now_ms: u64, id: RideId) -> Result<(), CoreError> {
        self.advance_until(now_ms);
        let state = self.ride_state(id)?;
        if state.is_terminal() {
            return Err(CoreError::InvalidTransition { state });
        }

        if let Some(mut ride) = self.world.get_mut::<Ride>(id.0) {
            ride.state = RideState::Cancelled;
        }
        if let Some(mut timing) = self.world.get_mut::<RideTiming>(id.0) {
            timing.cancelled_at = Some(now_ms);
        }
        self.world.resource_mut::<EngineTelemetry>().rides_cancelled += 1;
        tracing::info!(ride = ?id.0, "ride cancelled");
        Ok(())
    }

    /// Current state and progress of a ride, after draining due events.
    pub fn progress(&mut self, now_ms: u64, id: RideId) -> Result<RideSnapshot, CoreError> {
        self.advance_until(now_ms);
        let state = self.ride_state(id)?;
        let progress = self
            .world
            .get::<Progress>(id.0)
            .map(|p| p.0)
            .unwrap_or(0.0);
        Ok(RideSnapshot { state, progress })
    }

    /// The quote frozen into the ride at confirmation. Never recomputed.
    pub fn frozen_quote(&self, id: RideId) -> Result<FareQuote, CoreError> {
        self.world
            .get::<Ride>(id.0)
            .map(|ride| ride.quote)
            .ok_or(CoreError::UnknownRide)
    }

    pub fn telemetry(&self) -> EngineTelemetry {
        *self.world.resource::<EngineTelemetry>()
    }

    /// Drains every scheduled event with `timestamp <= now_ms` in order,
    /// then moves the engine clock up to `now_ms`.
    pub fn advance_until(&mut self, now_ms: u64) {
        loop {
            let due = self
                .world
                .resource::<EngineClock>()
                .next_event_time()
                .is_some_and(|ts| ts <= now_ms);
            if !due {
                break;
            }
            let Some(event) = self.world.resource_mut::<EngineClock>().pop_next() else {
                break;
            };
            self.world.insert_resource(CurrentEvent(event));
            self.schedule.run(&mut self.world);
        }
        self.world.resource_mut::<EngineClock>().fast_forward(now_ms);
    }

    fn ride_state(&self, id: RideId) -> Result<RideState, CoreError> {
        self.world
            .get::<Ride>(id.0)
            .map(|ride| ride.state)
            .ok_or(CoreError::UnknownRide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::{FareConfig, RideMode};
    use crate::test_helpers::sample_pool;

    fn engine_with_ride(now_ms: u64) -> (RideEngine, RideId) {
        let mut engine = RideEngine::new(ProgressConfig::default());
        let driver = sample_pool().remove(0);
        let quote = FareConfig::default().estimate(RideMode::Auto, 2.0);
        let id = engine.confirm_ride(now_ms, quote, driver);
        (engine, id)
    }

    #[test]
    fn confirmation_settles_into_assigned() {
        let (mut engine, id) = engine_with_ride(1_000);
        let snapshot = engine.progress(1_000, id).expect("snapshot");
        assert_eq!(snapshot.state, RideState::Matched);

        let snapshot = engine.progress(1_002, id).expect("snapshot");
        assert_eq!(snapshot.state, RideState::Assigned);
        assert_eq!(snapshot.progress, 0.0);
    }

    #[test]
    fn start_requires_assigned() {
        let (mut engine, id) = engine_with_ride(0);
        // At t=0 the ride has only reached Matched; acceptance lands at t=1.
        assert!(matches!(
            engine.start_ride(0, id),
            Err(CoreError::InvalidTransition {
                state: RideState::Matched
            })
        ));
        engine.start_ride(2, id).expect("assigned by t=2");
        assert_eq!(
            engine.progress(2, id).expect("snapshot").state,
            RideState::InProgress
        );
    }

    #[test]
    fn progress_is_monotone_and_completes() {
        let (mut engine, id) = engine_with_ride(0);
        engine.start_ride(10, id).expect("start");

        let mut last = 0.0;
        let mut t = 10;
        loop {
            t += 1_200;
            let snapshot = engine.progress(t, id).expect("snapshot");
            assert!(snapshot.progress >= last, "progress decreased");
            last = snapshot.progress;
            if snapshot.state == RideState::Completed {
                assert_eq!(snapshot.progress, 1.0);
                break;
            }
            assert!(t < 10 + 20 * 1_200, "ride never completed");
        }
        // ceil(1.0 / 0.08) = 13 ticks.
        assert_eq!(engine.telemetry().rides_completed, 1);
    }

    #[test]
    fn cancel_halts_ticking() {
        let (mut engine, id) = engine_with_ride(0);
        engine.start_ride(10, id).expect("start");

        let mid = engine.progress(10 + 3 * 1_200, id).expect("snapshot");
        assert_eq!(mid.state, RideState::InProgress);
        engine.cancel_ride(10 + 3 * 1_200, id).expect("cancel");

        let later = engine.progress(10 + 10 * 1_200, id).expect("snapshot");
        assert_eq!(later.state, RideState::Cancelled);
        assert_eq!(later.progress, mid.progress, "no ticks after cancel");
        assert!(engine.telemetry().ticks_discarded >= 1);
    }

    #[test]
    fn terminal_states_reject_transitions() {
        let (mut engine, id) = engine_with_ride(0);
        engine.cancel_ride(5, id).expect("cancel");
        assert_eq!(
            engine.cancel_ride(6, id),
            Err(CoreError::InvalidTransition {
                state: RideState::Cancelled
            })
        );
        assert_eq!(
            engine.start_ride(7, id),
            Err(CoreError::InvalidTransition {
                state: RideState::Cancelled
            })
        );
    }

    #[test]
    fn unknown_ride_is_reported() {
        let (mut engine, id) = engine_with_ride(0);
        let mut other = RideEngine::new(ProgressConfig::default());
        assert_eq!(other.progress(0, id), Err(CoreError::UnknownRide));
        let _ = engine;
    }
}
