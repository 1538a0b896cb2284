use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EngineClock, Event, EventKind};
use crate::ecs::{Progress, Ride, RideState, RideTiming};
use crate::engine::ProgressConfig;
use crate::telemetry::EngineTelemetry;

/// Advances an `InProgress` ride by one increment and reschedules the next
/// tick, auto-completing at 1.0. Ticks that arrive for a ride that is no
/// longer `InProgress` (cancelled or already completed) are discarded, which
/// is what makes cancellation halt the simulation.
pub fn progress_tick_system(
    event: Res<CurrentEvent>,
    config: Res<ProgressConfig>,
    mut clock: ResMut<EngineClock>,
    mut telemetry: ResMut<EngineTelemetry>,
    mut rides: Query<(&mut Ride, &mut Progress, &mut RideTiming)>,
) {
    if event.0.kind != EventKind::ProgressTick {
        return;
    }
    let Ok((mut ride, mut progress, mut timing)) = rides.get_mut(event.0.ride) else {
        return;
    };
    if ride.state != RideState::InProgress {
        telemetry.ticks_discarded += 1;
        return;
    }

    progress.0 = (progress.0 + config.increment).min(1.0);

    if progress.0 >= 1.0 {
        ride.state = RideState::Completed;
        timing.completed_at = Some(clock.now());
        telemetry.rides_completed += 1;
        tracing::info!(ride = ?event.0.ride, "ride completed");
    } else {
        let next_timestamp = clock.now() + config.tick_interval_ms;
        clock.schedule(Event {
            timestamp: next_timestamp,
            kind: EventKind::ProgressTick,
            ride: event.0.ride,
        });
    }
}
