use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EngineClock, Event, EventKind};
use crate::ecs::{Ride, RideState};

/// `Requested -> Matched` on driver confirmation, then schedules the
/// (instant) driver acceptance.
pub fn driver_confirmed_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<EngineClock>,
    mut rides: Query<&mut Ride>,
) {
    if event.0.kind != EventKind::DriverConfirmed {
        return;
    }
    let Ok(mut ride) = rides.get_mut(event.0.ride) else {
        return;
    };
    if ride.state != RideState::Requested {
        return;
    }

    ride.state = RideState::Matched;
    tracing::debug!(ride = ?event.0.ride, driver = %ride.driver.id, "ride matched");

    let next_timestamp = clock.now() + 1;
    clock.schedule(Event {
        timestamp: next_timestamp,
        kind: EventKind::DriverAccepted,
        ride: event.0.ride,
    });
}
