use bevy_ecs::prelude::{Query, Res};

use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{Ride, RideState};

/// `Matched -> Assigned`. Acceptance is instant in this design; there is no
/// negotiation protocol, so the ride just becomes startable.
pub fn driver_accepted_system(event: Res<CurrentEvent>, mut rides: Query<&mut Ride>) {
    if event.0.kind != EventKind::DriverAccepted {
        return;
    }
    let Ok(mut ride) = rides.get_mut(event.0.ride) else {
        return;
    };
    if ride.state != RideState::Matched {
        return;
    }

    ride.state = RideState::Assigned;
    tracing::debug!(ride = ?event.0.ride, driver = %ride.driver.id, "driver assigned");
}
