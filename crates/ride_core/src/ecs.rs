//! ECS components for the ride lifecycle. One entity per booking; the
//! engine is the only writer.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::fare::{FareQuote, RideMode};
use crate::matching::DriverProfile;

/// Lifecycle states. `Requested` through `Completed` advance monotonically;
/// `Cancelled` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideState {
    Requested,
    Matched,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl RideState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RideState::Completed | RideState::Cancelled)
    }
}

/// A booking with its frozen quote and chosen driver.
#[derive(Debug, Clone, Component)]
pub struct Ride {
    pub state: RideState,
    pub mode: RideMode,
    pub driver: DriverProfile,
    pub quote: FareQuote,
}

/// Simulated trip progress in `[0, 1]`; non-decreasing while the ride is
/// `InProgress`, pinned once terminal.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Progress(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct RideTiming {
    pub requested_at: u64,
    pub started_at: Option<u64>,
    pub completed_at: Option<u64>,
    pub cancelled_at: Option<u64>,
}

impl RideTiming {
    pub fn requested(requested_at: u64) -> Self {
        Self {
            requested_at,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
        }
    }
}
