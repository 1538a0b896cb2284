//! Engine KPIs: lifecycle counters kept as a world resource.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Resource, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineTelemetry {
    pub rides_confirmed: u64,
    pub rides_started: u64,
    pub rides_completed: u64,
    pub rides_cancelled: u64,
    /// Progress ticks that arrived for a ride already in a terminal state
    /// and were dropped (the cancellation contract at work).
    pub ticks_discarded: u64,
}
