use serde::{Deserialize, Serialize};

use crate::fare::RideMode;

/// One driver in the candidate pool. Reference data supplied by an external
/// source; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub id: String,
    pub name: String,
    pub mode: RideMode,
    pub rating: f64,
    pub customer_score: f64,
    pub safety_score: f64,
    pub driving_score: f64,
    pub vehicle_condition: f64,
    /// Current distance from the pickup area, in kilometers.
    pub distance_km: f64,
    pub trips: u32,
    pub badge: String,
}
