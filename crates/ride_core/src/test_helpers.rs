//! Shared fixtures for tests and benches. Gated behind the default
//! `test-helpers` feature so downstream builds can opt out.

use std::sync::Arc;

use crate::fare::RideMode;
use crate::matching::DriverProfile;
use crate::otp::DevEchoDelivery;
use crate::service::{RideService, ServiceConfig};
use crate::time::ManualClock;

fn profile(
    id: &str,
    name: &str,
    mode: RideMode,
    rating: f64,
    vehicle_condition: f64,
    distance_km: f64,
    badge: &str,
) -> DriverProfile {
    DriverProfile {
        id: id.into(),
        name: name.into(),
        mode,
        rating,
        customer_score: rating,
        safety_score: rating,
        driving_score: rating,
        vehicle_condition,
        distance_km,
        trips: 800,
        badge: badge.into(),
    }
}

/// Small pool covering every mode; the two AUTO entries mirror the
/// canonical constraint-matching scenario (1.2 km / 4.8 and 2.4 km / 4.6).
pub fn sample_pool() -> Vec<DriverProfile> {
    vec![
        profile("drv-auto-01", "Arjun Reddy", RideMode::Auto, 4.8, 4.6, 1.2, "Top Auto"),
        profile("drv-auto-02", "Sai Charan", RideMode::Auto, 4.6, 4.4, 2.4, "Friendly"),
        profile("drv-car-01", "Keerthi Rao", RideMode::Car, 4.9, 4.9, 1.6, "Premium"),
        profile("drv-bike-01", "Rohit Das", RideMode::Bike, 4.7, 4.5, 1.1, "Fast pickup"),
        profile("drv-scooty-01", "Meghana S", RideMode::Scooty, 4.6, 4.6, 1.9, "Smooth ride"),
        profile("drv-ev-01", "Ananya P", RideMode::Ev, 4.9, 4.8, 2.1, "Eco favorite"),
    ]
}

/// Service wired to a hand-driven clock starting at `start_ms`, backed by
/// [sample_pool].
pub fn manual_service(start_ms: u64) -> (RideService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_ms));
    let service = RideService::with_parts(
        ServiceConfig::default(),
        sample_pool(),
        clock.clone(),
        Box::new(DevEchoDelivery),
    );
    (service, clock)
}
