//! Reference driver roster for the demo deployment (Hyderabad pool).

use ride_core::fare::RideMode;
use ride_core::matching::DriverProfile;

#[allow(clippy::too_many_arguments)]
fn profile(
    id: &str,
    name: &str,
    mode: RideMode,
    rating: f64,
    customer_score: f64,
    safety_score: f64,
    driving_score: f64,
    vehicle_condition: f64,
    distance_km: f64,
    trips: u32,
    badge: &str,
) -> DriverProfile {
    DriverProfile {
        id: id.into(),
        name: name.into(),
        mode,
        rating,
        customer_score,
        safety_score,
        driving_score,
        vehicle_condition,
        distance_km,
        trips,
        badge: badge.into(),
    }
}

pub fn demo_pool() -> Vec<DriverProfile> {
    vec![
        profile("drv-auto-01", "Arjun Reddy", RideMode::Auto, 4.8, 4.9, 4.7, 4.8, 4.6, 1.2, 1_420, "Top Auto"),
        profile("drv-auto-02", "Sai Charan", RideMode::Auto, 4.6, 4.5, 4.6, 4.7, 4.4, 2.4, 980, "Friendly"),
        profile("drv-car-01", "Keerthi Rao", RideMode::Car, 4.9, 4.9, 4.9, 4.8, 4.9, 1.6, 2_100, "Premium"),
        profile("drv-car-02", "Nikhil Varma", RideMode::Car, 4.5, 4.4, 4.6, 4.5, 4.5, 3.2, 750, "Reliable"),
        profile("drv-bike-01", "Rohit Das", RideMode::Bike, 4.7, 4.8, 4.6, 4.7, 4.5, 1.1, 1_330, "Fast pickup"),
        profile("drv-bike-02", "Harsha B", RideMode::Bike, 4.4, 4.3, 4.4, 4.4, 4.2, 2.8, 640, "Budget pick"),
        profile("drv-scooty-01", "Meghana S", RideMode::Scooty, 4.6, 4.7, 4.5, 4.6, 4.6, 1.9, 870, "Smooth ride"),
        profile("drv-scooty-02", "Vikram K", RideMode::Scooty, 4.3, 4.2, 4.3, 4.4, 4.1, 3.6, 510, "Nearby"),
        profile("drv-ev-01", "Ananya P", RideMode::Ev, 4.9, 4.8, 4.9, 4.9, 4.8, 2.1, 940, "Eco favorite"),
        profile("drv-ev-02", "Pranav S", RideMode::Ev, 4.6, 4.5, 4.7, 4.6, 4.5, 2.9, 690, "Quiet ride"),
    ]
}
