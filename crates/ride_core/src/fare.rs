//! Vehicle classes and fare estimation.
//!
//! Fares follow `round(base + km * rate)` with a per-class per-km rate; the
//! ETA is a coarse 2 min/km with a 3 minute floor (this is an estimate shown
//! at booking time, not a routing engine). Estimation is pure: identical
//! inputs always produce identical quotes, and a quote frozen at
//! confirmation time is never recomputed behind the rider's back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Vehicle class of a ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RideMode {
    Auto,
    Car,
    Bike,
    Scooty,
    Ev,
}

impl RideMode {
    pub const ALL: [RideMode; 5] = [
        RideMode::Auto,
        RideMode::Car,
        RideMode::Bike,
        RideMode::Scooty,
        RideMode::Ev,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RideMode::Auto => "AUTO",
            RideMode::Car => "CAR",
            RideMode::Bike => "BIKE",
            RideMode::Scooty => "SCOOTY",
            RideMode::Ev => "EV",
        }
    }
}

impl fmt::Display for RideMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RideMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RideMode::ALL
            .into_iter()
            .find(|mode| s.eq_ignore_ascii_case(mode.as_str()))
            .ok_or_else(|| CoreError::Validation {
                field: "mode",
                reason: format!("unknown vehicle class {s:?}"),
            })
    }
}

/// Per-deployment fare table. Defaults match the reference deployment
/// (base 20, AUTO 14 / CAR 18 / BIKE 10 / SCOOTY 9 / EV 16 per km).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareConfig {
    /// Fixed component added to every fare, in whole currency units.
    pub base_fare: u32,
    pub auto_per_km: u32,
    pub car_per_km: u32,
    pub bike_per_km: u32,
    pub scooty_per_km: u32,
    pub ev_per_km: u32,
    /// Distance assumed when the trip distance is unavailable.
    pub fallback_distance_km: f64,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_fare: 20,
            auto_per_km: 14,
            car_per_km: 18,
            bike_per_km: 10,
            scooty_per_km: 9,
            ev_per_km: 16,
            fallback_distance_km: 5.0,
        }
    }
}

impl FareConfig {
    pub fn per_km_rate(&self, mode: RideMode) -> u32 {
        match mode {
            RideMode::Auto => self.auto_per_km,
            RideMode::Car => self.car_per_km,
            RideMode::Bike => self.bike_per_km,
            RideMode::Scooty => self.scooty_per_km,
            RideMode::Ev => self.ev_per_km,
        }
    }

    /// Estimate a quote for a trip of `distance_km` in the given class.
    /// Distance is rounded to 0.1 km before pricing so the displayed
    /// distance and the priced distance never disagree.
    pub fn estimate(&self, mode: RideMode, distance_km: f64) -> FareQuote {
        let km = round_to_tenth(distance_km.max(0.0));
        let fare = (self.base_fare as f64 + km * self.per_km_rate(mode) as f64).round() as u32;
        let eta_minutes = ((km * 2.0).round() as u32).max(3);
        FareQuote {
            distance_km: km,
            fare,
            eta_minutes,
        }
    }
}

/// A frozen fare estimate. Produced once at booking time and carried
/// unchanged through the ride lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    /// Trip distance rounded to 0.1 km.
    pub distance_km: f64,
    /// Whole currency units.
    pub fare: u32,
    pub eta_minutes: u32,
}

fn round_to_tenth(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_wire_spelling() {
        for mode in RideMode::ALL {
            assert_eq!(mode.as_str().parse::<RideMode>().expect("parse"), mode);
        }
        assert_eq!("scooty".parse::<RideMode>().expect("lowercase"), RideMode::Scooty);
        assert!(matches!(
            "TRUCK".parse::<RideMode>(),
            Err(CoreError::Validation { field: "mode", .. })
        ));
    }

    #[test]
    fn fare_follows_base_plus_rate() {
        let config = FareConfig::default();
        let quote = config.estimate(RideMode::Car, 1.66);
        assert_eq!(quote.distance_km, 1.7);
        assert_eq!(quote.fare, 20 + 31); // round(20 + 1.7 * 18)
        assert_eq!(quote.eta_minutes, 3);
    }

    #[test]
    fn eta_has_three_minute_floor() {
        let config = FareConfig::default();
        assert_eq!(config.estimate(RideMode::Bike, 0.4).eta_minutes, 3);
        assert_eq!(config.estimate(RideMode::Bike, 6.0).eta_minutes, 12);
    }

    #[test]
    fn fare_is_monotone_in_distance_per_mode() {
        let config = FareConfig::default();
        for mode in RideMode::ALL {
            let mut last = 0;
            for tenths in 0..200 {
                let fare = config.estimate(mode, tenths as f64 / 10.0).fare;
                assert!(fare >= last, "{mode} fare decreased at {tenths} tenths");
                last = fare;
            }
        }
    }

    #[test]
    fn negative_distance_clamps_to_base_fare() {
        let config = FareConfig::default();
        let quote = config.estimate(RideMode::Auto, -2.0);
        assert_eq!(quote.distance_km, 0.0);
        assert_eq!(quote.fare, config.base_fare);
    }

    #[test]
    fn estimation_is_reproducible() {
        let config = FareConfig::default();
        let a = config.estimate(RideMode::Ev, 3.14159);
        let b = config.estimate(RideMode::Ev, 3.14159);
        assert_eq!(a, b);
    }
}
