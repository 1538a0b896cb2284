//! Driver filtering and ranking.
//!
//! The matcher is pure over its inputs: it narrows the candidate pool by
//! vehicle class and rider constraints, then orders the survivors by a
//! single tagged sort criterion. The sort is stable, so ties keep the pool's
//! input order and repeated calls with unchanged input return identical
//! sequences. An empty result means "no match under current constraints"
//! and is a valid outcome, not an error.

pub mod types;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::fare::RideMode;

pub use types::DriverProfile;

/// Ranking criterion. Descending for scores, ascending for distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Rating,
    Distance,
    Safety,
    CustomerCare,
    VehicleCondition,
}

/// Rider-chosen constraints. Defaults match the selection screen's initial
/// sliders (3 km, rating 4.5, vehicle condition 4.3, sorted by rating).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConstraints {
    pub max_distance_km: f64,
    pub min_rating: f64,
    pub min_vehicle_condition: f64,
    pub sort_key: SortKey,
}

impl Default for MatchConstraints {
    fn default() -> Self {
        Self {
            max_distance_km: 3.0,
            min_rating: 4.5,
            min_vehicle_condition: 4.3,
            sort_key: SortKey::Rating,
        }
    }
}

/// Filters `pool` to `mode` and the given constraints, ranked by
/// `constraints.sort_key`. The pool is read-only reference data; matched
/// profiles are returned by value.
pub fn match_drivers(
    pool: &[DriverProfile],
    mode: RideMode,
    constraints: &MatchConstraints,
) -> Vec<DriverProfile> {
    let mut matched: Vec<DriverProfile> = pool
        .iter()
        .filter(|driver| driver.mode == mode)
        .filter(|driver| driver.distance_km <= constraints.max_distance_km)
        .filter(|driver| driver.rating >= constraints.min_rating)
        .filter(|driver| driver.vehicle_condition >= constraints.min_vehicle_condition)
        .cloned()
        .collect();
    // sort_by is stable: equal keys keep input order.
    matched.sort_by(|a, b| rank(constraints.sort_key, a, b));
    matched
}

fn rank(key: SortKey, a: &DriverProfile, b: &DriverProfile) -> Ordering {
    let ordering = match key {
        SortKey::Rating => b.rating.partial_cmp(&a.rating),
        SortKey::Distance => a.distance_km.partial_cmp(&b.distance_km),
        SortKey::Safety => b.safety_score.partial_cmp(&a.safety_score),
        SortKey::CustomerCare => b.customer_score.partial_cmp(&a.customer_score),
        SortKey::VehicleCondition => b.vehicle_condition.partial_cmp(&a.vehicle_condition),
    };
    ordering.unwrap_or(Ordering::Equal)
}
