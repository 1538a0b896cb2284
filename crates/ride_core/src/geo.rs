//! Coordinates and great-circle distances.
//!
//! Geocoding is an external capability: endpoints arrive as [Place] values
//! whose coordinates may be unresolved, and distance over such a pair is a
//! typed "unavailable" result rather than an error.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A named trip endpoint. `coord` is `None` when the label has not been
/// resolved to a position (manual entry without a map pin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    pub coord: Option<Coordinate>,
}

impl Place {
    /// Endpoint with a label only; distance over it is unavailable.
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            coord: None,
        }
    }

    pub fn at(label: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            label: label.into(),
            coord: Some(Coordinate::new(lat, lon)),
        }
    }
}

/// Haversine great-circle distance between two coordinates, in kilometers.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance between two places, or `None` when either endpoint is
/// unresolved. Callers fall back to a configured heuristic distance.
pub fn trip_distance_km(pickup: &Place, destination: &Place) -> Option<f64> {
    Some(distance_km(pickup.coord?, destination.coord?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HITEC_CITY: Coordinate = Coordinate {
        lat: 17.4435,
        lon: 78.3772,
    };
    const MADHAPUR: Coordinate = Coordinate {
        lat: 17.4494,
        lon: 78.3916,
    };

    #[test]
    fn distance_is_symmetric_and_zero_at_identity() {
        assert_eq!(distance_km(HITEC_CITY, HITEC_CITY), 0.0);
        assert_eq!(
            distance_km(HITEC_CITY, MADHAPUR),
            distance_km(MADHAPUR, HITEC_CITY)
        );
    }

    #[test]
    fn distance_matches_known_pairs() {
        let short = distance_km(HITEC_CITY, MADHAPUR);
        assert!((short - 1.66).abs() < 0.02, "got {short}");

        let berlin = Coordinate::new(52.52, 13.405);
        let paris = Coordinate::new(48.8566, 2.3522);
        let long = distance_km(berlin, paris);
        assert!((long - 877.5).abs() < 1.0, "got {long}");
    }

    #[test]
    fn trip_distance_requires_both_coordinates() {
        let pinned = Place::at("HITEC City", HITEC_CITY.lat, HITEC_CITY.lon);
        let unpinned = Place::named("Madhapur");
        assert_eq!(trip_distance_km(&pinned, &unpinned), None);
        assert_eq!(trip_distance_km(&unpinned, &pinned), None);

        let resolved = Place::at("Madhapur", MADHAPUR.lat, MADHAPUR.lon);
        let km = trip_distance_km(&pinned, &resolved).expect("both pinned");
        assert!(km > 0.0);
    }

    #[test]
    fn coordinate_range_validation() {
        assert!(Coordinate::new(17.44, 78.37).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
