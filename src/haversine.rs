//! Great-circle distance and instantaneous speed.
//!
//! Uses the haversine formula over a spherical Earth. Good enough for
//! segment lengths between consecutive GPS samples.

use crate::point::GeoPoint;
use crate::traits::DistanceProvider;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Plain haversine distance provider with no memoisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceProvider for Haversine {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        distance_km(from.0, from.1, to.0, to.1)
    }
}

/// Haversine distance between two points in kilometers.
///
/// Zero for identical coordinates. NaN inputs propagate to a NaN result.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Speed in km/h between two samples.
///
/// Exactly `0.0` when both samples share a timestamp. A `to` earlier than
/// `from` gives a negative speed.
pub fn speed_kmh(from: &GeoPoint, to: &GeoPoint) -> f64 {
    speed_kmh_with(&Haversine, from, to)
}

/// Speed in km/h using the given distance provider.
pub fn speed_kmh_with<D: DistanceProvider>(distances: &D, from: &GeoPoint, to: &GeoPoint) -> f64 {
    if from.timestamp == to.timestamp {
        return 0.0;
    }
    let hours = from.hours_until(to);
    distances.distance_km(from.coords(), to.coords()) / hours
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: (f64, f64) = (51.5074, -0.1278);
    const PARIS: (f64, f64) = (48.8566, 2.3522);

    #[test]
    fn test_haversine_same_point() {
        assert_eq!(distance_km(36.1, -115.1, 36.1, -115.1), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // London to Paris is about 343 km
        let dist = distance_km(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        assert!((dist - 343.0).abs() < 5.0, "London to Paris should be ~343km, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let there = distance_km(LONDON.0, LONDON.1, PARIS.0, PARIS.1);
        let back = distance_km(PARIS.0, PARIS.1, LONDON.0, LONDON.1);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_nan_propagates() {
        assert!(distance_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn test_speed_one_hour() {
        let a = GeoPoint::new(1, LONDON.0, LONDON.1, 1_609_459_200);
        let b = GeoPoint::new(1, PARIS.0, PARIS.1, 1_609_462_800);
        let speed = speed_kmh(&a, &b);
        assert!((speed - 343.0).abs() < 5.0, "got {}", speed);
    }

    #[test]
    fn test_speed_zero_time_difference() {
        let a = GeoPoint::new(1, LONDON.0, LONDON.1, 1_609_459_200);
        let b = GeoPoint::new(1, PARIS.0, PARIS.1, 1_609_459_200);
        assert_eq!(speed_kmh(&a, &b), 0.0);
    }

    #[test]
    fn test_speed_negative_when_inverted() {
        let a = GeoPoint::new(1, LONDON.0, LONDON.1, 1_609_462_800);
        let b = GeoPoint::new(1, PARIS.0, PARIS.1, 1_609_459_200);
        assert!(speed_kmh(&a, &b) < 0.0);
    }
}
