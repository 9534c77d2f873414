//! Core seams for the fare pipeline.
//!
//! The filter and fare calculator only need "distance between two
//! coordinates". Keeping that behind a trait lets a run swap the plain
//! haversine computation for a shared memo without touching either.

/// Provides the great-circle distance between two coordinates.
///
/// Implementations must be pure: the same inputs always yield the same
/// distance, so a caching implementation is observably identical to an
/// uncached one.
pub trait DistanceProvider: Sync {
    /// Distance in kilometers between two (lat, lng) coordinates.
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64;
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for &T {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        (**self).distance_km(from, to)
    }
}
