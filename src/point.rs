//! GPS samples and per-delivery grouping.
//!
//! Points are kept in arrival order. Grouping never sorts by timestamp:
//! the filter and fare calculator operate on consecutive pairs exactly as
//! they were recorded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier shared by every sample of one delivery. Signed, so negative
/// ids in the input are accepted.
pub type DeliveryId = i32;

/// Deliveries keyed by id, each holding its samples in arrival order.
pub type Deliveries = BTreeMap<DeliveryId, Vec<GeoPoint>>;

/// A single timestamped GPS sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "id_delivery")]
    pub delivery_id: DeliveryId,
    pub lat: f64,
    pub lng: f64,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
}

impl GeoPoint {
    pub fn new(delivery_id: DeliveryId, lat: f64, lng: f64, timestamp: i64) -> Self {
        Self {
            delivery_id,
            lat,
            lng,
            timestamp,
        }
    }

    /// Coordinates as a (lat, lng) tuple.
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Elapsed hours from `self` to `later`. Negative if `later` is earlier.
    ///
    /// Subtracts in floating point so extreme timestamps cannot overflow.
    pub fn hours_until(&self, later: &GeoPoint) -> f64 {
        (later.timestamp as f64 - self.timestamp as f64) / 3600.0
    }
}

/// Group points by delivery id, preserving each delivery's arrival order.
pub fn group_by_delivery<I>(points: I) -> Deliveries
where
    I: IntoIterator<Item = GeoPoint>,
{
    let mut deliveries = Deliveries::new();
    for point in points {
        deliveries.entry(point.delivery_id).or_default().push(point);
    }
    deliveries
}
