//! GPS outlier removal.
//!
//! Each sample is judged against the sample immediately before it in the
//! original sequence, not against the last sample that was kept. A single
//! teleport therefore also drops the sample that follows it, if the jump
//! back is equally implausible.

use tracing::trace;

use crate::haversine::{speed_kmh_with, Haversine};
use crate::point::GeoPoint;
use crate::traits::DistanceProvider;

/// Maximum plausible speed between consecutive samples.
pub const MAX_SPEED_KMH: f64 = 100.0;

/// Remove physically implausible samples using plain haversine distances.
pub fn filter_points(points: &[GeoPoint]) -> Vec<GeoPoint> {
    filter_points_with(&Haversine, points)
}

/// Remove physically implausible samples.
///
/// The first sample is always kept. Sample `i` is kept iff the speed from
/// sample `i - 1` (in the input) is at most [`MAX_SPEED_KMH`]. An empty
/// input yields an empty output.
pub fn filter_points_with<D: DistanceProvider>(distances: &D, points: &[GeoPoint]) -> Vec<GeoPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut kept = Vec::with_capacity(points.len());
    kept.push(*first);

    for (index, pair) in points.windows(2).enumerate() {
        let (previous, candidate) = (&pair[0], &pair[1]);
        let speed = speed_kmh_with(distances, previous, candidate);
        if speed <= MAX_SPEED_KMH {
            kept.push(*candidate);
        } else {
            trace!(
                delivery_id = candidate.delivery_id,
                index = index + 1,
                speed_kmh = speed,
                "dropping implausible point"
            );
        }
    }

    kept
}
