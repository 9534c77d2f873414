//! Test fixtures for fare-estimator.
//!
//! Provides:
//! - Real city and London street-level locations
//! - Helpers for building samples at a given local time

pub mod city_locations;

pub use city_locations::*;

use chrono::TimeZone;
use chrono_tz::Tz;

use fare_estimator::{DeliveryId, GeoPoint};

/// Zone the default fare options bill in.
pub const BILLING_ZONE: Tz = chrono_tz::Asia::Tehran;

/// Epoch seconds for a wall-clock time in the billing zone.
pub fn local_ts(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
    BILLING_ZONE
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("unambiguous local time")
        .timestamp()
}

/// A sample for `delivery_id` at `location` and epoch seconds `timestamp`.
pub fn sample(delivery_id: DeliveryId, location: &Location, timestamp: i64) -> GeoPoint {
    GeoPoint::new(delivery_id, location.lat, location.lng, timestamp)
}
