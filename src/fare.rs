//! Day/night fare model.
//!
//! A fare starts at the flag amount and grows segment by segment. Moving
//! segments are billed per kilometer at the day or night rate, split across
//! the 05:00 and midnight boundaries of the reference time zone. Idle
//! segments are billed per hour. After every segment the running fare is
//! raised to the minimum if it fell below it.

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{FareError, Result};
use crate::haversine::{speed_kmh_with, Haversine};
use crate::point::GeoPoint;
use crate::traits::DistanceProvider;

const SECONDS_PER_DAY: u32 = 86_400;

/// Start of the day window; the night window ends just before it.
fn day_start() -> NaiveTime {
    NaiveTime::MIN + TimeDelta::hours(5)
}

/// How an idle segment's time charge combines with the running fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleBilling {
    /// The idle charge replaces the running fare, discarding the flag
    /// amount and any earlier segments.
    #[default]
    Replace,
    /// The idle charge is added to the running fare.
    Accumulate,
}

#[derive(Debug, Clone)]
pub struct FareOptions {
    /// Base fare every delivery starts from.
    pub flag_amount: f64,
    /// Floor applied after every segment.
    pub minimum_fare: f64,
    /// Segments at or below this speed are billed by time.
    pub idle_speed_kmh: f64,
    /// Idle charge per hour.
    pub idle_rate_per_hour: f64,
    /// Per-kilometer rate inside the day window.
    pub day_rate_per_km: f64,
    /// Per-kilometer rate inside the night window.
    pub night_rate_per_km: f64,
    pub idle_billing: IdleBilling,
    /// Zone used to read timestamps as local wall-clock time.
    pub time_zone: Tz,
}

impl Default for FareOptions {
    fn default() -> Self {
        Self {
            flag_amount: 1.30,
            minimum_fare: 3.47,
            idle_speed_kmh: 10.0,
            idle_rate_per_hour: 11.9,
            day_rate_per_km: 0.74,
            night_rate_per_km: 1.3,
            idle_billing: IdleBilling::Replace,
            time_zone: chrono_tz::Asia::Tehran,
        }
    }
}

/// Which tariff rule billed a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Idle,
    NightToDay,
    Day,
    Night,
    DayToNight,
    CrossMidnight,
}

/// Computes the fare of one filtered delivery.
#[derive(Debug, Clone, Default)]
pub struct FareCalculator<D = Haversine> {
    options: FareOptions,
    distances: D,
}

impl FareCalculator<Haversine> {
    pub fn new(options: FareOptions) -> Self {
        Self {
            options,
            distances: Haversine,
        }
    }
}

impl<D: DistanceProvider> FareCalculator<D> {
    pub fn with_distances(options: FareOptions, distances: D) -> Self {
        Self { options, distances }
    }

    pub fn options(&self) -> &FareOptions {
        &self.options
    }

    pub fn distances(&self) -> &D {
        &self.distances
    }

    /// Fare for an already filtered sequence of samples.
    ///
    /// Fewer than two samples bill the flag amount raised to the minimum.
    /// Fails if a sample is earlier than the one before it; `index` in the
    /// error refers to the position in `points`.
    pub fn fare(&self, points: &[GeoPoint]) -> Result<f64> {
        let options = &self.options;
        if points.len() < 2 {
            return Ok(options.flag_amount.max(options.minimum_fare));
        }

        let mut fare = options.flag_amount;

        for (offset, pair) in points.windows(2).enumerate() {
            let (from, to) = (&pair[0], &pair[1]);
            if to.timestamp < from.timestamp {
                return Err(FareError::OutOfOrder {
                    delivery_id: to.delivery_id,
                    index: offset + 1,
                    previous: from.timestamp,
                    timestamp: to.timestamp,
                });
            }

            let (kind, charge) = self.segment_charge(from, to)?;
            fare = match kind {
                SegmentKind::Idle if options.idle_billing == IdleBilling::Replace => charge,
                _ => fare + charge,
            };
            if fare < options.minimum_fare {
                fare = options.minimum_fare;
            }

            trace!(
                delivery_id = to.delivery_id,
                segment = offset,
                ?kind,
                charge,
                fare,
                "billed segment"
            );
        }

        Ok(fare)
    }

    /// Tariff rule and charge for one segment.
    pub fn segment_charge(&self, from: &GeoPoint, to: &GeoPoint) -> Result<(SegmentKind, f64)> {
        let options = &self.options;
        let speed = speed_kmh_with(&self.distances, from, to);
        let distance = self.distances.distance_km(from.coords(), to.coords());

        let start = local_time(from.timestamp, options.time_zone)?;
        let end = local_time(to.timestamp, options.time_zone)?;
        let total_hours = hours(end.signed_duration_since(start));

        if speed <= options.idle_speed_kmh {
            return Ok((SegmentKind::Idle, total_hours * options.idle_rate_per_hour));
        }

        let day = distance * options.day_rate_per_km;
        let night = distance * options.night_rate_per_km;
        let (start_time, end_time) = (start.time(), end.time());

        if is_night(start_time) && is_day(end_time) {
            let night_hours = hours(day_start().signed_duration_since(start_time));
            let day_hours = hours(end_time.signed_duration_since(day_start()));
            return Ok((SegmentKind::NightToDay, night_hours * night + day_hours * day));
        }
        if is_day(start_time) && is_day(end_time) && end_time >= start_time {
            return Ok((SegmentKind::Day, day));
        }
        if is_night(start_time) && is_night(end_time) && end_time >= start_time {
            return Ok((SegmentKind::Night, night));
        }
        if is_day(start_time) && is_night(end_time) {
            let midnight = start
                .date()
                .and_time(NaiveTime::MIN)
                .checked_add_signed(TimeDelta::days(1))
                .ok_or(FareError::TimestampOutOfRange(from.timestamp))?;
            let day_hours = hours(midnight.signed_duration_since(start));
            let night_hours = hours(end.signed_duration_since(midnight));
            return Ok((SegmentKind::DayToNight, day_hours * day + night_hours * night));
        }

        let pre_midnight = seconds_until_midnight(start_time) as f64 / 3600.0;
        let post_midnight = total_hours - pre_midnight;
        Ok((SegmentKind::CrossMidnight, pre_midnight * day + post_midnight * night))
    }
}

/// Fare with default options and plain haversine distances.
pub fn calculate_fare(points: &[GeoPoint]) -> Result<f64> {
    FareCalculator::new(FareOptions::default()).fare(points)
}

fn local_time(timestamp: i64, zone: Tz) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&zone).naive_local())
        .ok_or(FareError::TimestampOutOfRange(timestamp))
}

fn is_night(time: NaiveTime) -> bool {
    time > NaiveTime::MIN && time < day_start()
}

fn is_day(time: NaiveTime) -> bool {
    time >= day_start()
}

fn seconds_until_midnight(time: NaiveTime) -> u32 {
    (SECONDS_PER_DAY - time.num_seconds_from_midnight()) % SECONDS_PER_DAY
}

fn hours(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 / 3600.0
}
