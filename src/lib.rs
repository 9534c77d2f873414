//! fare-estimator core
//!
//! Estimates delivery fares from raw GPS samples: outlier filtering,
//! a day/night tariff model, and a batch scheduler that prices
//! independent deliveries in parallel.

pub mod traits;
pub mod error;
pub mod point;
pub mod haversine;
pub mod cache;
pub mod filter;
pub mod fare;
pub mod scheduler;
pub mod config;
pub mod io;

pub use error::{ConfigError, FareError, IngestError, Result};
pub use fare::{calculate_fare, FareCalculator, FareOptions, IdleBilling, SegmentKind};
pub use filter::filter_points;
pub use point::{group_by_delivery, Deliveries, DeliveryId, GeoPoint};
pub use scheduler::{compute_fares, BatchScheduler, FareResult};
