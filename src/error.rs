//! Error types for ingestion, configuration, and fare computation.

use thiserror::Error;

use crate::point::DeliveryId;

/// Crate-wide result alias for the fare pipeline.
pub type Result<T, E = FareError> = std::result::Result<T, E>;

/// Failures raised while computing fares.
#[derive(Debug, Error)]
pub enum FareError {
    #[error("delivery {delivery_id}: point {index} at {timestamp} is earlier than the previous point at {previous}")]
    OutOfOrder {
        delivery_id: DeliveryId,
        index: usize,
        previous: i64,
        timestamp: i64,
    },

    #[error("timestamp {0} is outside the representable date range")]
    TimestampOutOfRange(i64),

    #[error("delivery {0} has no points")]
    EmptyDelivery(DeliveryId),

    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("worker for batch {batch} panicked: {message}")]
    WorkerPanicked { batch: usize, message: String },
}

/// Failures raised while reading points or writing fares.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidWorkers { key: &'static str, value: String },

    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),

    #[error("{key} has unrecognised value {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
