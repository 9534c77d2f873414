//! Parallel fare computation over independent deliveries.
//!
//! Deliveries are cut into contiguous, roughly equal batches in ascending
//! id order. Each batch runs on a worker of a thread pool that lives only
//! for the duration of one run. Workers build private maps which are merged
//! once every batch has finished.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, warn};

use crate::cache::DistanceCache;
use crate::config::EstimatorConfig;
use crate::error::{FareError, Result};
use crate::fare::{FareCalculator, FareOptions};
use crate::filter::filter_points_with;
use crate::haversine::Haversine;
use crate::point::{Deliveries, DeliveryId, GeoPoint};
use crate::traits::DistanceProvider;

/// Fare per delivery id.
pub type FareResult = BTreeMap<DeliveryId, f64>;

/// One worker's share of the input.
pub type Batch<'a> = Vec<(DeliveryId, &'a [GeoPoint])>;

#[derive(Debug, Clone)]
pub struct BatchScheduler {
    fare: FareOptions,
    workers: usize,
    cache_distances: bool,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::from_config(&EstimatorConfig::default())
    }
}

impl BatchScheduler {
    /// Scheduler with the distance cache off. [`from_config`](Self::from_config)
    /// and `Default` turn it on; use [`with_distance_cache`](Self::with_distance_cache)
    /// to change it.
    pub fn new(fare: FareOptions, workers: usize) -> Self {
        Self {
            fare,
            workers,
            cache_distances: false,
        }
    }

    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self {
            fare: config.fare.clone(),
            workers: config.workers,
            cache_distances: config.cache_distances,
        }
    }

    /// Share one distance cache between all workers of a run.
    pub fn with_distance_cache(mut self, enabled: bool) -> Self {
        self.cache_distances = enabled;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Filter and price every delivery.
    ///
    /// Returns one entry per input delivery, or the first failure of any
    /// worker. No partial result is ever returned.
    pub fn run(&self, deliveries: &Deliveries) -> Result<FareResult> {
        if self.cache_distances {
            let cache = DistanceCache::new();
            let result = self.run_with_distances(deliveries, &cache);
            let stats = cache.stats();
            debug!(
                entries = stats.entries,
                hits = stats.hits,
                misses = stats.misses,
                "distance cache"
            );
            result
        } else {
            self.run_with_distances(deliveries, &Haversine)
        }
    }

    /// Like [`run`](Self::run) with a caller-supplied distance provider.
    pub fn run_with_distances<D: DistanceProvider>(
        &self,
        deliveries: &Deliveries,
        distances: &D,
    ) -> Result<FareResult> {
        if self.workers == 0 {
            return Err(FareError::InvalidWorkerCount);
        }

        let batches = partition(deliveries, self.workers);
        info!(
            deliveries = deliveries.len(),
            batches = batches.len(),
            workers = self.workers,
            "computing fares"
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|index| format!("fare-worker-{}", index))
            .build()?;

        let calculator = FareCalculator::with_distances(self.fare.clone(), distances);

        let locals = pool.install(|| {
            batches
                .par_iter()
                .enumerate()
                .map(|(index, batch)| run_batch(index, &calculator, batch))
                .collect::<Result<Vec<_>>>()
        });

        let locals = match locals {
            Ok(locals) => locals,
            Err(err) => {
                warn!(error = %err, "fare run aborted");
                return Err(err);
            }
        };

        // Batches hold disjoint ids, so merge order does not matter.
        let mut fares = FareResult::new();
        for local in locals {
            fares.extend(local);
        }
        Ok(fares)
    }
}

/// Fares with default options on `workers` threads.
pub fn compute_fares(deliveries: &Deliveries, workers: usize) -> Result<FareResult> {
    BatchScheduler::new(FareOptions::default(), workers).run(deliveries)
}

/// Split deliveries into contiguous batches of `len / workers` entries.
///
/// A remainder forms one trailing, smaller batch. Batch size never drops
/// below one, so fewer deliveries than workers gives one batch each.
pub fn partition(deliveries: &Deliveries, workers: usize) -> Vec<Batch<'_>> {
    let size = (deliveries.len() / workers.max(1)).max(1);
    let entries: Batch<'_> = deliveries
        .iter()
        .map(|(id, points)| (*id, points.as_slice()))
        .collect();

    entries.chunks(size).map(<[_]>::to_vec).collect()
}

fn run_batch<D: DistanceProvider>(
    index: usize,
    calculator: &FareCalculator<D>,
    batch: &[(DeliveryId, &[GeoPoint])],
) -> Result<HashMap<DeliveryId, f64>> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| price_batch(calculator, batch)));
    match outcome {
        Ok(result) => {
            if result.is_ok() {
                debug!(batch = index, deliveries = batch.len(), "batch finished");
            }
            result
        }
        Err(payload) => Err(FareError::WorkerPanicked {
            batch: index,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn price_batch<D: DistanceProvider>(
    calculator: &FareCalculator<D>,
    batch: &[(DeliveryId, &[GeoPoint])],
) -> Result<HashMap<DeliveryId, f64>> {
    let mut fares = HashMap::with_capacity(batch.len());
    for &(delivery_id, points) in batch {
        if points.is_empty() {
            return Err(FareError::EmptyDelivery(delivery_id));
        }
        let filtered = filter_points_with(calculator.distances(), points);
        fares.insert(delivery_id, calculator.fare(&filtered)?);
    }
    Ok(fares)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
