//! Shared in-process distance memo.
//!
//! Keys are the raw bit patterns of the four coordinates, so a hit needs a
//! bit-identical repeat of the same ordered pair. `0.0` and `-0.0` are
//! distinct keys, and (a, b) does not hit for (b, a). Misses fall through
//! to the wrapped provider, so cached and uncached runs produce the same
//! fares.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::haversine::Haversine;
use crate::traits::DistanceProvider;

type CacheKey = [u64; 4];

/// Concurrency-safe distance cache wrapping another provider.
#[derive(Debug, Default)]
pub struct DistanceCache<D = Haversine> {
    inner: D,
    entries: DashMap<CacheKey, f64>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Hit/miss counters at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl DistanceCache<Haversine> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: DistanceProvider> DistanceCache<D> {
    /// Wrap an arbitrary provider.
    pub fn wrapping(inner: D) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drop every cached distance and reset the counters.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn key(from: (f64, f64), to: (f64, f64)) -> CacheKey {
        [from.0.to_bits(), from.1.to_bits(), to.0.to_bits(), to.1.to_bits()]
    }
}

impl<D: DistanceProvider> DistanceProvider for DistanceCache<D> {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        let key = Self::key(from, to);
        if let Some(cached) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return *cached;
        }

        // Two workers may both miss on the same key; both compute the same
        // value, so the second insert is harmless.
        let distance = self.inner.distance_km(from, to);
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(key, distance);
        distance
    }
}
