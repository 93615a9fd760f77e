//! # Caching
//!
//! Fitness caches keyed by the evaluated bit vector. Model-based optimizers
//! resample many identical candidates once the model sharpens, so wrapping an
//! expensive evaluator in a cache saves repeated work.
//!
//! ## Example
//!
//! ```rust
//! use bitopt::caching::CachingEvaluator;
//! use bitopt::fitness::FitnessEvaluator;
//!
//! let count_ones = |bits: &[u8]| bits.iter().map(|&b| b as f64).sum::<f64>();
//! let cached = count_ones.with_global_cache();
//!
//! assert_eq!(cached.evaluate(&[1, 1, 0]), 2.0);
//! assert_eq!(cached.evaluate(&[1, 1, 0]), 2.0);
//! assert_eq!(cached.cache_size(), 1);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thread_local::ThreadLocal;

use crate::fitness::{Bit, FitnessEvaluator};

type FitnessCache = HashMap<Vec<Bit>, f64>;

/// Which cache to wrap an evaluator in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    /// One cache shared by all threads behind a mutex.
    Global,
    /// A separate cache per thread, without locking.
    ThreadLocal,
}

/// An evaluator wrapper with one cache shared across threads and clones.
#[derive(Debug, Clone)]
pub struct CachedEvaluator<E> {
    evaluator: E,
    cache: Arc<Mutex<FitnessCache>>,
}

impl<E: FitnessEvaluator> CachedEvaluator<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a cached evaluator with a pre-populated cache.
    pub fn with_cache(evaluator: E, cache: HashMap<Vec<Bit>, f64>) -> Self {
        Self {
            evaluator,
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn inner(&self) -> &E {
        &self.evaluator
    }

    pub fn cache_size(&self) -> usize {
        self.lock().len()
    }

    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    // A panic inside the evaluator cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, FitnessCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: FitnessEvaluator> FitnessEvaluator for CachedEvaluator<E> {
    fn evaluate(&self, bits: &[Bit]) -> f64 {
        if let Some(&score) = self.lock().get(bits) {
            return score;
        }

        // Evaluate without holding the lock so other threads are not serialized.
        let score = self.evaluator.evaluate(bits);
        self.lock().insert(bits.to_vec(), score);
        score
    }
}

/// An evaluator wrapper that keeps an independent cache per thread.
#[derive(Debug)]
pub struct ThreadLocalCachedEvaluator<E> {
    evaluator: E,
    cache: ThreadLocal<RefCell<FitnessCache>>,
}

impl<E: FitnessEvaluator> ThreadLocalCachedEvaluator<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            cache: ThreadLocal::new(),
        }
    }

    pub fn inner(&self) -> &E {
        &self.evaluator
    }

    /// Number of cached evaluations made on the calling thread.
    pub fn local_cache_size(&self) -> usize {
        self.cache.get().map_or(0, |cell| cell.borrow().len())
    }

    /// Clears the caches of every thread.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl<E: FitnessEvaluator> FitnessEvaluator for ThreadLocalCachedEvaluator<E> {
    fn evaluate(&self, bits: &[Bit]) -> f64 {
        let cell = self.cache.get_or_default();
        if let Some(&score) = cell.borrow().get(bits) {
            return score;
        }

        let score = self.evaluator.evaluate(bits);
        cell.borrow_mut().insert(bits.to_vec(), score);
        score
    }
}

/// Either kind of cached evaluator, chosen at runtime through [`CacheType`].
#[derive(Debug)]
pub enum Cached<E> {
    Global(CachedEvaluator<E>),
    ThreadLocal(ThreadLocalCachedEvaluator<E>),
}

impl<E: FitnessEvaluator> FitnessEvaluator for Cached<E> {
    fn evaluate(&self, bits: &[Bit]) -> f64 {
        match self {
            Cached::Global(cached) => cached.evaluate(bits),
            Cached::ThreadLocal(cached) => cached.evaluate(bits),
        }
    }
}

/// Extension trait for wrapping any evaluator in a cache.
pub trait CachingEvaluator: FitnessEvaluator + Sized {
    fn with_global_cache(self) -> CachedEvaluator<Self> {
        CachedEvaluator::new(self)
    }

    fn with_thread_local_cache(self) -> ThreadLocalCachedEvaluator<Self> {
        ThreadLocalCachedEvaluator::new(self)
    }

    fn with_cache(self, cache_type: CacheType) -> Cached<Self> {
        match cache_type {
            CacheType::Global => Cached::Global(self.with_global_cache()),
            CacheType::ThreadLocal => Cached::ThreadLocal(self.with_thread_local_cache()),
        }
    }
}

impl<E: FitnessEvaluator> CachingEvaluator for E {}
