//! Per-symbol memo table of financial snapshots.
//!
//! Snapshots are cached for the lifetime of the process and never refreshed.
//! The table is guarded by a `Mutex`, but the lock is not held while fetching:
//! two workers missing the same symbol at once may both fetch, in which case the
//! first insert wins and both callers receive that value. Failed fetches are not
//! cached. When the table is full the oldest entry is evicted.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use log::debug;
use quickeval_common::Result;
use quickeval_common::model::FinancialSnapshot;
use quickeval_common::tickers::Symbol;

#[derive(Default)]
struct CacheInner {
    entries: HashMap<Symbol, Arc<FinancialSnapshot>>,
    order: VecDeque<Symbol>,
}

/// Thread-safe snapshot cache shared by all workers.
pub struct SnapshotCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl SnapshotCache {
    /// Create a cache holding at most `capacity` symbols (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Cached snapshot of `symbol`, if any.
    pub fn get(&self, symbol: &Symbol) -> Result<Option<Arc<FinancialSnapshot>>> {
        let inner = self.inner.lock()?;
        Ok(inner.entries.get(symbol).cloned())
    }

    /// Store a snapshot unless one is already cached, returning the cached value.
    pub fn insert(&self, snapshot: FinancialSnapshot) -> Result<Arc<FinancialSnapshot>> {
        let mut inner = self.inner.lock()?;
        if let Some(existing) = inner.entries.get(&snapshot.symbol) {
            return Ok(Arc::clone(existing));
        }

        while inner.entries.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            debug!("Evicting cached data for {}", oldest);
            inner.entries.remove(&oldest);
        }

        let symbol = snapshot.symbol.clone();
        let snapshot = Arc::new(snapshot);
        inner.order.push_back(symbol.clone());
        inner.entries.insert(symbol, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Return the cached snapshot or fetch, cache and return a new one.
    pub fn get_or_fetch<F>(&self, symbol: &Symbol, fetch: F) -> Result<Arc<FinancialSnapshot>>
    where
        F: FnOnce() -> Result<FinancialSnapshot>,
    {
        if let Some(hit) = self.get(symbol)? {
            debug!("Cache hit for {}", symbol);
            return Ok(hit);
        }
        self.insert(fetch()?)
    }

    /// Number of cached symbols.
    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.lock()?.entries.len())
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
