//! Engine settings, usually built from the app's command-line arguments.

use std::sync::Arc;

use quickeval_common::Result;

use crate::provider::MarketDataProvider;
use crate::provider::synthetic::SyntheticProvider;
use crate::provider::yahoo::YahooProvider;

/// Default number of background workers.
pub const DEFAULT_WORKERS: usize = 5;
/// Default number of symbols kept in the snapshot cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Settings for building an `Analyzer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Size of the worker pool.
    pub workers: usize,
    /// Maximum number of cached snapshots.
    pub cache_capacity: usize,
    /// Use synthetic data instead of the network.
    pub offline: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            offline: false,
        }
    }
}

impl EngineConfig {
    /// Create the market-data provider selected by this configuration.
    pub fn provider(&self) -> Result<Arc<dyn MarketDataProvider>> {
        if self.offline {
            Ok(Arc::new(SyntheticProvider::new()))
        } else {
            Ok(Arc::new(YahooProvider::new()?))
        }
    }
}
