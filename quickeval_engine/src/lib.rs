//! Analysis engine: market data, caching and background evaluation.
//!
//! The engine wires together four building blocks:
//!
//! - `provider`: `MarketDataProvider` implementations (Yahoo Finance over HTTP and an
//!   offline synthetic generator).
//! - `cache`: mutex-guarded memo table of `FinancialSnapshot`s, one per symbol.
//! - `pool`: fixed-size worker pool fed by a crossbeam channel.
//! - `analyzer`: dispatches valuation runs onto the pool and streams `UiMessage`s
//!   back to the UI thread.
//!
//! Nothing here touches the UI: results only flow out through the
//! `Sender<UiMessage>` handed to the `Analyzer`.
#![warn(missing_docs)]
pub mod analyzer;
pub mod cache;
pub mod config;
pub mod pool;
pub mod provider;

pub use analyzer::Analyzer;
pub use cache::SnapshotCache;
pub use config::EngineConfig;
pub use pool::WorkerPool;
pub use provider::MarketDataProvider;
