//! Corpus Graph - hierarchically addressed linguistic corpus with
//! dependency-graph annotations
//!
//! The corpus is organised as chapters, verses, tokens and intra-token
//! locations, each addressable by a composite numeric key. On top of the
//! corpus sit morphological entries and dependency graphs whose typed
//! annotation nodes live in per-type collections. The crate provides
//! boundary-crossing token navigation, disjunctive range queries and the
//! ordered, idempotently retryable mutations that keep graph, token and
//! entry records consistent with each other.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod corpus;
pub mod graph;
pub mod storage;
pub mod system;

// Re-export commonly used items for convenience
pub use crate::core::{Config, Error, Result};
pub use corpus::{AddressSpace, TokenNavigator};
pub use graph::{DependencyGraphManager, GraphNodeRegistry};
pub use storage::{CorpusStore, MemStore};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing and metrics from a loaded configuration.
pub fn init(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("Initializing {} v{}", NAME, VERSION);

    if config.metrics.enable_prometheus {
        system::metrics::Metrics::init();
    }

    Ok(())
}
