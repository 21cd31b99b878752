//! Prometheus metrics for navigation and graph mutations
//!
//! All counters hang off one process-wide [`Metrics`] instance behind a
//! lazily initialised registry, so instrumented code paths never thread a
//! metrics handle around. Registration happens once; a duplicate-name
//! failure there is a programming error, not a runtime condition.

use once_cell::sync::Lazy;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

use crate::core::error::Result;

static METRICS: Lazy<Metrics> = Lazy::new(|| {
    Metrics::new().expect("metric registration must not fail at startup")
});

/// Counters for token-sequence navigation.
pub struct NavigatorMetrics {
    /// Total next/previous lookups issued
    pub lookups: IntCounter,
    /// Address hops performed across all seeks
    pub hops: IntCounter,
    /// Seeks that ended without a token
    pub misses: IntCounter,
}

/// Counters and timings for mutating graph operations.
pub struct MutationMetrics {
    /// Tokens consumed by merge operations
    pub tokens_merged: IntCounter,
    /// Dependency graphs saved
    pub graphs_saved: IntCounter,
    /// Dependency graphs deleted
    pub graphs_deleted: IntCounter,
    /// Graph nodes deleted (including cascaded children)
    pub nodes_deleted: IntCounter,
    /// Wall time of multi-step mutations, in seconds
    pub mutation_duration: Histogram,
}

/// Process-wide metrics handle.
pub struct Metrics {
    /// Navigation counters
    pub navigator: NavigatorMetrics,
    /// Mutation counters
    pub mutations: MutationMetrics,
    registry: Registry,
}

impl Metrics {
    fn new() -> Result<Self> {
        let registry = Registry::new();

        let lookups = IntCounter::new("cg_navigator_lookups_total", "Token navigation lookups")?;
        let hops = IntCounter::new("cg_navigator_hops_total", "Address hops during seeks")?;
        let misses = IntCounter::new("cg_navigator_misses_total", "Seeks ending without a token")?;
        registry.register(Box::new(lookups.clone()))?;
        registry.register(Box::new(hops.clone()))?;
        registry.register(Box::new(misses.clone()))?;

        let tokens_merged =
            IntCounter::new("cg_tokens_merged_total", "Tokens consumed by merges")?;
        let graphs_saved = IntCounter::new("cg_graphs_saved_total", "Dependency graphs saved")?;
        let graphs_deleted =
            IntCounter::new("cg_graphs_deleted_total", "Dependency graphs deleted")?;
        let nodes_deleted = IntCounter::new("cg_nodes_deleted_total", "Graph nodes deleted")?;
        let mutation_duration = Histogram::with_opts(
            HistogramOpts::new("cg_mutation_duration_seconds", "Mutation wall time")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(tokens_merged.clone()))?;
        registry.register(Box::new(graphs_saved.clone()))?;
        registry.register(Box::new(graphs_deleted.clone()))?;
        registry.register(Box::new(nodes_deleted.clone()))?;
        registry.register(Box::new(mutation_duration.clone()))?;

        Ok(Self {
            navigator: NavigatorMetrics {
                lookups,
                hops,
                misses,
            },
            mutations: MutationMetrics {
                tokens_merged,
                graphs_saved,
                graphs_deleted,
                nodes_deleted,
                mutation_duration,
            },
            registry,
        })
    }

    /// The process-wide instance.
    pub fn global() -> &'static Metrics {
        &METRICS
    }

    /// Force registration eagerly so a bad metric definition fails at
    /// startup rather than on first use.
    pub fn init() {
        Lazy::force(&METRICS);
    }

    /// The underlying registry, for exporters.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| crate::core::error::Error::internal(format!("metrics encoding: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::global();
        let before = metrics.navigator.lookups.get();
        metrics.navigator.lookups.inc();
        metrics.navigator.lookups.inc();
        // other tests share the global registry, so only a lower bound holds
        assert!(metrics.navigator.lookups.get() >= before + 2);
    }

    #[test]
    fn test_export_contains_metric_names() {
        let metrics = Metrics::global();
        metrics.mutations.graphs_saved.inc();
        let text = metrics.export().unwrap();
        assert!(text.contains("cg_graphs_saved_total"));
        assert!(text.contains("cg_navigator_lookups_total"));
    }
}
