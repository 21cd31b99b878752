//! System-level concerns: metrics and observability

pub mod metrics;

pub use metrics::Metrics;
