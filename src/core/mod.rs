//! Core system types and foundations
//!
//! Fundamental building blocks shared by every layer: composite-address
//! types, error handling, and configuration.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use config::Config;
pub use error::{Error, GraphError, Result, StoreError};
pub use types::{
    chapter_in_range, GraphNodeType, LocationAddress, NodeId, TokenAddress, WordType, CHAPTER_MAX,
    CHAPTER_MIN, SENTINEL_LAST,
};
