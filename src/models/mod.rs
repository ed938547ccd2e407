//! Data models and structures for the inference benchmarker

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::{Config, WarmupMode};
pub use metrics::{BenchmarkReport, ImageRecord, ItemOutcome, ItemStatus};
