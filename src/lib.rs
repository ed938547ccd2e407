//! Inference Benchmarker
//!
//! A throughput benchmarking tool for remote image-inference HTTP APIs.
//! It loads a set of images (from a local directory or a downloaded dataset
//! export), issues bounded-concurrency inference requests and reports
//! end-to-end throughput and latency statistics.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod images;
pub mod models;
pub mod output;
pub mod runner;
pub mod stats;
pub mod warmup;

// Re-export commonly used types
pub use client::{HttpInferenceClient, InferenceApi, InferenceOutcome};
pub use error::{AppError, Result};
pub use models::{BenchmarkReport, Config, ImageRecord, ItemOutcome, WarmupMode};
pub use output::{ConsoleReporter, ProgressReporter};
pub use runner::BenchmarkRunner;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Hosted inference endpoint; self-hosted servers look like "http://192.168.4.128:9001"
    pub const DEFAULT_SERVER: &str = "https://detect.roboflow.com";
    /// Management API used to resolve dataset export links
    pub const DEFAULT_API_ENDPOINT: &str = "https://api.roboflow.com";
    pub const DEFAULT_PARALLELISM: usize = 32;
    pub const DEFAULT_IMAGES_DIR: &str = "images";
    pub const DEFAULT_SPLIT: &str = "train";
    pub const DATASETS_DIR: &str = "datasets";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Credential file searched for in the working directory and its ancestors
    pub const API_KEY_FILENAME: &str = ".roboflow_key";
    /// Environment variables checked for the API key, in precedence order
    pub const API_KEY_ENV_VARS: &[&str] = &["ROBOFLOW_KEY", "ROBOFLOW_API_KEY"];
    /// Stand-in when no credential can be resolved; the server rejects it
    pub const API_KEY_PLACEHOLDER: &str = "YOUR API KEY HERE";
}
