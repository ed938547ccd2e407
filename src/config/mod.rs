//! Configuration management module

pub mod credentials;
pub mod env;
pub mod parser;

// Re-export main functionality
pub use credentials::{resolve_api_key, ApiKey, ApiKeySource};
pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser};

// Re-export from models for convenience
pub use crate::models::Config;
