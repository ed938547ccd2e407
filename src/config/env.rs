//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Inference Benchmarker Configuration
#
# Values specified here are used as defaults and can be overridden by
# command-line arguments.

# Inference server base URL
# INFERENCE_SERVER=https://detect.roboflow.com

# Model identifier
# INFERENCE_MODEL=egohands-public/5

# Workspace (needed for the dataset profile)
# INFERENCE_WORKSPACE=my-team

# Dataset split to benchmark
# DATASET_SPLIT=train

# Maximum concurrent inference requests; 1 runs sequentially
# PARALLELISM=32

# Management API endpoint for dataset export links
# API_ENDPOINT=https://api.roboflow.com

# Enable colored output (true/false)
# ENABLE_COLOR=true

# API key (the .roboflow_key file takes precedence over these)
# ROBOFLOW_KEY=xxxxxxxx
# ROBOFLOW_API_KEY=xxxxxxxx
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        let content = Self::create_example_env_content();
        std::fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "INFERENCE_SERVER" | "API_ENDPOINT" => {
                url::Url::parse(value)
                    .map_err(|e| AppError::config(format!("Invalid {} '{}': {}", key, value, e)))?;
            }
            "PARALLELISM" => {
                let parallelism: usize = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid PARALLELISM '{}': {}", value, e))
                })?;
                if parallelism == 0 || parallelism > 1024 {
                    return Err(AppError::config(format!(
                        "PARALLELISM must be between 1 and 1024, got {}",
                        parallelism
                    )));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid ENABLE_COLOR '{}': {}", value, e))
                })?;
            }
            _ => {}
        }

        Ok(())
    }
}
