//! Configuration data model and validation

use crate::error::{AppError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the server is warmed up before the timed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WarmupMode {
    /// Send one real inference request for the first image; suits servers
    /// that lazily load model weights on first request
    Inference,
    /// Call the dedicated start endpoint; required by servers that preload
    /// models explicitly (e.g. TensorRT deployments)
    Start,
}

impl Default for WarmupMode {
    fn default() -> Self {
        Self::Inference
    }
}

/// Main application configuration
///
/// Resolved once at startup (defaults, then environment, then CLI overrides)
/// and passed by reference afterwards; nothing mutates it during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inference server base URL
    #[serde(default = "default_server")]
    pub server: String,

    /// Model identifier, e.g. "egohands-public/5"
    #[serde(default)]
    pub model: String,

    /// Workspace the model belongs to (dataset profile only)
    #[serde(default)]
    pub workspace: Option<String>,

    /// Dataset split to benchmark against (dataset profile only)
    #[serde(default = "default_split")]
    pub split: String,

    /// Maximum number of inference calls in flight; 1 means sequential
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Resolved API key (see `config::credentials` for the lookup order)
    #[serde(skip)]
    pub api_key: String,

    /// Warmup variant to run before the timed batch
    #[serde(default)]
    pub warmup: WarmupMode,

    /// Management API used to resolve dataset export links
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Directory of images for the local profile
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Benchmark a downloaded dataset export instead of a local directory
    #[serde(default)]
    pub dataset: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: default_server(),
            model: String::new(),
            workspace: None,
            split: default_split(),
            parallelism: default_parallelism(),
            api_key: String::new(),
            warmup: WarmupMode::default(),
            api_endpoint: default_api_endpoint(),
            images_dir: default_images_dir(),
            dataset: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Inference endpoint for this model: `<server>/<model>`
    pub fn inference_url(&self) -> String {
        format!("{}/{}", self.server.trim_end_matches('/'), self.model)
    }

    /// Explicit warmup endpoint: `<server>/start/<model>`
    pub fn warmup_url(&self) -> String {
        format!("{}/start/{}", self.server.trim_end_matches('/'), self.model)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.server.is_empty() {
            return Err(AppError::config("Server URL cannot be empty"));
        }
        if let Err(e) = url::Url::parse(&self.server) {
            return Err(AppError::config(format!(
                "Invalid server URL '{}': {}",
                self.server, e
            )));
        }

        if self.model.is_empty() {
            return Err(AppError::config(
                "Model identifier is required (e.g. \"egohands-public/5\")",
            ));
        }

        if let Err(e) = url::Url::parse(&self.api_endpoint) {
            return Err(AppError::config(format!(
                "Invalid API endpoint '{}': {}",
                self.api_endpoint, e
            )));
        }

        if self.parallelism == 0 {
            return Err(AppError::config("Parallelism must be at least 1"));
        }
        if self.parallelism > 1024 {
            return Err(AppError::config("Parallelism cannot exceed 1024"));
        }

        if self.dataset && self.workspace.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::config(
                "Dataset profile requires a workspace (--workspace or INFERENCE_WORKSPACE)",
            ));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        use crate::config::env::EnvManager;

        if let Ok(server) = std::env::var("INFERENCE_SERVER") {
            if !server.trim().is_empty() {
                EnvManager::validate_env_var("INFERENCE_SERVER", server.trim())?;
                self.server = server.trim().to_string();
            }
        }

        if let Ok(model) = std::env::var("INFERENCE_MODEL") {
            if !model.trim().is_empty() {
                self.model = model.trim().to_string();
            }
        }

        if let Ok(workspace) = std::env::var("INFERENCE_WORKSPACE") {
            if !workspace.trim().is_empty() {
                self.workspace = Some(workspace.trim().to_string());
            }
        }

        if let Ok(split) = std::env::var("DATASET_SPLIT") {
            if !split.trim().is_empty() {
                self.split = split.trim().to_string();
            }
        }

        if let Ok(parallelism) = std::env::var("PARALLELISM") {
            EnvManager::validate_env_var("PARALLELISM", &parallelism)?;
            self.parallelism = parallelism.parse().map_err(|e| {
                AppError::config(format!("Invalid PARALLELISM value '{}': {}", parallelism, e))
            })?;
        }

        if let Ok(api_endpoint) = std::env::var("API_ENDPOINT") {
            if !api_endpoint.trim().is_empty() {
                EnvManager::validate_env_var("API_ENDPOINT", api_endpoint.trim())?;
                self.api_endpoint = api_endpoint.trim().to_string();
            }
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            EnvManager::validate_env_var("ENABLE_COLOR", &enable_color)?;
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid ENABLE_COLOR value '{}': {}",
                    enable_color, e
                ))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_server() -> String {
    crate::defaults::DEFAULT_SERVER.to_string()
}

fn default_api_endpoint() -> String {
    crate::defaults::DEFAULT_API_ENDPOINT.to_string()
}

fn default_split() -> String {
    crate::defaults::DEFAULT_SPLIT.to_string()
}

fn default_parallelism() -> usize {
    crate::defaults::DEFAULT_PARALLELISM
}

fn default_images_dir() -> String {
    crate::defaults::DEFAULT_IMAGES_DIR.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
