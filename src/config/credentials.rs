//! API key resolution
//!
//! The key is resolved once at startup by an explicit ordered lookup:
//!
//! 1. the `--api-key` CLI argument;
//! 2. a `.roboflow_key` file in the working directory or any ancestor;
//! 3. the `ROBOFLOW_KEY` environment variable;
//! 4. the `ROBOFLOW_API_KEY` environment variable;
//! 5. a placeholder string (the server will reject requests made with it).
//!
//! The first hit wins; later sources are not consulted.

use crate::defaults;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the resolved API key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    CliArgument,
    KeyFile(PathBuf),
    Environment(&'static str),
    Placeholder,
}

/// A resolved API key and its provenance
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub value: String,
    pub source: ApiKeySource,
}

impl ApiKey {
    /// True when no real credential could be found
    pub fn is_placeholder(&self) -> bool {
        self.source == ApiKeySource::Placeholder
    }

    /// Human-readable provenance for debug output
    pub fn describe_source(&self) -> String {
        match &self.source {
            ApiKeySource::CliArgument => "command-line argument".to_string(),
            ApiKeySource::KeyFile(path) => format!("key file {}", path.display()),
            ApiKeySource::Environment(var) => format!("environment variable {}", var),
            ApiKeySource::Placeholder => "placeholder (no credential found)".to_string(),
        }
    }
}

/// Resolve the API key starting from the current working directory
pub fn resolve_api_key(cli_key: Option<&str>) -> ApiKey {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_api_key_from(cli_key, &cwd)
}

/// Resolve the API key with an explicit starting directory for the file walk
pub fn resolve_api_key_from(cli_key: Option<&str>, start_dir: &Path) -> ApiKey {
    if let Some(key) = cli_key {
        let key = key.trim();
        if !key.is_empty() {
            return ApiKey {
                value: key.to_string(),
                source: ApiKeySource::CliArgument,
            };
        }
    }

    if let Some((value, path)) = find_key_file(start_dir) {
        return ApiKey {
            value,
            source: ApiKeySource::KeyFile(path),
        };
    }

    for &var in defaults::API_KEY_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            let value = value.trim().to_string();
            if !value.is_empty() {
                return ApiKey {
                    value,
                    source: ApiKeySource::Environment(var),
                };
            }
        }
    }

    ApiKey {
        value: defaults::API_KEY_PLACEHOLDER.to_string(),
        source: ApiKeySource::Placeholder,
    }
}

/// Search `start_dir` and every ancestor for the key file; first hit wins
fn find_key_file(start_dir: &Path) -> Option<(String, PathBuf)> {
    for dir in start_dir.ancestors() {
        let candidate = dir.join(defaults::API_KEY_FILENAME);
        if let Ok(content) = fs::read_to_string(&candidate) {
            let trimmed = content.trim().to_string();
            if !trimmed.is_empty() {
                return Some((trimmed, candidate));
            }
        }
    }
    None
}
