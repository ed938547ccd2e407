//! Dataset acquisition for the dataset profile
//!
//! Downloads a labeled dataset export once and extracts it under
//! `datasets/<model>/`. An existing directory is used as-is; keeping datasets
//! in sync with the remote project is a non-goal.

use crate::{
    error::{AppError, Result},
    models::Config,
};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Management API response carrying the export download link
#[derive(Debug, Deserialize)]
struct ExportResponse {
    export: ExportInfo,
}

#[derive(Debug, Deserialize)]
struct ExportInfo {
    link: String,
}

/// Downloads and extracts dataset exports
pub struct DatasetManager {
    http: Client,
    api_endpoint: String,
    api_key: String,
    root: PathBuf,
}

impl DatasetManager {
    /// Create a manager rooted at the default `datasets/` directory
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_root(config, PathBuf::from(crate::defaults::DATASETS_DIR))
    }

    /// Create a manager with an explicit dataset root (used by tests)
    pub fn with_root(config: &Config, root: PathBuf) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::http_setup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            root,
        })
    }

    /// Ensure the dataset for `model` exists locally and return its directory.
    ///
    /// If `datasets/<model>/` already exists the download is skipped entirely.
    /// Otherwise the export link is resolved via the management API, the
    /// archive streamed to `datasets/<model>.zip`, extracted, and the zip
    /// deleted.
    pub async fn ensure_local(&self, workspace: &str, model: &str) -> Result<PathBuf> {
        let dataset_dir = self.root.join(model);
        if dataset_dir.is_dir() {
            return Ok(dataset_dir);
        }

        let link = self.export_link(workspace, model).await?;

        let zip_path = self.root.join(format!("{}.zip", model));
        self.download(&link, &zip_path).await?;

        extract(&zip_path, &dataset_dir).await?;
        fs::remove_file(&zip_path).await.map_err(|e| {
            AppError::dataset(format!(
                "Failed to delete archive '{}': {}",
                zip_path.display(),
                e
            ))
        })?;

        Ok(dataset_dir)
    }

    /// Resolve the export download link for this model and split
    async fn export_link(&self, workspace: &str, model: &str) -> Result<String> {
        let url = format!(
            "{}/{}/{}/benchmarker",
            self.api_endpoint.trim_end_matches('/'),
            workspace,
            model
        );

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::dataset(format!(
                "Export link request failed with HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: ExportResponse = response
            .json()
            .await
            .map_err(|e| AppError::dataset(format!("Invalid export link response: {}", e)))?;

        Ok(parsed.export.link)
    }

    /// Stream the archive to disk with progress reporting
    async fn download(&self, link: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        let response = self.http.get(link).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::dataset(format!(
                "Archive download failed with HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let progress = match response.content_length() {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{bar:40.cyan/blue} {percent:>3}% {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                bar
            }
            None => ProgressBar::new_spinner(),
        };

        let mut file = fs::File::create(dest).await.map_err(|e| {
            AppError::dataset(format!("Failed to create '{}': {}", dest.display(), e))
        })?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| AppError::dataset(format!("Download interrupted: {}", e)))?;
            file.write_all(&chunk).await?;
            progress.inc(chunk.len() as u64);
        }
        file.flush().await?;
        progress.finish();

        Ok(())
    }
}

/// Extract the archive into `dir`; zip decompression is blocking work
async fn extract(zip_path: &Path, dir: &Path) -> Result<()> {
    let zip_path = zip_path.to_path_buf();
    let dir = dir.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let file = std::fs::File::open(&zip_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        archive.extract(&dir)?;
        Ok(())
    })
    .await
    .map_err(|e| AppError::dataset(format!("Extraction task failed: {}", e)))?
}
