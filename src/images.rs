//! Image source: enumerate and load the benchmark image set

use crate::{
    error::{AppError, Result},
    models::ImageRecord,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// File extensions treated as images; dataset exports ship annotation files
/// alongside the images and those must not be submitted for inference
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Load every image under `dir` into an in-memory base64 payload.
///
/// Walks the directory recursively (dataset exports nest images under split
/// subdirectories), skips hidden files and non-image extensions, and returns
/// records sorted by name so runs over the same directory are deterministic.
pub fn load_images(dir: &Path) -> Result<Vec<ImageRecord>> {
    if !dir.is_dir() {
        return Err(AppError::io(format!(
            "Image directory '{}' does not exist",
            dir.display()
        )));
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || is_hidden(path) || !is_image(path) {
            continue;
        }

        let bytes = fs::read(path).map_err(|e| {
            AppError::io(format!("Failed to read image '{}': {}", path.display(), e))
        })?;

        let name = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        records.push(ImageRecord::new(name, BASE64.encode(&bytes)));
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(records)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
