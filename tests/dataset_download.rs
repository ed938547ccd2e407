//! Integration tests for dataset export download and extraction

use inference_benchmarker::{dataset::DatasetManager, error::AppError, images::load_images, models::Config};
use serde_json::json;
use std::io::Write;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

fn config_for(api_endpoint: &str) -> Config {
    Config {
        model: "egohands-public/5".to_string(),
        workspace: Some("team".to_string()),
        api_endpoint: api_endpoint.to_string(),
        api_key: "test-key".to_string(),
        dataset: true,
        ..Config::default()
    }
}

/// Build a small in-memory dataset export: one image and one annotation file
fn export_zip_bytes() -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        writer
            .start_file("train/hand.jpg", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"fake-jpeg-bytes").unwrap();
        writer
            .start_file("train/hand.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"0 0.5 0.5 0.1 0.1").unwrap();
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

#[tokio::test]
async fn test_full_download_extract_cycle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/team/egohands-public/5/benchmarker"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "export": {"link": format!("{}/export.zip", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/export.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(export_zip_bytes()))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("datasets");
    let manager = DatasetManager::with_root(&config_for(&server.uri()), root.clone()).unwrap();

    let dir = manager
        .ensure_local("team", "egohands-public/5")
        .await
        .unwrap();

    // Extracted image is present, the archive has been deleted
    assert!(dir.join("train/hand.jpg").is_file());
    assert!(!root.join("egohands-public/5.zip").exists());

    // The image source picks up only the image, not the annotation
    let records = load_images(&dir.join("train")).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "hand.jpg");
}

#[tokio::test]
async fn test_second_run_skips_download() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/team/egohands-public/5/benchmarker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "export": {"link": format!("{}/export.zip", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/export.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(export_zip_bytes()))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let manager =
        DatasetManager::with_root(&config_for(&server.uri()), tmp.path().join("datasets")).unwrap();

    let first = manager
        .ensure_local("team", "egohands-public/5")
        .await
        .unwrap();
    // Both mocks expect exactly one hit; a second download would overshoot them
    let second = manager
        .ensure_local("team", "egohands-public/5")
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_export_link_failure_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/team/egohands-public/5/benchmarker"))
        .respond_with(ResponseTemplate::new(404).set_body_string("project not found"))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let manager =
        DatasetManager::with_root(&config_for(&server.uri()), tmp.path().join("datasets")).unwrap();

    let err = manager
        .ensure_local("team", "egohands-public/5")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Dataset(_)));
    assert!(err.to_string().contains("404"));
}
