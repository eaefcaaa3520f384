//! Integration tests for the batch helpers: download-and-persist and
//! glob-driven directory upload.

use std::path::Path;

use fileferry::{SaveOutcome, TransferClient, UploadBatchOutcome, download_and_save, upload_from_path};
use tempfile::TempDir;
use uuid::Uuid;
use wiremock::matchers::{method, path as url_path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn connect(server: &MockServer) -> TransferClient {
    TransferClient::connect(&server.uri(), "bot", "secret")
        .await
        .expect("client should connect")
}

fn dir_entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("should list dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_download_and_save_200_writes_one_uuid_prefixed_file() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let content = b"col_a;col_b\n1;2\n";

    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=export.csv")
                .set_body_bytes(content.to_vec()),
        )
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = download_and_save(&client, temp_dir.path(), false)
        .await
        .expect("save should succeed");

    let SaveOutcome::Saved(saved_path) = outcome else {
        panic!("expected Saved, got {outcome:?}");
    };
    assert!(saved_path.exists());
    assert_eq!(std::fs::read(&saved_path).expect("should read"), content);

    let entries = dir_entries(temp_dir.path());
    assert_eq!(entries.len(), 1, "exactly one file: {entries:?}");

    let name = &entries[0];
    assert!(name.ends_with("_export.csv"), "got: {name}");
    let prefix = name.trim_end_matches("_export.csv");
    Uuid::parse_str(prefix).expect("prefix should be a fresh uuid");
}

#[tokio::test]
async fn test_download_and_save_twice_never_collides() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=export.csv")
                .set_body_bytes(b"same suggestion".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let first = download_and_save(&client, temp_dir.path(), false)
        .await
        .expect("first save");
    let second = download_and_save(&client, temp_dir.path(), false)
        .await
        .expect("second save");

    assert_ne!(first, second, "identical suggestions must not collide");
    assert_eq!(dir_entries(temp_dir.path()).len(), 2);
}

#[tokio::test]
async fn test_download_and_save_without_suggestion_uses_bare_uuid() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"anonymous".to_vec()))
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    download_and_save(&client, temp_dir.path(), false)
        .await
        .expect("save should succeed");

    let entries = dir_entries(temp_dir.path());
    assert_eq!(entries.len(), 1);
    Uuid::parse_str(&entries[0]).expect("name should be a bare uuid");
}

#[tokio::test]
async fn test_download_and_save_204_writes_nothing() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/download"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = download_and_save(&client, temp_dir.path(), false)
        .await
        .expect("204 is not an error");

    assert_eq!(outcome, SaveOutcome::NoContent);
    assert!(dir_entries(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_download_and_save_error_status_writes_nothing() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/download"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = download_and_save(&client, temp_dir.path(), false)
        .await
        .expect("non-200/204 is not an error");

    assert_eq!(
        outcome,
        SaveOutcome::Failed {
            status: 503,
            reason: "Service Unavailable".to_string(),
        }
    );
    assert!(dir_entries(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_download_and_save_missing_path_performs_zero_requests() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let missing = temp_dir.path().join("does-not-exist");

    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/download"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/downloadall"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = download_and_save(&client, &missing, false)
        .await
        .expect("missing path is a silent no-op, not an error");

    assert_eq!(outcome, SaveOutcome::MissingPath(missing));
}

#[tokio::test]
async fn test_download_and_save_all_flag_uses_downloadall() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/downloadall"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=bundle.zip")
                .set_body_bytes(b"archive".to_vec()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(url_path("/FileTransfer/download"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = download_and_save(&client, temp_dir.path(), true)
        .await
        .expect("save should succeed");

    assert!(matches!(outcome, SaveOutcome::Saved(_)));
}

#[tokio::test]
async fn test_upload_from_path_uploads_each_match() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    std::fs::write(temp_dir.path().join("one.csv"), b"1").expect("write");
    std::fs::write(temp_dir.path().join("two.csv"), b"2").expect("write");
    std::fs::write(temp_dir.path().join("skip.txt"), b"x").expect("write");

    Mock::given(method("POST"))
        .and(url_path("/FileTransfer/upload"))
        .and(query_param("dir", "incoming"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = upload_from_path(&client, "*.csv", temp_dir.path(), "incoming")
        .await
        .expect("batch upload should succeed");

    assert_eq!(outcome, UploadBatchOutcome::Uploaded(2));
}

#[tokio::test]
async fn test_upload_from_path_matches_literally_inside_bracketed_dir_name() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    // Glob metacharacters in the base directory must not be interpreted
    // as pattern syntax; only the caller's pattern is.
    let source = temp_dir.path().join("data[1]");
    std::fs::create_dir(&source).expect("create dir");
    std::fs::write(source.join("one.csv"), b"1").expect("write");

    Mock::given(method("POST"))
        .and(url_path("/FileTransfer/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = upload_from_path(&client, "*.csv", &source, "")
        .await
        .expect("batch upload should succeed");

    assert_eq!(outcome, UploadBatchOutcome::Uploaded(1));
}

#[tokio::test]
async fn test_upload_from_path_no_matches_uploads_nothing() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("POST"))
        .and(url_path("/FileTransfer/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = upload_from_path(&client, "*.csv", temp_dir.path(), "")
        .await
        .expect("empty match set is not an error");

    assert_eq!(outcome, UploadBatchOutcome::Uploaded(0));
}

#[tokio::test]
async fn test_upload_from_path_missing_path_performs_zero_requests() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let missing = temp_dir.path().join("does-not-exist");

    Mock::given(method("POST"))
        .and(url_path("/FileTransfer/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = upload_from_path(&client, "*", &missing, "")
        .await
        .expect("missing path is a silent no-op, not an error");

    assert_eq!(outcome, UploadBatchOutcome::MissingPath(missing));
}

#[tokio::test]
async fn test_upload_from_path_round_trips_file_bytes() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let content = b"binary \x00\x01\x02 payload";
    std::fs::write(temp_dir.path().join("data.bin"), content).expect("write");

    Mock::given(method("POST"))
        .and(url_path("/FileTransfer/upload"))
        .and(wiremock::matchers::body_bytes(content.to_vec()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = connect(&mock_server).await;
    let outcome = upload_from_path(&client, "*.bin", temp_dir.path(), "")
        .await
        .expect("batch upload should succeed");

    assert_eq!(outcome, UploadBatchOutcome::Uploaded(1));
}
