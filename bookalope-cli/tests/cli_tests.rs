//! Integration tests for the Bookalope CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "0123456789abcdef0123456789abcdef";
const BOOK: &str = "b00c0000000000000000000000000001";
const FLOW: &str = "f1000000000000000000000000000001";

/// Create a small manuscript file for testing
fn create_test_document(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "Alice was beginning to get very tired.").expect("Failed to write test file");
    path
}

fn bookalope() -> Command {
    let mut cmd = Command::cargo_bin("bookalope").unwrap();
    cmd.env_remove("BOOKALOPE_TOKEN").env_remove("BOOKALOPE_HOST");
    cmd
}

#[test]
fn test_help() {
    bookalope()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("formats"))
        .stdout(predicate::str::contains("styles"))
        .stdout(predicate::str::contains("books"))
        .stdout(predicate::str::contains("profile"));
}

#[test]
fn test_version() {
    bookalope()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookalope"));
}

#[test]
fn test_convert_help() {
    bookalope()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert a document"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--credit"))
        .stdout(predicate::str::contains("--keep"));
}

#[test]
fn test_styles_requires_format() {
    bookalope()
        .args(["--token", TOKEN, "styles"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<FORMAT>"));
}

#[test]
fn test_convert_missing_document() {
    bookalope()
        .args(["--token", TOKEN, "convert", "/nonexistent/manuscript.docx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read document"));
}

#[test]
fn test_convert_without_token() {
    let temp_dir = TempDir::new().unwrap();
    let document = create_test_document(&temp_dir, "alice.txt");

    bookalope()
        .arg("convert")
        .arg(&document)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API token"));
}

#[test]
fn test_invalid_token() {
    bookalope()
        .args(["--token", "not-a-token", "profile"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid API token"));
}

#[test]
fn test_invalid_credit() {
    let temp_dir = TempDir::new().unwrap();
    let document = create_test_document(&temp_dir, "alice.txt");

    bookalope()
        .args(["--token", TOKEN, "convert"])
        .arg(&document)
        .args(["--credit", "gold"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gold"));
}

#[test]
fn test_invalid_host() {
    bookalope()
        .args(["--token", TOKEN, "--host", "ftp://example.com", "formats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid server URL"));
}

// =============================================================================
// Against a mock server
// =============================================================================

fn ok(status: u16) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header("X-Bookalope-Api-Version", "1.1.0")
}

fn bookflow_json(step: &str) -> serde_json::Value {
    json!({"bookflow": {"id": FLOW, "name": "Bookflow", "step": step, "credit": null}})
}

/// Mount the endpoints a conversion run needs, up to the analysis result
async fn mount_lifecycle(server: &MockServer, analysed_step: &str) {
    Mock::given(method("POST"))
        .and(path("/api/books"))
        .respond_with(ok(201).set_body_json(json!({"book": {
            "id": BOOK,
            "name": "Alice",
            "created": "2024-03-01T09:30:00",
            "bookflows": [],
        }})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/books/{BOOK}/bookflows")))
        .respond_with(ok(201).set_body_json(bookflow_json("files")))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/bookflows/{FLOW}")))
        .respond_with(ok(200))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/api/bookflows/{FLOW}/files/document")))
        .respond_with(ok(200))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/bookflows/{FLOW}")))
        .respond_with(ok(200).set_body_json(bookflow_json(analysed_step)))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/books/{BOOK}")))
        .respond_with(ok(204))
        .expect(1)
        .mount(server)
        .await;
}

/// Run the binary off the async runtime, so the mock server keeps serving
async fn run_convert(server: &MockServer, document: &Path, output_dir: &Path) -> Output {
    let mut cmd = bookalope();
    cmd.args(["--token", TOKEN, "--host", &server.uri(), "convert"])
        .arg(document)
        .args(["--title", "Alice", "--author", "Lewis Carroll"])
        .args(["--format", "epub", "--poll-interval-ms", "10", "--timeout", "30"])
        .arg("--output-dir")
        .arg(output_dir);

    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_convert_end_to_end() {
    let server = MockServer::start().await;
    mount_lifecycle(&server, "convert").await;
    Mock::given(method("POST"))
        .and(path(format!("/api/bookflows/{FLOW}/convert")))
        .respond_with(ok(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/bookflows/{FLOW}/download/epub/status")))
        .respond_with(ok(200).set_body_json(json!({"status": "available"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/bookflows/{FLOW}/download/epub")))
        .respond_with(
            ok(200)
                .insert_header("Content-Disposition", "attachment; filename=alice.epub")
                .set_body_bytes(b"PK\x03\x04converted".to_vec()),
        )
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let document = create_test_document(&temp_dir, "alice.txt");
    let output_dir = temp_dir.path().join("out");

    let output = run_convert(&server, &document, &output_dir).await;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let converted = output_dir.join(format!("{FLOW}.epub"));
    assert_eq!(fs::read(&converted).unwrap(), b"PK\x03\x04converted");
    assert!(String::from_utf8_lossy(&output.stdout).contains(&format!("{FLOW}.epub")));

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path().ends_with("/files/document"))
        .unwrap();
    let body: serde_json::Value = upload.body_json().unwrap();
    assert_eq!(body["filename"], "alice.txt");
    assert_eq!(body["skip_analysis"], false);
}

#[tokio::test]
async fn test_convert_analysis_failure() {
    let server = MockServer::start().await;
    mount_lifecycle(&server, "processing_failed").await;
    Mock::given(method("POST"))
        .and(path(format!("/api/bookflows/{FLOW}/convert")))
        .respond_with(ok(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let document = create_test_document(&temp_dir, "alice.txt");

    let output = run_convert(&server, &document, temp_dir.path()).await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to analyse"));
}
