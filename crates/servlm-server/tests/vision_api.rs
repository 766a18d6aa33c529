//! Endpoint tests for the vision API, driven through a mock provider.

use std::sync::Arc;

use axum_test::TestServer;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};
use serde_json::{Value, json};
use servlm_core::mock::{MockConfig, MockProvider};
use servlm_server::{ModelRegistry, ServiceState, router};

fn test_server() -> TestServer {
    let provider = Arc::new(MockProvider::new(MockConfig {
        model_id: "florence-2-base".into(),
        ..Default::default()
    }));
    let state = ServiceState::new(ModelRegistry::new(provider));
    TestServer::new(router(state)).expect("router should start")
}

fn png_base64(width: u32, height: u32) -> String {
    let image = DynamicImage::new_rgb8(width, height);
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("png encoding");
    STANDARD.encode(buffer.get_ref())
}

#[tokio::test]
async fn caption_happy_path() {
    let server = test_server();

    let response = server
        .post("/vision")
        .json(&json!({
            "id": "req-42",
            "task": "caption",
            "image": png_base64(16, 8),
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "req-42");
    assert_eq!(body["model"], "florence-2-base");
    assert_eq!(body["image"], json!({"width": 16, "height": 8}));
    assert_eq!(body["results"]["caption"]["text"], "a cat sitting on a windowsill");
}

#[tokio::test]
async fn task_defaults_to_caption() {
    let server = test_server();

    let response = server
        .post("/vision")
        .json(&json!({"image": png_base64(4, 4)}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["results"]["caption"].is_object());
    // The id is generated when the caller omits it.
    assert!(!body["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn detection_returns_boxes() {
    let server = test_server();

    let response = server
        .post("/vision")
        .json(&json!({"task": "detection", "image": png_base64(4, 4)}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let boxes = body["results"]["detection"]["boxes"].as_array().unwrap();
    assert_eq!(boxes.len(), 1);
    assert_eq!(boxes[0]["label"], "cat");
}

#[tokio::test]
async fn open_vocabulary_detection_accepts_prompt() {
    let server = test_server();

    let response = server
        .post("/vision")
        .json(&json!({
            "task": "detection",
            "prompt": "a red bicycle",
            "image": png_base64(4, 4),
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["results"]["detection"].is_object());
}

#[tokio::test]
async fn ocr_with_regions_returns_polygons() {
    let server = test_server();

    let response = server
        .post("/vision")
        .json(&json!({
            "task": "ocr",
            "options": {"polys": true},
            "image": png_base64(4, 4),
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let polys = body["results"]["ocr"]["polys"].as_array().unwrap();
    assert_eq!(polys.len(), 1);
    assert!(body["results"]["ocr"].get("text").is_none());
}

#[tokio::test]
async fn unknown_model_is_rejected_before_inference() {
    let server = test_server();

    let response = server
        .post("/vision")
        .json(&json!({"model": "clip", "image": png_base64(4, 4)}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["name"], "validation");
    assert!(body["message"].as_str().unwrap().contains("florence-2-base"));
}

#[tokio::test]
async fn caption_prompt_is_rejected() {
    let server = test_server();

    let response = server
        .post("/vision")
        .json(&json!({
            "task": "caption",
            "prompt": "describe the sky",
            "image": png_base64(4, 4),
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["name"], "validation");
}

#[tokio::test]
async fn invalid_image_payload_is_rejected() {
    let server = test_server();

    let response = server
        .post("/vision")
        .json(&json!({"image": "definitely-not-base64!!!"}))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["name"], "invalid_image");
}

#[tokio::test]
async fn index_lists_routes() {
    let server = test_server();

    let response = server.get("/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let paths: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|route| route["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"/vision"));
}

#[tokio::test]
async fn health_reports_every_provider() {
    let server = test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["florence-2-base"]["status"], "healthy");
}
