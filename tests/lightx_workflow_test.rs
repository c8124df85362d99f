//! LightX hairstyle workflow against a mocked provider.

mod common;

use axum::body::Bytes;
use hairstyle_studio::services::lightx_service::LightXService;
use hairstyle_studio::utils::multipart::ImagePayload;
use hairstyle_studio::ErrorKind;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_bytes, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE: &[u8] = b"fake-png-bytes";

fn envelope(body: serde_json::Value) -> serde_json::Value {
    json!({ "statusCode": 2000, "message": "SUCCESS", "body": body })
}

fn service(server: &MockServer) -> LightXService {
    let config = common::test_config("http://unused", &server.uri());
    LightXService::new(Arc::new(config), reqwest::Client::new())
}

fn payload() -> ImagePayload {
    ImagePayload::new(Bytes::from_static(IMAGE), Some("image/png"), Some("me.png".into())).unwrap()
}

async fn mount_upload_and_submit(server: &MockServer, max_retries: u32) {
    Mock::given(method("POST"))
        .and(path("/v2/uploadImageUrl"))
        .and(header("x-api-key", "test-lightx-key"))
        .and(body_partial_json(json!({
            "uploadType": "imageUrl",
            "size": IMAGE.len(),
            "contentType": "image/png"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "uploadImage": format!("{}/upload/x", server.uri()),
            "imageUrl": "https://r/x"
        }))))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload/x"))
        .and(header("content-type", "image/png"))
        .and(body_bytes(IMAGE))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/hairstyle"))
        .and(header("x-api-key", "test-lightx-key"))
        .and(body_partial_json(json!({
            "imageUrl": "https://r/x",
            "textPrompt": "short fade"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "orderId": "abc",
            "maxRetriesAllowed": max_retries,
            "avgResponseTimeInSec": 15,
            "status": "init"
        }))))
        .expect(1)
        .mount(server)
        .await;
}

fn status_response(status: &str, output: Option<&str>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(envelope(json!({
        "orderId": "abc",
        "status": status,
        "output": output
    })))
}

#[tokio::test]
async fn pending_then_active_returns_output() {
    let server = MockServer::start().await;
    mount_upload_and_submit(&server, 2).await;

    Mock::given(method("POST"))
        .and(path("/v1/order-status"))
        .and(body_partial_json(json!({ "orderId": "abc" })))
        .respond_with(status_response("pending", None))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/order-status"))
        .respond_with(status_response("active", Some("https://r/x/out.png?sig=1")))
        .expect(1)
        .mount(&server)
        .await;

    let output = service(&server)
        .generate_hairstyle(&payload(), "short fade")
        .await
        .unwrap();

    assert_eq!(output, "https://r/x/out.png?sig=1");
}

#[tokio::test]
async fn missing_status_counts_as_pending() {
    let server = MockServer::start().await;
    mount_upload_and_submit(&server, 3).await;

    Mock::given(method("POST"))
        .and(path("/v1/order-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "orderId": "abc",
            "status": null
        }))))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/order-status"))
        .respond_with(status_response("active", Some("https://r/o.png")))
        .expect(1)
        .mount(&server)
        .await;

    let output = service(&server)
        .generate_hairstyle(&payload(), "short fade")
        .await
        .unwrap();

    assert_eq!(output, "https://r/o.png");
}

#[tokio::test]
async fn failed_status_stops_polling() {
    let server = MockServer::start().await;
    mount_upload_and_submit(&server, 5).await;

    Mock::given(method("POST"))
        .and(path("/v1/order-status"))
        .respond_with(status_response("failed", None))
        .expect(1)
        .mount(&server)
        .await;

    let err = service(&server)
        .generate_hairstyle(&payload(), "short fade")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert_eq!(err.to_string(), "Hairstyle generation failed");
}

#[tokio::test]
async fn never_terminal_times_out_after_declared_attempts() {
    let server = MockServer::start().await;
    mount_upload_and_submit(&server, 3).await;

    Mock::given(method("POST"))
        .and(path("/v1/order-status"))
        .respond_with(status_response("pending", None))
        .expect(3)
        .mount(&server)
        .await;

    let err = service(&server)
        .generate_hairstyle(&payload(), "short fade")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamTimeout);
    assert_eq!(err.to_string(), "Timeout while waiting for hairstyle generation");
}

#[tokio::test]
async fn status_check_error_is_not_retried() {
    let server = MockServer::start().await;
    mount_upload_and_submit(&server, 5).await;

    Mock::given(method("POST"))
        .and(path("/v1/order-status"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = service(&server)
        .generate_hairstyle(&payload(), "short fade")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to check order status");
}

#[tokio::test]
async fn rejected_reservation_stops_before_upload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/uploadImageUrl"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "statusCode": 4001,
            "message": "Invalid API key"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/hairstyle"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = service(&server)
        .generate_hairstyle(&payload(), "short fade")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    assert_eq!(err.to_string(), "Failed to get image upload URL: Invalid API key");
}

#[tokio::test]
async fn failed_upload_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/uploadImageUrl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "uploadImage": format!("{}/upload/x", server.uri()),
            "imageUrl": "https://r/x"
        }))))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload/x"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/hairstyle"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = service(&server)
        .generate_hairstyle(&payload(), "short fade")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to upload image");
}

#[tokio::test]
async fn envelope_without_body_reports_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/uploadImageUrl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 5040,
            "message": "Image size too large",
            "body": null
        })))
        .mount(&server)
        .await;

    let err = service(&server)
        .reserve_upload_slot(&payload())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to get image upload URL: Image size too large");
}
