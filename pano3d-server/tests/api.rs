//! End-to-end tests for the HTTP surface, driven against the in-memory
//! job client

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pano3d_server::meshy::{FakeImageTo3d, JobStatus};
use pano3d_server::routes::app;
use pano3d_server::state::AppState;
use pano3d_server::store::MetaStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn succeeded_status() -> JobStatus {
    JobStatus {
        status: Some("SUCCEEDED".to_string()),
        progress: Some(100.0),
        message: Some(String::new()),
        model_urls: Some(json!({"glb": "https://assets.test/model.glb"})),
    }
}

fn pending_status() -> JobStatus {
    JobStatus {
        status: Some("PENDING".to_string()),
        progress: Some(0.0),
        ..Default::default()
    }
}

/// Assemble a minimal single-triangle GLB in memory
fn triangle_glb() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let json = json!({
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962},
            {"buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
            {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}],
        "scene": 0
    });
    let mut json_bytes = serde_json::to_vec(&json).unwrap();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }

    let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json_bytes);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin);
    glb
}

/// Router wired to the given fake, with a throwaway data directory
fn test_app(fake: Arc<FakeImageTo3d>) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = MetaStore::new(dir.path()).unwrap();
    (app(AppState::with_client(fake, store)), dir)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_service_tag() {
    let (app, _dir) = test_app(Arc::new(FakeImageTo3d::new("task-1")));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "image-to-3d-backend");
}

#[tokio::test]
async fn process_image_without_source_is_rejected() {
    let fake = Arc::new(FakeImageTo3d::new("task-1"));
    let (app, _dir) = test_app(fake.clone());

    let response = app
        .oneshot(json_request("/api/process-image", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("No image provided"));
    assert_eq!(fake.call_count(), 0);
}

#[tokio::test]
async fn process_image_with_url_creates_job() {
    let fake = Arc::new(FakeImageTo3d::new("task-42"));
    let (app, _dir) = test_app(fake.clone());

    let response = app
        .oneshot(json_request(
            "/api/process-image",
            json!({"image_url": "https://images.test/cat.png"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = body_json(response).await;
    assert_eq!(body["task_id"], "task-42");

    let created = fake.created_jobs();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, "https://images.test/cat.png");
    assert!(created[0].1.enable_pbr);
}

#[tokio::test]
async fn bogus_ai_model_is_normalized_before_forwarding() {
    let fake = Arc::new(FakeImageTo3d::new("task-42"));
    let (app, _dir) = test_app(fake.clone());

    let response = app
        .oneshot(json_request(
            "/api/process-image",
            json!({"image_url": "https://images.test/cat.png", "ai_model": "bogus"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(fake.created_jobs()[0].1.ai_model, "latest");
}

#[tokio::test]
async fn base64_body_is_wrapped_as_data_uri() {
    let fake = Arc::new(FakeImageTo3d::new("task-42"));
    let (app, _dir) = test_app(fake.clone());

    use base64::{engine::general_purpose::STANDARD, Engine};
    let response = app
        .oneshot(json_request(
            "/api/process-image",
            json!({"image_base64": format!("data:image/png;base64,{}", STANDARD.encode(b"pixels"))}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let forwarded = &fake.created_jobs()[0].0;
    assert_eq!(
        forwarded,
        &format!("data:image/png;base64,{}", STANDARD.encode(b"pixels"))
    );
}

#[tokio::test]
async fn multipart_upload_creates_job_and_parses_flags() {
    let fake = Arc::new(FakeImageTo3d::new("task-42"));
    let (app, _dir) = test_app(fake.clone());

    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"cat.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         raw png bytes\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"enable_pbr\"\r\n\r\n\
         no\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"ai_model\"\r\n\r\n\
         meshy-5\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/process-image")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let created = fake.created_jobs();
    assert!(created[0].0.starts_with("data:image/png;base64,"));
    assert!(!created[0].1.enable_pbr);
    assert!(created[0].1.should_remesh);
    assert_eq!(created[0].1.ai_model, "meshy-5");
}

#[tokio::test]
async fn plain_text_body_is_unsupported_media_type() {
    let (app, _dir) = test_app(Arc::new(FakeImageTo3d::new("task-1")));

    let request = Request::builder()
        .method("POST")
        .uri("/api/process-image")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn status_relays_upstream_fields() {
    let fake = Arc::new(FakeImageTo3d::new("task-1").with_status(pending_status()));
    let (app, _dir) = test_app(fake);

    let response = app
        .oneshot(
            Request::get("/api/status/task-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["progress"], 0.0);
}

#[tokio::test]
async fn result_before_completion_conflicts() {
    let fake = Arc::new(FakeImageTo3d::new("task-1").with_status(pending_status()));
    let (app, _dir) = test_app(fake);

    let response = app
        .oneshot(
            Request::get("/api/result/task-1?format=ply")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["status"], "PENDING");
    assert!(body["error"].as_str().unwrap().contains("not completed"));
}

#[tokio::test]
async fn unknown_format_is_rejected_without_remote_calls() {
    let fake = Arc::new(FakeImageTo3d::new("task-1").with_status(succeeded_status()));
    let (app, _dir) = test_app(fake.clone());

    let response = app
        .oneshot(
            Request::get("/api/result/task-1?format=xyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unsupported format");
    assert_eq!(body["allowed"], json!(["glb", "obj", "ply"]));
    assert_eq!(fake.call_count(), 0, "no remote call may be made");
}

#[tokio::test]
async fn result_glb_is_byte_identical_passthrough() {
    let glb = triangle_glb();
    let fake = Arc::new(
        FakeImageTo3d::new("task-1")
            .with_status(succeeded_status())
            .with_model(glb.clone()),
    );
    let (app, _dir) = test_app(fake);

    let response = app
        .oneshot(
            Request::get("/api/result/task-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "model/gltf-binary"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.as_ref(), glb.as_slice());
}

#[tokio::test]
async fn result_obj_is_converted() {
    let fake = Arc::new(
        FakeImageTo3d::new("task-1")
            .with_status(succeeded_status())
            .with_model(triangle_glb()),
    );
    let (app, _dir) = test_app(fake);

    let response = app
        .oneshot(
            Request::get("/api/result/task-1?format=obj")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 1);
}

#[tokio::test]
async fn corrupt_model_fails_conversion() {
    let fake = Arc::new(
        FakeImageTo3d::new("task-1")
            .with_status(succeeded_status())
            .with_model(b"not a glb".to_vec()),
    );
    let (app, _dir) = test_app(fake);

    let response = app
        .oneshot(
            Request::get("/api/result/task-1?format=ply")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Conversion"));
}

#[tokio::test]
async fn succeeded_without_model_url_is_protocol_error() {
    let fake = Arc::new(FakeImageTo3d::new("task-1").with_status(JobStatus {
        status: Some("SUCCEEDED".to_string()),
        ..Default::default()
    }));
    let (app, _dir) = test_app(fake);

    let response = app
        .oneshot(
            Request::get("/api/result/task-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("GLB URL missing"));
}

#[tokio::test]
async fn missing_credential_fails_without_network() {
    use pano3d_server::meshy::MeshyClient;

    let dir = tempfile::tempdir().unwrap();
    let store = MetaStore::new(dir.path()).unwrap();
    // Unroutable base URL: a configuration error must surface before any
    // connection attempt
    let client = Arc::new(MeshyClient::new(
        "http://127.0.0.1:1/image-to-3d".to_string(),
        None,
    ));
    let app = app(AppState::with_client(client, store));

    let response = app
        .oneshot(json_request(
            "/api/process-image",
            json!({"image_url": "https://images.test/cat.png"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("MESHY_API_KEY"));
}
