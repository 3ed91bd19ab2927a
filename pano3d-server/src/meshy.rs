//! Client for the Meshy image-to-3D API
//!
//! The remote surface is three operations behind the [`ImageTo3d`] trait:
//! create a job, poll its status, download the finished binary model. All
//! calls are retry-free with fixed per-call timeouts. [`MeshyClient`] is
//! the live HTTP implementation; [`FakeImageTo3d`] is the in-memory double
//! used by the handler tests.

use crate::error::{ApiError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const CREATE_TIMEOUT: Duration = Duration::from_secs(60);
const STATUS_TIMEOUT: Duration = Duration::from_secs(30);
const FETCH_TIMEOUT: Duration = Duration::from_secs(180);

/// Model names accepted by the upstream API
pub const ALLOWED_AI_MODELS: [&str; 2] = ["latest", "meshy-5"];

/// Normalize a requested model name, silently falling back to `latest`
pub fn sanitize_ai_model(model: String) -> String {
    if ALLOWED_AI_MODELS.contains(&model.as_str()) {
        model
    } else {
        "latest".to_string()
    }
}

/// Options forwarded with every conversion job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOptions {
    pub enable_pbr: bool,
    pub should_remesh: bool,
    pub should_texture: bool,
    pub ai_model: String,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            enable_pbr: true,
            should_remesh: true,
            should_texture: true,
            ai_model: "latest".to_string(),
        }
    }
}

/// Pass-through projection of the upstream job state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: Option<String>,
    pub progress: Option<f64>,
    pub message: Option<String>,
    pub model_urls: Option<Value>,
}

impl JobStatus {
    pub fn is_succeeded(&self) -> bool {
        self.status.as_deref() == Some("SUCCEEDED")
    }

    /// Signed download URL of the binary glTF model, when published
    pub fn glb_url(&self) -> Option<&str> {
        self.model_urls.as_ref()?.get("glb")?.as_str()
    }
}

/// The narrow remote-job capability set: create, poll, download
#[async_trait]
pub trait ImageTo3d: Send + Sync {
    /// Submit a job; returns the upstream task identifier
    async fn create(&self, image_url: &str, options: &JobOptions) -> Result<String>;

    /// Fetch the live job state
    async fn status(&self, task_id: &str) -> Result<JobStatus>;

    /// Download the finished model from its signed URL
    async fn fetch_model(&self, url: &str) -> Result<Vec<u8>>;
}

/// Live HTTP implementation
pub struct MeshyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MeshyClient {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Credential check, performed before any network call
    fn key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            ApiError::Configuration(
                "MESHY_API_KEY is not set. Add the key to the environment or a .env file."
                    .to_string(),
            )
        })
    }
}

/// Relay a non-success upstream response as an error, keeping the body
/// verbatim (JSON when parseable, raw text otherwise)
async fn relay_failure(message: &str, response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.unwrap_or_default();
    let detail = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({ "text": String::from_utf8_lossy(&bytes) }));
    ApiError::Upstream {
        status,
        message: message.to_string(),
        detail,
    }
}

#[async_trait]
impl ImageTo3d for MeshyClient {
    async fn create(&self, image_url: &str, options: &JobOptions) -> Result<String> {
        let key = self.key()?;
        let payload = json!({
            "image_url": image_url,
            "enable_pbr": options.enable_pbr,
            "should_remesh": options.should_remesh,
            "should_texture": options.should_texture,
            "ai_model": options.ai_model,
        });

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(key)
            .json(&payload)
            .timeout(CREATE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        if !response.status().is_success() {
            return Err(relay_failure("Meshy create failed", response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        body.get("result")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Protocol {
                message: "Invalid Meshy response".to_string(),
                detail: body,
            })
    }

    async fn status(&self, task_id: &str) -> Result<JobStatus> {
        let key = self.key()?;
        let url = format!("{}/{}", self.base_url, task_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(key)
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        if !response.status().is_success() {
            return Err(relay_failure("Meshy status failed", response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        serde_json::from_value(body.clone()).map_err(|_| ApiError::Protocol {
            message: "Invalid Meshy response".to_string(),
            detail: body,
        })
    }

    async fn fetch_model(&self, url: &str) -> Result<Vec<u8>> {
        // The model URL is pre-signed; the credential check still applies
        self.key()?;

        let response = self
            .http
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        if !response.status().is_success() {
            return Err(relay_failure("Meshy model download failed", response).await);
        }

        Ok(response
            .bytes()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?
            .to_vec())
    }
}

/// In-memory implementation with scripted responses, for tests
#[derive(Default)]
pub struct FakeImageTo3d {
    pub task_id: String,
    status_response: Mutex<JobStatus>,
    model_bytes: Vec<u8>,
    created: Mutex<Vec<(String, JobOptions)>>,
    calls: AtomicUsize,
}

impl FakeImageTo3d {
    pub fn new(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            ..Default::default()
        }
    }

    pub fn with_status(self, status: JobStatus) -> Self {
        *self.status_response.lock().unwrap() = status;
        self
    }

    pub fn with_model(mut self, bytes: Vec<u8>) -> Self {
        self.model_bytes = bytes;
        self
    }

    /// Total remote operations performed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Jobs submitted through `create`, in order
    pub fn created_jobs(&self) -> Vec<(String, JobOptions)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageTo3d for FakeImageTo3d {
    async fn create(&self, image_url: &str, options: &JobOptions) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .unwrap()
            .push((image_url.to_string(), options.clone()));
        Ok(self.task_id.clone())
    }

    async fn status(&self, _task_id: &str) -> Result<JobStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.status_response.lock().unwrap().clone())
    }

    async fn fetch_model(&self, _url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.model_bytes.clone())
    }
}
