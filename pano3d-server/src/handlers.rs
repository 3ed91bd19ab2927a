//! HTTP handlers for the conversion API

use crate::error::{ApiError, Result};
use crate::extract::{self, ProcessImageBody};
use crate::meshy::JobStatus;
use crate::state::AppState;
use crate::store::TaskMeta;
use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pano3d_io::{convert_model, ModelFormat};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "image-to-3d-backend" }))
}

/// Create a conversion job from a multipart upload or a JSON body
pub async fn process_image(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let image_request = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?;
        extract::from_multipart(multipart).await?
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<ProcessImageBody>::from_request(request, &())
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {}", e)))?;
        extract::from_json(body)?
    } else {
        return Err(ApiError::UnsupportedMediaType);
    };

    if let Some(bytes) = image_request.source.bytes() {
        state
            .store
            .persist_upload(bytes, image_request.source.filename());
    }

    let image_url = image_request.source.to_upstream_url();
    let task_id = state
        .client
        .create(&image_url, &image_request.options)
        .await?;
    info!(task_id, "conversion job created");

    state.store.save_meta(
        &task_id,
        &TaskMeta {
            original_filename: image_request.source.filename().map(str::to_string),
            options: image_request.options,
        },
    );

    Ok((StatusCode::ACCEPTED, Json(json!({ "task_id": task_id }))))
}

/// Relay the live job state
pub async fn job_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<JobStatus>> {
    Ok(Json(state.client.status(&task_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    pub format: Option<String>,
}

/// Download the finished model, re-exported in the requested format
pub async fn job_result(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(query): Query<ResultQuery>,
) -> Result<Response> {
    let tag = query.format.unwrap_or_else(|| "glb".to_string());
    let format = ModelFormat::parse(&tag).ok_or(ApiError::UnsupportedFormat(tag))?;

    let status = state.client.status(&task_id).await?;
    if !status.is_succeeded() {
        return Err(ApiError::JobNotReady {
            status: status.status,
        });
    }
    let model_url = status
        .glb_url()
        .ok_or_else(|| ApiError::Protocol {
            message: "GLB URL missing in Meshy response".to_string(),
            detail: Value::Null,
        })?
        .to_string();

    let glb_bytes = state.client.fetch_model(&model_url).await?;
    let body = convert_model(&glb_bytes, format).map_err(|e| match e {
        pano3d_core::Error::Conversion { format, message } => ApiError::Conversion {
            format,
            detail: message,
        },
        other => ApiError::Internal(other.into()),
    })?;

    let headers = [
        (header::CONTENT_TYPE, format.mime_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}.{}\"", task_id, format.extension()),
        ),
    ];
    Ok((headers, body).into_response())
}
