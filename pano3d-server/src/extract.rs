//! Request normalization for the job-creation endpoint
//!
//! Conversion jobs arrive either as a multipart upload (file field `image`
//! plus optional flag fields) or as a JSON body carrying a base64 image or
//! a direct image URL. Both shapes normalize to an [`ImageRequest`].

use crate::error::{ApiError, Result};
use crate::meshy::{sanitize_ai_model, JobOptions};
use axum::extract::Multipart;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

const NO_IMAGE_MESSAGE: &str =
    "No image provided. Use multipart 'image' or JSON 'image_base64'/'image_url'.";

/// JSON body accepted by `POST /api/process-image`
#[derive(Debug, Default, Deserialize)]
pub struct ProcessImageBody {
    pub image_base64: Option<String>,
    pub image_url: Option<String>,
    pub enable_pbr: Option<bool>,
    pub should_remesh: Option<bool>,
    pub should_texture: Option<bool>,
    pub ai_model: Option<String>,
}

/// Where the image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Raw bytes from an upload or a decoded base64 payload
    Bytes {
        bytes: Vec<u8>,
        filename: Option<String>,
    },
    /// Directly accessible remote URL, passed through untouched
    Url(String),
}

impl ImageSource {
    /// The URL forwarded upstream: raw bytes are wrapped as a PNG data URI
    pub fn to_upstream_url(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Bytes { bytes, .. } => {
                format!("data:image/png;base64,{}", BASE64.encode(bytes))
            }
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes { bytes, .. } => Some(bytes),
            Self::Url(_) => None,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Bytes { filename, .. } => filename.as_deref(),
            Self::Url(_) => None,
        }
    }
}

/// A normalized job-creation request
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub source: ImageSource,
    pub options: JobOptions,
}

/// Truthy form-field values, as sent by HTML checkboxes and curl users
fn parse_bool_field(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes")
}

/// Normalize a multipart upload
pub async fn from_multipart(mut multipart: Multipart) -> Result<ImageRequest> {
    let mut bytes = None;
    let mut filename = None;
    let mut options = JobOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                if field.file_name().is_some_and(|f| !f.is_empty()) {
                    filename = field.file_name().map(str::to_string);
                    bytes = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| {
                                ApiError::BadRequest(format!("Failed to read upload: {}", e))
                            })?
                            .to_vec(),
                    );
                }
            }
            "enable_pbr" => options.enable_pbr = parse_bool_field(&field_text(field).await?),
            "should_remesh" => options.should_remesh = parse_bool_field(&field_text(field).await?),
            "should_texture" => {
                options.should_texture = parse_bool_field(&field_text(field).await?)
            }
            "ai_model" => options.ai_model = field_text(field).await?,
            _ => {}
        }
    }

    options.ai_model = sanitize_ai_model(options.ai_model);

    let Some(bytes) = bytes else {
        return Err(ApiError::BadRequest(NO_IMAGE_MESSAGE.to_string()));
    };

    Ok(ImageRequest {
        source: ImageSource::Bytes { bytes, filename },
        options,
    })
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart field: {}", e)))
}

/// Normalize a JSON body
pub fn from_json(body: ProcessImageBody) -> Result<ImageRequest> {
    let options = JobOptions {
        enable_pbr: body.enable_pbr.unwrap_or(true),
        should_remesh: body.should_remesh.unwrap_or(true),
        should_texture: body.should_texture.unwrap_or(true),
        ai_model: sanitize_ai_model(body.ai_model.unwrap_or_else(|| "latest".to_string())),
    };

    let source = if let Some(b64) = body.image_base64 {
        // Strip an optional data-URI prefix such as data:image/png;base64,
        let payload = match b64.split_once(',') {
            Some((_, rest)) => rest,
            None => b64.as_str(),
        };
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| ApiError::BadRequest(format!("Invalid base64 image: {}", e)))?;
        ImageSource::Bytes {
            bytes,
            filename: None,
        }
    } else if let Some(url) = body.image_url {
        ImageSource::Url(url)
    } else {
        return Err(ApiError::BadRequest(NO_IMAGE_MESSAGE.to_string()));
    };

    Ok(ImageRequest { source, options })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_with_direct_url_passes_through() {
        let request = from_json(ProcessImageBody {
            image_url: Some("https://images.test/cat.png".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            request.source,
            ImageSource::Url("https://images.test/cat.png".to_string())
        );
        assert_eq!(
            request.source.to_upstream_url(),
            "https://images.test/cat.png"
        );
        assert!(request.options.enable_pbr);
        assert_eq!(request.options.ai_model, "latest");
    }

    #[test]
    fn test_json_base64_with_data_uri_prefix() {
        let encoded = BASE64.encode(b"fake png bytes");
        let request = from_json(ProcessImageBody {
            image_base64: Some(format!("data:image/png;base64,{}", encoded)),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(request.source.bytes(), Some(b"fake png bytes".as_slice()));
        assert!(request
            .source
            .to_upstream_url()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_json_bare_base64() {
        let request = from_json(ProcessImageBody {
            image_base64: Some(BASE64.encode(b"pixels")),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(request.source.bytes(), Some(b"pixels".as_slice()));
    }

    #[test]
    fn test_json_invalid_base64_is_bad_request() {
        let result = from_json(ProcessImageBody {
            image_base64: Some("!!! not base64 !!!".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_json_without_image_is_bad_request() {
        let result = from_json(ProcessImageBody::default());
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_bogus_ai_model_falls_back_silently() {
        let request = from_json(ProcessImageBody {
            image_url: Some("https://images.test/cat.png".to_string()),
            ai_model: Some("bogus".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(request.options.ai_model, "latest");
    }

    #[test]
    fn test_flag_overrides() {
        let request = from_json(ProcessImageBody {
            image_url: Some("https://images.test/cat.png".to_string()),
            enable_pbr: Some(false),
            should_texture: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert!(!request.options.enable_pbr);
        assert!(request.options.should_remesh);
        assert!(!request.options.should_texture);
    }

    #[test]
    fn test_truthy_form_values() {
        for value in ["1", "true", "on", "yes", "TRUE", "Yes"] {
            assert!(parse_bool_field(value), "{value} should be truthy");
        }
        for value in ["0", "false", "off", "no", ""] {
            assert!(!parse_bool_field(value), "{value} should be falsy");
        }
    }
}
