//! Environment-backed service configuration

use std::env;
use std::path::PathBuf;

/// Meshy image-to-3D endpoint used when `MESHY_API_URL` is not set
pub const DEFAULT_MESHY_API_URL: &str = "https://api.meshy.ai/openapi/v1/image-to-3d";

const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Meshy credential. May be absent at startup; remote calls then fail
    /// with a configuration error instead of reaching the network.
    pub meshy_api_key: Option<String>,
    pub meshy_api_url: String,
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment, reading a `.env` file when
    /// one is present
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            meshy_api_key: env::var("MESHY_API_KEY").ok().filter(|k| !k.is_empty()),
            meshy_api_url: env::var("MESHY_API_URL")
                .unwrap_or_else(|_| DEFAULT_MESHY_API_URL.to_string()),
            data_dir: env::var("PANO3D_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
        }
    }
}
