//! Shared application state

use crate::config::Config;
use crate::meshy::{ImageTo3d, MeshyClient};
use crate::store::MetaStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn ImageTo3d>,
    pub store: MetaStore,
}

impl AppState {
    /// State backed by the live Meshy client
    pub fn new(config: &Config) -> std::io::Result<Self> {
        Ok(Self {
            client: Arc::new(MeshyClient::new(
                config.meshy_api_url.clone(),
                config.meshy_api_key.clone(),
            )),
            store: MetaStore::new(&config.data_dir)?,
        })
    }

    /// State with an injected client implementation
    pub fn with_client(client: Arc<dyn ImageTo3d>, store: MetaStore) -> Self {
        Self { client, store }
    }
}
