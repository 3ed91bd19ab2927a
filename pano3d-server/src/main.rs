use pano3d_server::config::Config;
use pano3d_server::routes;
use pano3d_server::state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    if config.meshy_api_key.is_none() {
        warn!("MESHY_API_KEY is not set; conversion requests will fail until it is provided");
    }

    let state = AppState::new(&config)?;
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
