//! vibe-qr server binary.
//!
//! Serves the designer page and the render/rewrite API on a local port.

use tracing_subscriber::EnvFilter;

use vibe_qr_lib::app::SharedState;
use vibe_qr_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting vibe-qr");

    let config = vibe_qr_lib::init_config();
    let state = SharedState::new(config);

    server::start_server(state).await?;
    Ok(())
}
