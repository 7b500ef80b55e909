pub mod app;
pub mod config;
pub mod server;

use config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load environment files and runtime configuration.
pub fn init_config() -> AppConfig {
    load_dotenv();

    let config = AppConfig::load();
    if config.api_key.is_empty() {
        tracing::warn!("API_KEY not set, Magic rewrite will be unavailable");
    }
    tracing::info!("Settings loaded (port={})", config.server_port);
    config
}
