pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod service;
pub mod state;
pub mod store;

use clock::SystemClock;
use config::Config;
use service::PostService;
use state::AppState;
use std::sync::Arc;
use store::PostStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("postbox=info,tower_http=info"));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();
}

pub fn build_state(config: &Config) -> Result<AppState, store::StoreError> {
    let store = PostStore::new(&config.data_file).with_corruption_policy(config.corruption_policy());
    if store.init()? {
        info!(path = %store.path().display(), "created empty post file");
    }

    let service = PostService::new(store, Arc::new(SystemClock))
        .with_payload_policy(config.payload_policy());
    Ok(AppState::new(service))
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!(data_file = %config.data_file.display(), "starting post server");

    let app_state = build_state(&config)?;
    let (_, handle) = server::start_server(config.addr, app_state).await?;
    handle.await??;
    Ok(())
}
