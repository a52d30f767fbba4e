use std::net::SocketAddr;
use std::sync::Arc;

use trekflow_api::{app, AppState};
use trekflow_store::{sample_inventory, Config, InMemoryTbrStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trekflow_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Trekflow API on port {}", config.server.port);

    let store = if config.business_rules.seed_on_startup {
        InMemoryTbrStore::new(sample_inventory(chrono::Utc::now()))
    } else {
        InMemoryTbrStore::empty()
    };

    let app_state = AppState {
        repo: Arc::new(store),
        rules: config.business_rules.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
