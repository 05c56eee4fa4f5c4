use std::sync::Arc;

use stockhub::{app, AppState, Config, MemStore, PgStore, SessionStore, SharedStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stockhub=info".parse()?))
        .init();

    let config = Config::from_env();
    let store: SharedStore = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;
            store.init().await?;
            tracing::info!("connected to PostgreSQL");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, running in demo mode with in-memory data");
            Arc::new(MemStore::seeded())
        }
    };

    let state = AppState {
        store,
        sessions: SessionStore::new(&config.session_secret, config.session_ttl_hours),
    };
    let app = app(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
