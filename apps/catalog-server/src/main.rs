//! Catalog Server binary.

use std::{net::SocketAddr, sync::Arc};

use auth::{ClientSecrets, GoogleProvider, IdentityVerifier};
use catalog_server::{config::Config, create_app, create_state, init_tracing};
use catalog_store::SqliteCatalogStore;
use tower_sessions_sqlx_store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(database_url = %config.database_url, "Starting Catalog Server");

    // Catalog tables and the session table share one database
    let store = SqliteCatalogStore::connect(&config.database_url).await?;

    let session_store = SqliteStore::new(store.pool().clone());
    session_store.migrate().await?;

    let secrets = ClientSecrets::from_file(&config.client_secrets_path)?;
    let client_id = secrets.client_id().to_string();
    let provider = GoogleProvider::new(secrets)?;
    let verifier = IdentityVerifier::new(Arc::new(provider), client_id);

    let addr: SocketAddr = config.server_addr().parse()?;

    let state = create_state(config, store, verifier);
    let app = create_app(state, session_store);

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
