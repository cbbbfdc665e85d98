//! Fills the configured database with the demo catalog.

use catalog_server::config::DEFAULT_DATABASE_URL;
use catalog_store::{SqliteCatalogStore, seed_demo_catalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_level = std::env::var("CATALOG_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    catalog_server::init_tracing(&log_level);

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let store = SqliteCatalogStore::connect(&database_url).await?;

    let summary = seed_demo_catalog(&store).await?;
    println!(
        "added {} categories and {} items owned by user {}",
        summary.categories, summary.items, summary.user_id
    );

    Ok(())
}
