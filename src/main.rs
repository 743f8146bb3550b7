use std::sync::Arc;

use bookmood_api::{
    config::Config,
    db::{self, Cache, PgCatalogStore},
    routes::{create_router, AppState},
    services::{CachedCatalogStore, CatalogStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookmood_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let mut catalog: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(pool));
    let mut cache_writer = None;

    if let Some(redis_url) = &config.redis_url {
        let client = db::create_redis_client(redis_url)?;
        let (cache, handle) = Cache::new(client);
        catalog = Arc::new(CachedCatalogStore::new(
            catalog,
            cache,
            config.catalog_cache_ttl_secs,
        ));
        cache_writer = Some(handle);
        tracing::info!(ttl = config.catalog_cache_ttl_secs, "Catalog caching enabled");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(catalog, config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        let processed = handle.shutdown().await;
        tracing::info!(processed, "Cache writer flushed");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
