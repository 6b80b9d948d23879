use std::{sync::Arc, time::Duration};

use anyhow::Context;
use product_api::{
    app::product::repository::{InMemoryProductRepository, ProductRepository},
    build_app,
    config::{self, Config},
    infrastructure::logger::Logger,
    AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load_config().context("failed to load configuration")?;
    Logger::init(&config.logging.level);

    info!("Starting product API...");

    let repository = build_repository(&config).await?;
    let state = AppState::new(repository, config.products.clone());
    let app = build_app(
        state,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let listener = TcpListener::bind(config.server.address())
        .await
        .with_context(|| format!("failed to bind {}", config.server.address()))?;
    let addr = listener.local_addr()?;

    info!("🚀 Product API running on http://{}", addr);
    info!("   POST   /products         - Create product");
    info!("   GET    /products         - List products");
    info!("   GET    /products/:id     - Get product by ID");
    info!("   PUT    /products/:id     - Replace product");
    info!("   DELETE /products/:id     - Delete product");
    info!("   GET    /health           - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

#[cfg(feature = "database")]
async fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn ProductRepository>> {
    use product_api::{
        app::product::pg_repository::PgProductRepository,
        infrastructure::database::DatabaseManager,
    };

    let Some(url) = config.database.url.as_deref() else {
        warn!("No database URL configured, using in-memory storage");
        return Ok(Arc::new(InMemoryProductRepository::new()));
    };

    let db = DatabaseManager::new(url, &config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        db.create_tables().await.context("failed to create tables")?;
    }

    Ok(Arc::new(PgProductRepository::new(db.get_pool().clone())))
}

#[cfg(not(feature = "database"))]
async fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn ProductRepository>> {
    if config.database.url.is_some() {
        warn!("Built without the `database` feature, ignoring database URL");
    }
    warn!("Using in-memory storage");
    Ok(Arc::new(InMemoryProductRepository::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
