//! 应用层

pub mod product;

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};

use crate::config::ProductsConfig;
use crate::core::error::CoreError;
use product::{repository::ProductRepository, service::ProductService};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub settings: ProductsConfig,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProductRepository>, settings: ProductsConfig) -> Self {
        let product_service =
            ProductService::new(repository).with_updated_at(settings.expose_updated_at);
        Self {
            product_service,
            settings,
        }
    }
}

/// 健康检查
async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, CoreError> {
    let repository = state.product_service.repository();
    repository.ping().await?;

    Ok(Json(json!({
        "status": "healthy",
        "storage": repository.backend(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .merge(product::handler::routes())
}
