//! # Product API
//!
//! 单一 Product 资源的 CRUD REST 服务：
//! - app: 产品实体、DTO、映射、持久化网关、服务与处理器
//! - core: 错误信封、请求提取、中间件、分页
//! - infrastructure: PostgreSQL 连接池与日志
//! - config: TOML 配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, middleware, Router};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
};

pub use app::AppState;

/// 组装路由与中间件
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    app::routes()
        .layer(middleware::from_fn(crate::core::middleware::request_logging_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(crate::core::middleware::handle_layer_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(CatchPanicLayer::custom(crate::core::middleware::handle_panic))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}
