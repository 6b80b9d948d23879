//! 核心中间件模块

use std::{any::Any, time::Instant};

use axum::{
    extract::Request,
    BoxError,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::error::CoreError;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 请求日志中间件
///
/// 为每个请求分配 request id（沿用客户端传入的值），记录方法、路径、状态码和耗时，
/// 并在响应头中回写该 id。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = info_span!("request", id = %request_id);
    let mut response = next.run(req).instrument(span).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        request_id = %request_id,
        "{} {} - {} - {}ms",
        method,
        uri,
        status,
        duration.as_millis()
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}

/// 将 tower 层的错误（目前只有超时）渲染为统一信封，配合 `HandleErrorLayer` 使用
pub async fn handle_layer_error(err: BoxError) -> CoreError {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("Request exceeded the configured timeout");
        CoreError::Timeout
    } else {
        CoreError::Internal(format!("middleware failure: {}", err))
    }
}

/// handler panic 时返回统一的 500 信封
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    CoreError::Internal(format!("handler panicked: {}", detail)).into_response()
}
