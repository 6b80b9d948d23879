//! 产品 HTTP 处理器

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;

use super::dto::{ProductInput, ProductListing, ProductRequest, ProductResponse};
use crate::app::AppState;
use crate::core::{
    error::CoreError,
    extract::{Path, Query, ValidatedJson},
    pagination::{PageRequest, Sort},
};

/// 列表查询参数，仅在分页模式下生效
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    size: Option<u32>,
    sort: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Result<impl IntoResponse, CoreError> {
    let input = ProductInput::try_from(request)?;
    let created = state.product_service.create(input).await?;
    let location = format!("/products/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListing>, CoreError> {
    let page_request = if state.settings.pagination {
        let sort = match query.sort.as_deref() {
            Some(raw) => raw.parse()?,
            None => Sort::default(),
        };
        let size = query
            .size
            .unwrap_or(state.settings.default_page_size)
            .clamp(1, state.settings.max_page_size);
        Some(PageRequest::new(query.page.unwrap_or(0), size, sort))
    } else {
        None
    };

    let listing = state.product_service.find_all(page_request).await?;
    Ok(Json(listing))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, CoreError> {
    Ok(Json(state.product_service.find_by_id(id).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> Result<Json<ProductResponse>, CoreError> {
    let input = ProductInput::try_from(request)?;
    Ok(Json(state.product_service.update(id, input).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, CoreError> {
    state.product_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
