//! 请求提取器：统一使用 CoreError 作为拒绝类型

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::error::CoreError;

/// 路径参数，解析失败时返回统一的错误信封
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(CoreError))]
pub struct Path<T>(pub T);

/// 查询参数
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(CoreError))]
pub struct Query<T>(pub T);

/// 先反序列化 JSON，再执行 `Validate`，在进入服务层之前拒绝非法输入
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
