//! 产品请求/响应结构

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::core::pagination::Page;

/// 创建与更新共用的请求体，更新时三个字段整体覆盖
///
/// `name`、`description` 缺失或为 `null` 时按空字符串处理，从而在校验阶段报 blank。
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ProductRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        length(min = 3, max = 255, message = "size must be between 3 and 255"),
        custom(function = "validate_text")
    )]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        length(min = 3, max = 1000, message = "size must be between 3 and 1000"),
        custom(function = "validate_text")
    )]
    pub description: String,

    #[validate(required(message = "must not be null"), custom(function = "validate_price"))]
    pub price: Option<Decimal>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 通过校验后的输入，`price` 必然存在
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

/// 在 `Validate` 之后调用；`price` 缺失时仍返回字段错误而不是默认值
impl TryFrom<ProductRequest> for ProductInput {
    type Error = ValidationErrors;

    fn try_from(request: ProductRequest) -> Result<Self, Self::Error> {
        let Some(price) = request.price else {
            let mut errors = ValidationErrors::new();
            errors.add("price", violation("required", "must not be null"));
            return Err(errors);
        };
        Ok(Self {
            name: request.name,
            description: request.description,
            price,
        })
    }
}

const PRICE_INTEGER_DIGITS: u32 = 13;
const PRICE_FRACTION_DIGITS: u32 = 2;

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// 非空白且至少包含一个字母
fn validate_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(violation("not_blank", "must not be blank"));
    }
    if !value.chars().any(char::is_alphabetic) {
        return Err(violation("letter", "must contain at least one letter"));
    }
    Ok(())
}

fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(violation("positive_or_zero", "must be greater than or equal to 0"));
    }
    let normalized = value.normalize();
    let limit = Decimal::from(10u64.pow(PRICE_INTEGER_DIGITS));
    if normalized.scale() > PRICE_FRACTION_DIGITS || normalized.trunc().abs() >= limit {
        return Err(violation(
            "digits",
            "numeric value out of bounds (<13 digits>.<2 digits> expected)",
        ));
    }
    Ok(())
}

/// 产品响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductResponse {
    pub fn without_updated_at(mut self) -> Self {
        self.updated_at = None;
        self
    }
}

/// 列表结果：平铺数组或分页对象
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProductListing {
    Flat(Vec<ProductResponse>),
    Paged(Page<ProductResponse>),
}

impl ProductListing {
    pub fn len(&self) -> usize {
        match self {
            ProductListing::Flat(items) => items.len(),
            ProductListing::Paged(page) => page.content.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
