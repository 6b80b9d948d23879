//! 实体与 DTO 之间的转换，纯函数

use super::{
    dto::{ProductInput, ProductResponse},
    model::{Price, Product},
};

/// 输入 -> 新实体
pub fn to_entity(input: ProductInput) -> Product {
    Product::new(input.name, input.description, Price::new(input.price))
}

/// 整体覆盖 name/description/price
pub fn apply_update(product: &mut Product, input: ProductInput) {
    product.name = input.name;
    product.description = input.description;
    product.price = Price::new(input.price);
}

/// 实体 -> 响应
///
/// # Panics
///
/// 实体必须来自网关（已持久化，带 id）；传入未保存的实体属于调用方错误。
pub fn to_response(product: &Product) -> ProductResponse {
    ProductResponse {
        id: product.id.expect("product must be persisted before mapping to a response"),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price.amount(),
        created_at: product.created_at(),
        updated_at: Some(product.updated_at()),
    }
}
