//! 产品实体

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// 价格，固定保留两位小数（四舍五入，0.5 远离零进位）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const SCALE: u32 = 2;

    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Price(rounded)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Price::new(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// 首次保存前为 None
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: Price,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: String, description: String, price: Price) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            description,
            price,
            created_at: now,
            updated_at: now,
        }
    }

    /// 从存储层还原
    pub fn restore(
        id: i64,
        name: String,
        description: String,
        price: Price,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            description,
            price,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 刷新更新时间，保证不早于创建时间
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}
