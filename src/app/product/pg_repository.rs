//! PostgreSQL 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use tracing::debug;

use super::{
    model::{Price, Product},
    repository::{ProductRepository, RepositoryError, RepositoryResult},
};
use crate::core::pagination::{Page, PageRequest, Sort};

const COLUMNS: &str = "id, name, description, price, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::restore(
            row.id,
            row.name,
            row.description,
            Price::new(row.price),
            row.created_at,
            row.updated_at,
        )
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation()
            {
                return RepositoryError::Integrity(db.message().to_string());
            }
        }
        RepositoryError::Unavailable(err.to_string())
    }
}

/// 排序列来自白名单，可以安全拼接
fn order_by(sort: Sort) -> String {
    format!(
        "ORDER BY {} {}, id {}",
        sort.field.column(),
        sort.direction.keyword(),
        sort.direction.keyword()
    )
}

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        let row = match product.id {
            None => {
                sqlx::query_as::<_, ProductRow>(&format!(
                    "INSERT INTO products (name, description, price, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING {}",
                    COLUMNS
                ))
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price.amount())
                .bind(product.created_at())
                .bind(product.updated_at())
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => {
                // created_at 不参与更新
                sqlx::query_as::<_, ProductRow>(&format!(
                    "UPDATE products SET name = $1, description = $2, price = $3, updated_at = $4 \
                     WHERE id = $5 RETURNING {}",
                    COLUMNS
                ))
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price.amount())
                .bind(product.updated_at())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(RepositoryError::Missing(id))?
            }
        };

        debug!("Saved product row {}", row.id);
        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_all(&self, sort: Sort) -> RepositoryResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products {}",
            COLUMNS,
            order_by(sort)
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_page(&self, request: PageRequest) -> RepositoryResult<Page<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products {} LIMIT $1 OFFSET $2",
            COLUMNS,
            order_by(request.sort)
        ))
        .bind(request.size as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let content = rows.into_iter().map(Product::from).collect();
        Ok(Page::new(content, &request, total.0.max(0) as u64))
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
