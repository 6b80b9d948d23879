//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(database_url: &str, config: &DatabaseConfig) -> Result<Self, Error> {
        info!(
            "Connecting to database: {}",
            mask_password(database_url)
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 建表（幂等）
    pub async fn create_tables(&self) -> Result<(), Error> {
        info!("Creating database tables...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                description VARCHAR(1000) NOT NULL,
                price NUMERIC(15, 2) NOT NULL CHECK (price >= 0),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }
}

/// 日志中隐藏连接串里的密码；无法解析的连接串整体隐藏
fn mask_password(database_url: &str) -> String {
    let Ok(mut url) = Url::parse(database_url) else {
        return "<unparseable database url>".to_string();
    };
    if url.password().is_some() && url.set_password(Some("***")).is_err() {
        return "<unparseable database url>".to_string();
    }
    url.to_string()
}
