//! 数据库连接管理

use rso_core::{Result, RsoError};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// 连接池参数
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub connection_string: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl PoolSettings {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(10),
        }
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
    }
}

/// 数据库连接池，进程生命周期内显式打开和关闭
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    pub async fn connect(settings: &PoolSettings) -> Result<Self> {
        let pool = settings
            .options()
            .connect(&settings.connection_string)
            .await
            .map_err(|e| RsoError::Database(format!("failed to connect: {}", e)))?;

        info!(
            "Database pool opened (max_connections={})",
            settings.max_connections
        );
        Ok(Self { pool })
    }

    /// 不立即建立连接，首次查询时才连接
    pub fn connect_lazy(settings: &PoolSettings) -> Result<Self> {
        let pool = settings
            .options()
            .connect_lazy(&settings.connection_string)
            .map_err(|e| RsoError::Config(format!("invalid connection string: {}", e)))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
