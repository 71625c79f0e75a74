//! Database connection pool management.

use async_trait::async_trait;
use shaku::Component;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::{info, warn};
use trellis_config::DatabaseConfig;
use trellis_core::{HealthCheck, HealthStatus, Interface, TrellisError, TrellisResult};

/// Interface for database pool operations.
///
/// This trait abstracts database pool functionality for dependency injection.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// Returns the underlying MySQL pool.
    ///
    /// Fails if the component was resolved without a connected pool.
    fn inner(&self) -> TrellisResult<&MySqlPool>;

    /// Checks if the database connection is healthy.
    async fn health_check(&self) -> TrellisResult<()>;

    /// Applies the bundled schema migrations.
    async fn run_migrations(&self) -> TrellisResult<()>;

    /// Closes the database pool.
    async fn close(&self);
}

/// Database pool wrapper.
#[derive(Component)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    #[shaku(default)]
    pool: Option<MySqlPool>,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> TrellisResult<Self> {
        info!("Connecting to MySQL database...");

        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                TrellisError::Database(format!("Failed to connect: {}", e))
            })?;

        info!("MySQL connection pool established");
        Ok(Self { pool: Some(pool) })
    }

    /// Creates a DatabasePool around a pre-existing pool.
    #[must_use]
    pub fn with_pool(pool: MySqlPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Consumes the wrapper, returning the pool for component parameters.
    #[must_use]
    pub fn into_inner(self) -> Option<MySqlPool> {
        self.pool
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> TrellisResult<&MySqlPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| TrellisError::Database("Database pool is not connected".to_string()))
    }

    async fn health_check(&self) -> TrellisResult<()> {
        sqlx::query("SELECT 1")
            .execute(self.inner()?)
            .await
            .map_err(|e| TrellisError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn run_migrations(&self) -> TrellisResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(self.inner()?)
            .await
            .map_err(|e| TrellisError::Database(format!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn close(&self) {
        if let Some(pool) = &self.pool {
            info!("Closing database connection pool...");
            pool.close().await;
            info!("Database connection pool closed");
        }
    }
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &str {
        "mysql"
    }

    async fn check(&self) -> HealthStatus {
        match DatabasePoolInterface::health_check(self).await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pool {
            Some(pool) => f
                .debug_struct("DatabasePool")
                .field("size", &pool.size())
                .field("num_idle", &pool.num_idle())
                .finish(),
            None => f.debug_struct("DatabasePool").field("connected", &false).finish(),
        }
    }
}
