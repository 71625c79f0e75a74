//! RedisBloom-backed name filter.

use super::NameFilter;
use crate::cache::cache_keys;
use async_trait::async_trait;
use deadpool_redis::{redis, Pool};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;
use trellis_core::{TrellisError, TrellisResult};

/// Name filter stored in Redis with `BF.ADD` / `BF.EXISTS` under
/// [`cache_keys::USERNAMES`], shared by every instance.
///
/// Without a pool every name is reported as possibly present, which sends
/// all checks to the store.
#[derive(Component)]
#[shaku(interface = NameFilter)]
pub struct RedisNameFilter {
    #[shaku(default)]
    pool: Option<Arc<Pool>>,
}

impl RedisNameFilter {
    /// Creates a filter over the given Redis pool.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    async fn get_conn(&self, pool: &Pool) -> TrellisResult<deadpool_redis::Connection> {
        pool.get()
            .await
            .map_err(|e| TrellisError::Cache(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl NameFilter for RedisNameFilter {
    async fn add(&self, name: &str) -> TrellisResult<()> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };

        let mut conn = self.get_conn(pool).await?;
        let added: bool = redis::cmd("BF.ADD")
            .arg(cache_keys::USERNAMES)
            .arg(name)
            .query_async(&mut conn)
            .await
            .map_err(|e| TrellisError::Cache(format!("BF.ADD failed for '{}': {}", name, e)))?;

        debug!(name, added, "Recorded username in filter");
        Ok(())
    }

    async fn might_contain(&self, name: &str) -> TrellisResult<bool> {
        let Some(pool) = &self.pool else {
            return Ok(true);
        };

        let mut conn = self.get_conn(pool).await?;
        let exists: bool = redis::cmd("BF.EXISTS")
            .arg(cache_keys::USERNAMES)
            .arg(name)
            .query_async(&mut conn)
            .await
            .map_err(|e| TrellisError::Cache(format!("BF.EXISTS failed for '{}': {}", name, e)))?;

        Ok(exists)
    }
}
