//! Dependency injection module using Shaku.
//!
//! `TrellisModule` holds every layer of a single Trellis process:
//! database pool, terminal cache and username filter at the bottom, the
//! MySQL DAOs, the repositories, and the managers on top.

use crate::startup::report_health;
use deadpool_redis::{Config as RedisPoolConfig, Pool, PoolConfig, Runtime};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::info;
use trellis_config::{AppConfig, FilterBackend, FilterConfig, RedisConfig};
use trellis_core::{HealthCheck, TrellisError, TrellisResult};
use trellis_repository::{
    BloomNameFilter, DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlTerminalDaoImpl,
    MySqlUserDaoImpl, NameFilter, RedisCacheService, RedisNameFilter, TerminalRepository,
    TerminalRepositoryImpl, TerminalRepositoryImplParameters, UserRepository, UserRepositoryImpl,
};
use trellis_repository::cache::RedisCacheServiceParameters;
use trellis_repository::filter::RedisNameFilterParameters;
use trellis_service::{TerminalManager, TerminalManagerImpl, UserManager, UserManagerImpl};

module! {
    pub TrellisModule {
        components = [
            DatabasePool,
            RedisCacheService,
            RedisNameFilter,
            MySqlTerminalDaoImpl,
            MySqlUserDaoImpl,
            TerminalRepositoryImpl,
            UserRepositoryImpl,
            TerminalManagerImpl,
            UserManagerImpl,
        ],
        providers = [],
    }
}

/// Creates the Redis pool, or `None` when Redis is disabled.
pub fn create_redis_pool(config: &RedisConfig) -> TrellisResult<Option<Arc<Pool>>> {
    if !config.enabled {
        info!("Redis disabled, terminal cache will always miss");
        return Ok(None);
    }

    let mut redis_cfg = RedisPoolConfig::from_url(&config.url);
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size as usize));

    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| TrellisError::Cache(format!("Failed to create Redis pool: {}", e)))?;

    Ok(Some(Arc::new(pool)))
}

/// Builds the in-process filter used by the `memory` backend.
#[must_use]
pub fn memory_name_filter(config: &FilterConfig) -> BloomNameFilter {
    BloomNameFilter::new(config.capacity, config.false_positive_rate)
}

/// Connects to MySQL and Redis, probes both, and builds the module.
pub async fn build_module(config: &AppConfig) -> TrellisResult<Arc<TrellisModule>> {
    let db_pool = DatabasePool::connect(&config.database).await?;
    let redis_pool = create_redis_pool(&config.redis)?;

    let cache_probe = redis_pool
        .clone()
        .map_or_else(RedisCacheService::disabled, RedisCacheService::new);
    let checks: [&dyn HealthCheck; 2] = [&db_pool, &cache_probe];
    report_health(&checks).await?;

    let mut builder = TrellisModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.into_inner(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: redis_pool.clone(),
        })
        .with_component_parameters::<RedisNameFilter>(RedisNameFilterParameters { pool: redis_pool })
        .with_component_parameters::<TerminalRepositoryImpl>(TerminalRepositoryImplParameters {
            ttl: config.cache.terminal_ttl(),
        });

    if config.filter.backend == FilterBackend::Memory {
        info!(
            capacity = config.filter.capacity,
            false_positive_rate = config.filter.false_positive_rate,
            "Using in-memory username filter"
        );
        builder = builder.with_component_override::<dyn NameFilter>(Box::new(memory_name_filter(&config.filter)));
    }

    Ok(Arc::new(builder.build()))
}

/// Resolves the layers `main` works with.
pub trait ManagerResolver {
    /// Resolves the terminal manager.
    fn terminal_manager(&self) -> Arc<dyn TerminalManager>;

    /// Resolves the user manager.
    fn user_manager(&self) -> Arc<dyn UserManager>;

    /// Resolves the user repository.
    fn user_repository(&self) -> Arc<dyn UserRepository>;

    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl ManagerResolver for TrellisModule {
    fn terminal_manager(&self) -> Arc<dyn TerminalManager> {
        self.resolve()
    }

    fn user_manager(&self) -> Arc<dyn UserManager> {
        self.resolve()
    }

    fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}
