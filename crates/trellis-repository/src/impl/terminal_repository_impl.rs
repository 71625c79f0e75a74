//! `TerminalRepositoryImpl`: cache-aside over [`TerminalDao`].
//!
//! ```text
//! get:    cache ──hit──▶ snapshot
//!           └─miss──▶ TerminalDao ──▶ cache.set (ttl) ──▶ terminal
//! write:  TerminalDao ──▶ cache.delete
//! ```
//!
//! Cache write and delete faults are logged and counted, never returned.
//! A read fault other than a miss is returned to the caller.

use crate::cache::{cache_keys, CacheExt, CacheInterface, DEFAULT_TTL};
use crate::dao::TerminalDao;
use crate::metrics::CacheMetrics;
use crate::traits::TerminalRepository;
use async_trait::async_trait;
use chrono::Utc;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use trellis_core::{Terminal, TerminalId, TrellisError, TrellisResult};

/// Terminal repository backed by a DAO and a read-through cache.
#[derive(Component)]
#[shaku(interface = TerminalRepository)]
pub struct TerminalRepositoryImpl {
    #[shaku(inject)]
    terminal_dao: Arc<dyn TerminalDao>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    /// Lifetime of a cached snapshot.
    #[shaku(default = DEFAULT_TTL)]
    ttl: Duration,
}

impl TerminalRepositoryImpl {
    /// Creates a new terminal repository.
    #[must_use]
    pub fn new(terminal_dao: Arc<dyn TerminalDao>, cache: Arc<dyn CacheInterface>, ttl: Duration) -> Self {
        Self {
            terminal_dao,
            cache,
            ttl,
        }
    }

    async fn invalidate(&self, id: TerminalId) {
        let key = cache_keys::terminal(id);
        if let Err(e) = self.cache.delete(&key).await {
            CacheMetrics::error("delete");
            warn!(terminal_id = %id, error = %e, "Failed to invalidate cached terminal");
        }
    }
}

#[async_trait]
impl TerminalRepository for TerminalRepositoryImpl {
    async fn get_terminal_by_id(&self, id: TerminalId) -> TrellisResult<Terminal> {
        let key = cache_keys::terminal(id);

        if let Some(cached) = self.cache.get::<Terminal>(&key).await? {
            CacheMetrics::hit();
            debug!("Cache hit for terminal: {}", id);
            return Ok(cached);
        }

        CacheMetrics::miss();
        debug!("Cache miss for terminal: {}, loading from store", id);

        let terminal = self
            .terminal_dao
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrellisError::not_found("Terminal", id))?;

        if let Err(e) = self.cache.set(&key, &terminal, self.ttl).await {
            CacheMetrics::error("set");
            warn!(terminal_id = %id, error = %e, "Failed to cache terminal");
        }

        Ok(terminal)
    }

    async fn update_terminal(&self, id: TerminalId, status: &str, timeout: i32) -> TrellisResult<()> {
        if !self
            .terminal_dao
            .update_status(id, status, timeout, Utc::now())
            .await?
        {
            return Err(TrellisError::not_found("Terminal", id));
        }

        self.invalidate(id).await;
        info!(terminal_id = %id, status, timeout, "Terminal updated");
        Ok(())
    }

    async fn set_terminal_timeout(&self, id: TerminalId, timeout: i32) -> TrellisResult<()> {
        if !self.terminal_dao.update_timeout(id, timeout).await? {
            return Err(TrellisError::not_found("Terminal", id));
        }

        self.invalidate(id).await;
        info!(terminal_id = %id, timeout, "Terminal timeout set");
        Ok(())
    }

    async fn is_terminal_exist(&self, id: TerminalId) -> TrellisResult<bool> {
        self.terminal_dao.exists(id).await
    }

    async fn register_terminal(&self, terminal: &Terminal) -> TrellisResult<()> {
        self.terminal_dao.insert(terminal).await?;
        info!(terminal_id = %terminal.id, "Terminal registered");
        Ok(())
    }
}
