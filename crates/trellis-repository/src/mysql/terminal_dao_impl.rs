//! MySQL implementation of [`TerminalDao`].

use crate::{dao::TerminalDao, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use trellis_core::{Terminal, TerminalId, TrellisResult};

/// MySQL-backed terminal DAO.
#[derive(Component, Clone)]
#[shaku(interface = TerminalDao)]
pub struct MySqlTerminalDaoImpl {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlTerminalDaoImpl {
    /// Creates a new MySQL terminal DAO.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TerminalRow {
    id: i32,
    status: String,
    timeout: i32,
    last_updated: DateTime<Utc>,
}

impl From<TerminalRow> for Terminal {
    fn from(row: TerminalRow) -> Self {
        Self {
            id: TerminalId::new(row.id),
            status: row.status,
            timeout: row.timeout,
            last_updated: row.last_updated,
        }
    }
}

#[async_trait]
impl TerminalDao for MySqlTerminalDaoImpl {
    async fn find_by_id(&self, id: TerminalId) -> TrellisResult<Option<Terminal>> {
        debug!("Finding terminal by id: {}", id);

        let row = sqlx::query_as::<_, TerminalRow>(
            "SELECT id, status, timeout, last_updated FROM terminal WHERE id = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner()?)
        .await?;

        Ok(row.map(Terminal::from))
    }

    async fn exists(&self, id: TerminalId) -> TrellisResult<bool> {
        let result: Option<i64> = sqlx::query_scalar("SELECT 1 FROM terminal WHERE id = ? LIMIT 1")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner()?)
            .await?;

        Ok(result.is_some())
    }

    async fn insert(&self, terminal: &Terminal) -> TrellisResult<()> {
        debug!("Inserting terminal: {}", terminal.id);

        sqlx::query(
            "INSERT INTO terminal (id, status, timeout, last_updated) VALUES (?, ?, ?, ?)",
        )
        .bind(terminal.id.into_inner())
        .bind(&terminal.status)
        .bind(terminal.timeout)
        .bind(terminal.last_updated)
        .execute(self.pool.inner()?)
        .await?;

        Ok(())
    }

    async fn update_status(
        &self,
        id: TerminalId,
        status: &str,
        timeout: i32,
        last_updated: DateTime<Utc>,
    ) -> TrellisResult<bool> {
        let result = sqlx::query(
            "UPDATE terminal SET status = ?, timeout = ?, last_updated = ? WHERE id = ?",
        )
        .bind(status)
        .bind(timeout)
        .bind(last_updated)
        .bind(id.into_inner())
        .execute(self.pool.inner()?)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_timeout(&self, id: TerminalId, timeout: i32) -> TrellisResult<bool> {
        let result = sqlx::query("UPDATE terminal SET timeout = ? WHERE id = ?")
            .bind(timeout)
            .bind(id.into_inner())
            .execute(self.pool.inner()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
