//! TerminalDao trait: row-level access to the `terminal` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use trellis_core::{Interface, Terminal, TerminalId, TrellisResult};

/// Low-level terminal data access object.
///
/// [`crate::TerminalRepositoryImpl`] layers the cache on top of it.
#[async_trait]
pub trait TerminalDao: Interface + Send + Sync {
    /// Finds a terminal by ID.
    async fn find_by_id(&self, id: TerminalId) -> TrellisResult<Option<Terminal>>;

    /// Checks if a terminal row exists.
    async fn exists(&self, id: TerminalId) -> TrellisResult<bool>;

    /// Inserts a new terminal row.
    async fn insert(&self, terminal: &Terminal) -> TrellisResult<()>;

    /// Writes status, timeout and status timestamp. Returns `true` if a row matched.
    async fn update_status(
        &self,
        id: TerminalId,
        status: &str,
        timeout: i32,
        last_updated: DateTime<Utc>,
    ) -> TrellisResult<bool>;

    /// Writes the timeout only. Returns `true` if a row matched.
    async fn update_timeout(&self, id: TerminalId, timeout: i32) -> TrellisResult<bool>;
}
