//! Terminal manager trait definition.

use async_trait::async_trait;
use trellis_core::{Interface, Terminal, TerminalId, TrellisResult};

/// Terminal business operations.
#[async_trait]
pub trait TerminalManager: Interface + Send + Sync {
    /// Gets a terminal, failing with `NotFound` if the store has no such terminal.
    async fn get_terminal_by_id(&self, id: TerminalId) -> TrellisResult<Terminal>;

    /// Gets the terminal's effective status: its stored status, or
    /// `"offline"` once more than its own timeout has passed since the last update.
    async fn get_terminal_status(&self, id: TerminalId) -> TrellisResult<String>;

    /// Sets the terminal's heartbeat timeout in seconds.
    async fn set_timeout(&self, id: TerminalId, timeout: i32) -> TrellisResult<()>;

    /// Records a status report along with the timeout.
    async fn update(&self, id: TerminalId, status: &str, timeout: i32) -> TrellisResult<()>;

    /// Registers a new terminal.
    async fn register(&self, terminal: &Terminal) -> TrellisResult<()>;
}
