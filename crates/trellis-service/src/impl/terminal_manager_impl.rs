//! Terminal manager implementation.

use crate::terminal_manager::TerminalManager;
use async_trait::async_trait;
use chrono::Utc;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};
use trellis_core::{Terminal, TerminalId, TrellisError, TrellisResult};
use trellis_repository::TerminalRepository;

/// Terminal manager backed by a [`TerminalRepository`].
///
/// Holds no timeout of its own: the effective status is always derived
/// from the entity's `timeout`.
#[derive(Component)]
#[shaku(interface = TerminalManager)]
pub struct TerminalManagerImpl {
    #[shaku(inject)]
    terminal_repository: Arc<dyn TerminalRepository>,
}

impl TerminalManagerImpl {
    /// Creates a new terminal manager.
    #[must_use]
    pub fn new(terminal_repository: Arc<dyn TerminalRepository>) -> Self {
        Self {
            terminal_repository,
        }
    }
}

fn ensure_positive_timeout(timeout: i32) -> TrellisResult<()> {
    if timeout <= 0 {
        return Err(TrellisError::validation(format!(
            "Terminal timeout must be positive, got {}",
            timeout
        )));
    }
    Ok(())
}

#[async_trait]
impl TerminalManager for TerminalManagerImpl {
    async fn get_terminal_by_id(&self, id: TerminalId) -> TrellisResult<Terminal> {
        debug!("Getting terminal: {}", id);

        if !self.terminal_repository.is_terminal_exist(id).await? {
            return Err(TrellisError::not_found("Terminal", id));
        }

        self.terminal_repository.get_terminal_by_id(id).await
    }

    async fn get_terminal_status(&self, id: TerminalId) -> TrellisResult<String> {
        let terminal = self.terminal_repository.get_terminal_by_id(id).await?;
        let status = terminal.effective_status(Utc::now()).to_string();

        debug!(terminal_id = %id, status = %status, "Computed terminal status");
        Ok(status)
    }

    async fn set_timeout(&self, id: TerminalId, timeout: i32) -> TrellisResult<()> {
        ensure_positive_timeout(timeout)?;

        self.terminal_repository.set_terminal_timeout(id, timeout).await?;

        info!(terminal_id = %id, timeout, "Terminal timeout set");
        Ok(())
    }

    async fn update(&self, id: TerminalId, status: &str, timeout: i32) -> TrellisResult<()> {
        ensure_positive_timeout(timeout)?;

        self.terminal_repository.update_terminal(id, status, timeout).await?;

        info!(terminal_id = %id, status, timeout, "Terminal updated");
        Ok(())
    }

    async fn register(&self, terminal: &Terminal) -> TrellisResult<()> {
        ensure_positive_timeout(terminal.timeout)?;

        self.terminal_repository.register_terminal(terminal).await?;

        info!("Terminal registered: {}", terminal.id);
        Ok(())
    }
}

impl std::fmt::Debug for TerminalManagerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalManagerImpl").finish()
    }
}
