//! Cache key generators for consistent key naming.

use trellis_core::TerminalId;

/// Key of the username filter.
pub const USERNAMES: &str = "user:names";

/// Generate the cache key for a terminal snapshot.
#[must_use]
pub fn terminal(id: TerminalId) -> String {
    format!("terminal:{}", id)
}
