//! Manager implementations.
//!
//! Trait definitions live in the parent module (e.g. `terminal_manager.rs`).

mod terminal_manager_impl;
mod user_manager_impl;

pub use terminal_manager_impl::{TerminalManagerImpl, TerminalManagerImplParameters};
pub use user_manager_impl::{UserManagerImpl, UserManagerImplParameters};
