//! Repository implementations.

mod terminal_repository_impl;
mod user_repository_impl;

pub use terminal_repository_impl::{TerminalRepositoryImpl, TerminalRepositoryImplParameters};
pub use user_repository_impl::{UserRepositoryImpl, UserRepositoryImplParameters};
