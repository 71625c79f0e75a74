//! # Trellis Service
//!
//! Business layer for Trellis. Managers sit between a transport-facing
//! service and the repositories, adding existence checks, not-found
//! translation and the derived terminal status.

pub mod r#impl;
pub mod terminal_manager;
pub mod user_manager;

pub use r#impl::*;
pub use terminal_manager::*;
pub use user_manager::*;
