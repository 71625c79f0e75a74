//! # Trellis Config
//!
//! Configuration management for Trellis.
//! Supports layered configuration from files and environment variables,
//! with validation up front and runtime refresh.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
