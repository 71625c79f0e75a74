//! # Trellis Server Library
//!
//! Dependency injection wiring and startup helpers for the Trellis server.

pub mod di;
pub mod startup;
