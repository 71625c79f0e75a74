//! # Trellis Core
//!
//! Core types, entities, and error definitions shared by every layer of
//! Trellis. The data layer (`trellis-repository`) and the business layer
//! (`trellis-service`) both speak in terms of the entities and errors defined
//! here.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
