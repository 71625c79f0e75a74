//! # Trellis Domain
//!
//! Entities and value objects managed by Trellis: users arranged in a
//! parent/child tree, and terminals reporting a status with a timeout.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
