//! Result type aliases for Trellis.

use crate::TrellisError;

/// A specialized `Result` type for Trellis operations.
pub type TrellisResult<T> = Result<T, TrellisError>;
