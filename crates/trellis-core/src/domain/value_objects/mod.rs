//! Value objects.

mod user_kind;

pub use user_kind::*;
