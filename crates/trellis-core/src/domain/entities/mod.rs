//! Domain entities.

mod terminal;
mod user;

pub use terminal::*;
pub use user::*;
