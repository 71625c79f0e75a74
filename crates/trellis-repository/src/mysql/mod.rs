//! MySQL DAO implementations.

mod terminal_dao_impl;
mod user_dao_impl;

pub use terminal_dao_impl::{MySqlTerminalDaoImpl, MySqlTerminalDaoImplParameters};
pub use user_dao_impl::{MySqlUserDaoImpl, MySqlUserDaoImplParameters};
