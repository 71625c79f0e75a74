//! DAO (Data Access Object) layer.
//!
//! DAOs provide low-level, single-source data access abstractions.
//! Each DAO interface maps to one table; the MySQL implementations live in
//! [`crate::mysql`].
//!
//! Hierarchy:
//! ```text
//! Manager → Repository (interface + impl) → DAO (interface + impl) → MySQL
//! ```

pub mod terminal_dao;
pub mod user_dao;

pub use terminal_dao::TerminalDao;
pub use user_dao::UserDao;
