//! # Trellis Repository
//!
//! Data access for users and terminals:
//!
//! ```text
//! Manager
//!   ↓  Arc<dyn TerminalRepository> / Arc<dyn UserRepository>
//! TerminalRepositoryImpl        UserRepositoryImpl
//!   ↓ TerminalDao + Cache         ↓ UserDao + NameFilter
//! MySqlTerminalDaoImpl          MySqlUserDaoImpl
//!   ↓                             ↓
//! MySQL / Redis
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   traits.rs            ← TerminalRepository, UserRepository
//!   impl/                ← repository implementations
//!   dao/                 ← TerminalDao, UserDao traits
//!   mysql/               ← SQLx DAO implementations
//!   cache/               ← CacheInterface + Redis implementation
//!   filter/              ← NameFilter + Redis / in-memory bloom filters
//!   pool.rs              ← DatabasePool
//!   metrics.rs           ← terminal cache counters
//! ```

pub mod cache;
pub mod dao;
pub mod filter;
pub mod metrics;
pub mod mysql;
pub mod pool;
pub mod traits;
pub mod r#impl;

pub use cache::{cache_keys, CacheExt, CacheInterface, RedisCacheService};
pub use dao::{TerminalDao, UserDao};
pub use filter::{BloomNameFilter, NameFilter, RedisNameFilter};
pub use mysql::*;
pub use pool::*;
pub use r#impl::*;
pub use traits::*;
