//! Caching infrastructure for the data layer.
//!
//! A cache abstraction with a Redis implementation. Terminal snapshots are
//! cached here under [`cache_keys::terminal`].

mod cache_interface;
pub mod cache_keys;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters, DEFAULT_TTL};
