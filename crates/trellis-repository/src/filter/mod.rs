//! Username set filter.
//!
//! A probabilistic set of taken usernames: it can answer "definitely not
//! present" cheaply and "possibly present" with a bounded false-positive
//! rate. It never forgets a name it has seen.

mod bloom;
mod redis_bloom;

pub use bloom::BloomNameFilter;
pub use redis_bloom::{RedisNameFilter, RedisNameFilterParameters};

use async_trait::async_trait;
use shaku::Interface;
use trellis_core::TrellisResult;

/// Probabilistic membership test over usernames.
#[async_trait]
pub trait NameFilter: Interface + Send + Sync {
    /// Records a name as taken.
    async fn add(&self, name: &str) -> TrellisResult<()>;

    /// Returns `false` only if the name was never added.
    async fn might_contain(&self, name: &str) -> TrellisResult<bool>;
}
