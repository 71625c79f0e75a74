//! User manager trait definition.

use async_trait::async_trait;
use trellis_core::{Interface, TrellisResult, User, UserId};

/// User business operations.
#[async_trait]
pub trait UserManager: Interface + Send + Sync {
    /// Gets a user by name.
    async fn get_by_name(&self, name: &str) -> TrellisResult<User>;

    /// Gets a user by ID.
    async fn get_by_id(&self, id: UserId) -> TrellisResult<User>;

    /// Soft-deletes a user.
    async fn remove_by_id(&self, id: UserId) -> TrellisResult<()>;

    /// Restores a soft-deleted user.
    async fn recover_by_id(&self, id: UserId) -> TrellisResult<()>;

    /// Adds a user and returns its ID.
    async fn add(&self, user: &User) -> TrellisResult<UserId>;

    /// Updates a user. Returns `false` if no user has `user.id`.
    async fn update(&self, user: &User) -> TrellisResult<bool>;

    /// Lists the direct children of a user.
    async fn children_of(&self, id: UserId) -> TrellisResult<Vec<User>>;
}
