//! UserDao trait: row-level access to the `sys_users` table.
//!
//! Users handed back by a DAO never carry `password` or `secret`.
//! [`UserRepository`] uses a `UserDao` plus the name filter to fulfil
//! domain-level operations.
//!
//! [`UserRepository`]: crate::traits::UserRepository

use async_trait::async_trait;
use trellis_core::{Interface, TrellisResult, User, UserId};

/// Low-level user data access object.
#[async_trait]
pub trait UserDao: Interface + Send + Sync {
    /// Finds a user by ID, soft-deleted rows included.
    async fn find_by_id(&self, id: UserId) -> TrellisResult<Option<User>>;

    /// Finds a user by name, soft-deleted rows included.
    async fn find_by_name(&self, name: &str) -> TrellisResult<Option<User>>;

    /// Checks if a user ID exists.
    async fn exists_by_id(&self, id: UserId) -> TrellisResult<bool>;

    /// Checks if a name is already taken.
    async fn exists_by_name(&self, name: &str) -> TrellisResult<bool>;

    /// Lists the direct children of a user.
    async fn find_children(&self, parent_id: UserId) -> TrellisResult<Vec<User>>;

    /// Lists every stored name.
    async fn list_names(&self) -> TrellisResult<Vec<String>>;

    /// Persists a new user and returns the assigned ID.
    async fn insert(&self, user: &User) -> TrellisResult<UserId>;

    /// Writes the user's fields by ID. Returns `true` if a row matched.
    async fn update(&self, user: &User) -> TrellisResult<bool>;

    /// Sets or clears the soft-delete flag. Returns `true` if a row matched.
    async fn set_deleted(&self, id: UserId, deleted: bool) -> TrellisResult<bool>;
}
