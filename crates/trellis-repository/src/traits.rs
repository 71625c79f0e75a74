//! Repository trait definitions.

use async_trait::async_trait;
use trellis_core::{Interface, Terminal, TerminalId, TrellisResult, User, UserId};

/// Terminal repository: the store behind a read-through cache.
#[async_trait]
pub trait TerminalRepository: Interface + Send + Sync {
    /// Returns the terminal, from cache when a snapshot is present.
    ///
    /// A cached snapshot may lag the store by up to the cache TTL.
    async fn get_terminal_by_id(&self, id: TerminalId) -> TrellisResult<Terminal>;

    /// Writes status and timeout, stamps `last_updated`, then drops the cached snapshot.
    async fn update_terminal(&self, id: TerminalId, status: &str, timeout: i32) -> TrellisResult<()>;

    /// Writes the timeout, then drops the cached snapshot.
    async fn set_terminal_timeout(&self, id: TerminalId, timeout: i32) -> TrellisResult<()>;

    /// Checks the store for the terminal. Never consults the cache.
    async fn is_terminal_exist(&self, id: TerminalId) -> TrellisResult<bool>;

    /// Inserts a new terminal.
    async fn register_terminal(&self, terminal: &Terminal) -> TrellisResult<()>;
}

/// User repository: user tree persistence plus the username filter.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Persists a new user under an existing parent and returns its ID.
    async fn add(&self, user: &User) -> TrellisResult<UserId>;

    /// Soft-deletes the user with `user.id`.
    async fn remove(&self, user: &User) -> TrellisResult<()>;

    /// Writes the user's fields by ID. Returns `false` if no row matched.
    async fn update(&self, user: &User) -> TrellisResult<bool>;

    /// Finds a user by name. Soft-deleted users are returned with `deleted` set.
    async fn find_by_name(&self, name: &str) -> TrellisResult<Option<User>>;

    /// Finds a user by ID. Soft-deleted users are returned with `deleted` set.
    async fn find_by_id(&self, id: UserId) -> TrellisResult<Option<User>>;

    /// Lists the direct children of an existing user.
    async fn find_children_by_parent_id(&self, id: UserId) -> TrellisResult<Vec<User>>;

    /// Clears the soft-delete flag.
    async fn recover_by_id(&self, id: UserId) -> TrellisResult<()>;

    /// Returns `true` when the name is free to use.
    async fn is_name_exist(&self, name: &str) -> TrellisResult<bool>;

    /// Loads every stored name into the name filter. Returns the count.
    async fn warm_name_filter(&self) -> TrellisResult<usize>;
}
