//! Typed ID wrappers for domain entities.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A strongly-typed wrapper for user IDs.
///
/// Users form a tree; the topmost users carry [`UserId::ROOT_PARENT`] as
/// their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Parent id of a user that sits at the top of the tree.
    pub const ROOT_PARENT: Self = Self(-1);

    /// Creates a user ID from its raw value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns true if this is the root parent marker.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT_PARENT.0
    }

    /// Returns the inner value.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// A strongly-typed wrapper for terminal IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerminalId(pub i32);

impl TerminalId {
    /// Creates a terminal ID from its raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the inner value.
    #[must_use]
    pub const fn into_inner(self) -> i32 {
        self.0
    }
}

impl Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TerminalId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<TerminalId> for i32 {
    fn from(id: TerminalId) -> Self {
        id.0
    }
}
