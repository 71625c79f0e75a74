//! User entity.

use crate::domain::value_objects::{Gender, UserType};
use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Default two-factor method for new accounts.
pub const TWO_FA_DISABLED: &str = "disabled";

/// A user account.
///
/// `password`, `salt` and `secret` are write-only: they are accepted on the
/// way in but never serialized out, and the data layer strips `password`
/// and `secret` before handing a user back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the store.
    pub id: UserId,

    /// Parent user, or [`UserId::ROOT_PARENT`] for a top-level user.
    pub parent_id: UserId,

    /// Account kind.
    pub user_type: UserType,

    /// Unique login name.
    pub name: String,

    /// Salted password hash, hashed by the caller.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,

    /// Salt used for the password hash.
    #[serde(skip_serializing, default)]
    pub salt: Vec<u8>,

    /// Two-factor validation method.
    pub two_fa_method: String,

    /// Two-factor secret or recovery address.
    #[serde(skip_serializing, default)]
    pub secret: Option<String>,

    /// Soft-delete flag.
    pub deleted: bool,

    /// Address of the last login.
    pub login_ip: Option<IpAddr>,

    /// Time of the last login.
    pub last_login: Option<DateTime<Utc>>,

    pub nickname: String,
    pub email: String,
    pub phone_number: String,

    /// Relative path of the avatar image.
    pub avatar: String,

    pub gender: Gender,

    /// Creation time.
    pub create_time: DateTime<Utc>,

    /// Last modification time.
    pub last_update: DateTime<Utc>,
}

impl User {
    /// Creates a new user that has not been persisted yet.
    ///
    /// The id is a placeholder until the store assigns one.
    #[must_use]
    pub fn new(parent_id: UserId, name: String, password_hash: String, salt: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(0),
            parent_id,
            user_type: UserType::Normal,
            name,
            password: Some(password_hash),
            salt,
            two_fa_method: TWO_FA_DISABLED.to_string(),
            secret: None,
            deleted: false,
            login_ip: None,
            last_login: None,
            nickname: String::new(),
            email: String::new(),
            phone_number: String::new(),
            avatar: String::new(),
            gender: Gender::Unknown,
            create_time: now,
            last_update: now,
        }
    }

    /// Checks if the user sits at the top of the tree.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_root()
    }

    /// Drops the write-only credential fields.
    #[must_use]
    pub fn without_credentials(mut self) -> Self {
        self.password = None;
        self.secret = None;
        self
    }
}
