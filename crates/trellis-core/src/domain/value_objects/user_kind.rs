//! User type and gender value objects.
//!
//! Both are stored as small integers in `sys_users`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Regular user account.
    #[default]
    Normal,
    /// A user group that other users hang under.
    Group,
}

impl UserType {
    /// Returns the stored column value.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Normal => 0,
            Self::Group => 1,
        }
    }

    /// Decodes the stored column value. Unknown values fall back to `Normal`.
    #[must_use]
    pub const fn from_i16(value: i16) -> Self {
        match value {
            1 => Self::Group,
            _ => Self::Normal,
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// Gender as recorded on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Returns the stored column value.
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Unknown => 0,
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    /// Decodes the stored column value.
    #[must_use]
    pub const fn from_i8(value: i8) -> Self {
        match value {
            1 => Self::Male,
            2 => Self::Female,
            _ => Self::Unknown,
        }
    }
}
