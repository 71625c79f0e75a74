//! MySQL implementation of [`UserDao`].
//!
//! `password` and `secret` are written but never selected, so users read
//! back from `sys_users` carry neither.

use crate::{dao::UserDao, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use tracing::debug;
use trellis_core::{Gender, TrellisError, TrellisResult, User, UserId, UserType};

/// Columns selected for every user read.
const USER_COLUMNS: &str = "id, parent_id, `type` AS user_type, name, salt, two_fa_method, deleted, \
     login_ip, last_login, nickname, email, phone_number, avatar, gender, create_time, last_update";

/// MySQL-backed user DAO.
#[derive(Component, Clone)]
#[shaku(interface = UserDao)]
pub struct MySqlUserDaoImpl {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserDaoImpl {
    /// Creates a new MySQL user DAO.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    parent_id: i64,
    user_type: i16,
    name: String,
    salt: Vec<u8>,
    two_fa_method: String,
    deleted: bool,
    login_ip: Option<Vec<u8>>,
    last_login: Option<DateTime<Utc>>,
    nickname: String,
    email: String,
    phone_number: String,
    avatar: String,
    gender: i8,
    create_time: DateTime<Utc>,
    last_update: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = TrellisError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let login_ip = match row.login_ip.as_deref() {
            None | Some([]) => None,
            Some(bytes) => Some(decode_ip(bytes)?),
        };

        Ok(User {
            id: UserId::new(row.id),
            parent_id: UserId::new(row.parent_id),
            user_type: UserType::from_i16(row.user_type),
            name: row.name,
            password: None,
            salt: row.salt,
            two_fa_method: row.two_fa_method,
            secret: None,
            deleted: row.deleted,
            login_ip,
            last_login: row.last_login,
            nickname: row.nickname,
            email: row.email,
            phone_number: row.phone_number,
            avatar: row.avatar,
            gender: Gender::from_i8(row.gender),
            create_time: row.create_time,
            last_update: row.last_update,
        })
    }
}

fn decode_ip(bytes: &[u8]) -> TrellisResult<IpAddr> {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        return Ok(IpAddr::V4(Ipv4Addr::from(octets)));
    }
    if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        return Ok(IpAddr::V6(Ipv6Addr::from(octets)));
    }
    Err(TrellisError::Internal(format!(
        "Invalid login_ip in database: {} bytes",
        bytes.len()
    )))
}

fn encode_ip(ip: IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

#[async_trait]
impl UserDao for MySqlUserDaoImpl {
    async fn find_by_id(&self, id: UserId) -> TrellisResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM sys_users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner()?)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> TrellisResult<Option<User>> {
        debug!("Finding user by name: {}", name);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM sys_users WHERE name = ? LIMIT 1",
            USER_COLUMNS
        ))
        .bind(name)
        .fetch_optional(self.pool.inner()?)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn exists_by_id(&self, id: UserId) -> TrellisResult<bool> {
        let result: Option<i64> = sqlx::query_scalar("SELECT 1 FROM sys_users WHERE id = ? LIMIT 1")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner()?)
            .await?;

        Ok(result.is_some())
    }

    async fn exists_by_name(&self, name: &str) -> TrellisResult<bool> {
        let result: Option<i64> = sqlx::query_scalar("SELECT 1 FROM sys_users WHERE name = ? LIMIT 1")
            .bind(name)
            .fetch_optional(self.pool.inner()?)
            .await?;

        Ok(result.is_some())
    }

    async fn find_children(&self, parent_id: UserId) -> TrellisResult<Vec<User>> {
        debug!("Finding children of user: {}", parent_id);

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM sys_users WHERE parent_id = ? ORDER BY id",
            USER_COLUMNS
        ))
        .bind(parent_id.into_inner())
        .fetch_all(self.pool.inner()?)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn list_names(&self) -> TrellisResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM sys_users")
            .fetch_all(self.pool.inner()?)
            .await?;

        Ok(names)
    }

    async fn insert(&self, user: &User) -> TrellisResult<UserId> {
        debug!("Inserting user: {}", user.name);

        let result = sqlx::query(
            r#"
            INSERT INTO sys_users (parent_id, `type`, name, password, salt, two_fa_method,
                                   secret, deleted, login_ip, last_login, nickname, email,
                                   phone_number, avatar, gender, create_time, last_update)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.parent_id.into_inner())
        .bind(user.user_type.as_i16())
        .bind(&user.name)
        .bind(user.password.as_deref())
        .bind(&user.salt)
        .bind(&user.two_fa_method)
        .bind(user.secret.as_deref().unwrap_or_default())
        .bind(user.deleted)
        .bind(user.login_ip.map(encode_ip))
        .bind(user.last_login)
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.avatar)
        .bind(user.gender.as_i8())
        .bind(user.create_time)
        .bind(user.last_update)
        .execute(self.pool.inner()?)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| TrellisError::Internal(format!("User id out of range: {}", e)))?;
        Ok(UserId::new(id))
    }

    async fn update(&self, user: &User) -> TrellisResult<bool> {
        debug!("Updating user: {}", user.id);

        // Credentials are only overwritten when supplied.
        let salt = (!user.salt.is_empty()).then_some(user.salt.as_slice());

        let result = sqlx::query(
            r#"
            UPDATE sys_users
            SET parent_id = ?, `type` = ?, name = ?,
                password = COALESCE(?, password), salt = COALESCE(?, salt),
                two_fa_method = ?, secret = COALESCE(?, secret),
                login_ip = ?, last_login = ?, nickname = ?, email = ?,
                phone_number = ?, avatar = ?, gender = ?
            WHERE id = ?
            "#,
        )
        .bind(user.parent_id.into_inner())
        .bind(user.user_type.as_i16())
        .bind(&user.name)
        .bind(user.password.as_deref())
        .bind(salt)
        .bind(&user.two_fa_method)
        .bind(user.secret.as_deref())
        .bind(user.login_ip.map(encode_ip))
        .bind(user.last_login)
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.avatar)
        .bind(user.gender.as_i8())
        .bind(user.id.into_inner())
        .execute(self.pool.inner()?)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_deleted(&self, id: UserId, deleted: bool) -> TrellisResult<bool> {
        let result = sqlx::query("UPDATE sys_users SET deleted = ? WHERE id = ?")
            .bind(deleted)
            .bind(id.into_inner())
            .execute(self.pool.inner()?)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
