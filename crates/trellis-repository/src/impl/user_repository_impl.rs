//! `UserRepositoryImpl`: user tree persistence over [`UserDao`] plus the
//! username [`NameFilter`].
//!
//! The filter only ever answers "definitely free" on its own; a "possibly
//! taken" answer is confirmed against the store.

use crate::dao::UserDao;
use crate::filter::NameFilter;
use crate::traits::UserRepository;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};
use trellis_core::{TrellisError, TrellisResult, User, UserId};

/// Repository implementation that orchestrates [`UserDao`] and [`NameFilter`].
#[derive(Component)]
#[shaku(interface = UserRepository)]
pub struct UserRepositoryImpl {
    #[shaku(inject)]
    user_dao: Arc<dyn UserDao>,
    #[shaku(inject)]
    name_filter: Arc<dyn NameFilter>,
}

impl UserRepositoryImpl {
    /// Creates a new user repository.
    #[must_use]
    pub fn new(user_dao: Arc<dyn UserDao>, name_filter: Arc<dyn NameFilter>) -> Self {
        Self {
            user_dao,
            name_filter,
        }
    }

    async fn require(&self, id: UserId) -> TrellisResult<User> {
        self.user_dao
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrellisError::not_found("User", id))
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn add(&self, user: &User) -> TrellisResult<UserId> {
        if user.password.is_none() {
            return Err(TrellisError::validation("password is required for a new user"));
        }

        if !user.parent_id.is_root() && !self.user_dao.exists_by_id(user.parent_id).await? {
            return Err(TrellisError::not_found("User", user.parent_id));
        }

        let id = self.user_dao.insert(user).await?;

        if let Err(e) = self.name_filter.add(&user.name).await {
            warn!(user_id = %id, name = %user.name, error = %e, "Failed to record username in filter");
        }

        info!(user_id = %id, parent_id = %user.parent_id, "User added");
        Ok(id)
    }

    async fn remove(&self, user: &User) -> TrellisResult<()> {
        let existing = self.require(user.id).await?;
        self.user_dao.set_deleted(existing.id, true).await?;
        info!(user_id = %existing.id, "User removed");
        Ok(())
    }

    async fn update(&self, user: &User) -> TrellisResult<bool> {
        let matched = self.user_dao.update(user).await?;
        if matched {
            // The row may have been renamed; the filter must never miss a stored name.
            if let Err(e) = self.name_filter.add(&user.name).await {
                warn!(user_id = %user.id, name = %user.name, error = %e, "Failed to record username in filter");
            }
            info!(user_id = %user.id, "User updated");
        } else {
            debug!("Update matched no user: {}", user.id);
        }
        Ok(matched)
    }

    async fn find_by_name(&self, name: &str) -> TrellisResult<Option<User>> {
        Ok(self
            .user_dao
            .find_by_name(name)
            .await?
            .map(User::without_credentials))
    }

    async fn find_by_id(&self, id: UserId) -> TrellisResult<Option<User>> {
        Ok(self
            .user_dao
            .find_by_id(id)
            .await?
            .map(User::without_credentials))
    }

    async fn find_children_by_parent_id(&self, id: UserId) -> TrellisResult<Vec<User>> {
        let parent = self.require(id).await?;
        let children = self.user_dao.find_children(parent.id).await?;
        debug!("Found {} children of user {}", children.len(), id);
        Ok(children.into_iter().map(User::without_credentials).collect())
    }

    async fn recover_by_id(&self, id: UserId) -> TrellisResult<()> {
        let existing = self.require(id).await?;
        self.user_dao.set_deleted(existing.id, false).await?;
        info!(user_id = %id, "User recovered");
        Ok(())
    }

    async fn is_name_exist(&self, name: &str) -> TrellisResult<bool> {
        if !self.name_filter.might_contain(name).await? {
            debug!("Name filter rules out '{}'", name);
            return Ok(true);
        }

        let taken = self.user_dao.exists_by_name(name).await?;
        Ok(!taken)
    }

    async fn warm_name_filter(&self) -> TrellisResult<usize> {
        let names = self.user_dao.list_names().await?;
        for name in &names {
            self.name_filter.add(name).await?;
        }
        info!("Loaded {} usernames into the name filter", names.len());
        Ok(names.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::BloomNameFilter;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory `sys_users` table. Stores users with credentials intact so
    /// tests can check the repository strips them.
    #[derive(Default)]
    struct InMemoryUserDao {
        users: Mutex<HashMap<UserId, User>>,
        next_id: AtomicUsize,
        name_checks: AtomicUsize,
    }

    impl InMemoryUserDao {
        fn stored(&self, id: UserId) -> User {
            self.users.lock().unwrap()[&id].clone()
        }
    }

    #[async_trait]
    impl UserDao for InMemoryUserDao {
        async fn find_by_id(&self, id: UserId) -> TrellisResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> TrellisResult<Option<User>> {
            Ok(self.users.lock().unwrap().values().find(|u| u.name == name).cloned())
        }

        async fn exists_by_id(&self, id: UserId) -> TrellisResult<bool> {
            Ok(self.users.lock().unwrap().contains_key(&id))
        }

        async fn exists_by_name(&self, name: &str) -> TrellisResult<bool> {
            self.name_checks.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.lock().unwrap().values().any(|u| u.name == name))
        }

        async fn find_children(&self, parent_id: UserId) -> TrellisResult<Vec<User>> {
            let mut children: Vec<User> = self
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| u.parent_id == parent_id)
                .cloned()
                .collect();
            children.sort_by_key(|u| u.id);
            Ok(children)
        }

        async fn list_names(&self) -> TrellisResult<Vec<String>> {
            Ok(self.users.lock().unwrap().values().map(|u| u.name.clone()).collect())
        }

        async fn insert(&self, user: &User) -> TrellisResult<UserId> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.name == user.name) {
                return Err(TrellisError::Conflict(format!("Duplicate entry '{}'", user.name)));
            }
            let id = UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1);
            let mut stored = user.clone();
            stored.id = id;
            users.insert(id, stored);
            Ok(id)
        }

        async fn update(&self, user: &User) -> TrellisResult<bool> {
            let mut users = self.users.lock().unwrap();
            Ok(users.get_mut(&user.id).map(|u| *u = user.clone()).is_some())
        }

        async fn set_deleted(&self, id: UserId, deleted: bool) -> TrellisResult<bool> {
            let mut users = self.users.lock().unwrap();
            Ok(users.get_mut(&id).map(|u| u.deleted = deleted).is_some())
        }
    }

    /// Exact-set filter with an injectable false positive and add fault.
    #[derive(Default)]
    struct SetNameFilter {
        names: Mutex<HashSet<String>>,
        false_positives: HashSet<String>,
        fail_add: bool,
    }

    #[async_trait]
    impl NameFilter for SetNameFilter {
        async fn add(&self, name: &str) -> TrellisResult<()> {
            if self.fail_add {
                return Err(TrellisError::cache("BF.ADD failed"));
            }
            self.names.lock().unwrap().insert(name.to_string());
            Ok(())
        }

        async fn might_contain(&self, name: &str) -> TrellisResult<bool> {
            Ok(self.false_positives.contains(name) || self.names.lock().unwrap().contains(name))
        }
    }

    fn new_user(parent_id: UserId, name: &str) -> User {
        let mut user = User::new(parent_id, name.to_string(), "hashed".to_string(), b"salt".to_vec());
        user.secret = Some("otp".to_string());
        user
    }

    fn repository(dao: &Arc<InMemoryUserDao>, filter: &Arc<SetNameFilter>) -> UserRepositoryImpl {
        UserRepositoryImpl::new(dao.clone(), filter.clone())
    }

    // =============================================================================
    // Add
    // =============================================================================

    #[tokio::test]
    async fn test_add_root_user() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        let id = repo.add(&new_user(UserId::ROOT_PARENT, "root")).await.unwrap();

        assert_eq!(dao.stored(id).name, "root");
        assert!(filter.names.lock().unwrap().contains("root"));
    }

    #[tokio::test]
    async fn test_add_under_missing_parent_fails() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        let err = repo.add(&new_user(UserId::new(42), "orphan")).await.unwrap_err();

        assert!(matches!(err, TrellisError::NotFound { resource_type: "User", ref id } if id == "42"));
        assert!(dao.users.lock().unwrap().is_empty());
        assert!(filter.names.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_under_existing_parent() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        let parent = repo.add(&new_user(UserId::ROOT_PARENT, "group")).await.unwrap();
        let child = repo.add(&new_user(parent, "member")).await.unwrap();

        assert_eq!(dao.stored(child).parent_id, parent);
    }

    #[tokio::test]
    async fn test_add_without_password_is_rejected() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        let mut user = new_user(UserId::ROOT_PARENT, "nopass");
        user.password = None;

        let err = repo.add(&user).await.unwrap_err();
        assert!(matches!(err, TrellisError::Validation(_)));
    }

    #[tokio::test]
    async fn test_add_survives_filter_fault() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter {
            fail_add: true,
            ..SetNameFilter::default()
        });
        let repo = repository(&dao, &filter);

        let id = repo.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();
        assert_eq!(dao.stored(id).name, "alice");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        repo.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();
        let err = repo.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap_err();
        assert!(matches!(err, TrellisError::Conflict(_)));
    }

    // =============================================================================
    // Soft delete
    // =============================================================================

    #[tokio::test]
    async fn test_remove_then_recover() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);
        let id = repo.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();

        let user = repo.find_by_id(id).await.unwrap().unwrap();
        repo.remove(&user).await.unwrap();

        let removed = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(removed.deleted);
        assert!(dao.users.lock().unwrap().contains_key(&id));

        repo.recover_by_id(id).await.unwrap();
        assert!(!repo.find_by_id(id).await.unwrap().unwrap().deleted);
    }

    #[tokio::test]
    async fn test_remove_missing_user_is_not_found() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        let mut ghost = new_user(UserId::ROOT_PARENT, "ghost");
        ghost.id = UserId::new(77);

        assert!(repo.remove(&ghost).await.unwrap_err().is_not_found());
        assert!(repo.recover_by_id(UserId::new(77)).await.unwrap_err().is_not_found());
    }

    // =============================================================================
    // Update and lookups
    // =============================================================================

    #[tokio::test]
    async fn test_update_missing_user_is_noop() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        let mut ghost = new_user(UserId::ROOT_PARENT, "ghost");
        ghost.id = UserId::new(5);

        assert!(!repo.update(&ghost).await.unwrap());
        assert!(dao.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_existing_user() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);
        let id = repo.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();

        let mut user = repo.find_by_id(id).await.unwrap().unwrap();
        user.nickname = "Al".to_string();

        assert!(repo.update(&user).await.unwrap());
        assert_eq!(dao.stored(id).nickname, "Al");
    }

    #[tokio::test]
    async fn test_renamed_user_is_not_reported_free() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(BloomNameFilter::new(1000, 0.01));
        let repo = UserRepositoryImpl::new(dao.clone(), filter);
        let id = repo.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();

        let mut user = repo.find_by_id(id).await.unwrap().unwrap();
        user.name = "alicia".to_string();
        assert!(repo.update(&user).await.unwrap());

        assert!(repo.find_by_name("alicia").await.unwrap().is_some());
        assert!(!repo.is_name_exist("alicia").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_survives_filter_fault() {
        let dao = Arc::new(InMemoryUserDao::default());
        let healthy = Arc::new(SetNameFilter::default());
        let id = repository(&dao, &healthy)
            .add(&new_user(UserId::ROOT_PARENT, "alice"))
            .await
            .unwrap();

        let failing = Arc::new(SetNameFilter {
            fail_add: true,
            ..SetNameFilter::default()
        });
        let repo = repository(&dao, &failing);

        let mut user = repo.find_by_id(id).await.unwrap().unwrap();
        user.name = "alicia".to_string();

        assert!(repo.update(&user).await.unwrap());
        assert_eq!(dao.stored(id).name, "alicia");
    }

    #[tokio::test]
    async fn test_update_missing_user_leaves_filter_untouched() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        let mut ghost = new_user(UserId::ROOT_PARENT, "ghost");
        ghost.id = UserId::new(9);

        assert!(!repo.update(&ghost).await.unwrap());
        assert!(filter.names.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookups_strip_credentials() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);
        let id = repo.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();

        let by_id = repo.find_by_id(id).await.unwrap().unwrap();
        let by_name = repo.find_by_name("alice").await.unwrap().unwrap();

        for user in [by_id, by_name] {
            assert!(user.password.is_none());
            assert!(user.secret.is_none());
        }
        assert!(repo.find_by_name("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_children_are_one_level_deep() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        let root = repo.add(&new_user(UserId::ROOT_PARENT, "root")).await.unwrap();
        let a = repo.add(&new_user(root, "a")).await.unwrap();
        repo.add(&new_user(root, "b")).await.unwrap();
        repo.add(&new_user(a, "a1")).await.unwrap();

        let children = repo.find_children_by_parent_id(root).await.unwrap();
        let names: Vec<&str> = children.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(children.iter().all(|u| u.password.is_none()));

        let err = repo.find_children_by_parent_id(UserId::new(999)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    // =============================================================================
    // Name availability
    // =============================================================================

    #[tokio::test]
    async fn test_name_ruled_out_by_filter_skips_store() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);

        assert!(repo.is_name_exist("fresh").await.unwrap());
        assert_eq!(dao.name_checks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_taken_name_is_not_free() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter::default());
        let repo = repository(&dao, &filter);
        repo.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();

        assert!(!repo.is_name_exist("alice").await.unwrap());
        assert_eq!(dao.name_checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_false_positive_is_confirmed_by_store() {
        let dao = Arc::new(InMemoryUserDao::default());
        let filter = Arc::new(SetNameFilter {
            false_positives: HashSet::from(["carol".to_string()]),
            ..SetNameFilter::default()
        });
        let repo = repository(&dao, &filter);

        assert!(repo.is_name_exist("carol").await.unwrap());
        assert_eq!(dao.name_checks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_warm_filter_from_store() {
        let dao = Arc::new(InMemoryUserDao::default());
        for name in ["alice", "bob"] {
            dao.insert(&new_user(UserId::ROOT_PARENT, name)).await.unwrap();
        }
        let filter = Arc::new(BloomNameFilter::new(100, 0.01));
        let repo = UserRepositoryImpl::new(dao.clone(), filter.clone());

        // A cold filter has never seen names stored before it was created.
        assert!(repo.is_name_exist("alice").await.unwrap());

        assert_eq!(repo.warm_name_filter().await.unwrap(), 2);
        assert!(filter.might_contain("alice").await.unwrap());
        assert!(filter.might_contain("bob").await.unwrap());
        assert!(!repo.is_name_exist("bob").await.unwrap());
    }
}
