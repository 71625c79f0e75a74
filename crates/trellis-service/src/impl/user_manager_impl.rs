//! User manager implementation.

use crate::user_manager::UserManager;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};
use trellis_core::{TrellisError, TrellisResult, User, UserId};
use trellis_repository::UserRepository;

/// User manager backed by a [`UserRepository`].
#[derive(Component)]
#[shaku(interface = UserManager)]
pub struct UserManagerImpl {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
}

impl UserManagerImpl {
    /// Creates a new user manager.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }
}

#[async_trait]
impl UserManager for UserManagerImpl {
    async fn get_by_name(&self, name: &str) -> TrellisResult<User> {
        debug!("Getting user by name: {}", name);

        // `is_name_exist` answers "is the name free".
        if self.user_repository.is_name_exist(name).await? {
            return Err(TrellisError::not_found("User", name));
        }

        self.user_repository
            .find_by_name(name)
            .await?
            .ok_or_else(|| TrellisError::not_found("User", name))
    }

    async fn get_by_id(&self, id: UserId) -> TrellisResult<User> {
        debug!("Getting user: {}", id);

        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrellisError::not_found("User", id))
    }

    async fn remove_by_id(&self, id: UserId) -> TrellisResult<()> {
        let user = self.get_by_id(id).await?;

        self.user_repository.remove(&user).await?;

        info!("User removed: {}", id);
        Ok(())
    }

    async fn recover_by_id(&self, id: UserId) -> TrellisResult<()> {
        self.user_repository.recover_by_id(id).await?;

        info!("User recovered: {}", id);
        Ok(())
    }

    async fn add(&self, user: &User) -> TrellisResult<UserId> {
        self.user_repository.add(user).await
    }

    async fn update(&self, user: &User) -> TrellisResult<bool> {
        self.user_repository.update(user).await
    }

    async fn children_of(&self, id: UserId) -> TrellisResult<Vec<User>> {
        self.user_repository.find_children_by_parent_id(id).await
    }
}

impl std::fmt::Debug for UserManagerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserManagerImpl").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory user repository.
    ///
    /// `taken_names` stands in for names the store reports as existing
    /// without a matching row, so a vanished user can be simulated.
    #[derive(Default)]
    struct MockUserRepository {
        users: Mutex<HashMap<UserId, User>>,
        taken_names: Mutex<Vec<String>>,
        next_id: Mutex<i64>,
        name_lookups: Mutex<usize>,
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn add(&self, user: &User) -> TrellisResult<UserId> {
            if !user.is_root() && !self.users.lock().unwrap().contains_key(&user.parent_id) {
                return Err(TrellisError::not_found("User", user.parent_id));
            }

            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let id = UserId::new(*next_id);

            let mut stored = user.clone();
            stored.id = id;
            self.users.lock().unwrap().insert(id, stored);
            Ok(id)
        }

        async fn remove(&self, user: &User) -> TrellisResult<()> {
            self.users
                .lock()
                .unwrap()
                .get_mut(&user.id)
                .ok_or_else(|| TrellisError::not_found("User", user.id))?
                .deleted = true;
            Ok(())
        }

        async fn update(&self, user: &User) -> TrellisResult<bool> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(&user.id) {
                Some(stored) => {
                    *stored = user.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn find_by_name(&self, name: &str) -> TrellisResult<Option<User>> {
            *self.name_lookups.lock().unwrap() += 1;
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.name == name)
                .cloned()
                .map(User::without_credentials))
        }

        async fn find_by_id(&self, id: UserId) -> TrellisResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .map(User::without_credentials))
        }

        async fn find_children_by_parent_id(&self, id: UserId) -> TrellisResult<Vec<User>> {
            let users = self.users.lock().unwrap();
            if !users.contains_key(&id) {
                return Err(TrellisError::not_found("User", id));
            }
            let mut children: Vec<User> = users
                .values()
                .filter(|u| u.parent_id == id)
                .cloned()
                .collect();
            children.sort_by_key(|u| u.id);
            Ok(children)
        }

        async fn recover_by_id(&self, id: UserId) -> TrellisResult<()> {
            self.users
                .lock()
                .unwrap()
                .get_mut(&id)
                .ok_or_else(|| TrellisError::not_found("User", id))?
                .deleted = false;
            Ok(())
        }

        async fn is_name_exist(&self, name: &str) -> TrellisResult<bool> {
            let stored = self.users.lock().unwrap().values().any(|u| u.name == name);
            let taken = self.taken_names.lock().unwrap().iter().any(|n| n == name);
            Ok(!(stored || taken))
        }

        async fn warm_name_filter(&self) -> TrellisResult<usize> {
            Ok(self.users.lock().unwrap().len())
        }
    }

    fn new_user(parent_id: UserId, name: &str) -> User {
        User::new(parent_id, name.to_string(), "hash".to_string(), b"salt".to_vec())
    }

    fn setup() -> (Arc<MockUserRepository>, UserManagerImpl) {
        let repo = Arc::new(MockUserRepository::default());
        let manager = UserManagerImpl::new(repo.clone());
        (repo, manager)
    }

    #[tokio::test]
    async fn test_get_by_name_returns_user_without_credentials() {
        let (_, manager) = setup();
        manager.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();

        let user = manager.get_by_name("alice").await.unwrap();

        assert_eq!(user.name, "alice");
        assert!(user.password.is_none());
    }

    #[tokio::test]
    async fn test_get_by_free_name_is_not_found_without_lookup() {
        let (repo, manager) = setup();

        let err = manager.get_by_name("nobody").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(*repo.name_lookups.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_by_name_of_vanished_row_is_not_found() {
        let (repo, manager) = setup();
        repo.taken_names.lock().unwrap().push("ghost".to_string());

        let err = manager.get_by_name("ghost").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(*repo.name_lookups.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_under_missing_parent_is_not_found() {
        let (_, manager) = setup();

        let err = manager.add(&new_user(UserId::new(5), "orphan")).await.unwrap_err();
        assert!(err.is_not_found());

        let id = manager.add(&new_user(UserId::ROOT_PARENT, "root")).await.unwrap();
        assert_eq!(manager.get_by_id(id).await.unwrap().name, "root");
    }

    #[tokio::test]
    async fn test_remove_and_recover_round_trip() {
        let (_, manager) = setup();
        let id = manager.add(&new_user(UserId::ROOT_PARENT, "bob")).await.unwrap();

        manager.remove_by_id(id).await.unwrap();
        assert!(manager.get_by_id(id).await.unwrap().deleted);

        manager.recover_by_id(id).await.unwrap();
        assert!(!manager.get_by_id(id).await.unwrap().deleted);
    }

    #[tokio::test]
    async fn test_remove_missing_user_is_not_found() {
        let (_, manager) = setup();

        let err = manager.remove_by_id(UserId::new(77)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_reports_missing_row() {
        let (_, manager) = setup();
        let id = manager.add(&new_user(UserId::ROOT_PARENT, "carol")).await.unwrap();

        let mut user = manager.get_by_id(id).await.unwrap();
        user.nickname = "C".to_string();
        assert!(manager.update(&user).await.unwrap());
        assert_eq!(manager.get_by_id(id).await.unwrap().nickname, "C");

        user.id = UserId::new(999);
        assert!(!manager.update(&user).await.unwrap());
    }

    #[tokio::test]
    async fn test_children_of_lists_direct_children_only() {
        let (_, manager) = setup();
        let root = manager.add(&new_user(UserId::ROOT_PARENT, "root")).await.unwrap();
        let child = manager.add(&new_user(root, "child")).await.unwrap();
        manager.add(&new_user(child, "grandchild")).await.unwrap();

        let children = manager.children_of(root).await.unwrap();

        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, child);
    }

    mod with_name_filter {
        use super::*;
        use trellis_repository::{BloomNameFilter, UserDao, UserRepositoryImpl};

        /// Minimal `sys_users` table so the real repository and filter run.
        #[derive(Default)]
        struct TableUserDao {
            users: Mutex<HashMap<UserId, User>>,
        }

        #[async_trait]
        impl UserDao for TableUserDao {
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
                Ok(self.users.lock().unwrap().values().any(|u| u.name == name))
            }

            async fn find_children(&self, parent_id: UserId) -> TrellisResult<Vec<User>> {
                Ok(self
                    .users
                    .lock()
                    .unwrap()
                    .values()
                    .filter(|u| u.parent_id == parent_id)
                    .cloned()
                    .collect())
            }

            async fn list_names(&self) -> TrellisResult<Vec<String>> {
                Ok(self.users.lock().unwrap().values().map(|u| u.name.clone()).collect())
            }

            async fn insert(&self, user: &User) -> TrellisResult<UserId> {
                let mut users = self.users.lock().unwrap();
                let id = UserId::new(users.len() as i64 + 1);
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

        #[tokio::test]
        async fn test_get_by_name_after_rename() {
            let repo = UserRepositoryImpl::new(
                Arc::new(TableUserDao::default()),
                Arc::new(BloomNameFilter::new(1000, 0.01)),
            );
            let manager = UserManagerImpl::new(Arc::new(repo));
            let id = manager.add(&new_user(UserId::ROOT_PARENT, "alice")).await.unwrap();

            let mut user = manager.get_by_id(id).await.unwrap();
            user.name = "alicia".to_string();
            assert!(manager.update(&user).await.unwrap());

            assert_eq!(manager.get_by_name("alicia").await.unwrap().id, id);
        }
    }
}
