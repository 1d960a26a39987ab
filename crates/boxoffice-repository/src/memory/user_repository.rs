//! In-memory user repository.

use super::MemoryTable;
use async_trait::async_trait;
use boxoffice_core::{
    BoxOfficeError, BoxOfficeResult, Email, Repository, User, UserId, UserRepository, UserRole,
};

/// User storage held in process memory. Emails are unique.
pub struct InMemoryUserRepository {
    users: MemoryTable<UserId, User>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: MemoryTable::new("User"),
        }
    }

    /// Creates a repository seeded with `users`.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        for user in users {
            let _ = repo.users.insert(&user);
        }
        repo
    }
}

#[async_trait]
impl Repository<User, UserId> for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> BoxOfficeResult<Option<User>> {
        Ok(self.users.get(id))
    }

    async fn save(&self, user: &User) -> BoxOfficeResult<User> {
        if self.users.find(|u| u.email == user.email).is_some() {
            return Err(BoxOfficeError::conflict(format!(
                "email '{}' already exists",
                user.email
            )));
        }
        self.users.insert(user)
    }

    async fn update(&self, user: &User) -> BoxOfficeResult<User> {
        self.users.replace(user)
    }

    async fn delete(&self, id: &UserId) -> BoxOfficeResult<bool> {
        Ok(self.users.remove(id))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &Email) -> BoxOfficeResult<Option<User>> {
        Ok(self.users.find(|u| u.email == *email))
    }

    async fn find_by_role(&self, role: UserRole) -> BoxOfficeResult<Vec<User>> {
        Ok(self.users.filter(|u| u.role == role))
    }

    async fn find_all(&self) -> BoxOfficeResult<Vec<User>> {
        Ok(self.users.filter(|_| true))
    }
}
