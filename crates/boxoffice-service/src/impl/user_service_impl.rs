//! User service implementation.

use super::{require_admin, require_self_or_admin};
use crate::cache::cache_keys::{self, views};
use crate::cache::{CacheAside, CacheInvalidator, EntityKind};
use crate::dto::{ChangeRoleRequest, UpdateProfileRequest, UserResponse, Viewer};
use crate::user_service::UserService;
use async_trait::async_trait;
use boxoffice_core::{
    BoxOfficeError, BoxOfficeResult, Email, Repository, User, UserId, UserRepository, UserRole,
    ValidateExt,
};
use std::sync::Arc;
use tracing::{debug, info};

/// User service backed by a [`UserRepository`] and the users namespace.
pub struct UserServiceImpl {
    users: Arc<dyn UserRepository>,
    cache: CacheAside,
    invalidator: CacheInvalidator,
}

impl UserServiceImpl {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        cache: CacheAside,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self {
            users,
            cache,
            invalidator,
        }
    }

    async fn load(&self, id: UserId) -> BoxOfficeResult<User> {
        self.users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| BoxOfficeError::not_found("User", id))
    }

    async fn commit(&self, user: &User) -> BoxOfficeResult<User> {
        let updated = self.users.update(user).await?;
        self.invalidator
            .on_user_mutation(updated.id, Some(updated.email.as_str()))
            .await?;
        Ok(updated)
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_user(&self, id: UserId) -> BoxOfficeResult<UserResponse> {
        debug!("Getting user: {}", id);
        let users = Arc::clone(&self.users);
        let user: User = self
            .cache
            .fetch(&cache_keys::by_id(EntityKind::User, id), None, move || async move {
                users
                    .find_by_id(&id)
                    .await?
                    .ok_or_else(|| BoxOfficeError::not_found("User", id))
            })
            .await?;

        Ok(UserResponse::from(user))
    }

    async fn get_user_by_email(&self, email: &str) -> BoxOfficeResult<UserResponse> {
        debug!("Getting user by email: {}", email);
        let email = Email::new(email).map_err(|e| BoxOfficeError::validation(e.to_string()))?;
        let key = cache_keys::user_by_email(email.as_str());
        let users = Arc::clone(&self.users);
        let user: User = self
            .cache
            .fetch(&key, None, move || async move {
                users
                    .find_by_email(&email)
                    .await?
                    .ok_or_else(|| BoxOfficeError::not_found("User", email))
            })
            .await?;

        Ok(UserResponse::from(user))
    }

    async fn list_by_role(
        &self,
        viewer: &Viewer,
        role: UserRole,
    ) -> BoxOfficeResult<Vec<UserResponse>> {
        require_admin(viewer, "list users")?;
        let users = Arc::clone(&self.users);
        let listed: Vec<User> = self
            .cache
            .fetch(&cache_keys::users_by_role(role), None, move || async move {
                users.find_by_role(role).await
            })
            .await?;

        Ok(listed.iter().map(UserResponse::from).collect())
    }

    async fn list_users(&self, viewer: &Viewer) -> BoxOfficeResult<Vec<UserResponse>> {
        require_admin(viewer, "list users")?;
        let key = cache_keys::list_view(EntityKind::User, views::ALL);
        let users = Arc::clone(&self.users);
        let listed: Vec<User> = self
            .cache
            .fetch(&key, None, move || async move { users.find_all().await })
            .await?;

        Ok(listed.iter().map(UserResponse::from).collect())
    }

    async fn update_profile(
        &self,
        viewer: &Viewer,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> BoxOfficeResult<UserResponse> {
        require_self_or_admin(viewer, id)?;
        debug!("Updating profile: {}", id);
        request.validate_request()?;

        let mut user = self.load(id).await?;
        user.update_profile(request.name, request.phone_number, request.profile_pic);
        let updated = self.commit(&user).await?;

        info!(user_id = %id, "Profile updated");
        Ok(UserResponse::from(updated))
    }

    async fn change_role(
        &self,
        viewer: &Viewer,
        id: UserId,
        request: ChangeRoleRequest,
    ) -> BoxOfficeResult<UserResponse> {
        require_admin(viewer, "change roles")?;
        debug!("Changing role: {} -> {:?}", id, request.role);

        let mut user = self.load(id).await?;
        let previous = user.role;
        user.change_role(request.role);
        let updated = self.commit(&user).await?;

        info!(user_id = %id, from = ?previous, to = ?request.role, "Role changed");
        Ok(UserResponse::from(updated))
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheInterface, MemoryCacheStore, NamespaceTtls};
    use boxoffice_repository::InMemoryUserRepository;

    fn user(name: &str, email: &str, role: UserRole) -> User {
        User::new(
            name.to_string(),
            Email::new(email).unwrap(),
            "555 0100".to_string(),
            role,
        )
    }

    fn service(users: Vec<User>) -> UserServiceImpl {
        let cache: Arc<dyn CacheInterface> = Arc::new(MemoryCacheStore::new());
        UserServiceImpl::new(
            Arc::new(InMemoryUserRepository::with_users(users)),
            CacheAside::new(Arc::clone(&cache), NamespaceTtls::default()),
            CacheInvalidator::new(cache),
        )
    }

    fn admin() -> Viewer {
        Viewer::user(UserId::new(), UserRole::Admin)
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let ada = user("Ada", "ada@example.com", UserRole::User);
        let service = service(vec![ada.clone()]);

        let found = service.get_user_by_email("  ADA@Example.com ").await.unwrap();
        assert_eq!(found.id, ada.id);

        let missing = service.get_user_by_email("nobody@example.com").await;
        assert!(matches!(missing, Err(BoxOfficeError::NotFound { .. })));
        assert!(service.get_user_by_email("not-an-email").await.is_err());
    }

    #[tokio::test]
    async fn test_profile_update_is_visible_through_every_lookup() {
        let ada = user("Ada", "ada@example.com", UserRole::User);
        let service = service(vec![ada.clone()]);
        let me = Viewer::user(ada.id, UserRole::User);

        // Warm the id and email entries.
        service.get_user(ada.id).await.unwrap();
        service.get_user_by_email("ada@example.com").await.unwrap();

        service
            .update_profile(
                &me,
                ada.id,
                UpdateProfileRequest {
                    name: Some("Ada L.".to_string()),
                    ..UpdateProfileRequest::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(service.get_user(ada.id).await.unwrap().name, "Ada L.");
        assert_eq!(
            service
                .get_user_by_email("ada@example.com")
                .await
                .unwrap()
                .name,
            "Ada L."
        );
    }

    #[tokio::test]
    async fn test_cannot_edit_someone_else() {
        let ada = user("Ada", "ada@example.com", UserRole::User);
        let service = service(vec![ada.clone()]);
        let other = Viewer::user(UserId::new(), UserRole::User);

        let result = service
            .update_profile(&other, ada.id, UpdateProfileRequest::default())
            .await;
        assert!(matches!(result, Err(BoxOfficeError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_role_change_moves_user_between_role_lists() {
        let ada = user("Ada", "ada@example.com", UserRole::User);
        let service = service(vec![
            ada.clone(),
            user("Grace", "grace@example.com", UserRole::Organizer),
        ]);
        let admin = admin();

        assert_eq!(
            service
                .list_by_role(&admin, UserRole::Organizer)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(service.list_users(&admin).await.unwrap().len(), 2);

        let changed = service
            .change_role(
                &admin,
                ada.id,
                ChangeRoleRequest {
                    role: UserRole::Organizer,
                },
            )
            .await
            .unwrap();
        assert_eq!(changed.role, UserRole::Organizer);

        assert_eq!(
            service
                .list_by_role(&admin, UserRole::Organizer)
                .await
                .unwrap()
                .len(),
            2
        );
        assert!(service
            .list_by_role(&admin, UserRole::User)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_only_admins_change_roles() {
        let ada = user("Ada", "ada@example.com", UserRole::User);
        let service = service(vec![ada.clone()]);
        let me = Viewer::user(ada.id, UserRole::User);

        let result = service
            .change_role(
                &me,
                ada.id,
                ChangeRoleRequest {
                    role: UserRole::Admin,
                },
            )
            .await;
        assert!(matches!(result, Err(BoxOfficeError::Forbidden(_))));
        assert!(service.list_users(&me).await.is_err());
    }
}
