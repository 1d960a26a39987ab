//! User service trait definition.

use crate::dto::{ChangeRoleRequest, UpdateProfileRequest, UserResponse, Viewer};
use async_trait::async_trait;
use boxoffice_core::{BoxOfficeResult, UserId, UserRole};

/// User service trait.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> BoxOfficeResult<UserResponse>;

    /// Gets a user by email address. Lookup is case-insensitive.
    async fn get_user_by_email(&self, email: &str) -> BoxOfficeResult<UserResponse>;

    /// Lists users holding a role (admin only).
    async fn list_by_role(&self, viewer: &Viewer, role: UserRole)
        -> BoxOfficeResult<Vec<UserResponse>>;

    /// Lists every user (admin only).
    async fn list_users(&self, viewer: &Viewer) -> BoxOfficeResult<Vec<UserResponse>>;

    /// Updates a profile. Users may edit themselves; admins may edit anyone.
    async fn update_profile(
        &self,
        viewer: &Viewer,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> BoxOfficeResult<UserResponse>;

    /// Changes a user's role (admin only).
    async fn change_role(
        &self,
        viewer: &Viewer,
        id: UserId,
        request: ChangeRoleRequest,
    ) -> BoxOfficeResult<UserResponse>;
}
