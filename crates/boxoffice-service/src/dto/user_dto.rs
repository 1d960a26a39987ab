//! User-related DTOs.

use boxoffice_core::validation::rules;
use boxoffice_core::{User, UserId, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to update the caller's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "rules::not_blank")
    )]
    pub name: Option<String>,

    #[validate(custom(function = "rules::phone_number"))]
    pub phone_number: Option<String>,

    #[validate(url(message = "Invalid profile picture URL"))]
    pub profile_pic: Option<String>,
}

/// Request to change a user's role (admin only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

/// User response DTO.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into(),
            phone_number: user.phone_number,
            role: user.role,
            is_email_verified: user.is_email_verified,
            profile_pic: user.profile_pic,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self::from(user.clone())
    }
}
