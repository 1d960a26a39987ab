//! User entity.

use super::super::value_objects::{Email, UserRole};
use crate::{Entity, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account holder: attendee, organizer or admin.
///
/// Credentials are owned by the authentication collaborator and are not part
/// of this entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone_number: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new unverified user.
    #[must_use]
    pub fn new(name: String, email: Email, phone_number: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: name.trim().to_string(),
            email,
            phone_number,
            role,
            is_email_verified: false,
            profile_pic: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user sees unpriced, administrative event data.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Updates display fields. `None` leaves a field untouched.
    pub fn update_profile(
        &mut self,
        name: Option<String>,
        phone_number: Option<String>,
        profile_pic: Option<String>,
    ) {
        if let Some(name) = name {
            self.name = name.trim().to_string();
        }
        if let Some(phone_number) = phone_number {
            self.phone_number = phone_number;
        }
        if let Some(profile_pic) = profile_pic {
            self.profile_pic = profile_pic;
        }
        self.updated_at = Utc::now();
    }

    /// Changes the user's role.
    pub fn change_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

impl Entity<UserId> for User {
    fn id(&self) -> &UserId {
        &self.id
    }
}
