//! The identity a representation is rendered for.

use boxoffice_core::{Event, UserId, UserRole};

/// Who is looking at a resource. Decides whether pricing internals are
/// exposed or the current dynamic price is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Option<UserId>,
    pub role: UserRole,
}

impl Viewer {
    /// An unauthenticated visitor.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            role: UserRole::User,
        }
    }

    #[must_use]
    pub const fn user(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id: Some(user_id),
            role,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Whether this viewer owns `event`.
    #[must_use]
    pub fn owns(&self, event: &Event) -> bool {
        self.user_id.is_some_and(|id| event.is_owned_by(id))
    }

    /// Owners and admins may modify an event and see its pricing rules.
    #[must_use]
    pub fn can_manage(&self, event: &Event) -> bool {
        self.is_admin() || self.owns(event)
    }
}
