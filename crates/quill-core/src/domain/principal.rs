use uuid::Uuid;

use super::UserRole;

/// The authenticated caller, as resolved by the access guard at the HTTP
/// boundary. Services only ever see this - they never touch tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: UserRole,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Role gate for a route: does the caller hold one of the allowed roles?
pub fn authorize(principal: &Principal, allowed: &[UserRole]) -> bool {
    allowed.contains(&principal.role)
}

/// Ownership-or-admin check shared by every mutating post/comment path.
/// A record without an author can only be mutated by an admin.
pub fn can_mutate(principal: &Principal, owner_id: Option<Uuid>) -> bool {
    principal.is_admin() || owner_id == Some(principal.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: Uuid) -> Principal {
        Principal {
            id,
            role: UserRole::User,
        }
    }

    fn admin() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn owner_can_mutate() {
        let id = Uuid::new_v4();
        assert!(can_mutate(&user(id), Some(id)));
    }

    #[test]
    fn unrelated_user_cannot_mutate() {
        assert!(!can_mutate(&user(Uuid::new_v4()), Some(Uuid::new_v4())));
    }

    #[test]
    fn admin_can_mutate_anything() {
        assert!(can_mutate(&admin(), Some(Uuid::new_v4())));
        assert!(can_mutate(&admin(), None));
    }

    #[test]
    fn orphaned_record_is_admin_only() {
        assert!(!can_mutate(&user(Uuid::new_v4()), None));
    }

    #[test]
    fn authorize_matches_roles() {
        let caller = user(Uuid::new_v4());
        assert!(authorize(&caller, &[UserRole::User, UserRole::Admin]));
        assert!(!authorize(&caller, &[UserRole::Admin]));
        assert!(authorize(&admin(), &[UserRole::Admin]));
    }
}
