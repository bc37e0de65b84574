//! Authorization checks shared by the catalog and the ledger.
//!
//! All role and ownership decisions route through these two functions so
//! the rules live in one place.

use crate::error::{Error, Result};
use crate::model::{Role, User};
use uuid::Uuid;

/// Require that the caller holds one of the allowed roles.
pub fn require_role(caller: &User, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&caller.role) {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}

/// Require that the caller owns the resource or is an admin.
///
/// Organizers may only touch their own events and the registrations under
/// them; admins may touch anything.
pub fn require_owner_or_admin(caller: &User, owner: Uuid) -> Result<()> {
    if caller.id == owner || caller.role == Role::Admin {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: Role) -> User {
        User::new("p@campus.edu", "hash".to_string(), "P", role)
    }

    #[test]
    fn test_require_role() {
        let organizer = user_with_role(Role::Organizer);
        assert!(require_role(&organizer, &[Role::Organizer, Role::Admin]).is_ok());

        let student = user_with_role(Role::Student);
        assert!(matches!(
            require_role(&student, &[Role::Organizer, Role::Admin]),
            Err(Error::Forbidden)
        ));
    }

    #[test]
    fn test_owner_may_touch_own_resource() {
        let organizer = user_with_role(Role::Organizer);
        assert!(require_owner_or_admin(&organizer, organizer.id).is_ok());
    }

    #[test]
    fn test_other_organizer_is_forbidden() {
        let organizer = user_with_role(Role::Organizer);
        assert!(matches!(
            require_owner_or_admin(&organizer, Uuid::new_v4()),
            Err(Error::Forbidden)
        ));
    }

    #[test]
    fn test_admin_bypasses_ownership() {
        let admin = user_with_role(Role::Admin);
        assert!(require_owner_or_admin(&admin, Uuid::new_v4()).is_ok());
    }
}
