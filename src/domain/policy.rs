//! Authorization policy
//!
//! The complete permission table lives here as one pure function over
//! `(actor, action)`, unit-testable without HTTP or a database. Services call
//! [`authorize`] before running any mutating query; every denial carries a
//! human-readable reason and maps to 401 at the boundary.

use super::user::UserRole;
use crate::shared::{DomainError, DomainResult};

/// Authenticated identity attached to a request after token resolution.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

/// Minimal view of the user a management action targets.
#[derive(Debug, Clone)]
pub struct UserRef {
    pub id: String,
    pub role: UserRole,
}

/// Every permission-gated operation in the system.
#[derive(Debug, Clone)]
pub enum Action {
    // Assets
    ViewAssets,
    CreateAsset,
    CheckInAsset,
    ExportAssets,
    DeleteAsset,
    DeleteAllAssets,
    // Users
    ListUsers,
    CreateUser { new_role: UserRole },
    UpdateUserProfile { target_id: String },
    ChangeUserRole { target: UserRef, new_role: UserRole },
    DeleteUser { target: UserRef },
    ChangeUserPassword { target_id: String },
    ChangeUserStatus { target_id: String },
    // System
    ViewSystemSettings,
    UpdateSystemSettings,
}

/// Deny unless `actor` is present with at least `min` level.
pub fn require_level(actor: Option<&Actor>, min: UserRole, what: &str) -> DomainResult<()> {
    let Some(actor) = actor else {
        return Err(DomainError::Unauthorized("Please log in first".into()));
    };
    if actor.role.has_level(min) {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(format!(
            "{} requires {} level or above",
            what,
            min.as_str()
        )))
    }
}

fn require_role(actor: Option<&Actor>, role: UserRole, what: &str) -> DomainResult<()> {
    let Some(actor) = actor else {
        return Err(DomainError::Unauthorized("Please log in first".into()));
    };
    if actor.role == role {
        Ok(())
    } else {
        Err(DomainError::Unauthorized(format!(
            "Only {} can {}",
            role.as_str(),
            what
        )))
    }
}

fn deny(reason: impl Into<String>) -> DomainResult<()> {
    Err(DomainError::Unauthorized(reason.into()))
}

/// Decide whether `actor` may perform `action`.
pub fn authorize(actor: Option<&Actor>, action: &Action) -> DomainResult<()> {
    use Action::*;

    match action {
        // Reads are open, including unauthenticated callers.
        ViewAssets => Ok(()),

        CreateAsset => require_level(actor, UserRole::Manager, "Creating assets"),
        CheckInAsset => require_level(actor, UserRole::Staff, "Updating asset status"),
        ExportAssets => require_level(actor, UserRole::Staff, "Exporting asset data"),
        DeleteAsset => require_role(actor, UserRole::Admin, "delete assets"),
        DeleteAllAssets => require_role(actor, UserRole::Admin, "delete all assets"),

        ListUsers => require_level(actor, UserRole::Manager, "User management"),
        CreateUser { new_role } => {
            require_level(actor, UserRole::Manager, "Creating users")?;
            if *new_role == UserRole::Admin {
                require_role(actor, UserRole::Admin, "create admin users")?;
            }
            Ok(())
        }

        UpdateUserProfile { target_id } => {
            let Some(actor) = actor else {
                return deny("Please log in first");
            };
            if actor.role.has_level(UserRole::Manager) || actor.id == *target_id {
                Ok(())
            } else {
                deny("You do not have permission to edit this user")
            }
        }

        ChangeUserRole { target, new_role } => {
            require_level(actor, UserRole::Manager, "Changing user roles")?;
            let Some(actor) = actor else {
                return deny("Please log in first");
            };
            if actor.role == UserRole::Manager {
                // Managers may only move users between staff and viewer.
                if !matches!(target.role, UserRole::Staff | UserRole::Viewer) {
                    return deny("Managers can only change roles of staff and viewer users");
                }
                if !matches!(new_role, UserRole::Staff | UserRole::Viewer) {
                    return deny("Managers can only assign the staff or viewer role");
                }
            }
            if *new_role == UserRole::Admin && actor.role != UserRole::Admin {
                return deny("Only admin can assign the admin role");
            }
            Ok(())
        }

        DeleteUser { target } => {
            require_level(actor, UserRole::Manager, "Deleting users")?;
            let Some(actor) = actor else {
                return deny("Please log in first");
            };
            if actor.id == target.id {
                return deny("You cannot delete your own account");
            }
            if target.role == UserRole::Admin && actor.role != UserRole::Admin {
                return deny("Only admin can delete admin users");
            }
            Ok(())
        }

        ChangeUserPassword { target_id } => {
            let Some(actor) = actor else {
                return deny("Please log in first");
            };
            if actor.role.has_level(UserRole::Manager) || actor.id == *target_id {
                Ok(())
            } else {
                deny("You do not have permission to change this user's password")
            }
        }

        ChangeUserStatus { target_id } => {
            require_role(actor, UserRole::Admin, "change user status")?;
            let Some(actor) = actor else {
                return deny("Please log in first");
            };
            if actor.id == *target_id {
                return deny("You cannot change your own status");
            }
            Ok(())
        }

        ViewSystemSettings => require_role(actor, UserRole::Admin, "access system settings"),
        UpdateSystemSettings => require_role(actor, UserRole::Admin, "update system settings"),
    }
}

/// Old-password re-verification applies only when a user changes their own
/// password; managers resetting someone else's skip it.
pub fn requires_old_password(actor: &Actor, target_id: &str) -> bool {
    actor.id == target_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str, role: UserRole) -> Actor {
        Actor {
            id: id.into(),
            username: id.into(),
            role,
        }
    }

    fn target(id: &str, role: UserRole) -> UserRef {
        UserRef {
            id: id.into(),
            role,
        }
    }

    const ALL_ROLES: [UserRole; 4] = [
        UserRole::Viewer,
        UserRole::Staff,
        UserRole::Manager,
        UserRole::Admin,
    ];

    fn allowed(role: UserRole, action: &Action) -> bool {
        authorize(Some(&actor("u1", role)), action).is_ok()
    }

    #[test]
    fn view_is_open_to_everyone() {
        assert!(authorize(None, &Action::ViewAssets).is_ok());
        for role in ALL_ROLES {
            assert!(allowed(role, &Action::ViewAssets));
        }
    }

    #[test]
    fn asset_cross_product_matches_table() {
        for role in ALL_ROLES {
            let level = role.level();
            assert_eq!(allowed(role, &Action::CreateAsset), level >= 2, "{role}");
            assert_eq!(allowed(role, &Action::CheckInAsset), level >= 1, "{role}");
            assert_eq!(allowed(role, &Action::ExportAssets), level >= 1, "{role}");
            assert_eq!(
                allowed(role, &Action::DeleteAsset),
                role == UserRole::Admin,
                "{role}"
            );
            assert_eq!(
                allowed(role, &Action::DeleteAllAssets),
                role == UserRole::Admin,
                "{role}"
            );
        }
    }

    #[test]
    fn user_management_cross_product_matches_table() {
        for role in ALL_ROLES {
            let level = role.level();
            assert_eq!(allowed(role, &Action::ListUsers), level >= 2, "{role}");
            assert_eq!(
                allowed(
                    role,
                    &Action::CreateUser {
                        new_role: UserRole::Staff
                    }
                ),
                level >= 2,
                "{role}"
            );
            // Only admin can mint admins.
            assert_eq!(
                allowed(
                    role,
                    &Action::CreateUser {
                        new_role: UserRole::Admin
                    }
                ),
                role == UserRole::Admin,
                "{role}"
            );
            assert_eq!(
                allowed(role, &Action::ViewSystemSettings),
                role == UserRole::Admin,
                "{role}"
            );
            assert_eq!(
                allowed(role, &Action::UpdateSystemSettings),
                role == UserRole::Admin,
                "{role}"
            );
        }
    }

    #[test]
    fn unauthenticated_is_denied_everything_but_reads() {
        for action in [
            Action::CreateAsset,
            Action::CheckInAsset,
            Action::ExportAssets,
            Action::DeleteAsset,
            Action::ListUsers,
            Action::ViewSystemSettings,
        ] {
            assert!(authorize(None, &action).is_err(), "{action:?}");
        }
    }

    #[test]
    fn profile_update_allows_manager_or_self() {
        let self_action = Action::UpdateUserProfile {
            target_id: "u1".into(),
        };
        let other_action = Action::UpdateUserProfile {
            target_id: "other".into(),
        };
        for role in ALL_ROLES {
            assert!(allowed(role, &self_action), "{role} editing self");
            assert_eq!(
                allowed(role, &other_action),
                role.level() >= 2,
                "{role} editing other"
            );
        }
    }

    #[test]
    fn password_change_allows_manager_or_self() {
        let self_action = Action::ChangeUserPassword {
            target_id: "u1".into(),
        };
        let other_action = Action::ChangeUserPassword {
            target_id: "other".into(),
        };
        for role in ALL_ROLES {
            assert!(allowed(role, &self_action), "{role}");
            assert_eq!(allowed(role, &other_action), role.level() >= 2, "{role}");
        }
    }

    #[test]
    fn only_self_requires_old_password() {
        let a = actor("u1", UserRole::Manager);
        assert!(requires_old_password(&a, "u1"));
        assert!(!requires_old_password(&a, "u2"));
    }

    #[test]
    fn manager_role_changes_restricted_to_staff_and_viewer() {
        let manager = actor("m1", UserRole::Manager);
        // staff <-> viewer is fine
        assert!(authorize(
            Some(&manager),
            &Action::ChangeUserRole {
                target: target("u2", UserRole::Staff),
                new_role: UserRole::Viewer,
            }
        )
        .is_ok());
        // promoting to manager is not
        assert!(authorize(
            Some(&manager),
            &Action::ChangeUserRole {
                target: target("u2", UserRole::Staff),
                new_role: UserRole::Manager,
            }
        )
        .is_err());
        // touching another manager is not
        assert!(authorize(
            Some(&manager),
            &Action::ChangeUserRole {
                target: target("u2", UserRole::Manager),
                new_role: UserRole::Staff,
            }
        )
        .is_err());
        // assigning admin is admin-only
        assert!(authorize(
            Some(&manager),
            &Action::ChangeUserRole {
                target: target("u2", UserRole::Staff),
                new_role: UserRole::Admin,
            }
        )
        .is_err());
        let admin = actor("a1", UserRole::Admin);
        assert!(authorize(
            Some(&admin),
            &Action::ChangeUserRole {
                target: target("u2", UserRole::Staff),
                new_role: UserRole::Admin,
            }
        )
        .is_ok());
    }

    #[test]
    fn delete_user_rules() {
        let manager = actor("m1", UserRole::Manager);
        let admin = actor("a1", UserRole::Admin);
        // staff/viewer cannot delete at all
        assert!(authorize(
            Some(&actor("s1", UserRole::Staff)),
            &Action::DeleteUser {
                target: target("u2", UserRole::Viewer)
            }
        )
        .is_err());
        // never self
        assert!(authorize(
            Some(&admin),
            &Action::DeleteUser {
                target: target("a1", UserRole::Admin)
            }
        )
        .is_err());
        // manager cannot delete an admin
        assert!(authorize(
            Some(&manager),
            &Action::DeleteUser {
                target: target("u2", UserRole::Admin)
            }
        )
        .is_err());
        // admin can delete another admin
        assert!(authorize(
            Some(&admin),
            &Action::DeleteUser {
                target: target("u2", UserRole::Admin)
            }
        )
        .is_ok());
        // manager can delete staff
        assert!(authorize(
            Some(&manager),
            &Action::DeleteUser {
                target: target("u2", UserRole::Staff)
            }
        )
        .is_ok());
    }

    #[test]
    fn status_change_is_admin_only_and_never_self() {
        for role in ALL_ROLES {
            assert_eq!(
                allowed(
                    role,
                    &Action::ChangeUserStatus {
                        target_id: "other".into()
                    }
                ),
                role == UserRole::Admin,
                "{role}"
            );
        }
        let admin = actor("a1", UserRole::Admin);
        assert!(authorize(
            Some(&admin),
            &Action::ChangeUserStatus {
                target_id: "a1".into()
            }
        )
        .is_err());
    }

    #[test]
    fn denials_carry_a_reason() {
        let err = authorize(
            Some(&actor("v1", UserRole::Viewer)),
            &Action::CreateAsset,
        )
        .unwrap_err();
        match err {
            crate::shared::DomainError::Unauthorized(reason) => {
                assert!(!reason.is_empty());
            }
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }
}
