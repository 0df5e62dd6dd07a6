//! Identity service — authentication and user management
//!
//! All user-related business logic lives here; HTTP handlers are thin
//! wrappers. Permission rules are delegated to `domain::policy` and run
//! before any mutating repository call.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::policy::{self, Action, Actor, UserRef};
use crate::domain::user::{
    CreateUserDto, ProfileUpdate, User, UserRepositoryInterface, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::{DomainError, DomainResult};

/// The login failure message is identical for unknown usernames and wrong
/// passwords so the endpoint cannot be used for username enumeration.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Identity service — orchestrates login, token resolution and every
/// user-management use-case.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from the
/// concrete persistence layer.
pub struct IdentityService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    jwt_config: JwtConfig,
}

impl<R: UserRepositoryInterface> IdentityService<R> {
    pub fn new(repo: Arc<R>, jwt_config: JwtConfig) -> Self {
        Self { repo, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by exact username + password and issue a JWT.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Username and password are required".into(),
            ));
        }

        let Some(user) = self.repo.get_user_by_username(username).await? else {
            debug!(username, "login rejected: unknown username");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            debug!(username, "login rejected: wrong password");
            return Err(DomainError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        self.repo.touch_last_login(&user.id, Utc::now()).await?;

        let token = create_token(&user.id, &user.username, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;

        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    /// Resolve a bearer token to an actor.
    ///
    /// The user row is re-fetched on every call: a deleted or deactivated
    /// account invalidates its outstanding tokens immediately, and the role
    /// comes from the store rather than the (possibly stale) claim.
    pub async fn resolve_token(&self, token: &str) -> DomainResult<Actor> {
        let claims = verify_token(token, &self.jwt_config).map_err(|e| {
            let message = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    "Token has expired, please log in again"
                }
                _ => "Invalid authentication token",
            };
            DomainError::Unauthorized(message.into())
        })?;

        let Some(user) = self.repo.get_user_by_id(&claims.sub).await? else {
            return Err(DomainError::Unauthorized(
                "User no longer exists or has been removed".into(),
            ));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        Ok(Actor {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }

    /// Fresh user record for the authenticated actor.
    pub async fn current_user(&self, actor: &Actor) -> DomainResult<User> {
        self.repo
            .get_user_by_id(&actor.id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".into()))
    }

    // ── User management ─────────────────────────────────────────

    pub async fn list_users(&self, actor: &Actor) -> DomainResult<Vec<User>> {
        policy::authorize(Some(actor), &Action::ListUsers)?;
        self.repo.list_users().await
    }

    pub async fn create_user(
        &self,
        actor: &Actor,
        username: &str,
        password: &str,
        role: &str,
    ) -> DomainResult<User> {
        policy::require_level(Some(actor), UserRole::Manager, "Creating users")?;

        if username.is_empty() || password.is_empty() || role.is_empty() {
            return Err(DomainError::Validation(
                "username, password and role are required".into(),
            ));
        }

        let new_role = UserRole::parse(role).ok_or_else(|| {
            DomainError::Validation("role must be one of: admin, manager, staff, viewer".into())
        })?;

        policy::authorize(Some(actor), &Action::CreateUser { new_role })?;

        if self.repo.get_user_by_username(username).await?.is_some() {
            return Err(DomainError::conflict("Username already exists", None));
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repo
            .create_user(CreateUserDto {
                username: username.to_string(),
                password_hash,
                role: new_role,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    /// Update profile fields. Role changes ride through the same rules as
    /// [`change_role`](Self::change_role).
    pub async fn update_user(
        &self,
        actor: &Actor,
        target_id: &str,
        username: Option<String>,
        role: Option<String>,
    ) -> DomainResult<User> {
        policy::authorize(
            Some(actor),
            &Action::UpdateUserProfile {
                target_id: target_id.to_string(),
            },
        )?;

        if username.is_none() && role.is_none() {
            return Err(DomainError::Validation("Nothing to update".into()));
        }

        let mut update = ProfileUpdate::default();

        if let Some(username) = username {
            if username.is_empty() {
                return Err(DomainError::Validation("username cannot be empty".into()));
            }
            if let Some(other) = self.repo.get_user_by_username(&username).await? {
                if other.id != target_id {
                    return Err(DomainError::conflict("Username already exists", None));
                }
            }
            update.username = Some(username);
        }

        if let Some(role) = role {
            update.role = Some(self.check_role_change(actor, target_id, &role).await?);
        }

        let updated = self
            .repo
            .update_profile(target_id, update)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".into()))?;

        Ok(updated)
    }

    pub async fn change_role(
        &self,
        actor: &Actor,
        target_id: &str,
        role: &str,
    ) -> DomainResult<UserRole> {
        policy::require_level(Some(actor), UserRole::Manager, "Changing user roles")?;

        let new_role = self.check_role_change(actor, target_id, role).await?;
        self.repo.update_role(target_id, new_role).await?;

        info!(target_id, new_role = %new_role, changed_by = %actor.username, "User role changed");
        Ok(new_role)
    }

    /// Shared validation for direct and profile-embedded role changes.
    async fn check_role_change(
        &self,
        actor: &Actor,
        target_id: &str,
        role: &str,
    ) -> DomainResult<UserRole> {
        let new_role = UserRole::parse(role).ok_or_else(|| {
            DomainError::Validation("role must be one of: admin, manager, staff, viewer".into())
        })?;

        if actor.id == target_id {
            return Err(DomainError::Validation(
                "You cannot change your own role".into(),
            ));
        }

        let target = self
            .repo
            .get_user_by_id(target_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".into()))?;

        policy::authorize(
            Some(actor),
            &Action::ChangeUserRole {
                target: UserRef {
                    id: target.id,
                    role: target.role,
                },
                new_role,
            },
        )?;

        Ok(new_role)
    }

    pub async fn delete_user(&self, actor: &Actor, target_id: &str) -> DomainResult<()> {
        policy::require_level(Some(actor), UserRole::Manager, "Deleting users")?;

        let target = self
            .repo
            .get_user_by_id(target_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".into()))?;

        policy::authorize(
            Some(actor),
            &Action::DeleteUser {
                target: UserRef {
                    id: target.id,
                    role: target.role,
                },
            },
        )?;

        self.repo.delete_user(target_id).await?;

        info!(target_id, deleted_by = %actor.username, "User deleted");
        Ok(())
    }

    /// Change a password. Old-password re-verification applies only when the
    /// actor changes their own password; a manager resetting another user's
    /// skips it.
    pub async fn change_password(
        &self,
        actor: &Actor,
        target_id: &str,
        old_password: Option<&str>,
        new_password: &str,
    ) -> DomainResult<()> {
        policy::authorize(
            Some(actor),
            &Action::ChangeUserPassword {
                target_id: target_id.to_string(),
            },
        )?;

        if new_password.len() < 8 {
            return Err(DomainError::Validation(
                "New password must be at least 8 characters".into(),
            ));
        }

        let user = self
            .repo
            .get_user_by_id(target_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".into()))?;

        if policy::requires_old_password(actor, target_id) {
            let Some(old_password) = old_password else {
                return Err(DomainError::Validation(
                    "Current password is required".into(),
                ));
            };
            let valid = verify_password(old_password, &user.password_hash).unwrap_or(false);
            if !valid {
                return Err(DomainError::Validation(
                    "Current password is incorrect".into(),
                ));
            }
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        self.repo.update_password(target_id, &new_hash).await?;

        info!(target_id, "Password changed");
        Ok(())
    }

    pub async fn change_status(
        &self,
        actor: &Actor,
        target_id: &str,
        is_active: bool,
    ) -> DomainResult<()> {
        policy::authorize(
            Some(actor),
            &Action::ChangeUserStatus {
                target_id: target_id.to_string(),
            },
        )?;

        self.repo.update_status(target_id, is_active).await?;

        info!(target_id, is_active, changed_by = %actor.username, "User status changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use super::*;

    struct InMemoryUserRepo {
        users: Mutex<Vec<User>>,
    }

    impl InMemoryUserRepo {
        fn new() -> Self {
            Self {
                users: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl UserRepositoryInterface for InMemoryUserRepo {
        async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == dto.username) {
                return Err(DomainError::conflict("Username already exists", None));
            }
            let now = Utc::now();
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                username: dto.username,
                password_hash: dto.password_hash,
                role: dto.role,
                is_active: true,
                last_login_time: None,
                created_at: now,
                updated_at: now,
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn list_users(&self) -> DomainResult<Vec<User>> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }

        async fn update_profile(
            &self,
            id: &str,
            update: ProfileUpdate,
        ) -> DomainResult<Option<User>> {
            let mut users = self.users.lock().unwrap();
            let Some(user) = users.iter_mut().find(|u| u.id == id) else {
                return Ok(None);
            };
            if let Some(username) = update.username {
                user.username = username;
            }
            if let Some(role) = update.role {
                user.role = role;
            }
            user.updated_at = Utc::now();
            Ok(Some(user.clone()))
        }

        async fn update_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| DomainError::NotFound("User not found".into()))?;
            user.password_hash = new_password_hash.to_string();
            Ok(())
        }

        async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<()> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| DomainError::NotFound("User not found".into()))?;
            user.role = role;
            Ok(())
        }

        async fn update_status(&self, id: &str, is_active: bool) -> DomainResult<()> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| DomainError::NotFound("User not found".into()))?;
            user.is_active = is_active;
            Ok(())
        }

        async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| DomainError::NotFound("User not found".into()))?;
            user.last_login_time = Some(at);
            Ok(())
        }

        async fn delete_user(&self, id: &str) -> DomainResult<()> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| u.id != id);
            if users.len() == before {
                return Err(DomainError::NotFound("User not found".into()));
            }
            Ok(())
        }
    }

    fn test_jwt() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "rfid-asset-service".into(),
        }
    }

    fn service() -> IdentityService<InMemoryUserRepo> {
        IdentityService::new(Arc::new(InMemoryUserRepo::new()), test_jwt())
    }

    async fn seed(
        svc: &IdentityService<InMemoryUserRepo>,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> User {
        svc.repo
            .create_user(CreateUserDto {
                username: username.into(),
                password_hash: hash_password(password).unwrap(),
                role,
            })
            .await
            .unwrap()
    }

    fn actor_for(user: &User) -> Actor {
        Actor {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }

    fn unauthorized_message(err: DomainError) -> String {
        match err {
            DomainError::Unauthorized(m) => m,
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_succeeds_and_touches_last_login() {
        let svc = service();
        let alice = seed(&svc, "alice", "secret123", UserRole::Staff).await;

        let result = svc.login("alice", "secret123").await.unwrap();
        assert!(!result.token.is_empty());
        assert_eq!(result.user.role, UserRole::Staff);

        let stored = svc.repo.get_user_by_id(&alice.id).await.unwrap().unwrap();
        assert!(stored.last_login_time.is_some());
    }

    #[tokio::test]
    async fn login_failure_message_is_uniform() {
        let svc = service();
        seed(&svc, "alice", "secret123", UserRole::Staff).await;

        let wrong_password = unauthorized_message(svc.login("alice", "nope").await.unwrap_err());
        let unknown_user = unauthorized_message(svc.login("bob", "nope").await.unwrap_err());
        assert_eq!(wrong_password, unknown_user);
    }

    #[tokio::test]
    async fn login_rejects_disabled_account() {
        let svc = service();
        let alice = seed(&svc, "alice", "secret123", UserRole::Staff).await;
        svc.repo.update_status(&alice.id, false).await.unwrap();

        assert!(svc.login("alice", "secret123").await.is_err());
    }

    #[tokio::test]
    async fn resolve_token_roundtrip_uses_stored_role() {
        let svc = service();
        let alice = seed(&svc, "alice", "secret123", UserRole::Staff).await;

        let auth = svc.login("alice", "secret123").await.unwrap();
        let actor = svc.resolve_token(&auth.token).await.unwrap();
        assert_eq!(actor.id, alice.id);
        assert_eq!(actor.role, UserRole::Staff);

        // Role changes take effect on the next request, not the next login.
        svc.repo
            .update_role(&alice.id, UserRole::Manager)
            .await
            .unwrap();
        let actor = svc.resolve_token(&auth.token).await.unwrap();
        assert_eq!(actor.role, UserRole::Manager);
    }

    #[tokio::test]
    async fn resolve_token_fails_after_user_deleted() {
        let svc = service();
        let alice = seed(&svc, "alice", "secret123", UserRole::Staff).await;

        let auth = svc.login("alice", "secret123").await.unwrap();
        svc.repo.delete_user(&alice.id).await.unwrap();

        let err = svc.resolve_token(&auth.token).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn resolve_token_rejects_garbage() {
        let svc = service();
        assert!(svc.resolve_token("not-a-token").await.is_err());
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_username() {
        let svc = service();
        let manager = seed(&svc, "mgr", "password1", UserRole::Manager).await;
        let actor = actor_for(&manager);

        svc.create_user(&actor, "bob", "password1", "staff")
            .await
            .unwrap();
        let err = svc
            .create_user(&actor, "bob", "password1", "viewer")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn create_user_role_rules() {
        let svc = service();
        let manager = seed(&svc, "mgr", "password1", UserRole::Manager).await;
        let staff = seed(&svc, "stf", "password1", UserRole::Staff).await;

        // staff cannot create users at all
        assert!(svc
            .create_user(&actor_for(&staff), "x", "password1", "viewer")
            .await
            .is_err());
        // manager cannot mint admins
        assert!(svc
            .create_user(&actor_for(&manager), "x", "password1", "admin")
            .await
            .is_err());
        // invalid role is a validation error
        let err = svc
            .create_user(&actor_for(&manager), "x", "password1", "root")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn change_role_enforces_manager_restrictions() {
        let svc = service();
        let manager = seed(&svc, "mgr", "password1", UserRole::Manager).await;
        let admin = seed(&svc, "adm", "password1", UserRole::Admin).await;
        let staff = seed(&svc, "stf", "password1", UserRole::Staff).await;

        // manager: staff -> viewer ok
        svc.change_role(&actor_for(&manager), &staff.id, "viewer")
            .await
            .unwrap();
        // manager cannot assign admin
        assert!(svc
            .change_role(&actor_for(&manager), &staff.id, "admin")
            .await
            .is_err());
        // admin can
        svc.change_role(&actor_for(&admin), &staff.id, "admin")
            .await
            .unwrap();
        // nobody changes their own role
        let err = svc
            .change_role(&actor_for(&admin), &admin.id, "viewer")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_user_rules() {
        let svc = service();
        let manager = seed(&svc, "mgr", "password1", UserRole::Manager).await;
        let admin = seed(&svc, "adm", "password1", UserRole::Admin).await;
        let staff = seed(&svc, "stf", "password1", UserRole::Staff).await;

        // manager cannot delete an admin
        assert!(svc
            .delete_user(&actor_for(&manager), &admin.id)
            .await
            .is_err());
        // never self
        assert!(svc
            .delete_user(&actor_for(&manager), &manager.id)
            .await
            .is_err());
        // manager deletes staff
        svc.delete_user(&actor_for(&manager), &staff.id)
            .await
            .unwrap();
        assert!(svc.repo.get_user_by_id(&staff.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn change_password_verifies_old_only_for_self() {
        let svc = service();
        let manager = seed(&svc, "mgr", "password1", UserRole::Manager).await;
        let staff = seed(&svc, "stf", "password1", UserRole::Staff).await;

        // self-change with wrong old password fails
        let err = svc
            .change_password(
                &actor_for(&staff),
                &staff.id,
                Some("wrong"),
                "newpassword",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // self-change with correct old password works
        svc.change_password(
            &actor_for(&staff),
            &staff.id,
            Some("password1"),
            "newpassword",
        )
        .await
        .unwrap();

        // manager resets without the old password
        svc.change_password(&actor_for(&manager), &staff.id, None, "resetpassword")
            .await
            .unwrap();

        // viewer cannot touch someone else's password
        let viewer = seed(&svc, "vwr", "password1", UserRole::Viewer).await;
        assert!(svc
            .change_password(&actor_for(&viewer), &staff.id, None, "newpassword")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn change_status_is_admin_only_and_never_self() {
        let svc = service();
        let admin = seed(&svc, "adm", "password1", UserRole::Admin).await;
        let manager = seed(&svc, "mgr", "password1", UserRole::Manager).await;
        let staff = seed(&svc, "stf", "password1", UserRole::Staff).await;

        assert!(svc
            .change_status(&actor_for(&manager), &staff.id, false)
            .await
            .is_err());
        assert!(svc
            .change_status(&actor_for(&admin), &admin.id, false)
            .await
            .is_err());

        svc.change_status(&actor_for(&admin), &staff.id, false)
            .await
            .unwrap();
        let stored = svc.repo.get_user_by_id(&staff.id).await.unwrap().unwrap();
        assert!(!stored.is_active);
    }
}
