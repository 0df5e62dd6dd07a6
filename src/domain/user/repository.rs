use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CreateUserDto, ProfileUpdate, User, UserRole};
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    async fn update_profile(&self, id: &str, update: ProfileUpdate) -> DomainResult<Option<User>>;
    async fn update_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()>;
    async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<()>;
    async fn update_status(&self, id: &str, is_active: bool) -> DomainResult<()>;
    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;

    async fn delete_user(&self, id: &str) -> DomainResult<()>;
}
