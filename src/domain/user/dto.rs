use super::UserRole;

/// Fields for inserting a new user. The password is already hashed by the
/// identity service; repositories never see plaintext.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub role: Option<UserRole>,
}
