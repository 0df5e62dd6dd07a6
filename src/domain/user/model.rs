use chrono::{DateTime, Utc};

/// User role, totally ordered: viewer < staff < manager < admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Manager,
    Staff,
    Viewer,
}

impl UserRole {
    /// Numeric permission level used by every hierarchy comparison.
    pub fn level(&self) -> u8 {
        match self {
            UserRole::Viewer => 0,
            UserRole::Staff => 1,
            UserRole::Manager => 2,
            UserRole::Admin => 3,
        }
    }

    /// `true` when this role is at least `required` in the hierarchy.
    pub fn has_level(&self, required: UserRole) -> bool {
        self.level() >= required.level()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Staff => "staff",
            UserRole::Viewer => "viewer",
        }
    }

    /// Strict parse for validation paths; `None` for anything outside the
    /// four known roles.
    pub fn parse(s: &str) -> Option<UserRole> {
        match s {
            "admin" => Some(UserRole::Admin),
            "manager" => Some(UserRole::Manager),
            "staff" => Some(UserRole::Staff),
            "viewer" => Some(UserRole::Viewer),
            _ => None,
        }
    }

    /// Lenient parse for token claims; an unknown role maps to the lowest
    /// level rather than failing the request.
    pub fn from_claim(s: &str) -> UserRole {
        Self::parse(s).unwrap_or(UserRole::Viewer)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Viewer
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain model
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub last_login_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_is_totally_ordered() {
        assert!(UserRole::Admin.has_level(UserRole::Manager));
        assert!(UserRole::Manager.has_level(UserRole::Staff));
        assert!(UserRole::Staff.has_level(UserRole::Viewer));
        assert!(!UserRole::Viewer.has_level(UserRole::Staff));
        assert!(!UserRole::Manager.has_level(UserRole::Admin));
        assert!(UserRole::Staff.has_level(UserRole::Staff));
    }

    #[test]
    fn unknown_claim_role_maps_to_viewer() {
        assert_eq!(UserRole::from_claim("superuser"), UserRole::Viewer);
        assert_eq!(UserRole::from_claim(""), UserRole::Viewer);
        assert_eq!(UserRole::from_claim("manager"), UserRole::Manager);
    }

    #[test]
    fn strict_parse_rejects_unknown_roles() {
        assert!(UserRole::parse("root").is_none());
        assert!(UserRole::parse("Admin").is_none());
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
    }
}
