//! System settings DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    pub system: SystemSection,
    pub security: SecuritySection,
    pub features: FeatureSection,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            system: SystemSection::default(),
            security: SecuritySection::default(),
            features: FeatureSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSection {
    pub max_users: u32,
    pub session_timeout: u32,
    pub allow_registration: bool,
    pub maintenance_mode: bool,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            max_users: 100,
            session_timeout: 24,
            allow_registration: false,
            maintenance_mode: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SecuritySection {
    pub password_min_length: u32,
    pub require_uppercase: bool,
    pub require_numbers: bool,
    pub session_timeout: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            require_uppercase: true,
            require_numbers: true,
            session_timeout: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureSection {
    pub enable_export: bool,
    pub enable_reports: bool,
    pub enable_user_management: bool,
}

impl Default for FeatureSection {
    fn default() -> Self {
        Self {
            enable_export: true,
            enable_reports: true,
            enable_user_management: true,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsRequest {
    pub settings: Option<SystemSettings>,
}
