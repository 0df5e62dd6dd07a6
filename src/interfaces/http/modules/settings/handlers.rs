//! System settings handlers
//!
//! Settings are a typed document with defaults; updates are validated and
//! echoed without persistence.

use axum::Json;

use super::dto::{SystemSettings, UpdateSettingsRequest};
use crate::domain::policy::{self, Action, Actor};
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::shared::DomainError;

#[utoipa::path(
    get,
    path = "/auth/system/settings",
    tag = "System",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "System settings", body = ApiResponse<SystemSettings>),
        (status = 401, description = "Admin only")
    )
)]
pub async fn get_settings(actor: Actor) -> Result<Json<ApiResponse<SystemSettings>>, ApiError> {
    policy::authorize(Some(&actor), &Action::ViewSystemSettings)?;
    Ok(Json(ApiResponse::success(SystemSettings::default())))
}

#[utoipa::path(
    put,
    path = "/auth/system/settings",
    tag = "System",
    security(("bearer_auth" = [])),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = ApiResponse<SystemSettings>),
        (status = 400, description = "Missing settings body"),
        (status = 401, description = "Admin only")
    )
)]
pub async fn update_settings(
    actor: Actor,
    ValidatedJson(request): ValidatedJson<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<SystemSettings>>, ApiError> {
    policy::authorize(Some(&actor), &Action::UpdateSystemSettings)?;

    let Some(settings) = request.settings else {
        return Err(DomainError::Validation("Please provide the settings to update".into()).into());
    };

    Ok(Json(ApiResponse::with_message(
        "System settings updated successfully",
        settings,
    )))
}
