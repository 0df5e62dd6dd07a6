//! User management handlers
//!
//! Delegates to `IdentityService`; the permission rules (manager+ with the
//! admin-only capability exceptions) live in `domain::policy`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{
    ChangePasswordRequest, ChangeRoleRequest, ChangeStatusRequest, CreateUserRequest, RoleChanged,
    StatusChanged, UpdateUserRequest,
};
use crate::application::IdentityService;
use crate::domain::policy::Actor;
use crate::infrastructure::database::repositories::UserRepository;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::auth::UserDto;

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub identity: Arc<IdentityService<UserRepository>>,
}

#[utoipa::path(
    get,
    path = "/auth/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User list", body = ApiResponse<Vec<UserDto>>),
        (status = 401, description = "Requires manager level")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    actor: Actor,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.identity.list_users(&actor).await?;
    let items: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::list(items)))
}

#[utoipa::path(
    post,
    path = "/auth/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 400, description = "Missing field or invalid role"),
        (status = 401, description = "Requires manager level"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    actor: Actor,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .identity
        .create_user(&actor, &request.username, &request.password, &request.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User created successfully",
            UserDto::from(user),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/auth/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 401, description = "Manager level or self only"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state
        .identity
        .update_user(&actor, &id, request.username, request.role)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "User updated successfully",
        UserDto::from(user),
    )))
}

#[utoipa::path(
    delete,
    path = "/auth/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Requires manager level"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.identity.delete_user(&actor, &id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/auth/users/{id}/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new password"),
        (status = 401, description = "Manager level or self only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn change_password(
    State(state): State<UserHandlerState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .identity
        .change_password(
            &actor,
            &id,
            request.old_password.as_deref(),
            &request.new_password,
        )
        .await?;

    Ok(Json(ApiResponse::message("Password changed successfully")))
}

#[utoipa::path(
    put,
    path = "/auth/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<RoleChanged>),
        (status = 400, description = "Invalid role or own role"),
        (status = 401, description = "Manager level required; admin rules apply"),
        (status = 404, description = "Not found")
    )
)]
pub async fn change_role(
    State(state): State<UserHandlerState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> Result<Json<ApiResponse<RoleChanged>>, ApiError> {
    let new_role = state.identity.change_role(&actor, &id, &request.role).await?;

    Ok(Json(ApiResponse::with_message(
        "User role changed successfully",
        RoleChanged {
            user_id: id,
            new_role: new_role.as_str().to_string(),
        },
    )))
}

#[utoipa::path(
    put,
    path = "/auth/users/{id}/status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<StatusChanged>),
        (status = 401, description = "Admin only, never self"),
        (status = 404, description = "Not found")
    )
)]
pub async fn change_status(
    State(state): State<UserHandlerState>,
    actor: Actor,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangeStatusRequest>,
) -> Result<Json<ApiResponse<StatusChanged>>, ApiError> {
    state
        .identity
        .change_status(&actor, &id, request.is_active)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "User status changed successfully",
        StatusChanged {
            user_id: id,
            is_active: request.is_active,
        },
    )))
}
