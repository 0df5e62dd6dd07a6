//! Authentication handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use super::dto::{LoginRequest, LoginResponse, UserDto};
use crate::application::IdentityService;
use crate::domain::policy::Actor;
use crate::infrastructure::database::repositories::UserRepository;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};

/// Auth handler state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub identity: Arc<IdentityService<UserRepository>>,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = state
        .identity
        .login(&request.username, &request.password)
        .await?;

    let response = LoginResponse {
        token: result.token,
        token_type: result.token_type,
        expires_in: result.expires_in,
        user: UserDto::from(result.user),
    };

    Ok(Json(ApiResponse::with_message("Login successful", response)))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout() -> Json<ApiResponse<()>> {
    // Tokens are stateless; logout is client-side token discard.
    Json(ApiResponse::message("Logout successful"))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AuthHandlerState>,
    actor: Actor,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.identity.current_user(&actor).await?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
