//! API Router with Swagger UI

use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::middleware::AuthState;
use super::modules::{assets, auth, health, settings, users};
use crate::application::{AssetService, IdentityService};
use crate::infrastructure::database::repositories::{AssetRepository, UserRepository};

/// Unified application state. Axum hands each handler its specific state
/// via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub assets: Arc<AssetService<AssetRepository>>,
    pub identity: Arc<IdentityService<UserRepository>>,
    pub db: DatabaseConnection,
}

impl FromRef<AppState> for assets::AssetHandlerState {
    fn from_ref(s: &AppState) -> Self {
        assets::AssetHandlerState {
            service: Arc::clone(&s.assets),
        }
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            identity: Arc::clone(&s.identity),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            identity: Arc::clone(&s.identity),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState { db: s.db.clone() }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            identity: Arc::clone(&s.identity),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Users
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::change_password,
        users::change_role,
        users::change_status,
        // Settings
        settings::get_settings,
        settings::update_settings,
        // Assets
        assets::list_assets,
        assets::search_assets,
        assets::check_epc,
        assets::get_asset_by_id,
        assets::get_asset_by_tag,
        assets::create_asset,
        assets::check_in_asset,
        assets::bulk_check_in,
        assets::delete_asset,
        assets::delete_all_assets,
        assets::export_assets,
    ),
    components(
        schemas(
            // Common
            crate::interfaces::http::common::ApiResponse<String>,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserDto,
            // Users
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::ChangePasswordRequest,
            users::ChangeRoleRequest,
            users::ChangeStatusRequest,
            users::RoleChanged,
            users::StatusChanged,
            // Settings
            settings::SystemSettings,
            settings::SystemSection,
            settings::SecuritySection,
            settings::FeatureSection,
            settings::UpdateSettingsRequest,
            // Assets
            assets::AssetDto,
            assets::CreateAssetRequest,
            assets::AssetCreated,
            assets::CheckInRequest,
            assets::BulkCheckInRequest,
            assets::CheckInResponse,
            assets::BulkCheckInResponse,
            assets::AssetDeleted,
            assets::AllAssetsDeleted,
            assets::CheckEpcResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Login (JWT), logout, current user"),
        (name = "Users", description = "User management: CRUD, password, role, status"),
        (name = "System", description = "Admin-only system settings"),
        (name = "Assets", description = "RFID asset CRUD, check-in, export"),
    ),
    info(
        title = "RFID Asset Service API",
        version = "1.0.0",
        description = "REST API for tracking RFID-tagged physical assets with role-based access control",
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger)
        .route("/", get(root_index))
        .route("/health", get(health::health_check))
        .nest("/assets", asset_routes())
        .nest("/auth", auth_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn asset_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assets::list_assets).post(assets::create_asset),
        )
        .route("/search", get(assets::search_assets))
        .route("/check-epc", get(assets::check_epc))
        .route("/export", get(assets::export_assets))
        .route("/id/{id}", get(assets::get_asset_by_id))
        .route("/all", delete(assets::delete_all_assets))
        .route("/bulk/status/checked", put(assets::bulk_check_in))
        .route(
            "/{tag_id}",
            get(assets::get_asset_by_tag).delete(assets::delete_asset),
        )
        .route("/{tag_id}/status/checked", put(assets::check_in_asset))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/users/{id}/password", put(users::change_password))
        .route("/users/{id}/role", put(users::change_role))
        .route("/users/{id}/status", put(users::change_status))
        .route(
            "/system/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
}

async fn root_index() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "RFID Asset Service",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "assets": "/assets (public reads; create/check-in/delete/export per role)",
                "search": "/assets/search?category=&status=&currentLocation=&zone=",
                "checkEpc": "/assets/check-epc?epc=",
                "export": "/assets/export?format=json|csv (staff+)",
                "auth": "/auth/login, /auth/logout, /auth/me",
                "users": "/auth/users (manager+)",
                "settings": "/auth/system/settings (admin)",
                "health": "/health",
                "docs": "/docs"
            }
        }
    }))
}
