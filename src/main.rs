//!
//! RFID asset tracking REST API server.
//! Reads configuration from TOML file (~/.config/rfid-asset-service/config.toml).

use std::path::PathBuf;
use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use rfid_assets::application::{AssetService, IdentityService};
use rfid_assets::config::AppConfig;
use rfid_assets::infrastructure::crypto::jwt::JwtConfig;
use rfid_assets::infrastructure::database::migrator::Migrator;
use rfid_assets::infrastructure::database::repositories::{AssetRepository, UserRepository};
use rfid_assets::{create_api_router, default_config_path, init_database, AppState, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("ASSET_SERVICE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::from_env();
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            warn!(
                "No config file at {} ({}). Using defaults with env overrides.",
                config_path.display(),
                e
            );
            cfg
        }
    };

    info!("Starting RFID Asset Service...");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
        max_connections: app_cfg.database.max_connections,
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "rfid-asset-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = init_database(&db_config).await?;

    // A database that is down at startup is not fatal: the pool connects
    // lazily and requests fail until connectivity recovers.
    if let Err(e) = Migrator::up(&db, None).await {
        error!(
            "Failed to run migrations: {}. Continuing; requests will fail until the database is reachable.",
            e
        );
    } else {
        info!("Migrations completed");
        create_default_admin(&db, &app_cfg).await;
    }

    // ── Services and router ────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db.clone()));
    let asset_repo = Arc::new(AssetRepository::new(db.clone()));

    let identity = Arc::new(IdentityService::new(user_repo, jwt_config));
    let assets = Arc::new(AssetService::new(asset_repo));

    let state = AppState {
        assets,
        identity,
        db: db.clone(),
    };
    let app = create_api_router(state);

    // ── Serve ──────────────────────────────────────────────────
    let addr = app_cfg.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }

    info!("RFID Asset Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Create the configured admin account when the users table is empty.
async fn create_default_admin(db: &sea_orm::DatabaseConnection, app_cfg: &AppConfig) {
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    use rfid_assets::infrastructure::crypto::password::hash_password;
    use rfid_assets::infrastructure::database::entities::user::{self, UserRole};

    let users_count = user::Entity::find().count(db).await.unwrap_or(0);
    if users_count > 0 {
        return;
    }

    info!("Creating default admin user...");

    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let now = chrono::Utc::now();
    let admin = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        username: Set(app_cfg.admin.username.clone()),
        password_hash: Set(password_hash),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        last_login_time: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    match admin.insert(db).await {
        Ok(_) => {
            info!("Default admin created: {}", app_cfg.admin.username);
            warn!("Please change the admin password immediately!");
        }
        Err(e) => {
            error!("Failed to create admin user: {}", e);
        }
    }
}
