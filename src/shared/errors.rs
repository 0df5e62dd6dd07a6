use thiserror::Error;

/// Domain-level error taxonomy.
///
/// Every variant maps to exactly one HTTP status at the response boundary
/// (`interfaces::http::common::ApiError`); services and repositories never
/// touch status codes themselves.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing input (400).
    #[error("{0}")]
    Validation(String),

    /// Authentication or permission failure (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Record does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (409). `existing_id` links the conflicting record
    /// when the pre-check discovered it; the UNIQUE constraint path cannot.
    #[error("{message}")]
    Conflict {
        message: String,
        existing_id: Option<String>,
    },

    /// Infrastructure failure (500). Wrapped driver errors are logged at the
    /// boundary and never shown to clients.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn conflict(message: impl Into<String>, existing_id: Option<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            existing_id,
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
