/// Error types for news-feed-service
///
/// Every failure is scoped to the single requested operation. Units of work
/// that fail before commit are rolled back, so no partial mutation is visible.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for news-feed-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// PostgreSQL SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed input (blank text, non-positive limit, negative offset)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced feed item or comment does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn feed_not_found(id: uuid::Uuid) -> Self {
        AppError::NotFound(format!("Feed not found with id: {}", id))
    }

    pub fn comment_not_found(id: uuid::Uuid) -> Self {
        AppError::NotFound(format!("Comment not found with id: {}", id))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // A dependent row referencing a feed item deleted concurrently
        if let Some(db_err) = err.as_database_error() {
            if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                return AppError::NotFound(format!(
                    "Referenced feed no longer exists: {}",
                    db_err.message()
                ));
            }
        }
        AppError::Database(err)
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Internal(format!("Migration failed: {}", err))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_feed_not_found_message() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            AppError::feed_not_found(id).to_string(),
            format!("Not found: Feed not found with id: {}", id)
        );
    }
}
