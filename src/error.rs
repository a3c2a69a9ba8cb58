//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

/// Failure at the repository boundary. Handlers branch on the variant, never on the message.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The targeted row does not exist (or vanished between probe and mutation).
    #[error("row not found")]
    NotFound,
    /// The write was rejected by a foreign-key constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("database: {0}")]
    Other(sqlx::Error),
    /// Preparing the database before serving failed.
    #[error("database bootstrap failed at {step}: {source}")]
    Bootstrap {
        step: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StorageError {
    /// `map_err` adapter tagging a bootstrap failure with the step that raised it.
    pub fn bootstrap(step: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
        move |source| StorageError::Bootstrap { step, source }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                let constraint = db.constraint().unwrap_or("foreign key").to_string();
                StorageError::ConstraintViolation(constraint)
            }
            other => StorageError::Other(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Formato de ID inválido.")]
    InvalidId,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Carries the client-facing message only; details are logged where the error is raised.
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidId => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            StorageError::from(sqlx::Error::RowNotFound),
            StorageError::NotFound
        ));
    }

    #[test]
    fn pool_errors_stay_unclassified() {
        assert!(matches!(
            StorageError::from(sqlx::Error::PoolTimedOut),
            StorageError::Other(_)
        ));
    }

    #[test]
    fn bootstrap_failures_name_their_step() {
        let err = StorageError::bootstrap("migration lock")(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StorageError::Bootstrap { step: "migration lock", .. }));
        assert!(err.to_string().starts_with("database bootstrap failed at migration lock"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn status_codes() {
        assert_eq!(AppError::InvalidId.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
