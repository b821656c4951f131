use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use issuer_console_core::dashboard::DashboardError;
use issuer_console_core::errors::{DatabaseError, Error as CoreError};
use issuer_console_core::identity::AuthError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

fn auth_status(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::Unauthenticated | AuthError::MissingEnterprise(_) => {
            (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
        }
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
        AuthError::EmailTaken => (StatusCode::CONFLICT, err.to_string()),
        AuthError::Forbidden(reason) => (StatusCode::FORBIDDEN, reason.clone()),
        AuthError::Store(_) => {
            error!("Identity resolution failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                CoreError::Dashboard(DashboardError::InvalidRange { .. }) => {
                    (StatusCode::BAD_REQUEST, "Invalid date range".to_string())
                }
                CoreError::NotFound(what) => (StatusCode::NOT_FOUND, what.clone()),
                CoreError::Database(DatabaseError::NotFound(_)) => {
                    (StatusCode::NOT_FOUND, "Not found".to_string())
                }
                CoreError::Auth(auth) => auth_status(auth),
                _ => {
                    error!("Request failed: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
            ApiError::Auth(auth) => auth_status(auth),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason.clone()),
            ApiError::Internal(reason) => (StatusCode::INTERNAL_SERVER_ERROR, reason.clone()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
