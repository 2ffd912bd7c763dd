use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Failure body returned to clients. Every error response carries the
/// `success:false` flag alongside a stable code and a human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
}

/// Storage-layer failures. Handlers never see raw `sqlx::Error`; the store
/// implementations convert everything into this enum.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage constraint violated: {0}")]
    Constraint(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str, String),
    NotFound(&'static str, String),
    Store(StoreError),
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::BadRequest("VALIDATION_ERROR", msg.into())
    }

    /// 404 with the `"<Resource> not found"` message shape the admin UI expects.
    pub fn not_found(resource: &str) -> Self {
        ApiError::NotFound("NOT_FOUND", format!("{resource} not found"))
    }

    fn to_error_response(code: &str, message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            success: false,
            code: code.to_string(),
            message: message.to_string(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(code, msg) => {
                (StatusCode::BAD_REQUEST, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::NotFound(code, msg) => {
                (StatusCode::NOT_FOUND, ApiError::to_error_response(code, &msg)).into_response()
            }
            // Persistence failures are logged in full server-side; the client
            // only gets a generic body, never driver internals.
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::to_error_response("STORE_ERROR", "storage unavailable"),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::to_error_response("INTERNAL", "internal server error"),
                )
                    .into_response()
            }
        }
    }
}
