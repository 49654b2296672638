use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Machine readable reason carried in a failure `Status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusReason {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    AlreadyExists,
    InternalError,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub reason: StatusReason,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a message, reason and status code
    pub fn new<S: ToString>(message: S, reason: StatusReason, status_code: StatusCode) -> Self {
        Self {
            message: message.to_string(),
            reason,
            status_code,
        }
    }

    /// Create new Internal Server Error (500).
    ///
    /// The message is prefixed the same way for every internal error so the
    /// caller cannot tell which subsystem failed.
    pub fn internal<S: fmt::Display>(detail: S) -> Self {
        Self::new(
            format!("Internal error occurred: {detail}"),
            StatusReason::InternalError,
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }

    /// Create new Bad Request Error (400) with a message
    pub fn bad_request<S: ToString>(message: S) -> Self {
        Self::new(message, StatusReason::BadRequest, StatusCode::BAD_REQUEST)
    }

    /// Create new Unauthorized Error (401) with a message
    pub fn unauthorized<S: ToString>(message: S) -> Self {
        Self::new(message, StatusReason::Unauthorized, StatusCode::UNAUTHORIZED)
    }

    /// Create new Forbidden Error (403) with a message
    pub fn forbidden<S: ToString>(message: S) -> Self {
        Self::new(message, StatusReason::Forbidden, StatusCode::FORBIDDEN)
    }

    /// Create new Not Found Error (404) for a named object
    pub fn not_found(resource: &str, name: &str) -> Self {
        Self::new(
            format!("{resource} \"{name}\" not found"),
            StatusReason::NotFound,
            StatusCode::NOT_FOUND,
        )
    }

    /// Create new Conflict Error (409) for a named object
    pub fn already_exists(resource: &str, name: &str) -> Self {
        Self::new(
            format!("{resource} \"{name}\" already exists"),
            StatusReason::AlreadyExists,
            StatusCode::CONFLICT,
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.message, self.reason)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = json!({
            "kind": "Status",
            "apiVersion": "v1",
            "metadata": {},
            "status": "Failure",
            "message": self.message,
            "reason": self.reason,
            "code": status_code.as_u16(),
        });
        (status_code, Json(body)).into_response()
    }
}
