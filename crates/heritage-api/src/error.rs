use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use heritage_core::error::HeritageError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

impl From<HeritageError> for ApiError {
    fn from(err: HeritageError) -> Self {
        let base = match &err {
            HeritageError::InvalidParameter { .. } => Self::bad_request("Invalid parameter"),
            HeritageError::InvalidGeometry { .. } => Self::bad_request("Invalid geometry"),
            HeritageError::NotFound { kind, .. } => Self::not_found(format!("{} not found", kind)),
            HeritageError::GeometryOutOfRange { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Geometry out of range")
            }
            HeritageError::DeadlineExceeded { .. } | HeritageError::Cancelled => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "Query aborted")
            }
            _ => {
                tracing::error!(error = %err, "Request failed");
                Self::internal("Internal error")
            }
        };
        base.with_details(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Invalid query parameters").with_details(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body").with_details(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request("Invalid path parameter").with_details(rejection.body_text())
    }
}
