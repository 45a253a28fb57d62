//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lampgrid_domain::error::LampGridError;

/// JSON error body returned by API endpoints.
///
/// `error` is the stable kind slug; `message` names the offending entity
/// or input so callers can pinpoint what failed.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Maps [`LampGridError`] to an HTTP response with appropriate status code.
pub struct ApiError(LampGridError);

impl From<LampGridError> for ApiError {
    fn from(err: LampGridError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LampGridError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            LampGridError::NotFound(_) => StatusCode::NOT_FOUND,
            LampGridError::DeviceUnavailable(_) => StatusCode::CONFLICT,
        };

        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.message(),
        };
        (status, Json(body)).into_response()
    }
}
