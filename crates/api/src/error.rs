//! API error types with HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use domain::{ErrorKind, Response, UnknownStatus};

/// API-level error type that maps to HTTP responses.
///
/// The body is always a failed [`Response`] envelope so clients see the same
/// shape whether a request was rejected by the router or by the store.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be interpreted.
    #[error("{0}")]
    BadRequest(String),

    /// The store rejected the operation.
    #[error("{message}")]
    Rejected { kind: ErrorKind, message: String },
}

impl ApiError {
    /// Converts a failed store response into an error.
    pub fn rejected<T>(response: Response<T>) -> Self {
        ApiError::Rejected {
            kind: response.kind().unwrap_or(ErrorKind::Validation),
            message: response.message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) => ErrorKind::Validation,
            ApiError::Rejected { kind, .. } => *kind,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }
}

/// HTTP status for a failure of the given kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        tracing::debug!(%status, error = %self, "request rejected");

        let body = Response::<()>::failure(self.kind(), self.to_string());
        (status, Json(body)).into_response()
    }
}

impl From<UnknownStatus> for ApiError {
    fn from(err: UnknownStatus) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Turns a store response into a handler result.
pub fn into_result<T>(response: Response<T>) -> Result<Json<Response<T>>, ApiError> {
    if response.successful {
        Ok(Json(response))
    } else {
        Err(ApiError::rejected(response))
    }
}
