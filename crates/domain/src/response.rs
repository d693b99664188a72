//! Uniform result envelope returned by every store operation.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, OrderError};

/// Separator used when several messages are reported at once.
pub const MESSAGE_SEPARATOR: &str = "; ";

/// Success or failure of a store operation, with an optional payload.
///
/// Failures never carry data and always carry a non-empty message and an
/// [`ErrorKind`]. Successes normally have an empty message, but may carry an
/// informational one (skipped items, empty pages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub data: Option<T>,
    pub successful: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T> Response<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            successful: true,
            message: String::new(),
            error_kind: None,
        }
    }

    /// Successful response carrying `data` and an informational message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            successful: true,
            message: message.into(),
            error_kind: None,
        }
    }

    /// Failed response with no payload.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            data: None,
            successful: false,
            message: message.into(),
            error_kind: Some(kind),
        }
    }

    /// Failed response describing a single error.
    pub fn from_error(error: OrderError) -> Self {
        Self::failure(error.kind(), error.to_string())
    }

    /// Failed response describing every error in `errors`.
    ///
    /// The kind is taken from the first error. Returns `None` when `errors`
    /// is empty so callers can write `if let Some(rejection) = ...`.
    pub fn from_errors(errors: Vec<OrderError>) -> Option<Self> {
        let kind = errors.first()?.kind();
        Some(Self::failure(kind, join_messages(&errors)))
    }

    /// Returns the error kind when this response is a failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    /// Transforms the payload, keeping flag, message and kind.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            data: self.data.map(f),
            successful: self.successful,
            message: self.message,
            error_kind: self.error_kind,
        }
    }
}

/// Joins the display text of every error into one message.
pub(crate) fn join_messages(errors: &[OrderError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}
