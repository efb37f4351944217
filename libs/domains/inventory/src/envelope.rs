//! Result envelope returned by every product operation
//!
//! Operations never fail across their public boundary. Whatever happens
//! inside, the caller receives `{status, error, data?}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, Serializer};

use crate::error::{InventoryError, InventoryResult};

/// Status codes an envelope can carry
///
/// `Created`, `Forbidden` and `TooManyAttempts` are part of the vocabulary
/// shared with the web client but no product operation produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Created,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    TooManyAttempts,
    InternalServerError,
}

impl Status {
    pub const fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::TooManyAttempts => 429,
            Status::InternalServerError => 500,
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Status::Ok | Status::Created)
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

impl From<Status> for StatusCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Ok => StatusCode::OK,
            Status::Created => StatusCode::CREATED,
            Status::BadRequest => StatusCode::BAD_REQUEST,
            Status::Unauthorized => StatusCode::UNAUTHORIZED,
            Status::Forbidden => StatusCode::FORBIDDEN,
            Status::NotFound => StatusCode::NOT_FOUND,
            Status::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            Status::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: Status::Ok,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(status: Status, error: impl Into<String>) -> Self {
        Self {
            status,
            error: Some(error.into()),
            data: None,
        }
    }

    /// Folds an operation result into an envelope
    ///
    /// Internal failures are logged here and replaced by `fallback`, so
    /// driver messages never reach the caller.
    pub fn from_result(result: InventoryResult<T>, fallback: &str) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::from_error(err, fallback),
        }
    }

    fn from_error(err: InventoryError, fallback: &str) -> Self {
        match err {
            InventoryError::Validation(msg) => Self::failure(Status::BadRequest, msg),
            InventoryError::Unauthorized => Self::failure(Status::Unauthorized, "Unauthorized"),
            InventoryError::NotFound(msg) => Self::failure(Status::NotFound, msg),
            internal @ (InventoryError::Database(_) | InventoryError::Internal(_)) => {
                tracing::error!(error = %internal, "{}", fallback);
                Self::failure(Status::InternalServerError, fallback)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl Envelope<()> {
    /// Success without a payload; `data` is omitted from the JSON
    pub fn done() -> Self {
        Self {
            status: Status::Ok,
            error: None,
            data: None,
        }
    }

    /// Like [`Envelope::from_result`] for operations with nothing to return
    pub fn from_unit(result: InventoryResult<()>, fallback: &str) -> Self {
        match result {
            Ok(()) => Self::done(),
            Err(err) => Self::from_error(err, fallback),
        }
    }
}

/// The HTTP status mirrors the envelope status
impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::from(self.status), Json(self)).into_response()
    }
}
