use thiserror::Error;

/// Failure inside a product operation
///
/// Every variant maps onto one envelope status; see
/// [`Envelope::from_result`](crate::envelope::Envelope::from_result).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Missing or malformed input, reported to the caller verbatim
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Unknown id, or a record owned by someone else
    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Stored data that cannot be interpreted, or gateway misuse
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<mongodb::error::Error> for InventoryError {
    fn from(err: mongodb::error::Error) -> Self {
        InventoryError::Database(err.to_string())
    }
}

impl InventoryError {
    /// `true` for failures the caller could not have caused
    pub fn is_internal(&self) -> bool {
        matches!(self, InventoryError::Database(_) | InventoryError::Internal(_))
    }
}
