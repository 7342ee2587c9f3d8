use thiserror::Error;

/// Errors surfaced by the payment flow APIs.
///
/// `ValidationError` and `AuthenticityError` carry detail for the logs only. Callers must not echo it back to the
/// gateway, or the difference between the two becomes an oracle for forging callbacks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentFlowError {
    #[error("Invalid callback: {0}")]
    ValidationError(String),
    #[error("Callback signature does not match its payload")]
    AuthenticityError,
    #[error("Not found: {0}")]
    NotFoundError(String),
    #[error("There is nothing to pay for")]
    EmptyOrderError,
    #[error("Could not encode the gateway request: {0}")]
    EncodingError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl PaymentFlowError {
    pub fn database<E: std::error::Error>(e: E) -> Self {
        Self::DatabaseError(e.to_string())
    }
}
