use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use log::*;
use spg_engine::PaymentFlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("There is nothing in the cart to pay for.")]
    EmptyCart,
    /// Deliberately vague. Whether the signature or the payload was at fault is only logged.
    #[error("Invalid callback.")]
    InvalidCallback,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::EmptyCart => StatusCode::BAD_REQUEST,
            Self::InvalidCallback => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<PaymentFlowError> for ServerError {
    fn from(e: PaymentFlowError) -> Self {
        match e {
            PaymentFlowError::ValidationError(msg) => {
                warn!("💻️ Rejected callback: {msg}");
                Self::InvalidCallback
            },
            PaymentFlowError::AuthenticityError => {
                warn!("🚨️ Rejected callback with a signature that does not match its payload");
                Self::InvalidCallback
            },
            PaymentFlowError::NotFoundError(msg) => Self::NoRecordFound(msg),
            PaymentFlowError::EmptyOrderError => Self::EmptyCart,
            PaymentFlowError::EncodingError(msg) => Self::BackendError(msg),
            PaymentFlowError::DatabaseError(msg) => Self::BackendError(format!("Database error: {msg}")),
        }
    }
}
