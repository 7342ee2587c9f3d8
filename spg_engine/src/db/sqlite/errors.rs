use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Could not run database migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Stored data could not be converted: {0}")]
    ConversionError(String),
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}
