//! # AppError
//!
//! Centralized error handling for Rusty-Board.
//! Storage backends speak `anyhow`; everything user-facing maps onto this enum.

use thiserror::Error;

/// The primary error type for board operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., a reply aimed at an unknown thread)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Rejected input. The message is the notice shown to the user.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Infrastructure failure (e.g., rendering, an unreadable image file)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}

/// A specialized Result type for Rusty-Board logic.
pub type Result<T> = std::result::Result<T, AppError>;
