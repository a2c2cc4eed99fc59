//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{OtpError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// The OTP taxonomy error carried by this error, if any
    pub fn as_otp(&self) -> Option<&OtpError> {
        match self {
            DomainError::Otp(error) => Some(error),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
