//! Order domain errors

use core_kernel::ProductId;
use thiserror::Error;

/// Errors that can occur in the order domain
#[derive(Debug, Error)]
pub enum OrderError {
    /// Product not found in the catalog
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Invalid lifecycle transition
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// No line has anything left to invoice
    #[error("Nothing to invoice: {0}")]
    NothingToInvoice(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl OrderError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        OrderError::InvalidStateTransition(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        OrderError::Validation(message.into())
    }
}
