//! Accounting domain errors

use core_kernel::InvoiceId;
use thiserror::Error;

/// Errors that can occur in the accounting domain
#[derive(Debug, Error)]
pub enum AccountingError {
    /// Invoice not found
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Invalid lifecycle transition
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// The selected invoices failed the merge eligibility checks;
    /// carries the same message surfaced in the wizard
    #[error("Invoices cannot be merged: {0}")]
    NotEligible(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AccountingError {
    pub fn validation(message: impl Into<String>) -> Self {
        AccountingError::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        AccountingError::InvalidStateTransition(message.into())
    }
}
