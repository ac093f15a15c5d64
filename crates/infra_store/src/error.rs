//! Store errors

use thiserror::Error;

use core_kernel::{JournalId, PurchaseOrderId, SaleOrderId};
use domain_accounting::AccountingError;
use domain_orders::OrderError;

/// Errors surfaced by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Accounting domain error
    #[error(transparent)]
    Accounting(#[from] AccountingError),

    /// Order domain error
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Journal not found
    #[error("Journal not found: {0}")]
    JournalNotFound(JournalId),

    /// Sale order not found
    #[error("Sale order not found: {0}")]
    SaleOrderNotFound(SaleOrderId),

    /// Purchase order not found
    #[error("Purchase order not found: {0}")]
    PurchaseOrderNotFound(PurchaseOrderId),
}
