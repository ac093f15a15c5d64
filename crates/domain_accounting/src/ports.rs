//! Accounting Domain Ports
//!
//! The merge pipeline needs a handful of operations from the platform that
//! owns the records: load invoices, write the survivor back, delete the
//! absorbed documents, post the audit message, and find the draft invoices
//! related to a set of orders. This module defines that port; the
//! in-memory store in `infra_store` is the production adapter.
//!
//! The port is synchronous by design: every merge runs single-threaded
//! inside one ambient unit of work, so adapters hand out plain `&mut`
//! access and errors abort the whole operation.

use core_kernel::{InvoiceId, MessageId};

use crate::error::AccountingError;
use crate::invoice::{Invoice, OrderRef};

/// The operations the merge pipeline requires from the record store
pub trait InvoiceStore {
    /// Loads invoices by id, in the requested order.
    ///
    /// # Errors
    ///
    /// Returns [`AccountingError::InvoiceNotFound`] for the first unknown id.
    fn invoices(&self, ids: &[InvoiceId]) -> Result<Vec<Invoice>, AccountingError>;

    /// Writes an invoice back, replacing the stored document and
    /// recomputing any aggregates that depend on its lines.
    fn update_invoice(&mut self, invoice: Invoice) -> Result<(), AccountingError>;

    /// Deletes invoices. Only drafts can be deleted; their audit messages
    /// go with them.
    fn delete_invoices(&mut self, ids: &[InvoiceId]) -> Result<(), AccountingError>;

    /// Posts a message on an invoice's audit trail.
    fn post_message(&mut self, id: InvoiceId, body: String) -> Result<MessageId, AccountingError>;

    /// Finds all draft invoices with at least one line invoicing any of
    /// the given orders, in creation order.
    fn draft_invoice_ids_for_orders(
        &self,
        orders: &[OrderRef],
    ) -> Result<Vec<InvoiceId>, AccountingError>;
}
