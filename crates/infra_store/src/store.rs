//! The in-memory record store
//!
//! [`ErpStore`] owns every record the system works on: creation, lookup,
//! update and deletion of invoices, the per-invoice audit-message log,
//! document numbering on posting, and the recomputation of invoiced
//! quantities on order lines after every invoice mutation.
//!
//! Invoices and orders are kept in insertion-ordered maps, so "first by
//! creation" is well-defined for merge survivor selection and searches
//! return records in creation order.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{
    InvoiceId, JournalId, MessageId, ProductId, PurchaseOrderId, PurchaseOrderLineId,
    SaleOrderId, SaleOrderLineId,
};
use domain_accounting::invoice::{Invoice, OrderLineRef, OrderRef};
use domain_accounting::journal::Journal;
use domain_accounting::merge::{merge_order_invoices, MergeOptions, MergeOutcome};
use domain_accounting::ports::InvoiceStore;
use domain_accounting::AccountingError;
use domain_orders::invoicing::{draft_invoice_for_purchase_order, draft_invoice_for_sale_order};
use domain_orders::product::{Product, ProductCatalog};
use domain_orders::purchase::PurchaseOrder;
use domain_orders::sale::SaleOrder;

use crate::error::StoreError;

/// An entry on an invoice's audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier
    pub id: MessageId,
    /// Message body (HTML fragment)
    pub body: String,
    /// When the message was posted
    pub posted_at: DateTime<Utc>,
}

/// The in-memory record platform
#[derive(Debug, Default)]
pub struct ErpStore {
    pub(crate) journals: IndexMap<JournalId, Journal>,
    pub(crate) products: HashMap<ProductId, Product>,
    pub(crate) invoices: IndexMap<InvoiceId, Invoice>,
    pub(crate) sale_orders: IndexMap<SaleOrderId, SaleOrder>,
    pub(crate) purchase_orders: IndexMap<PurchaseOrderId, PurchaseOrder>,
    pub(crate) messages: HashMap<InvoiceId, Vec<Message>>,
    pub(crate) sequences: HashMap<JournalId, u64>,
}

impl ErpStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Master data
    // ========================================================================

    /// Registers a journal
    pub fn add_journal(&mut self, journal: Journal) -> JournalId {
        let id = journal.id;
        self.journals.insert(id, journal);
        id
    }

    /// Looks a journal up
    pub fn journal(&self, id: JournalId) -> Result<&Journal, StoreError> {
        self.journals.get(&id).ok_or(StoreError::JournalNotFound(id))
    }

    /// Registers a product
    pub fn add_product(&mut self, product: Product) -> ProductId {
        let id = product.id;
        self.products.insert(id, product);
        id
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Registers a sale order
    pub fn add_sale_order(&mut self, order: SaleOrder) -> SaleOrderId {
        let id = order.id;
        self.sale_orders.insert(id, order);
        id
    }

    /// Looks a sale order up
    pub fn sale_order(&self, id: SaleOrderId) -> Result<&SaleOrder, StoreError> {
        self.sale_orders.get(&id).ok_or(StoreError::SaleOrderNotFound(id))
    }

    /// Mutable access to a sale order (confirmation, delivery updates)
    pub fn sale_order_mut(&mut self, id: SaleOrderId) -> Result<&mut SaleOrder, StoreError> {
        self.sale_orders
            .get_mut(&id)
            .ok_or(StoreError::SaleOrderNotFound(id))
    }

    /// Registers a purchase order
    pub fn add_purchase_order(&mut self, order: PurchaseOrder) -> PurchaseOrderId {
        let id = order.id;
        self.purchase_orders.insert(id, order);
        id
    }

    /// Looks a purchase order up
    pub fn purchase_order(&self, id: PurchaseOrderId) -> Result<&PurchaseOrder, StoreError> {
        self.purchase_orders
            .get(&id)
            .ok_or(StoreError::PurchaseOrderNotFound(id))
    }

    /// Mutable access to a purchase order (confirmation, receipt updates)
    pub fn purchase_order_mut(
        &mut self,
        id: PurchaseOrderId,
    ) -> Result<&mut PurchaseOrder, StoreError> {
        self.purchase_orders
            .get_mut(&id)
            .ok_or(StoreError::PurchaseOrderNotFound(id))
    }

    // ========================================================================
    // Invoices
    // ========================================================================

    /// Inserts a draft invoice and recomputes the invoiced quantities of
    /// the order lines it references
    pub fn create_invoice(&mut self, invoice: Invoice) -> InvoiceId {
        let id = invoice.id;
        let refs = invoice.order_line_refs();
        debug!(invoice = %id, lines = invoice.lines.len(), "created invoice");
        self.invoices.insert(id, invoice);
        self.recompute_invoiced_quantities(&refs);
        id
    }

    /// Looks an invoice up
    pub fn invoice(&self, id: InvoiceId) -> Result<&Invoice, StoreError> {
        self.invoices
            .get(&id)
            .ok_or_else(|| StoreError::Accounting(AccountingError::InvoiceNotFound(id)))
    }

    /// All invoice ids, in creation order
    pub fn invoice_ids(&self) -> Vec<InvoiceId> {
        self.invoices.keys().copied().collect()
    }

    /// Number of invoices currently stored
    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }

    /// Posts an invoice, assigning a document number from the journal's
    /// sequence when none is set yet
    pub fn post_invoice(&mut self, id: InvoiceId) -> Result<(), StoreError> {
        let (journal_id, needs_number) = {
            let invoice = self
                .invoices
                .get_mut(&id)
                .ok_or(AccountingError::InvoiceNotFound(id))?;
            invoice.post()?;
            (invoice.journal_id, invoice.name.is_none())
        };
        if needs_number {
            let journal = self
                .journals
                .get(&journal_id)
                .ok_or(StoreError::JournalNotFound(journal_id))?;
            let next = self.sequences.get(&journal_id).copied().unwrap_or(0) + 1;
            let name = journal.format_number(next);
            self.sequences.insert(journal_id, next);
            info!(invoice = %id, number = %name, "posted invoice");
            if let Some(invoice) = self.invoices.get_mut(&id) {
                invoice.name = Some(name);
            }
        }
        Ok(())
    }

    /// Cancels an invoice; its lines stop counting towards invoiced
    /// quantities
    pub fn cancel_invoice(&mut self, id: InvoiceId) -> Result<(), StoreError> {
        let refs = {
            let invoice = self
                .invoices
                .get_mut(&id)
                .ok_or(AccountingError::InvoiceNotFound(id))?;
            invoice.cancel()?;
            invoice.order_line_refs()
        };
        self.recompute_invoiced_quantities(&refs);
        Ok(())
    }

    /// Audit trail of an invoice, oldest first
    pub fn messages(&self, id: InvoiceId) -> &[Message] {
        self.messages.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    // ========================================================================
    // Order invoicing
    // ========================================================================

    /// Creates a draft customer invoice for a confirmed sale order
    pub fn invoice_sale_order(
        &mut self,
        order_id: SaleOrderId,
        journal_id: JournalId,
    ) -> Result<InvoiceId, StoreError> {
        let invoice = {
            let order = self
                .sale_orders
                .get(&order_id)
                .ok_or(StoreError::SaleOrderNotFound(order_id))?;
            let journal = self
                .journals
                .get(&journal_id)
                .ok_or(StoreError::JournalNotFound(journal_id))?;
            draft_invoice_for_sale_order(order, journal, &self.products)?
        };
        Ok(self.create_invoice(invoice))
    }

    /// Creates a draft vendor bill for a confirmed purchase order
    pub fn invoice_purchase_order(
        &mut self,
        order_id: PurchaseOrderId,
        journal_id: JournalId,
    ) -> Result<InvoiceId, StoreError> {
        let invoice = {
            let order = self
                .purchase_orders
                .get(&order_id)
                .ok_or(StoreError::PurchaseOrderNotFound(order_id))?;
            let journal = self
                .journals
                .get(&journal_id)
                .ok_or(StoreError::JournalNotFound(journal_id))?;
            draft_invoice_for_purchase_order(order, journal, &self.products)?
        };
        Ok(self.create_invoice(invoice))
    }

    /// Post-invoicing callback: merges all draft invoices related to the
    /// given orders and returns the survivor map
    pub fn auto_merge_draft_invoices(
        &mut self,
        orders: &[OrderRef],
        options: &MergeOptions,
    ) -> Result<MergeOutcome, StoreError> {
        Ok(merge_order_invoices(self, orders, options)?)
    }
}

impl ProductCatalog for ErpStore {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }
}

impl InvoiceStore for ErpStore {
    fn invoices(&self, ids: &[InvoiceId]) -> Result<Vec<Invoice>, AccountingError> {
        ids.iter()
            .map(|id| {
                self.invoices
                    .get(id)
                    .cloned()
                    .ok_or(AccountingError::InvoiceNotFound(*id))
            })
            .collect()
    }

    fn update_invoice(&mut self, invoice: Invoice) -> Result<(), AccountingError> {
        let id = invoice.id;
        let old = self
            .invoices
            .get(&id)
            .ok_or(AccountingError::InvoiceNotFound(id))?;
        let mut refs: BTreeSet<OrderLineRef> = old.order_line_refs();
        refs.extend(invoice.order_line_refs());
        debug!(invoice = %id, lines = invoice.lines.len(), "updated invoice");
        self.invoices.insert(id, invoice);
        self.recompute_invoiced_quantities(&refs);
        Ok(())
    }

    fn delete_invoices(&mut self, ids: &[InvoiceId]) -> Result<(), AccountingError> {
        let mut refs: BTreeSet<OrderLineRef> = BTreeSet::new();
        for id in ids {
            let invoice = self
                .invoices
                .get(id)
                .ok_or(AccountingError::InvoiceNotFound(*id))?;
            if !invoice.is_draft() {
                return Err(AccountingError::invalid_state(format!(
                    "only draft invoices can be deleted, {} is {:?}",
                    id, invoice.state
                )));
            }
            refs.extend(invoice.order_line_refs());
        }
        for id in ids {
            self.invoices.shift_remove(id);
            self.messages.remove(id);
        }
        debug!(count = ids.len(), "deleted invoices");
        self.recompute_invoiced_quantities(&refs);
        Ok(())
    }

    fn post_message(&mut self, id: InvoiceId, body: String) -> Result<MessageId, AccountingError> {
        if !self.invoices.contains_key(&id) {
            return Err(AccountingError::InvoiceNotFound(id));
        }
        let message = Message {
            id: MessageId::new_v7(),
            body,
            posted_at: Utc::now(),
        };
        let message_id = message.id;
        self.messages.entry(id).or_default().push(message);
        Ok(message_id)
    }

    fn draft_invoice_ids_for_orders(
        &self,
        orders: &[OrderRef],
    ) -> Result<Vec<InvoiceId>, AccountingError> {
        let mut sale_lines: BTreeSet<SaleOrderLineId> = BTreeSet::new();
        let mut purchase_lines: BTreeSet<PurchaseOrderLineId> = BTreeSet::new();
        for order in orders {
            match order {
                OrderRef::Sale(id) => {
                    if let Some(order) = self.sale_orders.get(id) {
                        sale_lines.extend(order.lines.iter().map(|line| line.id));
                    }
                }
                OrderRef::Purchase(id) => {
                    if let Some(order) = self.purchase_orders.get(id) {
                        purchase_lines.extend(order.lines.iter().map(|line| line.id));
                    }
                }
            }
        }
        Ok(self
            .invoices
            .values()
            .filter(|invoice| {
                invoice.is_draft()
                    && invoice.lines.iter().any(|line| {
                        line.sale_line_ids.iter().any(|id| sale_lines.contains(id))
                            || line
                                .purchase_line_ids
                                .iter()
                                .any(|id| purchase_lines.contains(id))
                    })
            })
            .map(|invoice| invoice.id)
            .collect())
    }
}
