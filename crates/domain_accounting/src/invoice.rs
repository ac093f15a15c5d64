//! Invoice documents
//!
//! This module defines the accounting document model: invoice headers with a
//! draft/posted/cancelled lifecycle and their line items. Lines optionally
//! carry back-references to the sale or purchase order lines they invoice;
//! those references drive the invoiced-quantity aggregation on the
//! originating orders and must survive merges intact.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AccountId, CompanyId, Currency, FiscalPositionId, InvoiceId, InvoiceLineId, JournalId,
    Money, PartnerId, PaymentTermId, ProductId, PurchaseOrderId, PurchaseOrderLineId,
    SaleOrderId, SaleOrderLineId, TaxId,
};

use crate::error::AccountingError;
use crate::journal::JournalType;

/// Invoice document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    /// Customer invoice
    OutInvoice,
    /// Vendor bill
    InInvoice,
    /// Customer credit note
    OutRefund,
    /// Vendor refund
    InRefund,
}

impl MoveType {
    /// The journal flow this document type belongs to
    pub fn journal_type(&self) -> JournalType {
        match self {
            MoveType::OutInvoice | MoveType::OutRefund => JournalType::Sale,
            MoveType::InInvoice | MoveType::InRefund => JournalType::Purchase,
        }
    }

    /// Sign applied when aggregating invoiced quantities on order lines:
    /// refunds reduce what has been invoiced.
    pub fn quantity_sign(&self) -> Decimal {
        match self {
            MoveType::OutInvoice | MoveType::InInvoice => Decimal::ONE,
            MoveType::OutRefund | MoveType::InRefund => Decimal::NEGATIVE_ONE,
        }
    }

    /// True for refund document types
    pub fn is_refund(&self) -> bool {
        matches!(self, MoveType::OutRefund | MoveType::InRefund)
    }
}

/// Invoice lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceState {
    /// Editable, not yet part of the books
    Draft,
    /// Posted to the books
    Posted,
    /// Cancelled
    Cancelled,
}

/// Reference from an invoice line back to the order line it invoices
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderLineRef {
    Sale(SaleOrderLineId),
    Purchase(PurchaseOrderLineId),
}

/// Reference to an originating order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderRef {
    Sale(SaleOrderId),
    Purchase(PurchaseOrderId),
}

/// A line item on an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Unique identifier
    pub id: InvoiceLineId,
    /// Invoiced product, if any
    pub product_id: Option<ProductId>,
    /// Line description
    pub label: String,
    /// Ledger account the line books to
    pub account_id: AccountId,
    /// Taxes applied to the line
    pub tax_ids: Vec<TaxId>,
    /// Quantity
    pub quantity: Decimal,
    /// Unit price
    pub price_unit: Money,
    /// Sale order lines this line invoices
    pub sale_line_ids: Vec<SaleOrderLineId>,
    /// Purchase order lines this line invoices
    pub purchase_line_ids: Vec<PurchaseOrderLineId>,
}

impl InvoiceLine {
    /// Creates a new line
    pub fn new(
        label: impl Into<String>,
        account_id: AccountId,
        quantity: Decimal,
        price_unit: Money,
    ) -> Self {
        Self {
            id: InvoiceLineId::new_v7(),
            product_id: None,
            label: label.into(),
            account_id,
            tax_ids: Vec::new(),
            quantity,
            price_unit,
            sale_line_ids: Vec::new(),
            purchase_line_ids: Vec::new(),
        }
    }

    /// Sets the product
    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Sets the taxes
    pub fn with_taxes(mut self, tax_ids: Vec<TaxId>) -> Self {
        self.tax_ids = tax_ids;
        self
    }

    /// Links the line to a sale order line
    pub fn with_sale_line(mut self, id: SaleOrderLineId) -> Self {
        self.sale_line_ids.push(id);
        self
    }

    /// Links the line to a purchase order line
    pub fn with_purchase_line(mut self, id: PurchaseOrderLineId) -> Self {
        self.purchase_line_ids.push(id);
        self
    }

    /// The line subtotal (quantity x unit price)
    pub fn subtotal(&self) -> Money {
        self.price_unit * self.quantity
    }

    /// All order-line back-references carried by this line
    pub fn order_line_refs(&self) -> impl Iterator<Item = OrderLineRef> + '_ {
        self.sale_line_ids
            .iter()
            .copied()
            .map(OrderLineRef::Sale)
            .chain(
                self.purchase_line_ids
                    .iter()
                    .copied()
                    .map(OrderLineRef::Purchase),
            )
    }
}

/// An invoice document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Document type
    pub move_type: MoveType,
    /// Lifecycle state
    pub state: InvoiceState,
    /// Invoiced partner
    pub partner_id: PartnerId,
    /// Owning company
    pub company_id: CompanyId,
    /// Journal the document belongs to
    pub journal_id: JournalId,
    /// Document currency
    pub currency: Currency,
    /// Fiscal position applied, if any
    pub fiscal_position_id: Option<FiscalPositionId>,
    /// Payment terms, if any
    pub payment_term_id: Option<PaymentTermId>,
    /// Document number, assigned on posting
    pub name: Option<String>,
    /// Partner reference / memo
    pub reference: Option<String>,
    /// Free-form terms and conditions
    pub narration: Option<String>,
    /// Invoice date
    pub invoice_date: Option<NaiveDate>,
    /// Line items
    pub lines: Vec<InvoiceLine>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Model key for this document type, used by the wizard context check
    /// and the audit identifier fallback.
    pub const MODEL: &'static str = "account.invoice";

    /// Creates a new draft invoice
    pub fn new(
        move_type: MoveType,
        partner_id: PartnerId,
        journal_id: JournalId,
        company_id: CompanyId,
        currency: Currency,
    ) -> Self {
        Self {
            id: InvoiceId::new_v7(),
            move_type,
            state: InvoiceState::Draft,
            partner_id,
            company_id,
            journal_id,
            currency,
            fiscal_position_id: None,
            payment_term_id: None,
            name: None,
            reference: None,
            narration: None,
            invoice_date: None,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends a line
    pub fn add_line(&mut self, line: InvoiceLine) {
        self.lines.push(line);
    }

    /// True while the document is still a draft
    pub fn is_draft(&self) -> bool {
        self.state == InvoiceState::Draft
    }

    /// The document total (sum of line subtotals)
    pub fn amount_total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(self.currency), |acc, line| acc + line.subtotal())
    }

    /// Posts the document to the books
    ///
    /// # Errors
    ///
    /// Returns an error unless the document is a draft.
    pub fn post(&mut self) -> Result<(), AccountingError> {
        if self.state != InvoiceState::Draft {
            return Err(AccountingError::invalid_state(format!(
                "only draft invoices can be posted, {} is {:?}",
                self.id, self.state
            )));
        }
        self.state = InvoiceState::Posted;
        Ok(())
    }

    /// Cancels the document
    ///
    /// # Errors
    ///
    /// Returns an error unless the document is a draft.
    pub fn cancel(&mut self) -> Result<(), AccountingError> {
        if self.state != InvoiceState::Draft {
            return Err(AccountingError::invalid_state(format!(
                "only draft invoices can be cancelled, {} is {:?}",
                self.id, self.state
            )));
        }
        self.state = InvoiceState::Cancelled;
        Ok(())
    }

    /// Human-readable identifier: the document number when assigned,
    /// otherwise the `model(id)` fallback form.
    pub fn display_identifier(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}({})", Self::MODEL, self.id),
        }
    }

    /// All order-line back-references across the document's lines
    pub fn order_line_refs(&self) -> BTreeSet<OrderLineRef> {
        self.lines
            .iter()
            .flat_map(InvoiceLine::order_line_refs)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft_invoice() -> Invoice {
        Invoice::new(
            MoveType::OutInvoice,
            PartnerId::new(),
            JournalId::new(),
            CompanyId::new(),
            Currency::USD,
        )
    }

    #[test]
    fn test_amount_total_sums_lines() {
        let mut invoice = draft_invoice();
        invoice.add_line(InvoiceLine::new(
            "widget",
            AccountId::new(),
            dec!(2),
            Money::new(dec!(5), Currency::USD),
        ));
        invoice.add_line(InvoiceLine::new(
            "gadget",
            AccountId::new(),
            dec!(1),
            Money::new(dec!(10), Currency::USD),
        ));
        assert_eq!(invoice.amount_total(), Money::new(dec!(20), Currency::USD));
    }

    #[test]
    fn test_post_requires_draft() {
        let mut invoice = draft_invoice();
        invoice.post().unwrap();
        assert_eq!(invoice.state, InvoiceState::Posted);
        assert!(invoice.post().is_err());
        assert!(invoice.cancel().is_err());
    }

    #[test]
    fn test_cancel_requires_draft() {
        let mut invoice = draft_invoice();
        invoice.cancel().unwrap();
        assert_eq!(invoice.state, InvoiceState::Cancelled);
        assert!(invoice.post().is_err());
    }

    #[test]
    fn test_display_identifier_falls_back_to_model_form() {
        let mut invoice = draft_invoice();
        assert_eq!(
            invoice.display_identifier(),
            format!("account.invoice({})", invoice.id)
        );

        invoice.name = Some("INV/0001".to_string());
        assert_eq!(invoice.display_identifier(), "INV/0001");
    }

    #[test]
    fn test_refund_quantity_sign() {
        assert_eq!(MoveType::OutInvoice.quantity_sign(), Decimal::ONE);
        assert_eq!(MoveType::OutRefund.quantity_sign(), Decimal::NEGATIVE_ONE);
        assert!(MoveType::InRefund.is_refund());
    }

    #[test]
    fn test_order_line_refs_collects_both_kinds() {
        let mut invoice = draft_invoice();
        let sale_line = SaleOrderLineId::new();
        let purchase_line = PurchaseOrderLineId::new();
        invoice.add_line(
            InvoiceLine::new("a", AccountId::new(), dec!(1), Money::zero(Currency::USD))
                .with_sale_line(sale_line),
        );
        invoice.add_line(
            InvoiceLine::new("b", AccountId::new(), dec!(1), Money::zero(Currency::USD))
                .with_purchase_line(purchase_line),
        );
        let refs = invoice.order_line_refs();
        assert!(refs.contains(&OrderLineRef::Sale(sale_line)));
        assert!(refs.contains(&OrderLineRef::Purchase(purchase_line)));
    }
}
