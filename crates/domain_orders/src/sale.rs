//! Sale orders
//!
//! A sale order carries product lines plus optional section/note display
//! lines. Product lines track three quantities: ordered, delivered, and
//! invoiced. The invoiced quantity is a recomputed aggregate owned by the
//! record store; everything else is ordinary record state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, Currency, Money, PartnerId, ProductId, SaleOrderId, SaleOrderLineId};

use crate::error::OrderError;
use crate::product::{InvoicePolicy, Product};

/// Order lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    /// Quotation, editable
    Draft,
    /// Confirmed, invoiceable
    Confirmed,
    /// Cancelled
    Cancelled,
}

/// Display-only line kinds; these never invoice anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDisplay {
    /// Section header
    Section,
    /// Free-form note
    Note,
}

/// A line on a sale order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleOrderLine {
    /// Unique identifier
    pub id: SaleOrderLineId,
    /// Set for section/note lines, absent for product lines
    pub display: Option<LineDisplay>,
    /// Ordered product; always set for product lines
    pub product_id: Option<ProductId>,
    /// Line description
    pub label: String,
    /// Invoicing policy, taken from the product
    pub invoice_policy: InvoicePolicy,
    /// Ordered quantity
    pub qty_ordered: Decimal,
    /// Delivered quantity
    pub qty_delivered: Decimal,
    /// Invoiced quantity; recomputed from the invoice lines referencing
    /// this line, never written directly
    pub qty_invoiced: Decimal,
    /// Unit price
    pub price_unit: Money,
}

impl SaleOrderLine {
    /// Creates a product line from a catalog product
    pub fn for_product(product: &Product, qty_ordered: Decimal) -> Self {
        Self {
            id: SaleOrderLineId::new_v7(),
            display: None,
            product_id: Some(product.id),
            label: product.name.clone(),
            invoice_policy: product.invoice_policy,
            qty_ordered,
            qty_delivered: Decimal::ZERO,
            qty_invoiced: Decimal::ZERO,
            price_unit: product.list_price,
        }
    }

    /// Creates a section header line
    pub fn section(label: impl Into<String>, currency: Currency) -> Self {
        Self {
            id: SaleOrderLineId::new_v7(),
            display: Some(LineDisplay::Section),
            product_id: None,
            label: label.into(),
            invoice_policy: InvoicePolicy::Order,
            qty_ordered: Decimal::ZERO,
            qty_delivered: Decimal::ZERO,
            qty_invoiced: Decimal::ZERO,
            price_unit: Money::zero(currency),
        }
    }

    /// True for section/note lines
    pub fn is_display(&self) -> bool {
        self.display.is_some()
    }

    /// Quantity that can still be invoiced under the line's policy
    pub fn qty_to_invoice(&self) -> Decimal {
        if self.is_display() {
            return Decimal::ZERO;
        }
        match self.invoice_policy {
            InvoicePolicy::Order => self.qty_ordered - self.qty_invoiced,
            InvoicePolicy::Delivery => self.qty_delivered - self.qty_invoiced,
        }
    }
}

/// A sale order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleOrder {
    /// Unique identifier
    pub id: SaleOrderId,
    /// Customer
    pub partner_id: PartnerId,
    /// Owning company
    pub company_id: CompanyId,
    /// Order currency
    pub currency: Currency,
    /// Lifecycle state
    pub state: OrderState,
    /// Order lines
    pub lines: Vec<SaleOrderLine>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl SaleOrder {
    /// Creates a new draft order
    pub fn new(partner_id: PartnerId, company_id: CompanyId, currency: Currency) -> Self {
        Self {
            id: SaleOrderId::new_v7(),
            partner_id,
            company_id,
            currency,
            state: OrderState::Draft,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends a line
    pub fn add_line(&mut self, line: SaleOrderLine) {
        self.lines.push(line);
    }

    /// Confirms the order
    ///
    /// # Errors
    ///
    /// Returns an error unless the order is a draft.
    pub fn confirm(&mut self) -> Result<(), OrderError> {
        if self.state != OrderState::Draft {
            return Err(OrderError::invalid_state(format!(
                "only draft orders can be confirmed, {} is {:?}",
                self.id, self.state
            )));
        }
        self.state = OrderState::Confirmed;
        Ok(())
    }

    /// Product lines with a positive quantity left to invoice
    pub fn invoiceable_lines(&self) -> impl Iterator<Item = &SaleOrderLine> {
        self.lines
            .iter()
            .filter(|line| !line.is_display() && line.qty_to_invoice() > Decimal::ZERO)
    }
}
