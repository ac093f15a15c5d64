//! Purchase orders
//!
//! Mirrors the sale side with received quantities in place of delivered
//! ones: a purchase order line invoices what was ordered or what was
//! received, depending on the product's policy.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    CompanyId, Currency, Money, PartnerId, ProductId, PurchaseOrderId, PurchaseOrderLineId,
};

use crate::error::OrderError;
use crate::product::{InvoicePolicy, Product};
use crate::sale::{LineDisplay, OrderState};

/// A line on a purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    /// Unique identifier
    pub id: PurchaseOrderLineId,
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
    /// Received quantity
    pub qty_received: Decimal,
    /// Invoiced quantity; recomputed from the invoice lines referencing
    /// this line, never written directly
    pub qty_invoiced: Decimal,
    /// Unit price
    pub price_unit: Money,
}

impl PurchaseOrderLine {
    /// Creates a product line from a catalog product
    pub fn for_product(product: &Product, qty_ordered: Decimal) -> Self {
        Self {
            id: PurchaseOrderLineId::new_v7(),
            display: None,
            product_id: Some(product.id),
            label: product.name.clone(),
            invoice_policy: product.invoice_policy,
            qty_ordered,
            qty_received: Decimal::ZERO,
            qty_invoiced: Decimal::ZERO,
            price_unit: product.list_price,
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
            InvoicePolicy::Delivery => self.qty_received - self.qty_invoiced,
        }
    }
}

/// A purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique identifier
    pub id: PurchaseOrderId,
    /// Vendor
    pub partner_id: PartnerId,
    /// Owning company
    pub company_id: CompanyId,
    /// Order currency
    pub currency: Currency,
    /// Lifecycle state
    pub state: OrderState,
    /// Order lines
    pub lines: Vec<PurchaseOrderLine>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Creates a new draft order
    pub fn new(partner_id: PartnerId, company_id: CompanyId, currency: Currency) -> Self {
        Self {
            id: PurchaseOrderId::new_v7(),
            partner_id,
            company_id,
            currency,
            state: OrderState::Draft,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends a line
    pub fn add_line(&mut self, line: PurchaseOrderLine) {
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
    pub fn invoiceable_lines(&self) -> impl Iterator<Item = &PurchaseOrderLine> {
        self.lines
            .iter()
            .filter(|line| !line.is_display() && line.qty_to_invoice() > Decimal::ZERO)
    }
}
