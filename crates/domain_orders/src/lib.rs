//! Order Domain - Sale and Purchase Orders
//!
//! This crate models the order side of the system: a product catalog with
//! per-product invoicing policy, sale orders tracking ordered/delivered/
//! invoiced quantities, purchase orders tracking ordered/received/invoiced
//! quantities, and the assembly of draft invoices from a confirmed order's
//! invoiceable lines.
//!
//! Invoiced quantities on order lines are recomputed aggregates over the
//! invoice lines that reference them; the recomputation itself lives with
//! the record store, this crate provides the inputs (line references and
//! quantity semantics).

pub mod error;
pub mod invoicing;
pub mod product;
pub mod purchase;
pub mod sale;

pub use error::OrderError;
pub use invoicing::{draft_invoice_for_purchase_order, draft_invoice_for_sale_order};
pub use product::{InvoicePolicy, Product, ProductCatalog};
pub use purchase::{PurchaseOrder, PurchaseOrderLine};
pub use sale::{LineDisplay, OrderState, SaleOrder, SaleOrderLine};
