//! Core Kernel - Foundational types and utilities for the accounting system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers for every record kind

pub mod money;
pub mod identifiers;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{
    PartnerId, CompanyId, JournalId, AccountId, TaxId,
    FiscalPositionId, PaymentTermId, ProductId,
    InvoiceId, InvoiceLineId, MessageId,
    SaleOrderId, SaleOrderLineId, PurchaseOrderId, PurchaseOrderLineId,
};
