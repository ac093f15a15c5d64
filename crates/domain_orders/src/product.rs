//! Product catalog
//!
//! Products carry the list price, the ledger accounts invoice lines book
//! to, and the invoicing policy deciding which quantity an order line may
//! invoice (what was ordered, or what was delivered/received).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, Money, ProductId};

/// Which quantity an order line invoices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoicePolicy {
    /// Invoice the ordered quantity
    Order,
    /// Invoice the delivered (sale) or received (purchase) quantity
    Delivery,
}

/// A sellable / purchasable product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: ProductId,
    /// Display name, used as the order and invoice line label
    pub name: String,
    /// Default unit price
    pub list_price: Money,
    /// Invoicing policy
    pub invoice_policy: InvoicePolicy,
    /// Revenue account for customer invoice lines
    pub income_account_id: AccountId,
    /// Expense account for vendor bill lines
    pub expense_account_id: AccountId,
}

impl Product {
    /// Creates a new product with the Order invoicing policy
    pub fn new(
        name: impl Into<String>,
        list_price: Money,
        income_account_id: AccountId,
        expense_account_id: AccountId,
    ) -> Self {
        Self {
            id: ProductId::new_v7(),
            name: name.into(),
            list_price,
            invoice_policy: InvoicePolicy::Order,
            income_account_id,
            expense_account_id,
        }
    }

    /// Sets the invoicing policy
    pub fn with_invoice_policy(mut self, policy: InvoicePolicy) -> Self {
        self.invoice_policy = policy;
        self
    }
}

/// Read access to the product catalog, as needed by invoice assembly
pub trait ProductCatalog {
    /// Looks a product up by id
    fn product(&self, id: ProductId) -> Option<&Product>;
}

impl ProductCatalog for HashMap<ProductId, Product> {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.get(&id)
    }
}
