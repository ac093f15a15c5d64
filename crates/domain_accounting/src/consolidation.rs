//! Line consolidation
//!
//! Builds the surviving invoice's line set for a merge group: lines that
//! agree on every attribute except quantity are combined into one line with
//! the quantities summed; all other lines are kept as-is and simply change
//! owner. The order-line back-references are part of the comparison - two
//! lines invoicing different order lines stay separate, which keeps the
//! invoiced-quantity aggregation on the originating orders exact after the
//! merge.

use indexmap::IndexMap;

use core_kernel::{AccountId, Money, ProductId, PurchaseOrderLineId, SaleOrderLineId, TaxId};

use crate::invoice::{Invoice, InvoiceLine};

/// Everything that must match for two lines to be combined
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineMergeKey {
    product_id: Option<ProductId>,
    label: String,
    account_id: AccountId,
    tax_ids: Vec<TaxId>,
    price_unit: Money,
    sale_line_ids: Vec<SaleOrderLineId>,
    purchase_line_ids: Vec<PurchaseOrderLineId>,
}

impl LineMergeKey {
    /// Derives the merge key of a line. Collection-valued fields are
    /// sorted so that ordering differences do not block a merge.
    pub fn of(line: &InvoiceLine) -> Self {
        let mut tax_ids = line.tax_ids.clone();
        tax_ids.sort_unstable();
        let mut sale_line_ids = line.sale_line_ids.clone();
        sale_line_ids.sort_unstable();
        let mut purchase_line_ids = line.purchase_line_ids.clone();
        purchase_line_ids.sort_unstable();
        Self {
            product_id: line.product_id,
            label: line.label.clone(),
            account_id: line.account_id,
            tax_ids,
            price_unit: line.price_unit,
            sale_line_ids,
            purchase_line_ids,
        }
    }
}

/// Consolidates the lines of a merge group into the survivor's line set.
///
/// Lines are visited in invoice order, then line order; the result keeps
/// first-seen order. A combined line takes every field from its first
/// contributor and the summed quantity.
pub fn consolidate_lines(invoices: &[Invoice]) -> Vec<InvoiceLine> {
    let mut merged: IndexMap<LineMergeKey, InvoiceLine> = IndexMap::new();
    for invoice in invoices {
        for line in &invoice.lines {
            match merged.entry(LineMergeKey::of(line)) {
                indexmap::map::Entry::Occupied(mut entry) => {
                    entry.get_mut().quantity += line.quantity;
                }
                indexmap::map::Entry::Vacant(entry) => {
                    entry.insert(line.clone());
                }
            }
        }
    }
    merged.into_values().collect()
}
