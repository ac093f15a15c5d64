//! Merge orchestration
//!
//! [`do_merge`] is the programmatic entry point shared by the interactive
//! wizard and the order-invoicing callback: it filters the given invoices
//! down to drafts, partitions them into merge groups, and merges every
//! group of at least two documents. Each merge consolidates the lines onto
//! the group's first invoice, applies the configured field concatenations,
//! posts one audit message, and deletes the absorbed documents.
//!
//! [`merge_order_invoices`] is the automatic callback run after sale or
//! purchase order invoicing: it re-derives the draft invoices related to
//! the affected orders (not just the newly created ones) and merges
//! whatever qualifies.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{debug, info};

use core_kernel::InvoiceId;

use crate::audit::merge_message_body;
use crate::consolidation::consolidate_lines;
use crate::error::AccountingError;
use crate::grouping::group_by_merge_key;
use crate::invoice::{Invoice, OrderLineRef, OrderRef};
use crate::ports::InvoiceStore;
use crate::postprocess::{post_process_fields, MergeSettings};

/// Options for a programmatic merge
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Whether reference-like fields are concatenated onto the survivor;
    /// false leaves the survivor's original reference untouched
    pub keep_references: bool,
    /// Invoice date forced onto each survivor, when given
    pub invoice_date: Option<NaiveDate>,
    /// Field post-processor configuration
    pub settings: MergeSettings,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            keep_references: true,
            invoice_date: None,
            settings: MergeSettings::default(),
        }
    }
}

/// Result of a merge: each surviving invoice mapped to the order lines
/// whose invoice lines now point at it. Callers use the mapping to trigger
/// dependent recomputation on the originating orders.
pub type MergeOutcome = BTreeMap<InvoiceId, BTreeSet<OrderLineRef>>;

/// Merges the given invoices, group by group.
///
/// Non-draft invoices are skipped; singleton groups are no-ops. Returns
/// the survivor map, empty when nothing qualified.
pub fn do_merge<S>(
    store: &mut S,
    ids: &[InvoiceId],
    options: &MergeOptions,
) -> Result<MergeOutcome, AccountingError>
where
    S: InvoiceStore + ?Sized,
{
    let invoices = store.invoices(ids)?;
    let drafts: Vec<Invoice> = invoices.into_iter().filter(Invoice::is_draft).collect();
    let groups = group_by_merge_key(drafts);
    debug!(
        selected = ids.len(),
        groups = groups.len(),
        "grouped draft invoices for merge"
    );

    let mut outcome = MergeOutcome::new();
    for group in groups.into_values() {
        if group.len() < 2 {
            continue;
        }

        let mut survivor = group[0].clone();
        let survivor_id = survivor.id;
        let absorbed: Vec<InvoiceId> = group[1..].iter().map(|i| i.id).collect();

        survivor.lines = consolidate_lines(&group);
        if let Some(date) = options.invoice_date {
            survivor.invoice_date = Some(date);
        }
        post_process_fields(&mut survivor, &group, &options.settings, options.keep_references);

        // Audit body uses the pre-merge documents and totals.
        let body = merge_message_body(&group);
        let order_lines: BTreeSet<OrderLineRef> = survivor.order_line_refs();

        store.update_invoice(survivor)?;
        store.post_message(survivor_id, body)?;
        store.delete_invoices(&absorbed)?;

        info!(
            survivor = %survivor_id,
            absorbed = absorbed.len(),
            order_lines = order_lines.len(),
            "merged invoices"
        );
        outcome.insert(survivor_id, order_lines);
    }
    Ok(outcome)
}

/// Automatic callback after order invoicing: merges all currently draft
/// invoices related to the affected orders.
pub fn merge_order_invoices<S>(
    store: &mut S,
    orders: &[OrderRef],
    options: &MergeOptions,
) -> Result<MergeOutcome, AccountingError>
where
    S: InvoiceStore + ?Sized,
{
    let ids = store.draft_invoice_ids_for_orders(orders)?;
    debug!(
        orders = orders.len(),
        drafts = ids.len(),
        "collected draft invoices for post-invoicing merge"
    );
    do_merge(store, &ids, options)
}
