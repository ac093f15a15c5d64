//! Merge grouping
//!
//! Partitions a set of invoices into merge groups: invoices land in the
//! same group exactly when they agree on every attribute the merge must
//! hold constant. Groups keep first-seen order, and so do the invoices
//! inside each group; the first invoice of a group is its merge survivor.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use core_kernel::{
    CompanyId, Currency, FiscalPositionId, JournalId, PartnerId, PaymentTermId,
};

use crate::invoice::{Invoice, MoveType};

/// The attributes a merge group holds constant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeKey {
    pub partner_id: PartnerId,
    pub move_type: MoveType,
    pub journal_id: JournalId,
    pub company_id: CompanyId,
    pub currency: Currency,
    pub fiscal_position_id: Option<FiscalPositionId>,
    pub payment_term_id: Option<PaymentTermId>,
}

impl MergeKey {
    /// Derives the merge key of an invoice
    pub fn of(invoice: &Invoice) -> Self {
        Self {
            partner_id: invoice.partner_id,
            move_type: invoice.move_type,
            journal_id: invoice.journal_id,
            company_id: invoice.company_id,
            currency: invoice.currency,
            fiscal_position_id: invoice.fiscal_position_id,
            payment_term_id: invoice.payment_term_id,
        }
    }
}

/// Partitions invoices into merge groups, preserving encounter order.
///
/// Every invoice appears in exactly one group. Singleton groups are
/// returned too; whether they are merge candidates is the caller's call
/// (they never are).
pub fn group_by_merge_key(invoices: Vec<Invoice>) -> IndexMap<MergeKey, Vec<Invoice>> {
    let mut groups: IndexMap<MergeKey, Vec<Invoice>> = IndexMap::new();
    for invoice in invoices {
        groups.entry(MergeKey::of(&invoice)).or_default().push(invoice);
    }
    groups
}
