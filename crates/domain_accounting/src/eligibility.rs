//! Merge eligibility checks
//!
//! A set of invoices is mergeable when it contains at least two documents
//! that agree on partner, type, journal and company, and are all still
//! drafts. The verdict is a plain string: empty means eligible, anything
//! else is the message shown verbatim in the wizard. Both message forms
//! below are documented contracts that downstream consumers assert on.

use crate::invoice::{Invoice, InvoiceState};

/// Verdict when fewer than two invoices are selected.
pub const SELECT_MULTIPLE_MESSAGE: &str =
    "Please select multiple invoices to merge in the list view.";

/// Header preceding the list of mismatched attributes.
pub const MISMATCH_HEADER: &str = "All invoices must have the same: ";

/// Computes the eligibility verdict for a set of invoices.
///
/// Checks are accumulated, not short-circuited: every violated attribute is
/// reported, one bullet each, in the fixed order Partner, Type, Journal,
/// Company, Merge-able State.
pub fn eligibility_message(invoices: &[Invoice]) -> String {
    if invoices.len() < 2 {
        return SELECT_MULTIPLE_MESSAGE.to_string();
    }

    let mut mismatched: Vec<&str> = Vec::new();
    if !all_equal(invoices, |i| i.partner_id) {
        mismatched.push("Partner");
    }
    if !all_equal(invoices, |i| i.move_type) {
        mismatched.push("Type");
    }
    if !all_equal(invoices, |i| i.journal_id) {
        mismatched.push("Journal");
    }
    if !all_equal(invoices, |i| i.company_id) {
        mismatched.push("Company");
    }
    if invoices.iter().any(|i| i.state != InvoiceState::Draft) {
        mismatched.push("Merge-able State (ex : Draft)");
    }

    if mismatched.is_empty() {
        return String::new();
    }

    let bullets: Vec<String> = mismatched.iter().map(|m| format!("- {m}")).collect();
    format!("{MISMATCH_HEADER}\n{}", bullets.join("\n"))
}

fn all_equal<T: PartialEq>(invoices: &[Invoice], field: impl Fn(&Invoice) -> T) -> bool {
    let first = field(&invoices[0]);
    invoices[1..].iter().all(|i| field(i) == first)
}
