//! Merge audit messages
//!
//! One message is posted on the surviving invoice per merge, listing every
//! merged document with a record link and its pre-merge total. The body is
//! an HTML fragment with a fixed shape that downstream consumers assert on:
//!
//! ```text
//! Invoice merged from :<ul>{item}*</ul>
//! item = <li><a href=# data-oe-model='account.invoice'
//!         data-oe-id='{id}'>{identifier}</a> - {amount}</li>
//! ```
//!
//! `{identifier}` is the document number when assigned, otherwise the
//! `account.invoice({id})` fallback; `{amount}` is the total at currency
//! precision.

use std::fmt::Write;

use crate::invoice::Invoice;

/// Header of the merge audit message
pub const MERGE_MESSAGE_HEADER: &str = "Invoice merged from :";

/// Builds the audit message body for a merged set, in invoice order.
pub fn merge_message_body(merged: &[Invoice]) -> String {
    let mut body = String::from(MERGE_MESSAGE_HEADER);
    body.push_str("<ul>");
    for invoice in merged {
        // write! to a String cannot fail
        let _ = write!(
            body,
            "<li><a href=# data-oe-model='{model}' data-oe-id='{id}'>{identifier}</a> - {amount}</li>",
            model = Invoice::MODEL,
            id = invoice.id,
            identifier = invoice.display_identifier(),
            amount = invoice.amount_total().display_amount(),
        );
    }
    body.push_str("</ul>");
    body
}
