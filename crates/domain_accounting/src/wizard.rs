//! Interactive merge wizard
//!
//! The wizard is a transient request object scoped to the user's current
//! invoice selection. Opening it computes the eligibility verdict eagerly
//! so the UI can disable the merge action; confirming runs the merge and
//! returns a window action pointing at the surviving invoices.

use serde::{Deserialize, Serialize};

use core_kernel::InvoiceId;

use crate::eligibility::eligibility_message;
use crate::error::AccountingError;
use crate::invoice::{Invoice, MoveType};
use crate::merge::{do_merge, MergeOptions};
use crate::ports::InvoiceStore;

/// The context a wizard is created with: the active selection and the
/// model it was taken from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeWizardContext {
    /// Model key of the selected records; must be [`Invoice::MODEL`]
    pub active_model: String,
    /// Selected invoice ids, in selection order
    pub active_ids: Vec<InvoiceId>,
}

impl MergeWizardContext {
    /// Creates a context for an invoice selection
    pub fn for_invoices(active_ids: Vec<InvoiceId>) -> Self {
        Self {
            active_model: Invoice::MODEL.to_string(),
            active_ids,
        }
    }
}

/// UI action descriptor returned after a successful merge: opens the
/// invoice list filtered to the surviving documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowAction {
    /// Action discriminator, always `"act_window"`
    #[serde(rename = "type")]
    pub kind: String,
    /// View types the action binds to, always `"list,form"`
    pub binding_view_types: String,
    /// Reference of the list action to open, per document type
    pub xml_id: String,
    /// Invoice ids the list is filtered to
    pub domain: Vec<InvoiceId>,
}

impl WindowAction {
    /// Builds the action for an invoice list of the given document type
    pub fn for_invoice_list(move_type: MoveType, domain: Vec<InvoiceId>) -> Self {
        let xml_id = match move_type {
            MoveType::OutInvoice => "account.action_out_invoice_list",
            MoveType::InInvoice => "account.action_in_invoice_list",
            MoveType::OutRefund => "account.action_out_refund_list",
            MoveType::InRefund => "account.action_in_refund_list",
        };
        Self {
            kind: "act_window".to_string(),
            binding_view_types: "list,form".to_string(),
            xml_id: xml_id.to_string(),
            domain,
        }
    }
}

/// The invoice merge wizard
#[derive(Debug, Clone)]
pub struct InvoiceMergeWizard {
    context: MergeWizardContext,
    error_message: String,
}

impl InvoiceMergeWizard {
    /// Opens the wizard on the current selection and computes the
    /// eligibility verdict.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the context does not carry invoice
    /// records, or a not-found error for an unknown id.
    pub fn open<S>(store: &S, context: MergeWizardContext) -> Result<Self, AccountingError>
    where
        S: InvoiceStore + ?Sized,
    {
        if context.active_model != Invoice::MODEL {
            return Err(AccountingError::validation(format!(
                "invoice merge expects {} records, got {}",
                Invoice::MODEL,
                context.active_model
            )));
        }
        let invoices = store.invoices(&context.active_ids)?;
        let error_message = eligibility_message(&invoices);
        Ok(Self {
            context,
            error_message,
        })
    }

    /// The eligibility verdict; empty means the selection is mergeable.
    /// This is the only signal [`Self::merge_invoices`] consults.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    /// True when the merge action is executable
    pub fn can_merge(&self) -> bool {
        self.error_message.is_empty()
    }

    /// Merges the selected invoices and returns the list action scoped to
    /// the survivors.
    ///
    /// # Errors
    ///
    /// Returns [`AccountingError::NotEligible`] when the eligibility
    /// verdict is non-empty.
    pub fn merge_invoices<S>(&self, store: &mut S) -> Result<WindowAction, AccountingError>
    where
        S: InvoiceStore + ?Sized,
    {
        if !self.can_merge() {
            return Err(AccountingError::NotEligible(self.error_message.clone()));
        }

        let selection = store.invoices(&self.context.active_ids)?;
        let move_type = selection[0].move_type;

        let outcome = do_merge(store, &self.context.active_ids, &MergeOptions::default())?;
        let survivors: Vec<InvoiceId> = if outcome.is_empty() {
            self.context.active_ids.clone()
        } else {
            outcome.keys().copied().collect()
        };
        Ok(WindowAction::for_invoice_list(move_type, survivors))
    }
}
