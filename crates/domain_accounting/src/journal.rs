//! Accounting journals
//!
//! A journal scopes invoices to a company and a document flow (sale or
//! purchase) and owns the numbering sequence used when documents are posted.

use serde::{Deserialize, Serialize};

use core_kernel::{CompanyId, JournalId};

/// The document flow a journal records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalType {
    /// Customer invoices and credit notes
    Sale,
    /// Vendor bills and refunds
    Purchase,
}

/// An accounting journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier
    pub id: JournalId,
    /// Short code (e.g. "INV")
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Document flow
    pub journal_type: JournalType,
    /// Owning company
    pub company_id: CompanyId,
    /// Prefix for numbers assigned on posting (e.g. "INV/2026/")
    pub sequence_prefix: String,
}

impl Journal {
    /// Creates a new journal
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        journal_type: JournalType,
        company_id: CompanyId,
    ) -> Self {
        let code = code.into();
        let sequence_prefix = format!("{code}/");
        Self {
            id: JournalId::new_v7(),
            code,
            name: name.into(),
            journal_type,
            company_id,
            sequence_prefix,
        }
    }

    /// Sets the numbering prefix
    pub fn with_sequence_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sequence_prefix = prefix.into();
        self
    }

    /// Formats a document number from this journal's sequence
    pub fn format_number(&self, next: u64) -> String {
        format!("{}{:04}", self.sequence_prefix, next)
    }
}
