//! Post-merge field processing
//!
//! After consolidation the survivor takes over selected metadata fields
//! from the whole merged set: each configured field becomes the " // "
//! joined concatenation of all non-empty values, in invoice order. Which
//! fields take part is configuration, not fixed logic; the default list
//! contains only the partner reference.

use serde::{Deserialize, Serialize};

use crate::invoice::Invoice;

/// Separator between concatenated values
pub const CONCAT_SEPARATOR: &str = " // ";

/// A field that can be concatenated across a merged set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatField {
    /// Partner reference / memo
    Reference,
    /// Terms and conditions text
    Narration,
}

impl ConcatField {
    fn get<'a>(&self, invoice: &'a Invoice) -> Option<&'a str> {
        match self {
            ConcatField::Reference => invoice.reference.as_deref(),
            ConcatField::Narration => invoice.narration.as_deref(),
        }
    }

    fn set(&self, invoice: &mut Invoice, value: Option<String>) {
        match self {
            ConcatField::Reference => invoice.reference = value,
            ConcatField::Narration => invoice.narration = value,
        }
    }
}

/// Merge-time configuration for the field post-processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Fields whose values are concatenated onto the survivor
    pub fields_to_concatenate: Vec<ConcatField>,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            fields_to_concatenate: vec![ConcatField::Reference],
        }
    }
}

impl MergeSettings {
    /// Adds a field to the concatenation list
    pub fn with_field(mut self, field: ConcatField) -> Self {
        if !self.fields_to_concatenate.contains(&field) {
            self.fields_to_concatenate.push(field);
        }
        self
    }
}

/// Applies the configured concatenations onto the survivor.
///
/// `keep_references` mirrors the programmatic merge flag: when false the
/// Reference field is left at the survivor's original value even if
/// configured. Fields not configured are never touched, so the absorbed
/// invoices' values for them are discarded with the invoices themselves.
pub fn post_process_fields(
    survivor: &mut Invoice,
    merged: &[Invoice],
    settings: &MergeSettings,
    keep_references: bool,
) {
    for field in &settings.fields_to_concatenate {
        if *field == ConcatField::Reference && !keep_references {
            continue;
        }
        let values: Vec<&str> = merged
            .iter()
            .filter_map(|invoice| field.get(invoice))
            .filter(|value| !value.is_empty())
            .collect();
        if !values.is_empty() {
            field.set(survivor, Some(values.join(CONCAT_SEPARATOR)));
        }
    }
}
