//! Draft invoice assembly
//!
//! Builds the draft invoice content for a confirmed order: one invoice
//! line per order line with a positive quantity left to invoice, priced
//! from the order line, booked to the product's revenue or expense
//! account, and back-referencing the order line so invoiced-quantity
//! aggregation keeps working once the invoice exists.

use tracing::debug;

use domain_accounting::invoice::{Invoice, InvoiceLine, MoveType};
use domain_accounting::journal::{Journal, JournalType};

use crate::error::OrderError;
use crate::product::ProductCatalog;
use crate::purchase::PurchaseOrder;
use crate::sale::{OrderState, SaleOrder};

/// Builds a draft customer invoice for a confirmed sale order.
///
/// # Errors
///
/// Returns an error when the order is not confirmed, the journal does not
/// fit (wrong flow or company), a line's product is missing from the
/// catalog, or nothing is left to invoice.
pub fn draft_invoice_for_sale_order<C>(
    order: &SaleOrder,
    journal: &Journal,
    catalog: &C,
) -> Result<Invoice, OrderError>
where
    C: ProductCatalog + ?Sized,
{
    if order.state != OrderState::Confirmed {
        return Err(OrderError::invalid_state(format!(
            "only confirmed orders can be invoiced, {} is {:?}",
            order.id, order.state
        )));
    }
    check_journal(journal, JournalType::Sale, order.company_id == journal.company_id)?;

    let mut invoice = Invoice::new(
        MoveType::OutInvoice,
        order.partner_id,
        journal.id,
        order.company_id,
        order.currency,
    );
    for line in order.invoiceable_lines() {
        let product_id = line
            .product_id
            .ok_or_else(|| OrderError::validation(format!("order line {} has no product", line.id)))?;
        let product = catalog
            .product(product_id)
            .ok_or(OrderError::ProductNotFound(product_id))?;
        invoice.add_line(
            InvoiceLine::new(
                line.label.clone(),
                product.income_account_id,
                line.qty_to_invoice(),
                line.price_unit,
            )
            .with_product(product_id)
            .with_sale_line(line.id),
        );
    }
    if invoice.lines.is_empty() {
        return Err(OrderError::NothingToInvoice(order.id.to_string()));
    }
    debug!(order = %order.id, lines = invoice.lines.len(), "assembled draft invoice for sale order");
    Ok(invoice)
}

/// Builds a draft vendor bill for a confirmed purchase order.
///
/// # Errors
///
/// Same conditions as [`draft_invoice_for_sale_order`].
pub fn draft_invoice_for_purchase_order<C>(
    order: &PurchaseOrder,
    journal: &Journal,
    catalog: &C,
) -> Result<Invoice, OrderError>
where
    C: ProductCatalog + ?Sized,
{
    if order.state != OrderState::Confirmed {
        return Err(OrderError::invalid_state(format!(
            "only confirmed orders can be invoiced, {} is {:?}",
            order.id, order.state
        )));
    }
    check_journal(journal, JournalType::Purchase, order.company_id == journal.company_id)?;

    let mut invoice = Invoice::new(
        MoveType::InInvoice,
        order.partner_id,
        journal.id,
        order.company_id,
        order.currency,
    );
    for line in order.invoiceable_lines() {
        let product_id = line
            .product_id
            .ok_or_else(|| OrderError::validation(format!("order line {} has no product", line.id)))?;
        let product = catalog
            .product(product_id)
            .ok_or(OrderError::ProductNotFound(product_id))?;
        invoice.add_line(
            InvoiceLine::new(
                line.label.clone(),
                product.expense_account_id,
                line.qty_to_invoice(),
                line.price_unit,
            )
            .with_product(product_id)
            .with_purchase_line(line.id),
        );
    }
    if invoice.lines.is_empty() {
        return Err(OrderError::NothingToInvoice(order.id.to_string()));
    }
    debug!(order = %order.id, lines = invoice.lines.len(), "assembled draft invoice for purchase order");
    Ok(invoice)
}

fn check_journal(
    journal: &Journal,
    expected: JournalType,
    company_matches: bool,
) -> Result<(), OrderError> {
    if journal.journal_type != expected {
        return Err(OrderError::validation(format!(
            "journal {} is a {:?} journal, expected {:?}",
            journal.code, journal.journal_type, expected
        )));
    }
    if !company_matches {
        return Err(OrderError::validation(format!(
            "journal {} belongs to another company",
            journal.code
        )));
    }
    Ok(())
}
