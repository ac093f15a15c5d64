//! Invoiced-quantity recomputation
//!
//! The invoiced quantity on an order line is an aggregate over the invoice
//! lines that reference it: the signed sum of their quantities across all
//! non-cancelled invoices (refunds count negative). The store recomputes it
//! explicitly after every invoice mutation that can change line ownership
//! or visibility; no other code writes `qty_invoiced`.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::debug;

use domain_accounting::invoice::{InvoiceState, OrderLineRef};

use crate::store::ErpStore;

impl ErpStore {
    /// Recomputes `qty_invoiced` for the given order lines from the
    /// current invoice contents. Unknown references are ignored; the
    /// orders they belonged to no longer exist.
    pub(crate) fn recompute_invoiced_quantities(&mut self, refs: &BTreeSet<OrderLineRef>) {
        if refs.is_empty() {
            return;
        }
        let totals: Vec<(OrderLineRef, Decimal)> = refs
            .iter()
            .map(|line_ref| (*line_ref, self.invoiced_total(*line_ref)))
            .collect();
        for (line_ref, total) in totals {
            match line_ref {
                OrderLineRef::Sale(line_id) => {
                    if let Some(line) = self
                        .sale_orders
                        .values_mut()
                        .flat_map(|order| order.lines.iter_mut())
                        .find(|line| line.id == line_id)
                    {
                        line.qty_invoiced = total;
                    }
                }
                OrderLineRef::Purchase(line_id) => {
                    if let Some(line) = self
                        .purchase_orders
                        .values_mut()
                        .flat_map(|order| order.lines.iter_mut())
                        .find(|line| line.id == line_id)
                    {
                        line.qty_invoiced = total;
                    }
                }
            }
        }
        debug!(order_lines = refs.len(), "recomputed invoiced quantities");
    }

    fn invoiced_total(&self, line_ref: OrderLineRef) -> Decimal {
        self.invoices
            .values()
            .filter(|invoice| invoice.state != InvoiceState::Cancelled)
            .map(|invoice| {
                let sign = invoice.move_type.quantity_sign();
                invoice
                    .lines
                    .iter()
                    .filter(|line| match line_ref {
                        OrderLineRef::Sale(id) => line.sale_line_ids.contains(&id),
                        OrderLineRef::Purchase(id) => line.purchase_line_ids.contains(&id),
                    })
                    .map(|line| line.quantity * sign)
                    .sum::<Decimal>()
            })
            .sum()
    }
}
