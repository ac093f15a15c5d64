//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use domain_orders::purchase::PurchaseOrder;
use domain_orders::sale::SaleOrder;

/// Asserts delivered and invoiced quantities on every product line of a
/// sale order
///
/// # Panics
///
/// Panics when any product line deviates, naming the line.
pub fn assert_sale_quantities(order: &SaleOrder, delivered: Decimal, invoiced: Decimal) {
    for line in order.lines.iter().filter(|line| !line.is_display()) {
        assert_eq!(
            line.qty_delivered, delivered,
            "sale line {} ({}): qty_delivered {} != {}",
            line.id, line.label, line.qty_delivered, delivered
        );
        assert_eq!(
            line.qty_invoiced, invoiced,
            "sale line {} ({}): qty_invoiced {} != {}",
            line.id, line.label, line.qty_invoiced, invoiced
        );
    }
}

/// Asserts received and invoiced quantities on every product line of a
/// purchase order
///
/// # Panics
///
/// Panics when any product line deviates, naming the line.
pub fn assert_purchase_quantities(order: &PurchaseOrder, received: Decimal, invoiced: Decimal) {
    for line in order.lines.iter().filter(|line| !line.is_display()) {
        assert_eq!(
            line.qty_received, received,
            "purchase line {} ({}): qty_received {} != {}",
            line.id, line.label, line.qty_received, received
        );
        assert_eq!(
            line.qty_invoiced, invoiced,
            "purchase line {} ({}): qty_invoiced {} != {}",
            line.id, line.label, line.qty_invoiced, invoiced
        );
    }
}
