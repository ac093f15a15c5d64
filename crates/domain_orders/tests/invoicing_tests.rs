//! Draft invoice assembly tests

use std::collections::HashMap;

use rust_decimal_macros::dec;

use core_kernel::{AccountId, CompanyId, Currency, Money, PartnerId, ProductId};
use domain_accounting::journal::{Journal, JournalType};
use domain_accounting::MoveType;
use domain_orders::invoicing::{draft_invoice_for_purchase_order, draft_invoice_for_sale_order};
use domain_orders::product::{InvoicePolicy, Product};
use domain_orders::purchase::{PurchaseOrder, PurchaseOrderLine};
use domain_orders::sale::{SaleOrder, SaleOrderLine};
use domain_orders::OrderError;

struct Setup {
    company: CompanyId,
    partner: PartnerId,
    sale_journal: Journal,
    purchase_journal: Journal,
    catalog: HashMap<ProductId, Product>,
    product_1: ProductId,
    product_2: ProductId,
}

fn setup(policy: InvoicePolicy) -> Setup {
    let company = CompanyId::new();
    let income = AccountId::new();
    let expense = AccountId::new();
    let product_1 = Product::new("product 1", Money::new(dec!(5), Currency::USD), income, expense)
        .with_invoice_policy(policy);
    let product_2 = Product::new("product 2", Money::new(dec!(10), Currency::USD), income, expense)
        .with_invoice_policy(policy);
    let mut catalog = HashMap::new();
    let product_1_id = product_1.id;
    let product_2_id = product_2.id;
    catalog.insert(product_1.id, product_1);
    catalog.insert(product_2.id, product_2);
    Setup {
        company,
        partner: PartnerId::new(),
        sale_journal: Journal::new("INV", "Customer Invoices", JournalType::Sale, company),
        purchase_journal: Journal::new("BILL", "Vendor Bills", JournalType::Purchase, company),
        catalog,
        product_1: product_1_id,
        product_2: product_2_id,
    }
}

fn sale_order_with_sections(s: &Setup) -> SaleOrder {
    let mut order = SaleOrder::new(s.partner, s.company, Currency::USD);
    order.add_line(SaleOrderLine::section("Dummy section", Currency::USD));
    order.add_line(SaleOrderLine::section("Dummy section", Currency::USD));
    order.add_line(SaleOrderLine::for_product(&s.catalog[&s.product_1], dec!(1)));
    order.add_line(SaleOrderLine::for_product(&s.catalog[&s.product_2], dec!(1)));
    order
}

#[test]
fn test_sale_invoice_skips_sections_and_links_lines() {
    let s = setup(InvoicePolicy::Order);
    let mut order = sale_order_with_sections(&s);
    order.confirm().unwrap();

    let invoice = draft_invoice_for_sale_order(&order, &s.sale_journal, &s.catalog).unwrap();
    assert_eq!(invoice.move_type, MoveType::OutInvoice);
    assert_eq!(invoice.partner_id, s.partner);
    assert_eq!(invoice.journal_id, s.sale_journal.id);
    assert_eq!(invoice.lines.len(), 2);

    let product_line_ids: Vec<_> = order
        .lines
        .iter()
        .filter(|line| !line.is_display())
        .map(|line| line.id)
        .collect();
    for (line, order_line_id) in invoice.lines.iter().zip(product_line_ids) {
        assert_eq!(line.quantity, dec!(1));
        assert_eq!(line.sale_line_ids, vec![order_line_id]);
    }
    assert_eq!(invoice.amount_total(), Money::new(dec!(15), Currency::USD));
}

#[test]
fn test_sale_invoice_requires_confirmed_order() {
    let s = setup(InvoicePolicy::Order);
    let order = sale_order_with_sections(&s);
    let result = draft_invoice_for_sale_order(&order, &s.sale_journal, &s.catalog);
    assert!(matches!(result, Err(OrderError::InvalidStateTransition(_))));
}

#[test]
fn test_sale_invoice_rejects_purchase_journal() {
    let s = setup(InvoicePolicy::Order);
    let mut order = sale_order_with_sections(&s);
    order.confirm().unwrap();
    let result = draft_invoice_for_sale_order(&order, &s.purchase_journal, &s.catalog);
    assert!(matches!(result, Err(OrderError::Validation(_))));
}

#[test]
fn test_delivery_policy_invoices_delivered_quantity_only() {
    let s = setup(InvoicePolicy::Delivery);
    let mut order = SaleOrder::new(s.partner, s.company, Currency::USD);
    order.add_line(SaleOrderLine::for_product(&s.catalog[&s.product_1], dec!(5)));
    order.confirm().unwrap();

    // Nothing delivered yet, nothing to invoice.
    let result = draft_invoice_for_sale_order(&order, &s.sale_journal, &s.catalog);
    assert!(matches!(result, Err(OrderError::NothingToInvoice(_))));

    order.lines[0].qty_delivered = dec!(2);
    let invoice = draft_invoice_for_sale_order(&order, &s.sale_journal, &s.catalog).unwrap();
    assert_eq!(invoice.lines.len(), 1);
    assert_eq!(invoice.lines[0].quantity, dec!(2));
}

#[test]
fn test_already_invoiced_quantity_is_excluded() {
    let s = setup(InvoicePolicy::Order);
    let mut order = SaleOrder::new(s.partner, s.company, Currency::USD);
    order.add_line(SaleOrderLine::for_product(&s.catalog[&s.product_1], dec!(5)));
    order.confirm().unwrap();
    order.lines[0].qty_invoiced = dec!(3);

    let invoice = draft_invoice_for_sale_order(&order, &s.sale_journal, &s.catalog).unwrap();
    assert_eq!(invoice.lines[0].quantity, dec!(2));
}

#[test]
fn test_unknown_product_is_an_error() {
    let s = setup(InvoicePolicy::Order);
    let foreign =
        Product::new("foreign", Money::new(dec!(1), Currency::USD), AccountId::new(), AccountId::new());
    let mut order = SaleOrder::new(s.partner, s.company, Currency::USD);
    order.add_line(SaleOrderLine::for_product(&foreign, dec!(1)));
    order.confirm().unwrap();

    let result = draft_invoice_for_sale_order(&order, &s.sale_journal, &s.catalog);
    assert!(matches!(result, Err(OrderError::ProductNotFound(_))));
}

#[test]
fn test_purchase_invoice_uses_expense_account_and_received_quantity() {
    let s = setup(InvoicePolicy::Delivery);
    let mut order = PurchaseOrder::new(s.partner, s.company, Currency::USD);
    order.add_line(PurchaseOrderLine::for_product(&s.catalog[&s.product_2], dec!(5)));
    order.confirm().unwrap();
    order.lines[0].qty_received = dec!(3);

    let invoice = draft_invoice_for_purchase_order(&order, &s.purchase_journal, &s.catalog).unwrap();
    assert_eq!(invoice.move_type, MoveType::InInvoice);
    assert_eq!(invoice.lines.len(), 1);
    assert_eq!(invoice.lines[0].quantity, dec!(3));
    assert_eq!(
        invoice.lines[0].account_id,
        s.catalog[&s.product_2].expense_account_id
    );
    assert_eq!(invoice.lines[0].purchase_line_ids, vec![order.lines[0].id]);
}
