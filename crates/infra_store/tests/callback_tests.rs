//! Automatic-callback merge tests
//!
//! Ports of the order-invoicing scenarios: invoices generated from sale
//! and purchase orders are merged after invoicing, and the per-order
//! delivered/received and invoiced quantities must come out unchanged -
//! only the number of invoice documents drops.

use chrono::Utc;
use rust_decimal_macros::dec;

use core_kernel::{Currency, InvoiceId, Money, PurchaseOrderId, SaleOrderId};
use domain_accounting::merge::{do_merge, MergeOptions};
use domain_accounting::{InvoiceStore, OrderRef};
use domain_orders::product::InvoicePolicy;
use test_utils::{
    assert_purchase_quantities, assert_sale_quantities, init_test_tracing, ErpFixture,
    ProductBuilder, PurchaseOrderBuilder, SaleOrderBuilder,
};

fn merge_options_without_references() -> MergeOptions {
    MergeOptions {
        keep_references: false,
        ..MergeOptions::default()
    }
}

/// Delivers one more unit on every line that still has some outstanding,
/// then invoices the order - the delivery-policy drip-invoicing loop.
fn add_qty_delivered_and_create_invoice(f: &mut ErpFixture, order_id: SaleOrderId) -> InvoiceId {
    {
        let order = f.store.sale_order_mut(order_id).unwrap();
        for line in order.lines.iter_mut().filter(|line| !line.is_display()) {
            if line.qty_delivered < line.qty_ordered {
                line.qty_delivered += dec!(1);
            }
        }
    }
    f.store.invoice_sale_order(order_id, f.sale_journal).unwrap()
}

fn add_qty_received_and_create_invoice(f: &mut ErpFixture, order_id: PurchaseOrderId) -> InvoiceId {
    {
        let order = f.store.purchase_order_mut(order_id).unwrap();
        for line in order.lines.iter_mut().filter(|line| !line.is_display()) {
            if line.qty_received < line.qty_ordered {
                line.qty_received += dec!(1);
            }
        }
    }
    f.store
        .invoice_purchase_order(order_id, f.purchase_journal)
        .unwrap()
}

#[test]
fn test_callback_different_sale_order_00() {
    init_test_tracing();
    let mut f = ErpFixture::new();
    let product_1 = ProductBuilder::new()
        .with_name("product 1")
        .with_list_price(Money::new(dec!(5), Currency::USD))
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    let product_2 = ProductBuilder::new()
        .with_name("product 2")
        .with_list_price(Money::new(dec!(10), Currency::USD))
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    f.store.add_product(product_1.clone());
    f.store.add_product(product_2.clone());

    let sale_order = f.store.add_sale_order(
        SaleOrderBuilder::new(f.partner_a, f.company)
            .with_section("Dummy section")
            .with_section("Dummy section")
            .with_product(&product_1, dec!(1))
            .with_product(&product_2, dec!(1))
            .build(),
    );
    let sale_order_2 = f.store.add_sale_order(
        SaleOrderBuilder::new(f.partner_a, f.company)
            .with_section("Dummy section")
            .with_section("Dummy section")
            .with_product(&product_1, dec!(1))
            .with_product(&product_2, dec!(1))
            .build(),
    );
    f.store.sale_order_mut(sale_order).unwrap().confirm().unwrap();
    f.store.sale_order_mut(sale_order_2).unwrap().confirm().unwrap();

    let invoice_1 = f.store.invoice_sale_order(sale_order, f.sale_journal).unwrap();
    let invoice_2 = f.store.invoice_sale_order(sale_order_2, f.sale_journal).unwrap();
    assert_ne!(invoice_1, invoice_2);
    // Section lines never produce invoice lines.
    assert_eq!(f.store.invoice(invoice_1).unwrap().lines.len(), 2);

    let today = Utc::now().date_naive();
    let orders = [OrderRef::Sale(sale_order), OrderRef::Sale(sale_order_2)];
    let outcome = f
        .store
        .auto_merge_draft_invoices(
            &orders,
            &MergeOptions {
                keep_references: false,
                invoice_date: Some(today),
                ..MergeOptions::default()
            },
        )
        .unwrap();

    // The surviving drafts related to the orders are exactly the outcome keys.
    let mut drafts = f.store.draft_invoice_ids_for_orders(&orders).unwrap();
    drafts.sort();
    let survivors: Vec<InvoiceId> = outcome.keys().copied().collect();
    assert_eq!(drafts, survivors);

    assert_eq!(outcome.len(), 1);
    let (survivor, order_lines) = outcome.iter().next().unwrap();
    // Lines invoicing different order lines stay separate.
    let merged = f.store.invoice(*survivor).unwrap();
    assert_eq!(merged.lines.len(), 4);
    assert_eq!(merged.invoice_date, Some(today));
    assert_eq!(order_lines.len(), 4);

    assert_sale_quantities(f.store.sale_order(sale_order).unwrap(), dec!(0), dec!(1));
    assert_sale_quantities(f.store.sale_order(sale_order_2).unwrap(), dec!(0), dec!(1));
}

#[test]
fn test_callback_different_sale_order_01() {
    init_test_tracing();
    let mut f = ErpFixture::new();
    let product_1 = ProductBuilder::new()
        .with_name("product 1")
        .with_list_price(Money::new(dec!(5), Currency::USD))
        .with_invoice_policy(InvoicePolicy::Delivery)
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    let product_2 = ProductBuilder::new()
        .with_name("product 2")
        .with_list_price(Money::new(dec!(10), Currency::USD))
        .with_invoice_policy(InvoicePolicy::Delivery)
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    f.store.add_product(product_1.clone());
    f.store.add_product(product_2.clone());

    let sale_order = f.store.add_sale_order(
        SaleOrderBuilder::new(f.partner_a, f.company)
            .with_product(&product_1, dec!(5))
            .with_product(&product_2, dec!(5))
            .build(),
    );
    let sale_order_2 = f.store.add_sale_order(
        SaleOrderBuilder::new(f.partner_a, f.company)
            .with_product(&product_1, dec!(5))
            .with_product(&product_2, dec!(5))
            .build(),
    );
    f.store.sale_order_mut(sale_order).unwrap().confirm().unwrap();
    f.store.sale_order_mut(sale_order_2).unwrap().confirm().unwrap();

    let first_of_order_1 = add_qty_delivered_and_create_invoice(&mut f, sale_order);
    add_qty_delivered_and_create_invoice(&mut f, sale_order);
    add_qty_delivered_and_create_invoice(&mut f, sale_order);
    let first_of_order_2 = add_qty_delivered_and_create_invoice(&mut f, sale_order_2);
    add_qty_delivered_and_create_invoice(&mut f, sale_order_2);
    add_qty_delivered_and_create_invoice(&mut f, sale_order_2);

    assert_eq!(
        f.store
            .draft_invoice_ids_for_orders(&[OrderRef::Sale(sale_order)])
            .unwrap()
            .len(),
        3
    );
    assert_eq!(
        f.store
            .draft_invoice_ids_for_orders(&[OrderRef::Sale(sale_order_2)])
            .unwrap()
            .len(),
        3
    );
    assert_eq!(f.store.invoice_count(), 6);
    assert_sale_quantities(f.store.sale_order(sale_order).unwrap(), dec!(3), dec!(3));
    assert_sale_quantities(f.store.sale_order(sale_order_2).unwrap(), dec!(3), dec!(3));

    do_merge(
        &mut f.store,
        &[first_of_order_1, first_of_order_2],
        &merge_options_without_references(),
    )
    .unwrap();

    // The merged document now belongs to both orders, so each order still
    // sees three invoices while the total dropped to five.
    assert_eq!(
        f.store
            .draft_invoice_ids_for_orders(&[OrderRef::Sale(sale_order)])
            .unwrap()
            .len(),
        3
    );
    assert_eq!(
        f.store
            .draft_invoice_ids_for_orders(&[OrderRef::Sale(sale_order_2)])
            .unwrap()
            .len(),
        3
    );
    assert_eq!(f.store.invoice_count(), 5);
    assert_sale_quantities(f.store.sale_order(sale_order).unwrap(), dec!(3), dec!(3));
    assert_sale_quantities(f.store.sale_order(sale_order_2).unwrap(), dec!(3), dec!(3));
}

#[test]
fn test_callback_same_sale_order() {
    init_test_tracing();
    let mut f = ErpFixture::new();
    let product_1 = ProductBuilder::new()
        .with_name("product 1")
        .with_list_price(Money::new(dec!(5), Currency::USD))
        .with_invoice_policy(InvoicePolicy::Delivery)
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    let product_2 = ProductBuilder::new()
        .with_name("product 2")
        .with_list_price(Money::new(dec!(10), Currency::USD))
        .with_invoice_policy(InvoicePolicy::Delivery)
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    f.store.add_product(product_1.clone());
    f.store.add_product(product_2.clone());

    let sale_order = f.store.add_sale_order(
        SaleOrderBuilder::new(f.partner_a, f.company)
            .with_product(&product_1, dec!(5))
            .with_product(&product_2, dec!(5))
            .build(),
    );
    f.store.sale_order_mut(sale_order).unwrap().confirm().unwrap();

    let invoices: Vec<InvoiceId> = (0..5)
        .map(|_| add_qty_delivered_and_create_invoice(&mut f, sale_order))
        .collect();

    f.store.cancel_invoice(invoices[4]).unwrap();
    f.store.post_invoice(invoices[3]).unwrap();

    assert_eq!(f.store.invoice_count(), 5);
    assert_sale_quantities(f.store.sale_order(sale_order).unwrap(), dec!(5), dec!(4));

    do_merge(
        &mut f.store,
        &[invoices[0], invoices[1]],
        &merge_options_without_references(),
    )
    .unwrap();

    assert_eq!(f.store.invoice_count(), 4);
    assert_sale_quantities(f.store.sale_order(sale_order).unwrap(), dec!(5), dec!(4));

    // Lines invoicing the same order line were combined.
    let survivor = f.store.invoice(invoices[0]).unwrap();
    assert_eq!(survivor.lines.len(), 2);
    assert!(survivor.lines.iter().all(|line| line.quantity == dec!(2)));
}

#[test]
fn test_callback_different_purchase_order() {
    init_test_tracing();
    let mut f = ErpFixture::new();
    let product_1 = ProductBuilder::new()
        .with_name("product 1")
        .with_list_price(Money::new(dec!(5), Currency::USD))
        .with_invoice_policy(InvoicePolicy::Delivery)
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    let product_2 = ProductBuilder::new()
        .with_name("product 2")
        .with_list_price(Money::new(dec!(10), Currency::USD))
        .with_invoice_policy(InvoicePolicy::Delivery)
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    f.store.add_product(product_1.clone());
    f.store.add_product(product_2.clone());

    let purchase_order = f.store.add_purchase_order(
        PurchaseOrderBuilder::new(f.partner_a, f.company)
            .with_product(&product_1, dec!(5))
            .with_product(&product_2, dec!(5))
            .build(),
    );
    let purchase_order_2 = f.store.add_purchase_order(
        PurchaseOrderBuilder::new(f.partner_a, f.company)
            .with_product(&product_1, dec!(5))
            .with_product(&product_2, dec!(5))
            .build(),
    );
    f.store
        .purchase_order_mut(purchase_order)
        .unwrap()
        .confirm()
        .unwrap();
    f.store
        .purchase_order_mut(purchase_order_2)
        .unwrap()
        .confirm()
        .unwrap();

    let first_of_order_1 = add_qty_received_and_create_invoice(&mut f, purchase_order);
    add_qty_received_and_create_invoice(&mut f, purchase_order);
    add_qty_received_and_create_invoice(&mut f, purchase_order);
    let first_of_order_2 = add_qty_received_and_create_invoice(&mut f, purchase_order_2);
    add_qty_received_and_create_invoice(&mut f, purchase_order_2);
    add_qty_received_and_create_invoice(&mut f, purchase_order_2);

    assert_eq!(f.store.invoice_count(), 6);
    assert_purchase_quantities(f.store.purchase_order(purchase_order).unwrap(), dec!(3), dec!(3));
    assert_purchase_quantities(
        f.store.purchase_order(purchase_order_2).unwrap(),
        dec!(3),
        dec!(3),
    );

    do_merge(
        &mut f.store,
        &[first_of_order_1, first_of_order_2],
        &merge_options_without_references(),
    )
    .unwrap();

    assert_eq!(
        f.store
            .draft_invoice_ids_for_orders(&[OrderRef::Purchase(purchase_order)])
            .unwrap()
            .len(),
        3
    );
    assert_eq!(
        f.store
            .draft_invoice_ids_for_orders(&[OrderRef::Purchase(purchase_order_2)])
            .unwrap()
            .len(),
        3
    );
    assert_eq!(f.store.invoice_count(), 5);
    assert_purchase_quantities(f.store.purchase_order(purchase_order).unwrap(), dec!(3), dec!(3));
    assert_purchase_quantities(
        f.store.purchase_order(purchase_order_2).unwrap(),
        dec!(3),
        dec!(3),
    );
}

#[test]
fn test_callback_same_purchase_order() {
    init_test_tracing();
    let mut f = ErpFixture::new();
    let product_1 = ProductBuilder::new()
        .with_name("product 1")
        .with_list_price(Money::new(dec!(5), Currency::USD))
        .with_invoice_policy(InvoicePolicy::Delivery)
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    let product_2 = ProductBuilder::new()
        .with_name("product 2")
        .with_list_price(Money::new(dec!(10), Currency::USD))
        .with_invoice_policy(InvoicePolicy::Delivery)
        .with_income_account(f.income_account)
        .with_expense_account(f.expense_account)
        .build();
    f.store.add_product(product_1.clone());
    f.store.add_product(product_2.clone());

    let purchase_order = f.store.add_purchase_order(
        PurchaseOrderBuilder::new(f.partner_a, f.company)
            .with_product(&product_1, dec!(5))
            .with_product(&product_2, dec!(5))
            .build(),
    );
    f.store
        .purchase_order_mut(purchase_order)
        .unwrap()
        .confirm()
        .unwrap();

    let invoices: Vec<InvoiceId> = (0..5)
        .map(|_| add_qty_received_and_create_invoice(&mut f, purchase_order))
        .collect();

    f.store.cancel_invoice(invoices[4]).unwrap();
    f.store.post_invoice(invoices[3]).unwrap();

    assert_eq!(f.store.invoice_count(), 5);
    assert_purchase_quantities(f.store.purchase_order(purchase_order).unwrap(), dec!(5), dec!(4));

    do_merge(
        &mut f.store,
        &[invoices[0], invoices[1]],
        &merge_options_without_references(),
    )
    .unwrap();

    assert_eq!(f.store.invoice_count(), 4);
    assert_purchase_quantities(f.store.purchase_order(purchase_order).unwrap(), dec!(5), dec!(4));

    let survivor = f.store.invoice(invoices[0]).unwrap();
    assert_eq!(survivor.lines.len(), 2);
    assert!(survivor.lines.iter().all(|line| line.quantity == dec!(2)));
}
