//! Pre-wired test fixtures
//!
//! [`ErpFixture`] mirrors the setup most merge scenarios need: two
//! companies, sale and purchase journals, two partners, and a catalog
//! product, all registered in a fresh store.

use rust_decimal_macros::dec;

use core_kernel::{
    AccountId, CompanyId, Currency, InvoiceId, JournalId, Money, PartnerId, ProductId,
};
use domain_accounting::journal::{Journal, JournalType};
use domain_accounting::{Invoice, InvoiceLine, MoveType};
use domain_orders::product::Product;
use infra_store::ErpStore;

/// A store wired with the standard master data used across the test suite
pub struct ErpFixture {
    pub store: ErpStore,
    pub company: CompanyId,
    pub company_2: CompanyId,
    pub partner_a: PartnerId,
    pub partner_b: PartnerId,
    pub sale_journal: JournalId,
    pub purchase_journal: JournalId,
    pub sale_journal_company_2: JournalId,
    pub income_account: AccountId,
    pub expense_account: AccountId,
    pub product_a: ProductId,
}

impl ErpFixture {
    /// Builds the standard fixture
    pub fn new() -> Self {
        let mut store = ErpStore::new();
        let company = CompanyId::new();
        let company_2 = CompanyId::new();
        let income_account = AccountId::new();
        let expense_account = AccountId::new();

        let sale_journal = store.add_journal(Journal::new(
            "INV",
            "Customer Invoices",
            JournalType::Sale,
            company,
        ));
        let purchase_journal = store.add_journal(Journal::new(
            "BILL",
            "Vendor Bills",
            JournalType::Purchase,
            company,
        ));
        let sale_journal_company_2 = store.add_journal(Journal::new(
            "INV2",
            "Customer Invoices (second company)",
            JournalType::Sale,
            company_2,
        ));

        let product_a = store.add_product(Product::new(
            "product a",
            Money::new(dec!(100), Currency::USD),
            income_account,
            expense_account,
        ));

        Self {
            store,
            company,
            company_2,
            partner_a: PartnerId::new(),
            partner_b: PartnerId::new(),
            sale_journal,
            purchase_journal,
            sale_journal_company_2,
            income_account,
            expense_account,
            product_a,
        }
    }

    /// Creates a draft customer invoice for a partner with one line of
    /// `product_a` (quantity 1), the simplest mergeable document
    pub fn customer_invoice(&mut self, partner: PartnerId) -> InvoiceId {
        let mut invoice = Invoice::new(
            MoveType::OutInvoice,
            partner,
            self.sale_journal,
            self.company,
            Currency::USD,
        );
        invoice.add_line(
            InvoiceLine::new(
                "product a",
                self.income_account,
                dec!(1),
                Money::new(dec!(100), Currency::USD),
            )
            .with_product(self.product_a),
        );
        self.store.create_invoice(invoice)
    }

    /// Creates a draft vendor bill for a partner with one line of
    /// `product_a` (quantity 1)
    pub fn vendor_bill(&mut self, partner: PartnerId) -> InvoiceId {
        let mut invoice = Invoice::new(
            MoveType::InInvoice,
            partner,
            self.purchase_journal,
            self.company,
            Currency::USD,
        );
        invoice.add_line(
            InvoiceLine::new(
                "product a",
                self.expense_account,
                dec!(1),
                Money::new(dec!(100), Currency::USD),
            )
            .with_product(self.product_a),
        );
        self.store.create_invoice(invoice)
    }

    /// Creates a draft customer invoice in the second company's journal
    pub fn customer_invoice_company_2(&mut self, partner: PartnerId) -> InvoiceId {
        let mut invoice = Invoice::new(
            MoveType::OutInvoice,
            partner,
            self.sale_journal_company_2,
            self.company_2,
            Currency::USD,
        );
        invoice.add_line(
            InvoiceLine::new(
                "product a",
                self.income_account,
                dec!(1),
                Money::new(dec!(100), Currency::USD),
            )
            .with_product(self.product_a),
        );
        self.store.create_invoice(invoice)
    }
}

impl Default for ErpFixture {
    fn default() -> Self {
        Self::new()
    }
}
