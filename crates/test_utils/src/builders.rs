//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use fake::faker::lorem::en::Word;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{AccountId, CompanyId, Currency, JournalId, Money, PartnerId};
use domain_accounting::{Invoice, InvoiceLine, MoveType};
use domain_orders::product::{InvoicePolicy, Product};
use domain_orders::purchase::{PurchaseOrder, PurchaseOrderLine};
use domain_orders::sale::{SaleOrder, SaleOrderLine};

/// Builder for draft invoices
pub struct InvoiceBuilder {
    move_type: MoveType,
    partner_id: PartnerId,
    journal_id: JournalId,
    company_id: CompanyId,
    currency: Currency,
    name: Option<String>,
    reference: Option<String>,
    narration: Option<String>,
    lines: Vec<InvoiceLine>,
}

impl InvoiceBuilder {
    /// Creates a builder for a customer invoice in USD
    pub fn new(partner_id: PartnerId, journal_id: JournalId, company_id: CompanyId) -> Self {
        Self {
            move_type: MoveType::OutInvoice,
            partner_id,
            journal_id,
            company_id,
            currency: Currency::USD,
            name: None,
            reference: None,
            narration: None,
            lines: Vec::new(),
        }
    }

    /// Sets the document type
    pub fn with_move_type(mut self, move_type: MoveType) -> Self {
        self.move_type = move_type;
        self
    }

    /// Sets the currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the document number
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the partner reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the narration
    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }

    /// Appends a line
    pub fn with_line(mut self, line: InvoiceLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Builds the invoice
    pub fn build(self) -> Invoice {
        let mut invoice = Invoice::new(
            self.move_type,
            self.partner_id,
            self.journal_id,
            self.company_id,
            self.currency,
        );
        invoice.name = self.name;
        invoice.reference = self.reference;
        invoice.narration = self.narration;
        for line in self.lines {
            invoice.add_line(line);
        }
        invoice
    }
}

/// Builder for catalog products
pub struct ProductBuilder {
    name: String,
    list_price: Money,
    invoice_policy: InvoicePolicy,
    income_account_id: AccountId,
    expense_account_id: AccountId,
}

impl ProductBuilder {
    /// Creates a builder with a generated name and a 5.00 USD list price
    pub fn new() -> Self {
        Self {
            name: Word().fake(),
            list_price: Money::new(dec!(5), Currency::USD),
            invoice_policy: InvoicePolicy::Order,
            income_account_id: AccountId::new(),
            expense_account_id: AccountId::new(),
        }
    }

    /// Sets the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the list price
    pub fn with_list_price(mut self, price: Money) -> Self {
        self.list_price = price;
        self
    }

    /// Sets the invoicing policy
    pub fn with_invoice_policy(mut self, policy: InvoicePolicy) -> Self {
        self.invoice_policy = policy;
        self
    }

    /// Books revenue to the given account
    pub fn with_income_account(mut self, account: AccountId) -> Self {
        self.income_account_id = account;
        self
    }

    /// Books expenses to the given account
    pub fn with_expense_account(mut self, account: AccountId) -> Self {
        self.expense_account_id = account;
        self
    }

    /// Builds the product
    pub fn build(self) -> Product {
        Product::new(
            self.name,
            self.list_price,
            self.income_account_id,
            self.expense_account_id,
        )
        .with_invoice_policy(self.invoice_policy)
    }
}

impl Default for ProductBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for sale orders
pub struct SaleOrderBuilder {
    partner_id: PartnerId,
    company_id: CompanyId,
    currency: Currency,
    lines: Vec<SaleOrderLine>,
}

impl SaleOrderBuilder {
    /// Creates a builder for a draft order in USD
    pub fn new(partner_id: PartnerId, company_id: CompanyId) -> Self {
        Self {
            partner_id,
            company_id,
            currency: Currency::USD,
            lines: Vec::new(),
        }
    }

    /// Appends a product line
    pub fn with_product(mut self, product: &Product, qty_ordered: Decimal) -> Self {
        self.lines.push(SaleOrderLine::for_product(product, qty_ordered));
        self
    }

    /// Appends a section header line
    pub fn with_section(mut self, label: impl Into<String>) -> Self {
        self.lines.push(SaleOrderLine::section(label, self.currency));
        self
    }

    /// Builds the order
    pub fn build(self) -> SaleOrder {
        let mut order = SaleOrder::new(self.partner_id, self.company_id, self.currency);
        for line in self.lines {
            order.add_line(line);
        }
        order
    }
}

/// Builder for purchase orders
pub struct PurchaseOrderBuilder {
    partner_id: PartnerId,
    company_id: CompanyId,
    currency: Currency,
    lines: Vec<PurchaseOrderLine>,
}

impl PurchaseOrderBuilder {
    /// Creates a builder for a draft order in USD
    pub fn new(partner_id: PartnerId, company_id: CompanyId) -> Self {
        Self {
            partner_id,
            company_id,
            currency: Currency::USD,
            lines: Vec::new(),
        }
    }

    /// Appends a product line
    pub fn with_product(mut self, product: &Product, qty_ordered: Decimal) -> Self {
        self.lines
            .push(PurchaseOrderLine::for_product(product, qty_ordered));
        self
    }

    /// Builds the order
    pub fn build(self) -> PurchaseOrder {
        let mut order = PurchaseOrder::new(self.partner_id, self.company_id, self.currency);
        for line in self.lines {
            order.add_line(line);
        }
        order
    }
}
