use std::fmt;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::Utc;

use crate::domain::cart::CartLine;
use crate::domain::errors::DomainError;
use crate::domain::ports::{
    CartRepository, CatalogRepository, ProfileRepository, TransactionRepository,
};
use crate::domain::pricing::{cart_total, checkout_totals, TaxRate};
use crate::domain::transaction::{
    CheckoutDraft, CheckoutItem, ContactInfo, ContactOverrides, InvoiceNumber, TransactionStatus,
    TransactionView,
};

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub contact: ContactOverrides,
    pub payment_method_id: i32,
    pub shipping_id: i32,
}

/// Where a checkout got to. Anything short of `Committed` left no trace in
/// the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    NoCart,
    Validating,
    Reserving,
    Committed,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStage::NoCart => "no-cart",
            CheckoutStage::Validating => "validating",
            CheckoutStage::Reserving => "reserving",
            CheckoutStage::Committed => "committed",
        };
        f.write_str(name)
    }
}

pub struct CheckoutService {
    catalog: Arc<dyn CatalogRepository>,
    profiles: Arc<dyn ProfileRepository>,
    carts: Arc<dyn CartRepository>,
    transactions: Arc<dyn TransactionRepository>,
    tax_rate: TaxRate,
}

impl CheckoutService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        profiles: Arc<dyn ProfileRepository>,
        carts: Arc<dyn CartRepository>,
        transactions: Arc<dyn TransactionRepository>,
        tax_rate: TaxRate,
    ) -> Self {
        Self {
            catalog,
            profiles,
            carts,
            transactions,
            tax_rate,
        }
    }

    /// Turns the user's cart into a transaction. Either the transaction is
    /// stored, stock is decremented and the cart is emptied, or nothing
    /// changes at all.
    pub fn checkout(
        &self,
        user_id: i32,
        request: CheckoutRequest,
    ) -> Result<TransactionView, DomainError> {
        let mut stage = CheckoutStage::Validating;
        let result = self.run(user_id, request, &mut stage);

        match &result {
            Ok(tx) => log::info!(
                "checkout committed: user={} invoice={} total={}",
                user_id,
                tx.invoice_number,
                tx.total
            ),
            Err(e @ DomainError::InsufficientStockAtCheckout { .. })
            | Err(e @ DomainError::CartChanged)
            | Err(e @ DomainError::Conflict(_)) => {
                log::warn!("checkout aborted at {}: user={} {}", stage, user_id, e)
            }
            Err(e @ DomainError::Internal(_)) => {
                log::error!("checkout failed at {}: user={} {}", stage, user_id, e)
            }
            Err(e) => log::debug!("checkout rejected at {}: user={} {}", stage, user_id, e),
        }

        result
    }

    fn run(
        &self,
        user_id: i32,
        request: CheckoutRequest,
        stage: &mut CheckoutStage,
    ) -> Result<TransactionView, DomainError> {
        let profile = self
            .profiles
            .profile(user_id)?
            .ok_or(DomainError::NotFound("User"))?;
        let contact = ContactInfo::resolve(request.contact, &profile)?;

        let lines = self.carts.list_lines(user_id)?;
        if lines.is_empty() {
            *stage = CheckoutStage::NoCart;
            return Err(DomainError::EmptyCart);
        }

        let shipping = self
            .catalog
            .shipping(request.shipping_id)?
            .ok_or(DomainError::ShippingNotFound)?;
        let payment = self
            .catalog
            .payment_method(request.payment_method_id)?
            .ok_or(DomainError::PaymentMethodNotFound)?;

        let items = freeze_lines(&lines);
        let subtotals: Vec<&BigDecimal> = items.iter().map(|item| &item.subtotal).collect();
        let totals = checkout_totals(cart_total(subtotals), shipping.surcharge, &self.tax_rate);

        let draft = CheckoutDraft {
            user_id,
            invoice_number: InvoiceNumber::generate(user_id, Utc::now()),
            contact,
            payment_method_id: payment.id,
            shipping_id: shipping.id,
            status: TransactionStatus::Pending,
            totals,
            items,
        };

        *stage = CheckoutStage::Reserving;
        let transaction_id = self.transactions.commit_checkout(&draft)?;
        *stage = CheckoutStage::Committed;

        self.transactions
            .find_by_id(transaction_id)?
            .ok_or_else(|| {
                DomainError::Internal(format!(
                    "transaction {transaction_id} missing right after commit"
                ))
            })
    }
}

/// Prices every line at today's catalog prices; the result is what gets stored.
fn freeze_lines(lines: &[CartLine]) -> Vec<CheckoutItem> {
    lines
        .iter()
        .map(|line| CheckoutItem {
            cart_line_id: line.id,
            product_id: line.product.id,
            variant_id: line.variant.as_ref().map(|v| v.id),
            size_id: line.size.as_ref().map(|s| s.id),
            quantity: line.quantity,
            subtotal: line.subtotal(),
        })
        .collect()
}
