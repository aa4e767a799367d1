use super::cart::{CartLine, CartLineInput};
use super::catalog::{PaymentMethod, PriceOption, Product, ShippingMethod, UserProfile};
use super::errors::DomainError;
use super::transaction::{
    CheckoutDraft, ListResult, PageRequest, TransactionStatus, TransactionView,
};

/// Read-only view of the catalog and the shipping/payment options.
///
/// `product`, `variant` and `size` are the single-row catalog lookups. Cart
/// writes do not go through them: each adapter resolves the same rows inside
/// the transaction that writes the cart, so stock is read under its lock.
pub trait CatalogRepository: Send + Sync + 'static {
    fn product(&self, id: i32) -> Result<Option<Product>, DomainError>;
    fn variant(&self, id: i32) -> Result<Option<PriceOption>, DomainError>;
    fn size(&self, id: i32) -> Result<Option<PriceOption>, DomainError>;
    fn shipping(&self, id: i32) -> Result<Option<ShippingMethod>, DomainError>;
    fn payment_method(&self, id: i32) -> Result<Option<PaymentMethod>, DomainError>;
}

pub trait ProfileRepository: Send + Sync + 'static {
    fn profile(&self, user_id: i32) -> Result<Option<UserProfile>, DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    /// Applies the whole batch or nothing. Lines matching an existing
    /// product/variant/size combination increase its quantity.
    fn add_lines(&self, user_id: i32, lines: &[CartLineInput])
        -> Result<Vec<CartLine>, DomainError>;
    fn list_lines(&self, user_id: i32) -> Result<Vec<CartLine>, DomainError>;
    /// Returns `false` when no line with that id belongs to the user.
    fn remove_line(&self, user_id: i32, line_id: i32) -> Result<bool, DomainError>;
}

pub trait TransactionRepository: Send + Sync + 'static {
    /// Persists the transaction and its items, decrements stock and removes
    /// the checked-out cart lines as a single unit. Fails without any
    /// effect when a product cannot cover its quantity or the cart moved on.
    fn commit_checkout(&self, draft: &CheckoutDraft) -> Result<i32, DomainError>;
    fn find_by_id(&self, id: i32) -> Result<Option<TransactionView>, DomainError>;
    /// Lists newest first; `user_id` restricts to one customer's history.
    fn list(&self, user_id: Option<i32>, page: PageRequest) -> Result<ListResult, DomainError>;
    fn set_status(&self, id: i32, status: TransactionStatus) -> Result<bool, DomainError>;
    fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
