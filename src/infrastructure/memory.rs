//! Process-local implementation of every port. All state sits behind one
//! mutex, so each repository call is atomic; multi-row writes are staged on
//! copies and swapped in only when every step succeeded.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::domain::cart::{quantity_after_add, CartLine, CartLineInput, LineKey};
use crate::domain::catalog::{PaymentMethod, PriceOption, Product, ShippingMethod, UserProfile};
use crate::domain::errors::DomainError;
use crate::domain::ports::{
    CartRepository, CatalogRepository, ProfileRepository, TransactionRepository,
};
use crate::domain::transaction::{
    CheckoutDraft, CheckoutItem, ListResult, PageRequest, TransactionItemView, TransactionStatus,
    TransactionView,
};

#[derive(Debug, Clone)]
struct CartRow {
    user_id: i32,
    key: LineKey,
    quantity: i32,
}

#[derive(Debug, Clone)]
struct StoredTransaction {
    draft: CheckoutDraft,
    status: TransactionStatus,
    item_ids: Vec<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i32,
    profiles: HashMap<i32, UserProfile>,
    products: HashMap<i32, Product>,
    variants: HashMap<i32, PriceOption>,
    sizes: HashMap<i32, PriceOption>,
    shippings: HashMap<i32, ShippingMethod>,
    payment_methods: HashMap<i32, PaymentMethod>,
    carts: BTreeMap<i32, CartRow>,
    transactions: BTreeMap<i32, StoredTransaction>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn product(&self, id: i32) -> Result<Product, DomainError> {
        self.products
            .get(&id)
            .cloned()
            .ok_or(DomainError::NotFound("Product"))
    }

    fn option(
        options: &HashMap<i32, PriceOption>,
        id: Option<i32>,
        entity: &'static str,
    ) -> Result<Option<PriceOption>, DomainError> {
        id.map(|id| options.get(&id).cloned().ok_or(DomainError::NotFound(entity)))
            .transpose()
    }

    fn cart_line(&self, id: i32, row: &CartRow) -> Result<CartLine, DomainError> {
        Ok(CartLine {
            id,
            user_id: row.user_id,
            product: self.product(row.key.product_id)?,
            variant: Self::option(&self.variants, row.key.variant_id, "Variant")?,
            size: Self::option(&self.sizes, row.key.size_id, "Size")?,
            quantity: row.quantity,
        })
    }

    fn view(&self, id: i32, stored: &StoredTransaction) -> TransactionView {
        let draft = &stored.draft;
        let name_of = |options: &HashMap<i32, PriceOption>, id: Option<i32>| {
            id.and_then(|id| options.get(&id)).map(|o| o.name.clone())
        };
        let items = stored
            .item_ids
            .iter()
            .zip(&draft.items)
            .map(|(item_id, item)| TransactionItemView {
                id: *item_id,
                product_id: item.product_id,
                title: self
                    .products
                    .get(&item.product_id)
                    .map(|p| p.title.clone())
                    .unwrap_or_default(),
                variant: name_of(&self.variants, item.variant_id),
                size: name_of(&self.sizes, item.size_id),
                quantity: item.quantity,
                subtotal: item.subtotal.clone(),
            })
            .collect();

        TransactionView {
            id,
            user_id: draft.user_id,
            invoice_number: draft.invoice_number.as_str().to_string(),
            fullname: draft.contact.fullname.clone(),
            email: draft.contact.email.clone(),
            phone: draft.contact.phone.clone(),
            address: draft.contact.address.clone(),
            payment_method: self
                .payment_methods
                .get(&draft.payment_method_id)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            shipping: self
                .shippings
                .get(&draft.shipping_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            status: stored.status,
            items_total: draft.totals.items_total.clone(),
            shipping_fee: draft.totals.shipping_fee.clone(),
            tax_amount: draft.totals.tax_amount.clone(),
            total: draft.totals.total.clone(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            items,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_user(
        &self,
        fullname: &str,
        email: &str,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        state.profiles.insert(
            id,
            UserProfile {
                user_id: id,
                fullname: Some(fullname.to_string()),
                email: Some(email.to_string()),
                phone: phone.map(str::to_string),
                address: address.map(str::to_string),
            },
        );
        id
    }

    pub fn insert_product(&self, title: &str, base_price: i64, stock: i32) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        state.products.insert(
            id,
            Product {
                id,
                title: title.to_string(),
                base_price: BigDecimal::from(base_price),
                stock,
                image: None,
            },
        );
        id
    }

    pub fn insert_variant(&self, name: &str, surcharge: i64) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        state.variants.insert(id, price_option(id, name, surcharge));
        id
    }

    pub fn insert_size(&self, name: &str, surcharge: i64) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        state.sizes.insert(id, price_option(id, name, surcharge));
        id
    }

    pub fn insert_shipping(&self, name: &str, surcharge: i64) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        state.shippings.insert(
            id,
            ShippingMethod {
                id,
                name: name.to_string(),
                surcharge: BigDecimal::from(surcharge),
            },
        );
        id
    }

    pub fn insert_payment_method(&self, name: &str) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        state.payment_methods.insert(
            id,
            PaymentMethod {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    pub fn product_stock(&self, product_id: i32) -> Option<i32> {
        self.state().products.get(&product_id).map(|p| p.stock)
    }

    pub fn set_product_stock(&self, product_id: i32, stock: i32) {
        if let Some(product) = self.state().products.get_mut(&product_id) {
            product.stock = stock;
        }
    }

    pub fn set_product_price(&self, product_id: i32, base_price: i64) {
        if let Some(product) = self.state().products.get_mut(&product_id) {
            product.base_price = BigDecimal::from(base_price);
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.state().transactions.len()
    }
}

fn price_option(id: i32, name: &str, surcharge: i64) -> PriceOption {
    PriceOption {
        id,
        name: name.to_string(),
        surcharge: BigDecimal::from(surcharge),
    }
}

impl CatalogRepository for InMemoryStore {
    fn product(&self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self.state().products.get(&id).cloned())
    }

    fn variant(&self, id: i32) -> Result<Option<PriceOption>, DomainError> {
        Ok(self.state().variants.get(&id).cloned())
    }

    fn size(&self, id: i32) -> Result<Option<PriceOption>, DomainError> {
        Ok(self.state().sizes.get(&id).cloned())
    }

    fn shipping(&self, id: i32) -> Result<Option<ShippingMethod>, DomainError> {
        Ok(self.state().shippings.get(&id).cloned())
    }

    fn payment_method(&self, id: i32) -> Result<Option<PaymentMethod>, DomainError> {
        Ok(self.state().payment_methods.get(&id).cloned())
    }
}

impl ProfileRepository for InMemoryStore {
    fn profile(&self, user_id: i32) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.state().profiles.get(&user_id).cloned())
    }
}

impl CartRepository for InMemoryStore {
    fn add_lines(
        &self,
        user_id: i32,
        lines: &[CartLineInput],
    ) -> Result<Vec<CartLine>, DomainError> {
        let mut state = self.state();
        let mut carts = state.carts.clone();
        let mut next_id = state.last_id;
        let mut touched = Vec::with_capacity(lines.len());

        for line in lines {
            let product = state.product(line.product_id)?;
            State::option(&state.variants, line.variant_id, "Variant")?;
            State::option(&state.sizes, line.size_id, "Size")?;

            let key = line.key();
            let existing = carts
                .iter()
                .find(|(_, row)| row.user_id == user_id && row.key == key)
                .map(|(id, row)| (*id, row.quantity));
            let in_cart = existing.map_or(0, |(_, quantity)| quantity);
            let quantity = quantity_after_add(&product, in_cart, line.quantity)?;

            let id = match existing {
                Some((id, _)) => id,
                None => {
                    next_id += 1;
                    next_id
                }
            };
            carts.insert(
                id,
                CartRow {
                    user_id,
                    key,
                    quantity,
                },
            );
            if !touched.contains(&id) {
                touched.push(id);
            }
        }

        state.carts = carts;
        state.last_id = next_id;
        touched
            .into_iter()
            .map(|id| {
                let row = &state.carts[&id];
                state.cart_line(id, row)
            })
            .collect()
    }

    fn list_lines(&self, user_id: i32) -> Result<Vec<CartLine>, DomainError> {
        let state = self.state();
        state
            .carts
            .iter()
            .filter(|(_, row)| row.user_id == user_id)
            .map(|(id, row)| state.cart_line(*id, row))
            .collect()
    }

    fn remove_line(&self, user_id: i32, line_id: i32) -> Result<bool, DomainError> {
        let mut state = self.state();
        let owned = state
            .carts
            .get(&line_id)
            .is_some_and(|row| row.user_id == user_id);
        if owned {
            state.carts.remove(&line_id);
        }
        Ok(owned)
    }
}

impl TransactionRepository for InMemoryStore {
    fn commit_checkout(&self, draft: &CheckoutDraft) -> Result<i32, DomainError> {
        let mut state = self.state();

        if state
            .transactions
            .values()
            .any(|t| t.draft.invoice_number == draft.invoice_number)
        {
            return Err(DomainError::Conflict(format!(
                "invoice number {} already exists",
                draft.invoice_number.as_str()
            )));
        }

        let mut products = state.products.clone();
        for CheckoutItem {
            product_id,
            quantity,
            ..
        } in &draft.items
        {
            let product = products
                .get_mut(product_id)
                .ok_or(DomainError::NotFound("Product"))?;
            if product.stock < *quantity {
                return Err(DomainError::InsufficientStockAtCheckout {
                    product_id: *product_id,
                });
            }
            product.stock -= quantity;
        }

        let mut carts = state.carts.clone();
        for item in &draft.items {
            let matches = carts.get(&item.cart_line_id).is_some_and(|row| {
                row.user_id == draft.user_id && row.quantity == item.quantity
            });
            if !matches {
                return Err(DomainError::CartChanged);
            }
            carts.remove(&item.cart_line_id);
        }

        let id = state.next_id();
        let item_ids = draft.items.iter().map(|_| state.next_id()).collect();
        let now = Utc::now();
        state.products = products;
        state.carts = carts;
        state.transactions.insert(
            id,
            StoredTransaction {
                draft: draft.clone(),
                status: draft.status,
                item_ids,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    fn find_by_id(&self, id: i32) -> Result<Option<TransactionView>, DomainError> {
        let state = self.state();
        Ok(state.transactions.get(&id).map(|t| state.view(id, t)))
    }

    fn list(&self, user_id: Option<i32>, page: PageRequest) -> Result<ListResult, DomainError> {
        let state = self.state();
        let mut matching: Vec<(&i32, &StoredTransaction)> = state
            .transactions
            .iter()
            .filter(|(_, t)| user_id.map_or(true, |u| t.draft.user_id == u))
            .collect();
        matching.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at).then(b.0.cmp(a.0)));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|(id, t)| {
                let mut view = state.view(*id, t);
                view.items.clear();
                view
            })
            .collect();
        Ok(ListResult { items, total })
    }

    fn set_status(&self, id: i32, status: TransactionStatus) -> Result<bool, DomainError> {
        let mut state = self.state();
        Ok(match state.transactions.get_mut(&id) {
            Some(stored) => {
                stored.status = status;
                stored.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        Ok(self.state().transactions.remove(&id).is_some())
    }
}
