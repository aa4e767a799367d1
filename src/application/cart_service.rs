use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::domain::cart::{validate_batch, CartLine, CartLineInput};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::domain::pricing::cart_total;

#[derive(Debug, Clone)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: BigDecimal,
}

pub struct CartService {
    repo: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(repo: Arc<dyn CartRepository>) -> Self {
        Self { repo }
    }

    pub fn add_lines(
        &self,
        user_id: i32,
        lines: Vec<CartLineInput>,
    ) -> Result<Vec<CartLine>, DomainError> {
        validate_batch(&lines)?;
        let added = self.repo.add_lines(user_id, &lines)?;
        log::info!("user {} added {} cart line(s)", user_id, added.len());
        Ok(added)
    }

    pub fn list_lines(&self, user_id: i32) -> Result<CartSummary, DomainError> {
        let lines = self.repo.list_lines(user_id)?;
        let subtotals: Vec<BigDecimal> = lines.iter().map(CartLine::subtotal).collect();
        Ok(CartSummary {
            total: cart_total(&subtotals),
            lines,
        })
    }

    pub fn remove_line(&self, user_id: i32, line_id: i32) -> Result<(), DomainError> {
        if self.repo.remove_line(user_id, line_id)? {
            Ok(())
        } else {
            Err(DomainError::NotFound("Cart item"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryStore;

    fn setup(stock: i32) -> (Arc<InMemoryStore>, CartService, i32) {
        let store = Arc::new(InMemoryStore::new());
        let product = store.insert_product("Espresso Shot", 15000, stock);
        let service = CartService::new(store.clone());
        (store, service, product)
    }

    fn line(product_id: i32, variant_id: Option<i32>, size_id: Option<i32>, quantity: i32) -> CartLineInput {
        CartLineInput {
            product_id,
            variant_id,
            size_id,
            quantity,
        }
    }

    #[test]
    fn adding_two_units_totals_thirty_thousand() {
        let (_store, service, product) = setup(40);

        let added = service
            .add_lines(7, vec![line(product, None, None, 2)])
            .expect("add failed");
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].subtotal(), BigDecimal::from(30000));
        assert_eq!(added[0].product.stock, 40);

        let cart = service.list_lines(7).expect("list failed");
        assert_eq!(cart.total, BigDecimal::from(30000));
    }

    #[test]
    fn same_combination_merges_into_one_line() {
        let (store, service, product) = setup(40);
        let ice = store.insert_variant("Ice", 7000);
        let large = store.insert_size("L", 5000);

        service
            .add_lines(7, vec![line(product, Some(ice), Some(large), 1)])
            .expect("first add");
        service
            .add_lines(7, vec![line(product, Some(ice), Some(large), 2)])
            .expect("second add");

        let cart = service.list_lines(7).expect("list failed");
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.total, BigDecimal::from((15000 + 7000 + 5000) * 3));
    }

    #[test]
    fn different_size_is_a_separate_line() {
        let (store, service, product) = setup(40);
        let regular = store.insert_size("R", 0);
        let large = store.insert_size("L", 5000);

        service
            .add_lines(
                7,
                vec![
                    line(product, None, Some(regular), 1),
                    line(product, None, Some(large), 1),
                ],
            )
            .expect("add failed");

        assert_eq!(service.list_lines(7).expect("list").lines.len(), 2);
    }

    #[test]
    fn second_unit_of_last_item_is_insufficient_stock() {
        let (_store, service, product) = setup(1);

        service
            .add_lines(7, vec![line(product, None, None, 1)])
            .expect("first add");
        let err = service
            .add_lines(7, vec![line(product, None, None, 1)])
            .expect_err("second add must fail");

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }

    #[test]
    fn sold_out_product_is_out_of_stock() {
        let (_store, service, product) = setup(0);
        let err = service
            .add_lines(7, vec![line(product, None, None, 1)])
            .expect_err("must fail");
        assert!(matches!(err, DomainError::OutOfStock { .. }));
    }

    #[test]
    fn failing_line_rolls_back_the_whole_batch() {
        let (store, service, product) = setup(5);
        let other = store.insert_product("Latte", 30000, 2);

        let err = service
            .add_lines(
                7,
                vec![line(product, None, None, 2), line(other, None, None, 3)],
            )
            .expect_err("second line exceeds stock");

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert!(service.list_lines(7).expect("list").lines.is_empty());
    }

    #[test]
    fn duplicates_within_one_batch_share_the_stock_check() {
        let (_store, service, product) = setup(3);
        let err = service
            .add_lines(
                7,
                vec![line(product, None, None, 2), line(product, None, None, 2)],
            )
            .expect_err("4 > 3");
        assert!(matches!(
            err,
            DomainError::InsufficientStock { requested: 4, available: 3, .. }
        ));
    }

    #[test]
    fn repeated_line_in_one_batch_is_reported_once() {
        let (_store, service, product) = setup(5);
        let added = service
            .add_lines(
                7,
                vec![line(product, None, None, 1), line(product, None, None, 2)],
            )
            .expect("add failed");

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].quantity, 3);
        assert_eq!(service.list_lines(7).expect("list").lines.len(), 1);
    }

    #[test]
    fn unknown_references_are_not_found() {
        let (_store, service, product) = setup(5);
        assert!(matches!(
            service.add_lines(7, vec![line(999, None, None, 1)]),
            Err(DomainError::NotFound("Product"))
        ));
        assert!(matches!(
            service.add_lines(7, vec![line(product, Some(999), None, 1)]),
            Err(DomainError::NotFound("Variant"))
        ));
        assert!(matches!(
            service.add_lines(7, vec![line(product, None, Some(999), 1)]),
            Err(DomainError::NotFound("Size"))
        ));
    }

    #[test]
    fn invalid_quantity_is_rejected_before_the_store() {
        let (_store, service, product) = setup(5);
        assert!(matches!(
            service.add_lines(7, vec![line(product, None, None, 0)]),
            Err(DomainError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn empty_cart_lists_as_empty() {
        let (_store, service, _product) = setup(5);
        let cart = service.list_lines(7).expect("list failed");
        assert!(cart.lines.is_empty());
        assert_eq!(cart.total, BigDecimal::from(0));
    }

    #[test]
    fn remove_twice_reports_not_found() {
        let (_store, service, product) = setup(5);
        let added = service
            .add_lines(7, vec![line(product, None, None, 1)])
            .expect("add failed");
        let id = added[0].id;

        service.remove_line(7, id).expect("first remove");
        assert!(matches!(
            service.remove_line(7, id),
            Err(DomainError::NotFound("Cart item"))
        ));
    }

    #[test]
    fn cannot_remove_another_users_line() {
        let (_store, service, product) = setup(5);
        let added = service
            .add_lines(7, vec![line(product, None, None, 1)])
            .expect("add failed");

        assert!(matches!(
            service.remove_line(8, added[0].id),
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(service.list_lines(7).expect("list").lines.len(), 1);
    }
}
