use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::TransactionRepository;
use crate::domain::transaction::{ListResult, PageRequest, TransactionStatus, TransactionView};

pub struct TransactionService {
    repo: Arc<dyn TransactionRepository>,
}

impl TransactionService {
    pub fn new(repo: Arc<dyn TransactionRepository>) -> Self {
        Self { repo }
    }

    pub fn history(&self, user_id: i32, page: PageRequest) -> Result<ListResult, DomainError> {
        self.repo.list(Some(user_id), page)
    }

    /// Another customer's transaction is reported as missing, not forbidden.
    pub fn history_detail(&self, user_id: i32, id: i32) -> Result<TransactionView, DomainError> {
        self.repo
            .find_by_id(id)?
            .filter(|tx| tx.user_id == user_id)
            .ok_or(DomainError::NotFound("Transaction"))
    }

    pub fn list(&self, page: PageRequest) -> Result<ListResult, DomainError> {
        self.repo.list(None, page)
    }

    pub fn get(&self, id: i32) -> Result<TransactionView, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Transaction"))
    }

    pub fn set_status(&self, id: i32, status_id: i32) -> Result<TransactionView, DomainError> {
        let status = TransactionStatus::from_id(status_id)?;
        if !self.repo.set_status(id, status)? {
            return Err(DomainError::NotFound("Transaction"));
        }
        log::info!("transaction {} moved to {}", id, status);
        self.get(id)
    }

    pub fn delete(&self, id: i32) -> Result<(), DomainError> {
        if !self.repo.delete(id)? {
            return Err(DomainError::NotFound("Transaction"));
        }
        log::info!("transaction {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::checkout_service::{CheckoutRequest, CheckoutService};
    use crate::domain::cart::CartLineInput;
    use crate::domain::ports::CartRepository;
    use crate::domain::pricing::TaxRate;
    use crate::domain::transaction::ContactOverrides;
    use crate::infrastructure::memory::InMemoryStore;

    /// Places one order per user and returns the store with their ids.
    fn seeded(users: usize) -> (Arc<InMemoryStore>, TransactionService, Vec<(i32, i32)>) {
        let store = Arc::new(InMemoryStore::new());
        let product = store.insert_product("Latte", 30000, 100);
        let shipping = store.insert_shipping("PickUp", 0);
        let payment = store.insert_payment_method("Cash");
        let checkout = CheckoutService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            TaxRate::default(),
        );

        let placed = (0..users)
            .map(|n| {
                let user = store.insert_user(
                    &format!("User {n}"),
                    &format!("user{n}@example.com"),
                    Some("0812"),
                    Some("Jl. Kopi"),
                );
                store
                    .add_lines(
                        user,
                        &[CartLineInput {
                            product_id: product,
                            variant_id: None,
                            size_id: None,
                            quantity: 1,
                        }],
                    )
                    .expect("add");
                let tx = checkout
                    .checkout(
                        user,
                        CheckoutRequest {
                            contact: ContactOverrides::default(),
                            payment_method_id: payment,
                            shipping_id: shipping,
                        },
                    )
                    .expect("checkout");
                (user, tx.id)
            })
            .collect();

        let service = TransactionService::new(store.clone());
        (store, service, placed)
    }

    #[test]
    fn status_can_move_freely_between_states() {
        let (_store, service, placed) = seeded(1);
        let (_, tx_id) = placed[0];

        let done = service.set_status(tx_id, 1).expect("to done");
        assert_eq!(done.status, TransactionStatus::Done);
        let waiting = service.set_status(tx_id, 4).expect("back to waiting");
        assert_eq!(waiting.status, TransactionStatus::Waiting);
    }

    #[test]
    fn unknown_status_or_transaction_is_rejected() {
        let (_store, service, placed) = seeded(1);
        assert!(matches!(
            service.set_status(placed[0].1, 0),
            Err(DomainError::InvalidStatus(0))
        ));
        assert!(matches!(
            service.set_status(999, 1),
            Err(DomainError::NotFound("Transaction"))
        ));
    }

    #[test]
    fn delete_removes_and_then_reports_not_found() {
        let (store, service, placed) = seeded(1);
        let (_, tx_id) = placed[0];

        service.delete(tx_id).expect("delete");
        assert_eq!(store.transaction_count(), 0);
        assert!(matches!(
            service.delete(tx_id),
            Err(DomainError::NotFound("Transaction"))
        ));
    }

    #[test]
    fn history_only_shows_own_transactions() {
        let (_store, service, placed) = seeded(3);
        let (user, tx_id) = placed[1];

        let history = service
            .history(user, PageRequest::new(None, None))
            .expect("history");
        assert_eq!(history.total, 1);
        assert_eq!(history.items[0].id, tx_id);

        assert!(service.history_detail(user, tx_id).is_ok());
        assert!(matches!(
            service.history_detail(user, placed[0].1),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn admin_list_paginates_across_users() {
        let (_store, service, _placed) = seeded(5);

        let first = service.list(PageRequest::new(Some(1), Some(3))).expect("page 1");
        assert_eq!(first.total, 5);
        assert_eq!(first.items.len(), 3);

        let second = service.list(PageRequest::new(Some(2), Some(3))).expect("page 2");
        assert_eq!(second.items.len(), 2);
    }
}
