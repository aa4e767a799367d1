use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::cart::{quantity_after_add, CartLine, CartLineInput};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{carts, products, sizes, variants};

use super::catalog_repo::{to_product, CatalogSnapshot};
use super::models::{CartItemRow, NewCartItemRow, ProductRow};

/// Loads a user's cart rows (optionally only `ids`) joined with their catalog data.
pub(super) fn load_lines(
    conn: &mut PgConnection,
    user_id: i32,
    ids: Option<&[i32]>,
) -> Result<Vec<CartLine>, DomainError> {
    let mut query = carts::table
        .select(CartItemRow::as_select())
        .filter(carts::user_id.eq(user_id))
        .order(carts::id.asc())
        .into_boxed();
    if let Some(ids) = ids {
        query = query.filter(carts::id.eq_any(ids.to_vec()));
    }
    let rows: Vec<CartItemRow> = query.load(conn)?;

    let snapshot = CatalogSnapshot::load(
        conn,
        rows.iter().map(|r| r.product_id).collect(),
        rows.iter().filter_map(|r| r.variant_id).collect(),
        rows.iter().filter_map(|r| r.size_id).collect(),
    )?;

    rows.into_iter()
        .map(|row| {
            Ok(CartLine {
                id: row.id,
                user_id: row.user_id,
                product: snapshot.product(row.product_id)?,
                variant: snapshot.variant(row.variant_id)?,
                size: snapshot.size(row.size_id)?,
                quantity: row.quantity,
            })
        })
        .collect()
}

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn add_lines(
        &self,
        user_id: i32,
        lines: &[CartLineInput],
    ) -> Result<Vec<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let mut touched = Vec::with_capacity(lines.len());

            for line in lines {
                // Row lock serialises concurrent adds touching the same product.
                let product = products::table
                    .find(line.product_id)
                    .select(ProductRow::as_select())
                    .for_update()
                    .first(conn)
                    .optional()?
                    .ok_or(DomainError::NotFound("Product"))?;

                if let Some(variant_id) = line.variant_id {
                    let found: i64 = variants::table
                        .filter(variants::id.eq(variant_id))
                        .count()
                        .get_result(conn)?;
                    if found == 0 {
                        return Err(DomainError::NotFound("Variant"));
                    }
                }
                if let Some(size_id) = line.size_id {
                    let found: i64 = sizes::table
                        .filter(sizes::id.eq(size_id))
                        .count()
                        .get_result(conn)?;
                    if found == 0 {
                        return Err(DomainError::NotFound("Size"));
                    }
                }

                let existing = carts::table
                    .filter(carts::user_id.eq(user_id))
                    .filter(carts::product_id.eq(line.product_id))
                    .filter(carts::variant_id.is_not_distinct_from(line.variant_id))
                    .filter(carts::size_id.is_not_distinct_from(line.size_id))
                    .select(CartItemRow::as_select())
                    .first(conn)
                    .optional()?;

                let in_cart = existing.as_ref().map_or(0, |row| row.quantity);
                let quantity = quantity_after_add(&to_product(product, None), in_cart, line.quantity)?;

                let id = match existing {
                    Some(row) => {
                        diesel::update(carts::table.find(row.id))
                            .set((
                                carts::quantity.eq(quantity),
                                carts::updated_at.eq(Utc::now()),
                            ))
                            .execute(conn)?;
                        row.id
                    }
                    None => diesel::insert_into(carts::table)
                        .values(&NewCartItemRow {
                            user_id,
                            product_id: line.product_id,
                            variant_id: line.variant_id,
                            size_id: line.size_id,
                            quantity,
                        })
                        .returning(carts::id)
                        .get_result(conn)?,
                };
                if !touched.contains(&id) {
                    touched.push(id);
                }
            }

            let mut added = load_lines(conn, user_id, Some(touched.as_slice()))?;
            // Report lines in request order.
            added.sort_by_key(|line| touched.iter().position(|id| *id == line.id));
            Ok(added)
        })
    }

    fn list_lines(&self, user_id: i32) -> Result<Vec<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;
        load_lines(&mut conn, user_id, None)
    }

    fn remove_line(&self, user_id: i32, line_id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // Ownership is part of the filter; a foreign id deletes nothing.
        let deleted = diesel::delete(
            carts::table
                .filter(carts::id.eq(line_id))
                .filter(carts::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::infrastructure::test_support::{self, setup_db};

    fn input(
        product_id: i32,
        variant_id: Option<i32>,
        size_id: Option<i32>,
        quantity: i32,
    ) -> CartLineInput {
        CartLineInput {
            product_id,
            variant_id,
            size_id,
            quantity,
        }
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn repeated_combination_increments_single_row() {
        let (_container, pool) = setup_db().await;
        let (user, product, ice, large) = {
            let mut conn = pool.get().expect("conn");
            (
                test_support::user(&mut conn, "rani@example.com", None, None),
                test_support::product(&mut conn, "Espresso Shot", 15000, 40),
                test_support::variant(&mut conn, "Ice", 7000),
                test_support::size(&mut conn, "L", 5000),
            )
        };
        let repo = DieselCartRepository::new(pool);

        repo.add_lines(user, &[input(product, Some(ice), Some(large), 1)])
            .expect("first add");
        let added = repo
            .add_lines(user, &[input(product, Some(ice), Some(large), 2)])
            .expect("second add");

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].quantity, 3);
        assert_eq!(added[0].subtotal(), BigDecimal::from(27000 * 3));

        let lines = repo.list_lines(user).expect("list");
        assert_eq!(lines.len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn lines_without_options_also_merge() {
        let (_container, pool) = setup_db().await;
        let (user, product) = {
            let mut conn = pool.get().expect("conn");
            (
                test_support::user(&mut conn, "rani@example.com", None, None),
                test_support::product(&mut conn, "Espresso Shot", 15000, 40),
            )
        };
        let repo = DieselCartRepository::new(pool);

        repo.add_lines(user, &[input(product, None, None, 1), input(product, None, None, 1)])
            .expect("add");

        let lines = repo.list_lines(user).expect("list");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn failed_batch_leaves_cart_unchanged() {
        let (_container, pool) = setup_db().await;
        let (user, espresso, latte) = {
            let mut conn = pool.get().expect("conn");
            (
                test_support::user(&mut conn, "rani@example.com", None, None),
                test_support::product(&mut conn, "Espresso Shot", 15000, 40),
                test_support::product(&mut conn, "Latte", 30000, 1),
            )
        };
        let repo = DieselCartRepository::new(pool);

        let err = repo
            .add_lines(user, &[input(espresso, None, None, 2), input(latte, None, None, 2)])
            .expect_err("latte is short");

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert!(repo.list_lines(user).expect("list").is_empty());
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn concurrent_adds_do_not_lose_quantity() {
        let (_container, pool) = setup_db().await;
        let (user, product) = {
            let mut conn = pool.get().expect("conn");
            (
                test_support::user(&mut conn, "rani@example.com", None, None),
                test_support::product(&mut conn, "Espresso Shot", 15000, 40),
            )
        };
        let repo = Arc::new(DieselCartRepository::new(pool));

        let tasks = (0..5).map(|_| {
            let repo = repo.clone();
            tokio::task::spawn_blocking(move || repo.add_lines(user, &[input(product, None, None, 1)]))
        });
        for result in futures::future::join_all(tasks).await {
            result.expect("task panicked").expect("add failed");
        }

        let lines = repo.list_lines(user).expect("list");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[tokio::test]
    #[ignore = "requires docker for the Postgres testcontainer"]
    async fn remove_is_scoped_to_owner() {
        let (_container, pool) = setup_db().await;
        let (owner, stranger, product) = {
            let mut conn = pool.get().expect("conn");
            (
                test_support::user(&mut conn, "rani@example.com", None, None),
                test_support::user(&mut conn, "budi@example.com", None, None),
                test_support::product(&mut conn, "Espresso Shot", 15000, 40),
            )
        };
        let repo = DieselCartRepository::new(pool);
        let line = repo
            .add_lines(owner, &[input(product, None, None, 1)])
            .expect("add")[0]
            .id;

        assert!(!repo.remove_line(stranger, line).expect("remove"));
        assert!(repo.remove_line(owner, line).expect("remove"));
        assert!(!repo.remove_line(owner, line).expect("remove again"));
    }
}
