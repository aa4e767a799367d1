use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::TransactionRepository;
use crate::domain::transaction::{
    CheckoutDraft, ListResult, PageRequest, TransactionItemView, TransactionStatus,
    TransactionView,
};
use crate::schema::{carts, payment_methods, products, shippings, transaction_items, transactions};

use super::catalog_repo::CatalogSnapshot;
use super::models::{NewTransactionItemRow, NewTransactionRow, TransactionItemRow, TransactionRow};

/// A transaction row with the names of its shipping and payment methods.
type JoinedRow = (TransactionRow, String, String);

fn to_view(
    (row, shipping, payment_method): JoinedRow,
    items: Vec<TransactionItemView>,
) -> Result<TransactionView, DomainError> {
    Ok(TransactionView {
        id: row.id,
        user_id: row.user_id,
        invoice_number: row.invoice_number,
        fullname: row.fullname,
        email: row.email,
        phone: row.phone,
        address: row.address,
        payment_method,
        shipping,
        status: row.status.parse::<TransactionStatus>()?,
        items_total: row.items_total,
        shipping_fee: row.shipping_fee,
        tax_amount: row.tax_amount,
        total: row.total,
        created_at: row.created_at,
        updated_at: row.updated_at,
        items,
    })
}

fn load_items(
    conn: &mut PgConnection,
    transaction: &TransactionRow,
) -> Result<Vec<TransactionItemView>, DomainError> {
    let rows: Vec<TransactionItemRow> = TransactionItemRow::belonging_to(transaction)
        .select(TransactionItemRow::as_select())
        .order(transaction_items::id.asc())
        .load(conn)?;

    let snapshot = CatalogSnapshot::load(
        conn,
        rows.iter().map(|r| r.product_id).collect(),
        rows.iter().filter_map(|r| r.variant_id).collect(),
        rows.iter().filter_map(|r| r.size_id).collect(),
    )?;

    rows.into_iter()
        .map(|row| {
            Ok(TransactionItemView {
                id: row.id,
                product_id: row.product_id,
                title: snapshot.product(row.product_id)?.title,
                variant: snapshot.variant(row.variant_id)?.map(|v| v.name),
                size: snapshot.size(row.size_id)?.map(|s| s.name),
                quantity: row.quantity,
                subtotal: row.subtotal,
            })
        })
        .collect()
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselTransactionRepository {
    pool: DbPool,
}

impl DieselTransactionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TransactionRepository for DieselTransactionRepository {
    fn commit_checkout(&self, draft: &CheckoutDraft) -> Result<i32, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the transaction header
            let transaction_id: i32 = diesel::insert_into(transactions::table)
                .values(&NewTransactionRow {
                    user_id: draft.user_id,
                    invoice_number: draft.invoice_number.as_str().to_string(),
                    fullname: draft.contact.fullname.clone(),
                    email: draft.contact.email.clone(),
                    phone: draft.contact.phone.clone(),
                    address: draft.contact.address.clone(),
                    payment_method_id: draft.payment_method_id,
                    shipping_id: draft.shipping_id,
                    status: draft.status.as_str().to_string(),
                    items_total: draft.totals.items_total.clone(),
                    shipping_fee: draft.totals.shipping_fee.clone(),
                    tax_amount: draft.totals.tax_amount.clone(),
                    total: draft.totals.total.clone(),
                })
                .returning(transactions::id)
                .get_result(conn)?;

            // 2. Insert the frozen line items
            let items: Vec<NewTransactionItemRow> = draft
                .items
                .iter()
                .map(|item| NewTransactionItemRow {
                    transaction_id,
                    product_id: item.product_id,
                    variant_id: item.variant_id,
                    size_id: item.size_id,
                    quantity: item.quantity,
                    subtotal: item.subtotal.clone(),
                })
                .collect();
            diesel::insert_into(transaction_items::table)
                .values(&items)
                .execute(conn)?;

            // 3. Take the stock. The guard makes concurrent checkouts of the
            //    last units lose cleanly instead of driving stock negative.
            let now = Utc::now();
            for item in &draft.items {
                let updated = diesel::update(
                    products::table
                        .filter(products::id.eq(item.product_id))
                        .filter(products::stock.ge(item.quantity)),
                )
                .set((
                    products::stock.eq(products::stock - item.quantity),
                    products::updated_at.eq(now),
                ))
                .execute(conn)?;
                if updated != 1 {
                    return Err(DomainError::InsufficientStockAtCheckout {
                        product_id: item.product_id,
                    });
                }
            }

            // 4. Consume exactly the cart lines that were priced
            for item in &draft.items {
                let removed = diesel::delete(
                    carts::table
                        .filter(carts::id.eq(item.cart_line_id))
                        .filter(carts::user_id.eq(draft.user_id))
                        .filter(carts::quantity.eq(item.quantity)),
                )
                .execute(conn)?;
                if removed != 1 {
                    return Err(DomainError::CartChanged);
                }
            }

            Ok(transaction_id)
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<TransactionView>, DomainError> {
        let mut conn = self.pool.get()?;

        let joined = transactions::table
            .inner_join(shippings::table)
            .inner_join(payment_methods::table)
            .filter(transactions::id.eq(id))
            .select((
                TransactionRow::as_select(),
                shippings::name,
                payment_methods::name,
            ))
            .first::<JoinedRow>(&mut conn)
            .optional()?;

        let Some(joined) = joined else {
            return Ok(None);
        };

        let items = load_items(&mut conn, &joined.0)?;
        to_view(joined, items).map(Some)
    }

    fn list(&self, user_id: Option<i32>, page: PageRequest) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let mut count_query = transactions::table.select(count_star()).into_boxed();
            let mut rows_query = transactions::table
                .inner_join(shippings::table)
                .inner_join(payment_methods::table)
                .select((
                    TransactionRow::as_select(),
                    shippings::name,
                    payment_methods::name,
                ))
                .into_boxed();
            if let Some(user_id) = user_id {
                count_query = count_query.filter(transactions::user_id.eq(user_id));
                rows_query = rows_query.filter(transactions::user_id.eq(user_id));
            }

            let total: i64 = count_query.get_result(conn)?;
            let rows: Vec<JoinedRow> = rows_query
                .order((transactions::created_at.desc(), transactions::id.desc()))
                .limit(page.limit)
                .offset(page.offset())
                .load(conn)?;

            // Listings carry the header only; items come with the detail view.
            let items = rows
                .into_iter()
                .map(|row| to_view(row, Vec::new()))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ListResult { items, total })
        })
    }

    fn set_status(&self, id: i32, status: TransactionStatus) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(transactions::table.find(id))
            .set((
                transactions::status.eq(status.as_str()),
                transactions::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        Ok(updated > 0)
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // Items go with the header (ON DELETE CASCADE).
        let deleted = diesel::delete(transactions::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
