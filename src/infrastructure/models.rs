use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::{
    carts, payment_methods, product_images, products, profiles, shippings, sizes,
    transaction_items, transactions, users, variants,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub fullname: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = profiles)]
#[diesel(belongs_to(UserRow, foreign_key = user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    pub id: i32,
    pub user_id: i32,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub title: String,
    pub base_price: BigDecimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = product_images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductImageRow {
    pub product_id: i32,
    pub image: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = variants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VariantRow {
    pub id: i32,
    pub name: String,
    pub additional_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sizes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SizeRow {
    pub id: i32,
    pub name: String,
    pub additional_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = shippings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShippingRow {
    pub id: i32,
    pub name: String,
    pub additional_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = payment_methods)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentMethodRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemRow {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = carts)]
pub struct NewCartItemRow {
    pub user_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionRow {
    pub id: i32,
    pub user_id: i32,
    pub invoice_number: String,
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method_id: i32,
    pub shipping_id: i32,
    pub status: String,
    pub items_total: BigDecimal,
    pub shipping_fee: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = transactions)]
pub struct NewTransactionRow {
    pub user_id: i32,
    pub invoice_number: String,
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method_id: i32,
    pub shipping_id: i32,
    pub status: String,
    pub items_total: BigDecimal,
    pub shipping_fee: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total: BigDecimal,
}

#[derive(
    Debug, Clone, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = transaction_items)]
#[diesel(belongs_to(TransactionRow, foreign_key = transaction_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TransactionItemRow {
    pub id: i32,
    pub transaction_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = transaction_items)]
pub struct NewTransactionItemRow {
    pub transaction_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}
