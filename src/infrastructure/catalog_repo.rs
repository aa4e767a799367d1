use std::collections::HashMap;

use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::{PaymentMethod, PriceOption, Product, ShippingMethod, UserProfile};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CatalogRepository, ProfileRepository};
use crate::schema::{payment_methods, product_images, products, profiles, shippings, sizes, users, variants};

use super::models::{
    PaymentMethodRow, ProductImageRow, ProductRow, ProfileRow, ShippingRow, SizeRow, UserRow,
    VariantRow,
};

// ── Row → domain ─────────────────────────────────────────────────────────────

pub(super) fn to_product(row: ProductRow, image: Option<String>) -> Product {
    Product {
        id: row.id,
        title: row.title,
        base_price: row.base_price,
        stock: row.stock,
        image,
    }
}

impl From<VariantRow> for PriceOption {
    fn from(row: VariantRow) -> Self {
        PriceOption {
            id: row.id,
            name: row.name,
            surcharge: row.additional_price,
        }
    }
}

impl From<SizeRow> for PriceOption {
    fn from(row: SizeRow) -> Self {
        PriceOption {
            id: row.id,
            name: row.name,
            surcharge: row.additional_price,
        }
    }
}

impl From<ShippingRow> for ShippingMethod {
    fn from(row: ShippingRow) -> Self {
        ShippingMethod {
            id: row.id,
            name: row.name,
            surcharge: row.additional_price,
        }
    }
}

impl From<PaymentMethodRow> for PaymentMethod {
    fn from(row: PaymentMethodRow) -> Self {
        PaymentMethod {
            id: row.id,
            name: row.name,
        }
    }
}

/// First image (lowest id) of each product.
pub(super) fn first_images(
    conn: &mut PgConnection,
    product_ids: &[i32],
) -> QueryResult<HashMap<i32, String>> {
    let rows: Vec<ProductImageRow> = product_images::table
        .filter(product_images::product_id.eq_any(product_ids.to_vec()))
        .order((product_images::product_id.asc(), product_images::id.asc()))
        .select(ProductImageRow::as_select())
        .load(conn)?;

    let mut images = HashMap::new();
    for row in rows {
        images.entry(row.product_id).or_insert(row.image);
    }
    Ok(images)
}

/// Catalog rows referenced by a set of cart lines or transaction items,
/// loaded in one round per table.
pub(super) struct CatalogSnapshot {
    products: HashMap<i32, Product>,
    variants: HashMap<i32, PriceOption>,
    sizes: HashMap<i32, PriceOption>,
}

impl CatalogSnapshot {
    pub(super) fn load(
        conn: &mut PgConnection,
        product_ids: Vec<i32>,
        variant_ids: Vec<i32>,
        size_ids: Vec<i32>,
    ) -> Result<Self, DomainError> {
        let mut images = first_images(conn, &product_ids)?;
        let products = products::table
            .filter(products::id.eq_any(product_ids))
            .select(ProductRow::as_select())
            .load::<ProductRow>(conn)?
            .into_iter()
            .map(|row| {
                let image = images.remove(&row.id);
                (row.id, to_product(row, image))
            })
            .collect();
        let variants = variants::table
            .filter(variants::id.eq_any(variant_ids))
            .select(VariantRow::as_select())
            .load::<VariantRow>(conn)?
            .into_iter()
            .map(|row| (row.id, PriceOption::from(row)))
            .collect();
        let sizes = sizes::table
            .filter(sizes::id.eq_any(size_ids))
            .select(SizeRow::as_select())
            .load::<SizeRow>(conn)?
            .into_iter()
            .map(|row| (row.id, PriceOption::from(row)))
            .collect();

        Ok(Self {
            products,
            variants,
            sizes,
        })
    }

    pub(super) fn product(&self, id: i32) -> Result<Product, DomainError> {
        self.products
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::Internal(format!("product {id} vanished from catalog")))
    }

    pub(super) fn variant(&self, id: Option<i32>) -> Result<Option<PriceOption>, DomainError> {
        id.map(|id| {
            self.variants
                .get(&id)
                .cloned()
                .ok_or_else(|| DomainError::Internal(format!("variant {id} vanished from catalog")))
        })
        .transpose()
    }

    pub(super) fn size(&self, id: Option<i32>) -> Result<Option<PriceOption>, DomainError> {
        id.map(|id| {
            self.sizes
                .get(&id)
                .cloned()
                .ok_or_else(|| DomainError::Internal(format!("size {id} vanished from catalog")))
        })
        .transpose()
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn product(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };

        let image = first_images(&mut conn, &[row.id])?.remove(&row.id);
        Ok(Some(to_product(row, image)))
    }

    fn variant(&self, id: i32) -> Result<Option<PriceOption>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = variants::table
            .find(id)
            .select(VariantRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(PriceOption::from))
    }

    fn size(&self, id: i32) -> Result<Option<PriceOption>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = sizes::table
            .find(id)
            .select(SizeRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(PriceOption::from))
    }

    fn shipping(&self, id: i32) -> Result<Option<ShippingMethod>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = shippings::table
            .find(id)
            .select(ShippingRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(ShippingMethod::from))
    }

    fn payment_method(&self, id: i32) -> Result<Option<PaymentMethod>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = payment_methods::table
            .find(id)
            .select(PaymentMethodRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(PaymentMethod::from))
    }
}

impl ProfileRepository for DieselCatalogRepository {
    fn profile(&self, user_id: i32) -> Result<Option<UserProfile>, DomainError> {
        let mut conn = self.pool.get()?;

        let user = users::table
            .find(user_id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(user) = user else {
            return Ok(None);
        };

        let profile = ProfileRow::belonging_to(&user)
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(Some(UserProfile {
            user_id: user.id,
            fullname: Some(user.fullname),
            email: Some(user.email),
            phone: profile.as_ref().and_then(|p| p.phone.clone()),
            address: profile.and_then(|p| p.address),
        }))
    }
}
