use bigdecimal::BigDecimal;

use super::catalog::{PriceOption, Product};
use super::errors::DomainError;
use super::pricing::line_subtotal;

/// Identity of a cart line: one row per product/variant/size combination per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CartLineInput {
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
}

impl CartLineInput {
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id,
            variant_id: self.variant_id,
            size_id: self.size_id,
        }
    }
}

/// Rejects a batch before any store work happens.
pub fn validate_batch(lines: &[CartLineInput]) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::InvalidInput(
            "at least one cart item is required".to_string(),
        ));
    }
    if let Some(line) = lines.iter().find(|l| l.quantity < 1) {
        return Err(DomainError::InvalidQuantity(line.quantity));
    }
    Ok(())
}

/// Returns the quantity the line will hold once `requested` more units are
/// added on top of `in_cart`, provided the product can cover it.
pub fn quantity_after_add(
    product: &Product,
    in_cart: i32,
    requested: i32,
) -> Result<i32, DomainError> {
    if requested < 1 {
        return Err(DomainError::InvalidQuantity(requested));
    }
    if product.stock <= 0 {
        return Err(DomainError::OutOfStock {
            product_id: product.id,
        });
    }
    let wanted = in_cart.saturating_add(requested);
    if wanted > product.stock {
        return Err(DomainError::InsufficientStock {
            product_id: product.id,
            requested: wanted,
            available: product.stock,
        });
    }
    Ok(wanted)
}

/// A cart row joined with the catalog data needed to price and display it.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: i32,
    pub user_id: i32,
    pub product: Product,
    pub variant: Option<PriceOption>,
    pub size: Option<PriceOption>,
    pub quantity: i32,
}

impl CartLine {
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id,
            variant_id: self.variant.as_ref().map(|v| v.id),
            size_id: self.size.as_ref().map(|s| s.id),
        }
    }

    pub fn subtotal(&self) -> BigDecimal {
        line_subtotal(
            &self.product.base_price,
            self.variant.as_ref().map(|v| &v.surcharge),
            self.size.as_ref().map(|s| &s.surcharge),
            self.quantity,
        )
    }
}
