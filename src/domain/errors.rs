use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: i32 },
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },
    #[error("Missing contact information: {}", .0.join(", "))]
    MissingContactInfo(Vec<&'static str>),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Shipping method not found")]
    ShippingNotFound,
    #[error("Payment method not found")]
    PaymentMethodNotFound,
    #[error("Product {product_id} no longer has enough stock, please review your cart")]
    InsufficientStockAtCheckout { product_id: i32 },
    #[error("Cart changed while checking out, please review your cart")]
    CartChanged,
    #[error("Invalid status id {0}")]
    InvalidStatus(i32),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable machine-readable name, surfaced to clients as the `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "NotFound",
            DomainError::InvalidQuantity(_) => "InvalidQuantity",
            DomainError::OutOfStock { .. } => "OutOfStock",
            DomainError::InsufficientStock { .. } => "InsufficientStock",
            DomainError::MissingContactInfo(_) => "MissingContactInfo",
            DomainError::EmptyCart => "EmptyCart",
            DomainError::ShippingNotFound => "ShippingNotFound",
            DomainError::PaymentMethodNotFound => "PaymentMethodNotFound",
            DomainError::InsufficientStockAtCheckout { .. } => "InsufficientStockAtCheckout",
            DomainError::CartChanged => "CartChanged",
            DomainError::InvalidStatus(_) => "InvalidStatus",
            DomainError::InvalidInput(_) => "InvalidInput",
            DomainError::Conflict(_) => "Conflict",
            DomainError::Internal(_) => "Internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_contact_lists_every_field() {
        let err = DomainError::MissingContactInfo(vec!["phone", "address"]);
        assert_eq!(err.to_string(), "Missing contact information: phone, address");
        assert_eq!(err.kind(), "MissingContactInfo");
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(DomainError::NotFound("Cart item").to_string(), "Cart item not found");
    }

    #[test]
    fn stock_race_has_its_own_kind() {
        let err = DomainError::InsufficientStockAtCheckout { product_id: 7 };
        assert_eq!(err.kind(), "InsufficientStockAtCheckout");
    }
}
