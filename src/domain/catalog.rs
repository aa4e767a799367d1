//! Read models for the collaborators the checkout engine consumes: catalog
//! entries, shipping and payment options, and the customer's stored profile.

use bigdecimal::BigDecimal;

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub base_price: BigDecimal,
    pub stock: i32,
    /// First image of the product, if any.
    pub image: Option<String>,
}

/// A priced option chosen alongside a product (a variant such as "Ice", or a
/// size such as "L").
#[derive(Debug, Clone)]
pub struct PriceOption {
    pub id: i32,
    pub name: String,
    pub surcharge: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct ShippingMethod {
    pub id: i32,
    pub name: String,
    pub surcharge: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PaymentMethod {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub user_id: i32,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
