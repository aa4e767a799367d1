//! Pure price arithmetic. Amounts are exact decimals in whole currency units;
//! nothing here rounds.

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};

use super::errors::DomainError;

/// Tax applied on top of items plus shipping.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxRate(BigDecimal);

impl TaxRate {
    pub fn new(rate: BigDecimal) -> Result<Self, DomainError> {
        if rate < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(format!(
                "tax rate must not be negative, got {rate}"
            )));
        }
        Ok(Self(rate))
    }

    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self(BigDecimal::new(10.into(), 2))
    }
}

impl FromStr for TaxRate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = BigDecimal::from_str(s.trim())
            .map_err(|e| DomainError::InvalidInput(format!("invalid tax rate '{s}': {e}")))?;
        Self::new(rate)
    }
}

/// `(base + variant surcharge + size surcharge) * quantity`; absent options add nothing.
pub fn line_subtotal(
    base_price: &BigDecimal,
    variant_surcharge: Option<&BigDecimal>,
    size_surcharge: Option<&BigDecimal>,
    quantity: i32,
) -> BigDecimal {
    let mut unit = base_price.clone();
    if let Some(surcharge) = variant_surcharge {
        unit += surcharge;
    }
    if let Some(surcharge) = size_surcharge {
        unit += surcharge;
    }
    unit * BigDecimal::from(quantity)
}

pub fn cart_total<'a, I>(subtotals: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    subtotals
        .into_iter()
        .fold(BigDecimal::zero(), |acc, subtotal| acc + subtotal)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutTotals {
    pub items_total: BigDecimal,
    pub shipping_fee: BigDecimal,
    pub subtotal: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total: BigDecimal,
}

pub fn checkout_totals(
    items_total: BigDecimal,
    shipping_fee: BigDecimal,
    tax_rate: &TaxRate,
) -> CheckoutTotals {
    let subtotal = &items_total + &shipping_fee;
    let tax_amount = &subtotal * tax_rate.as_decimal();
    let total = &subtotal + &tax_amount;
    CheckoutTotals {
        items_total,
        shipping_fee,
        subtotal,
        tax_amount,
        total,
    }
}
