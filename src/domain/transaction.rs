use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::UserProfile;
use super::errors::DomainError;
use super::pricing::CheckoutTotals;

/// Lifecycle of a placed order. Admins may move between any two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Done,
    Pending,
    OnProgress,
    Waiting,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 4] = [
        TransactionStatus::Done,
        TransactionStatus::Pending,
        TransactionStatus::OnProgress,
        TransactionStatus::Waiting,
    ];

    /// Numeric id used by admin clients (`1 = Done` .. `4 = Waiting`).
    pub fn from_id(id: i32) -> Result<Self, DomainError> {
        match id {
            1 => Ok(TransactionStatus::Done),
            2 => Ok(TransactionStatus::Pending),
            3 => Ok(TransactionStatus::OnProgress),
            4 => Ok(TransactionStatus::Waiting),
            other => Err(DomainError::InvalidStatus(other)),
        }
    }

    pub fn id(self) -> i32 {
        match self {
            TransactionStatus::Done => 1,
            TransactionStatus::Pending => 2,
            TransactionStatus::OnProgress => 3,
            TransactionStatus::Waiting => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Done => "Done",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::OnProgress => "OnProgress",
            TransactionStatus::Waiting => "Waiting",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::Internal(format!("unknown transaction status '{s}'")))
    }
}

/// Contact fields a customer may override at checkout.
#[derive(Debug, Clone, Default)]
pub struct ContactOverrides {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Contact details frozen onto a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactInfo {
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ContactInfo {
    /// Request values win; blank or absent ones fall back to the stored profile.
    pub fn resolve(overrides: ContactOverrides, profile: &UserProfile) -> Result<Self, DomainError> {
        fn pick(requested: Option<String>, stored: &Option<String>) -> Option<String> {
            requested
                .filter(|v| !v.trim().is_empty())
                .or_else(|| stored.clone().filter(|v| !v.trim().is_empty()))
        }

        let fullname = pick(overrides.fullname, &profile.fullname);
        let email = pick(overrides.email, &profile.email);
        let phone = pick(overrides.phone, &profile.phone);
        let address = pick(overrides.address, &profile.address);

        match (fullname, email, phone, address) {
            (Some(fullname), Some(email), Some(phone), Some(address)) => Ok(Self {
                fullname,
                email,
                phone,
                address,
            }),
            (fullname, email, phone, address) => {
                let missing = [
                    ("fullname", fullname.is_none()),
                    ("email", email.is_none()),
                    ("phone", phone.is_none()),
                    ("address", address.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(DomainError::MissingContactInfo(missing))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// `INV-<yyyymmddHHMMSS>-<user>-<8 hex>`. The random suffix keeps two
    /// checkouts in the same second apart; the store's unique index catches
    /// anything left.
    pub fn generate(user_id: i32, now: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "INV-{}-{}-{}",
            now.format("%Y%m%d%H%M%S"),
            user_id,
            &suffix[..8]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One cart line as it will be frozen into a transaction item.
#[derive(Debug, Clone)]
pub struct CheckoutItem {
    pub cart_line_id: i32,
    pub product_id: i32,
    pub variant_id: Option<i32>,
    pub size_id: Option<i32>,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

/// Everything the store needs to commit a checkout in one unit.
#[derive(Debug, Clone)]
pub struct CheckoutDraft {
    pub user_id: i32,
    pub invoice_number: InvoiceNumber,
    pub contact: ContactInfo,
    pub payment_method_id: i32,
    pub shipping_id: i32,
    pub status: TransactionStatus,
    pub totals: CheckoutTotals,
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Clone)]
pub struct TransactionItemView {
    pub id: i32,
    pub product_id: i32,
    pub title: String,
    pub variant: Option<String>,
    pub size: Option<String>,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct TransactionView {
    pub id: i32,
    pub user_id: i32,
    pub invoice_number: String,
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
    pub shipping: String,
    pub status: TransactionStatus,
    pub items_total: BigDecimal,
    pub shipping_fee: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<TransactionItemView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;
    /// Keeps `offset()` and the next-page link well inside `i64`.
    pub const MAX_PAGE: i64 = i32::MAX as i64;

    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, Self::MAX_PAGE),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<TransactionView>,
    pub total: i64,
}
