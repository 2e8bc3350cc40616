//! Shared types for the gateway interface

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gateway operation (used for logging and metrics labels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Authorize + capture
    Purchase,
    /// Reserve funds
    Authorize,
    /// Settle an authorization
    Capture,
    /// Cancel an authorization
    Void,
    /// Return captured funds
    Refund,
    /// Create a customer or attach a card
    Store,
    /// Remove a customer or card
    Unstore,
}

impl Operation {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Purchase => "purchase",
            Operation::Authorize => "authorize",
            Operation::Capture => "capture",
            Operation::Void => "void",
            Operation::Refund => "refund",
            Operation::Store => "store",
            Operation::Unstore => "unstore",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a minor-unit amount into the two-place decimal Openpay expects
pub fn to_major_units(minor: u64) -> Result<Decimal> {
    let minor = i64::try_from(minor).map_err(|_| Error::InvalidAmount(minor))?;
    Ok(Decimal::new(minor, 2))
}

/// Raw card data
///
/// `Debug` only shows the last four digits and never the verification value.
#[derive(Clone, PartialEq, Eq)]
pub struct CreditCard {
    /// Primary account number
    pub number: String,
    /// Expiration month (1-12)
    pub month: u8,
    /// Expiration year (four digits)
    pub year: u16,
    /// CVV / CVC
    pub verification_value: Option<String>,
    /// Holder first name
    pub first_name: String,
    /// Holder last name
    pub last_name: String,
}

impl CreditCard {
    /// Create a card with holder name
    pub fn new(
        number: impl Into<String>,
        month: u8,
        year: u16,
        verification_value: Option<&str>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            month,
            year,
            verification_value: verification_value.map(str::to_string),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Full holder name, `None` when both parts are blank
    pub fn name(&self) -> Option<String> {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Last four digits of the number
    pub fn last_digits(&self) -> &str {
        let len = self.number.len();
        self.number.get(len.saturating_sub(4)..).unwrap_or("")
    }

    /// Two-digit expiration month, zero padded
    pub fn expiration_month(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Two-digit expiration year
    pub fn expiration_year(&self) -> String {
        format!("{:02}", self.year % 100)
    }

    /// Reject cards that cannot possibly be accepted
    pub fn validate(&self) -> Result<()> {
        if self.number.len() < 12
            || self.number.len() > 19
            || !self.number.chars().all(|c| c.is_ascii_digit())
        {
            return Err(Error::InvalidCard(format!(
                "number ending in {} is not 12-19 digits",
                self.last_digits()
            )));
        }
        if !(1..=12).contains(&self.month) {
            return Err(Error::InvalidCard(format!("month {} out of range", self.month)));
        }
        if let Some(cvv) = &self.verification_value {
            if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::InvalidCard("verification value must be 3-4 digits".into()));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("number", &format_args!("XXXX-{}", self.last_digits()))
            .field("month", &self.month)
            .field("year", &self.year)
            .field(
                "verification_value",
                &self.verification_value.as_ref().map(|_| "[FILTERED]"),
            )
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Payment instrument for purchase/authorize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentSource {
    /// Raw card data
    Card(CreditCard),
    /// Stored card token (vendor card id)
    Stored(String),
}

impl From<CreditCard> for PaymentSource {
    fn from(card: CreditCard) -> Self {
        PaymentSource::Card(card)
    }
}

impl From<&str> for PaymentSource {
    fn from(token: &str) -> Self {
        PaymentSource::Stored(token.to_string())
    }
}

impl From<String> for PaymentSource {
    fn from(token: String) -> Self {
        PaymentSource::Stored(token)
    }
}

/// Billing address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line
    pub address1: Option<String>,
    /// Second street line
    pub address2: Option<String>,
    /// Company
    pub company: Option<String>,
    /// City
    pub city: Option<String>,
    /// State / province
    pub state: Option<String>,
    /// Postal code
    pub zip: Option<String>,
    /// ISO country code
    pub country: Option<String>,
}

/// Customer attached to a charge
///
/// Either a reference to a vendor customer (`id`) or inline details for a
/// new one. Absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Vendor customer id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Merchant-side unique id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// First name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Last name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl Customer {
    /// Reference an existing vendor customer
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }
}

/// Card points usage for Mexican reward cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardPoints {
    /// Pay with points only
    Only,
    /// Points plus money
    Mixed,
    /// Do not use points
    None,
}

/// Per-transaction options
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    /// Billing address
    pub billing_address: Option<Address>,
    /// Charge / refund description
    pub description: Option<String>,
    /// Payer email
    pub email: Option<String>,
    /// Payer name (fallback when the card has no holder name)
    pub name: Option<String>,
    /// Merchant order id
    pub order_id: Option<String>,
    /// Anti-fraud device session id
    pub device_session_id: Option<String>,
    /// Currency code (defaults to MXN)
    pub currency: Option<String>,
    /// Free-form metadata
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    /// Customer reference or details
    pub customer: Option<Customer>,
    /// Card points usage
    pub use_card_points: Option<CardPoints>,
    /// Installment count
    pub payments: Option<u32>,
}

impl TransactionOptions {
    /// Currency to send, upper-cased
    pub fn currency_code(&self) -> String {
        self.currency
            .as_deref()
            .unwrap_or(crate::DEFAULT_CURRENCY)
            .to_uppercase()
    }
}
