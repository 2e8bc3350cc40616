//! Openpay wire format
//!
//! Request bodies built from the generic options, and normalization of the
//! vendor's JSON into a [`Response`].

use crate::{response::Response, types::*, Error, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Synthetic error code for bodies that are not JSON objects
pub const INVALID_RESPONSE_CODE: i64 = 9999;

/// `POST charges`
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    /// Major-unit amount
    pub amount: Decimal,
    /// Always `card`
    pub method: &'static str,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Merchant order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Anti-fraud session id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_session_id: Option<String>,
    /// Upper-case currency code
    pub currency: String,
    /// `false` for authorize-only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,
    /// Card points usage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_card_points: Option<CardPoints>,
    /// Installments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_plan: Option<PaymentPlan>,
    /// Raw card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardRequest>,
    /// Stored card token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Customer reference or details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    /// Free-form metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Installment plan
#[derive(Debug, Clone, Serialize)]
pub struct PaymentPlan {
    /// Number of installments
    pub payments: u32,
}

/// Card object (charges and `customers/{id}/cards`)
#[derive(Debug, Clone, Serialize)]
pub struct CardRequest {
    /// PAN
    pub card_number: String,
    /// `MM`
    pub expiration_month: String,
    /// `YY`
    pub expiration_year: String,
    /// CVV
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv2: Option<String>,
    /// Holder name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    /// Billing address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressRequest>,
}

/// Openpay address object
#[derive(Debug, Clone, Serialize)]
pub struct AddressRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_code: Option<String>,
}

impl From<&Address> for AddressRequest {
    fn from(address: &Address) -> Self {
        Self {
            line1: address.address1.clone(),
            line2: address.address2.clone(),
            line3: address.company.clone(),
            city: address.city.clone(),
            postal_code: address.zip.clone(),
            state: address.state.clone(),
            country_code: address.country.clone(),
        }
    }
}

/// `POST charges/{id}/capture`
#[derive(Debug, Clone, Default, Serialize)]
pub struct CaptureRequest {
    /// Amount to settle (full authorization when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// Installments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<u32>,
}

/// `POST charges/{id}/refund`
#[derive(Debug, Clone, Serialize)]
pub struct RefundRequest {
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Amount to return
    pub amount: Decimal,
}

/// `POST customers`
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomerRequest {
    /// Customer name
    pub name: String,
    /// Customer email
    pub email: String,
}

impl CardRequest {
    /// Card object with the billing address from `options`
    pub fn new(card: &CreditCard, options: &TransactionOptions) -> Self {
        Self {
            card_number: card.number.clone(),
            expiration_month: card.expiration_month(),
            expiration_year: card.expiration_year(),
            cvv2: card.verification_value.clone(),
            holder_name: card.name(),
            address: options.billing_address.as_ref().map(AddressRequest::from),
        }
    }
}

impl ChargeRequest {
    /// Body for purchase (`capture = None`) or authorize (`capture = Some(false)`)
    pub fn new(
        amount: u64,
        source: &PaymentSource,
        options: &TransactionOptions,
        capture: Option<bool>,
    ) -> Result<Self> {
        let mut request = Self {
            amount: to_major_units(amount)?,
            method: "card",
            description: options.description.clone(),
            order_id: options.order_id.clone(),
            device_session_id: options.device_session_id.clone(),
            currency: options.currency_code(),
            capture,
            use_card_points: options.use_card_points,
            payment_plan: options.payments.map(|payments| PaymentPlan { payments }),
            card: None,
            source_id: None,
            customer: None,
            metadata: options.metadata.clone(),
        };

        match source {
            PaymentSource::Card(card) => {
                card.validate()?;
                request.card = Some(CardRequest::new(card, options));
                if let Some(email) = &options.email {
                    request.customer = Some(Customer {
                        name: card.name().or_else(|| options.name.clone()),
                        email: Some(email.clone()),
                        ..Default::default()
                    });
                }
            }
            PaymentSource::Stored(token) => {
                if token.is_empty() {
                    return Err(Error::InvalidCard("empty stored card token".into()));
                }
                request.source_id = Some(token.clone());
            }
        }

        // An explicit customer replaces the one derived from the email
        if let Some(customer) = &options.customer {
            request.customer = Some(customer.clone());
        }

        Ok(request)
    }
}

/// Parse a response body; an empty 2xx body is `{}`, anything else that is
/// not a JSON object becomes a synthetic request error
pub fn parse_body(status_code: u16, raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return if (200..300).contains(&status_code) {
            Map::new()
        } else {
            invalid_response(raw)
        };
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(params)) => params,
        _ => invalid_response(raw),
    }
}

fn invalid_response(raw: &str) -> Map<String, Value> {
    let description = format!(
        "Invalid response received from the Openpay API. Please contact soporte@openpay.mx if you continue to receive this message. (The raw response returned by the API was {:?})",
        raw
    );
    let mut params = Map::new();
    params.insert("category".into(), json!("request"));
    params.insert("error_code".into(), json!(INVALID_RESPONSE_CODE));
    params.insert("description".into(), json!(description));
    params
}

/// Openpay signals failure with a non-empty `error_code`
pub fn is_error(params: &Map<String, Value>) -> bool {
    match params.get("error_code") {
        None | Some(Value::Null) => false,
        Some(Value::String(code)) => !code.trim().is_empty(),
        Some(_) => true,
    }
}

/// Normalize parsed vendor params
pub fn into_response(status_code: u16, params: Map<String, Value>, test: bool) -> Response {
    let success = !is_error(&params);
    let message = if success {
        None
    } else {
        params
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let authorization = match params.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };

    Response {
        success,
        message,
        params,
        authorization,
        status_code,
        test,
    }
}
