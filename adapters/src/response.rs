//! Normalized gateway responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized result of one vendor round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the vendor accepted the request
    pub success: bool,
    /// Human-readable failure description (`None` on success)
    pub message: Option<String>,
    /// Raw vendor JSON object
    pub params: Map<String, Value>,
    /// Vendor identifier used to chain later operations
    pub authorization: Option<String>,
    /// HTTP status code of the round trip
    pub status_code: u16,
    /// Sandbox response
    pub test: bool,
}

impl Response {
    /// Numeric vendor error code, if any
    pub fn error_code(&self) -> Option<i64> {
        match self.params.get("error_code")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Vendor `status` field (e.g. `completed`, `in_progress`, `cancelled`)
    pub fn status(&self) -> Option<&str> {
        self.params.get("status").and_then(Value::as_str)
    }

    /// Look up a top-level vendor field
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

/// Ordered sequence of sub-responses for one logical operation
///
/// A primary response drives success, message, params and authorization. In
/// first-response mode the first successful step stays primary until a later
/// step fails; otherwise the latest processed step is primary. Steps processed
/// with `ignore_result` are recorded but never become primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiResponse {
    responses: Vec<Response>,
    primary: Option<usize>,
    use_first_response: bool,
}

impl MultiResponse {
    /// Latest step is primary
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            primary: None,
            use_first_response: false,
        }
    }

    /// First successful step is primary
    pub fn use_first_response() -> Self {
        Self {
            use_first_response: true,
            ..Self::new()
        }
    }

    /// Record a step
    pub fn process(&mut self, response: Response, ignore_result: bool) {
        let index = self.responses.len();
        let success = response.success;
        self.responses.push(response);

        if ignore_result {
            return;
        }
        if self.use_first_response && success {
            self.primary.get_or_insert(index);
        } else {
            self.primary = Some(index);
        }
    }

    /// All steps in order
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Consume into the steps
    pub fn into_responses(self) -> Vec<Response> {
        self.responses
    }

    /// Primary step
    pub fn primary_response(&self) -> Option<&Response> {
        self.primary.and_then(|i| self.responses.get(i))
    }

    /// Overall success (an empty sequence is successful)
    pub fn success(&self) -> bool {
        self.primary_response().map_or(true, |r| r.success)
    }

    /// Primary message
    pub fn message(&self) -> Option<&str> {
        self.primary_response().and_then(|r| r.message.as_deref())
    }

    /// Primary authorization
    pub fn authorization(&self) -> Option<&str> {
        self.primary_response()
            .and_then(|r| r.authorization.as_deref())
    }

    /// Primary params
    pub fn params(&self) -> Option<&Map<String, Value>> {
        self.primary_response().map(|r| &r.params)
    }
}

impl Default for MultiResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of storing a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreResponse {
    /// Card attached to an existing customer
    Card(Response),
    /// Customer created, then card attached
    CustomerAndCard(MultiResponse),
}

impl StoreResponse {
    /// Overall success
    pub fn success(&self) -> bool {
        match self {
            StoreResponse::Card(r) => r.success,
            StoreResponse::CustomerAndCard(m) => m.success(),
        }
    }

    /// Card id for `Card`, customer id for `CustomerAndCard`
    pub fn authorization(&self) -> Option<&str> {
        match self {
            StoreResponse::Card(r) => r.authorization.as_deref(),
            StoreResponse::CustomerAndCard(m) => m.authorization(),
        }
    }

    /// Failure message
    pub fn message(&self) -> Option<&str> {
        match self {
            StoreResponse::Card(r) => r.message.as_deref(),
            StoreResponse::CustomerAndCard(m) => m.message(),
        }
    }

    /// Every vendor response, in order
    pub fn responses(&self) -> Vec<&Response> {
        match self {
            StoreResponse::Card(r) => vec![r],
            StoreResponse::CustomerAndCard(m) => m.responses().iter().collect(),
        }
    }

    /// The multi-step form, when a customer was created
    pub fn as_multi(&self) -> Option<&MultiResponse> {
        match self {
            StoreResponse::CustomerAndCard(m) => Some(m),
            StoreResponse::Card(_) => None,
        }
    }
}
