//! Openpay connector

pub mod transformers;

use crate::{
    connector::PaymentGateway,
    metrics::*,
    response::{MultiResponse, Response, StoreResponse},
    scrub::scrub,
    settings::OpenpayConfig,
    transcript::TranscriptRecorder,
    types::*,
    Error, Result,
};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method, Request, Url};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use transformers::*;

/// Openpay gateway
pub struct OpenpayGateway {
    config: OpenpayConfig,
    client: Client,
    transcript: Option<TranscriptRecorder>,
}

impl OpenpayGateway {
    /// Create new Openpay gateway
    pub fn new(config: OpenpayConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config("api_key is required".into()));
        }
        if config.merchant_id.is_empty() {
            return Err(Error::Config("merchant_id is required".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("Openpay/v1 RustBindings/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(Self {
            config,
            client,
            transcript: None,
        })
    }

    /// Record every request and response into `recorder`
    pub fn with_transcript(mut self, recorder: TranscriptRecorder) -> Self {
        self.transcript = Some(recorder);
        self
    }

    /// Attached transcript recorder
    pub fn transcript(&self) -> Option<&TranscriptRecorder> {
        self.transcript.as_ref()
    }

    /// Gateway configuration
    pub fn config(&self) -> &OpenpayConfig {
        &self.config
    }

    /// `{endpoint}{merchant_id}/{segments...}`, each segment percent-encoded
    pub fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let endpoint = self.config.endpoint();
        let mut url = Url::parse(&endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint {}: {}", endpoint, e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("endpoint {} cannot be a base", endpoint)))?;
            path.pop_if_empty().push(&self.config.merchant_id).extend(segments);
        }
        Ok(url)
    }

    async fn charge(
        &self,
        operation: Operation,
        amount: u64,
        source: &PaymentSource,
        options: &TransactionOptions,
        capture: Option<bool>,
    ) -> Result<Response> {
        let request = ChargeRequest::new(amount, source, options, capture)?;
        self.commit(operation, Method::POST, &["charges"], Some(&request))
            .await
    }

    async fn attach_card(
        &self,
        customer_id: &str,
        card: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<Response> {
        let request = CardRequest::new(card, options);
        self.commit(
            Operation::Store,
            Method::POST,
            &["customers", customer_id, "cards"],
            Some(&request),
        )
        .await
    }

    /// One round trip: build, send, record, normalize
    async fn commit<T: Serialize + ?Sized>(
        &self,
        operation: Operation,
        method: Method,
        segments: &[&str],
        body: Option<&T>,
    ) -> Result<Response> {
        let url = self.resource_url(segments)?;
        let payload = body.map(serde_json::to_string).transpose()?;

        let mut builder = self
            .client
            .request(method.clone(), url.clone())
            .basic_auth(&self.config.api_key, None::<&str>)
            .header(CONTENT_TYPE, "application/json");
        if let Some(payload) = &payload {
            builder = builder.body(payload.clone());
        }
        let request = builder.build()?;

        debug!("Openpay {} request: {} {}", operation, method, url.path());
        if let Some(payload) = &payload {
            debug!("Openpay {} body: {}", operation, scrub(payload));
        }
        self.record_request(&request, payload.as_deref());

        let start = Instant::now();
        let result = self.client.execute(request).await;
        GATEWAY_REQUEST_DURATION
            .with_label_values(&[operation.as_str()])
            .observe(start.elapsed().as_secs_f64());

        let http_response = match result {
            Ok(http_response) => http_response,
            Err(e) => return Err(self.transport_error(operation, e)),
        };

        let status = http_response.status();
        let raw = match http_response.text().await {
            Ok(raw) => raw,
            Err(e) => return Err(self.transport_error(operation, e)),
        };
        if let Some(transcript) = &self.transcript {
            transcript.incoming(format!("HTTP/1.1 {}", status));
            transcript.incoming(&raw);
        }

        let params = parse_body(status.as_u16(), &raw);
        let response = into_response(status.as_u16(), params, !self.config.production);

        if response.success {
            info!(
                "Openpay {} succeeded ({}): {}",
                operation,
                status.as_u16(),
                response.authorization.as_deref().unwrap_or("-")
            );
        } else {
            warn!(
                "Openpay {} failed ({}): code {:?}, {}",
                operation,
                status.as_u16(),
                response.error_code(),
                response.message.as_deref().unwrap_or("no description")
            );
        }
        GATEWAY_REQUESTS_TOTAL
            .with_label_values(&[
                operation.as_str(),
                if response.success { "success" } else { "failure" },
            ])
            .inc();

        Ok(response)
    }

    fn record_request(&self, request: &Request, payload: Option<&str>) {
        let Some(transcript) = &self.transcript else {
            return;
        };
        let url = request.url();
        transcript.note(format!(
            "opening connection to {}:{}...",
            url.host_str().unwrap_or_default(),
            url.port_or_known_default().unwrap_or_default()
        ));
        transcript.outgoing(format!("{} {} HTTP/1.1", request.method(), url.path()));
        for (name, value) in request.headers() {
            transcript.outgoing(format!(
                "{}: {}",
                name,
                value.to_str().unwrap_or("[binary]")
            ));
        }
        if let Some(payload) = payload {
            transcript.outgoing(payload);
        }
    }

    fn transport_error(&self, operation: Operation, error: reqwest::Error) -> Error {
        warn!("Openpay {} transport error: {}", operation, error);
        GATEWAY_REQUESTS_TOTAL
            .with_label_values(&[operation.as_str(), "error"])
            .inc();
        if let Some(transcript) = &self.transcript {
            transcript.note(format!("connection error: {}", error));
        }

        if error.is_timeout() {
            Error::Timeout {
                seconds: self.config.timeout_seconds,
                operation: operation.to_string(),
            }
        } else if error.is_connect() {
            Error::Connection(error.to_string())
        } else {
            Error::Http(error)
        }
    }
}

/// Vendor identifiers become path segments; a blank one would address the
/// collection instead of the resource
fn require_id(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField(field));
    }
    Ok(())
}

#[async_trait]
impl PaymentGateway for OpenpayGateway {
    fn name(&self) -> &str {
        "Openpay"
    }

    async fn purchase(
        &self,
        amount: u64,
        source: &PaymentSource,
        options: &TransactionOptions,
    ) -> Result<Response> {
        info!("Sending Openpay purchase of {} minor units", amount);
        self.charge(Operation::Purchase, amount, source, options, None)
            .await
    }

    async fn authorize(
        &self,
        amount: u64,
        source: &PaymentSource,
        options: &TransactionOptions,
    ) -> Result<Response> {
        info!("Sending Openpay authorization of {} minor units", amount);
        self.charge(Operation::Authorize, amount, source, options, Some(false))
            .await
    }

    async fn capture(
        &self,
        amount: Option<u64>,
        authorization: &str,
        options: &TransactionOptions,
    ) -> Result<Response> {
        require_id("authorization", authorization)?;
        let request = CaptureRequest {
            amount: amount.map(to_major_units).transpose()?,
            payments: options.payments,
        };
        self.commit(
            Operation::Capture,
            Method::POST,
            &["charges", authorization, "capture"],
            Some(&request),
        )
        .await
    }

    async fn void(&self, authorization: &str, _options: &TransactionOptions) -> Result<Response> {
        require_id("authorization", authorization)?;
        self.commit(
            Operation::Void,
            Method::POST,
            &["charges", authorization, "refund"],
            None::<&Value>,
        )
        .await
    }

    async fn refund(
        &self,
        amount: u64,
        authorization: &str,
        options: &TransactionOptions,
    ) -> Result<Response> {
        require_id("authorization", authorization)?;
        let request = RefundRequest {
            description: options.description.clone(),
            amount: to_major_units(amount)?,
        };
        self.commit(
            Operation::Refund,
            Method::POST,
            &["charges", authorization, "refund"],
            Some(&request),
        )
        .await
    }

    async fn store(
        &self,
        card: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<StoreResponse> {
        card.validate()?;

        if let Some(customer_id) = options.customer.as_ref().and_then(|c| c.id.as_deref()) {
            require_id("customer_id", customer_id)?;
            let response = self.attach_card(customer_id, card, options).await?;
            return Ok(StoreResponse::Card(response));
        }

        let request = NewCustomerRequest {
            name: options.name.clone().ok_or(Error::MissingField("name"))?,
            email: options.email.clone().ok_or(Error::MissingField("email"))?,
        };

        let mut multi = MultiResponse::use_first_response();
        let customer = self
            .commit(Operation::Store, Method::POST, &["customers"], Some(&request))
            .await?;
        let customer_id = customer
            .success
            .then(|| customer.authorization.clone())
            .flatten();
        multi.process(customer, false);

        if let Some(customer_id) = customer_id {
            let card = self.attach_card(&customer_id, card, options).await?;
            multi.process(card, false);
        }

        Ok(StoreResponse::CustomerAndCard(multi))
    }

    async fn unstore(&self, customer_id: &str, card_id: Option<&str>) -> Result<Response> {
        require_id("customer_id", customer_id)?;
        match card_id {
            Some(card_id) => {
                require_id("card_id", card_id)?;
                self.commit(
                    Operation::Unstore,
                    Method::DELETE,
                    &["customers", customer_id, "cards", card_id],
                    None::<&Value>,
                )
                .await
            }
            None => {
                self.commit(
                    Operation::Unstore,
                    Method::DELETE,
                    &["customers", customer_id],
                    None::<&Value>,
                )
                .await
            }
        }
    }

    fn supports_scrubbing(&self) -> bool {
        true
    }

    fn scrub(&self, transcript: &str) -> String {
        scrub(transcript)
    }
}
