//! Generic card gateway interface

use crate::{
    response::{MultiResponse, Response, StoreResponse},
    types::*,
    Result,
};
use async_trait::async_trait;

/// Card gateway trait
///
/// Amounts are minor currency units. Vendor declines are returned as failed
/// responses; `Err` means no normalized response could be produced.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Get gateway name
    fn name(&self) -> &str;

    /// Authorize and capture in one step
    async fn purchase(
        &self,
        amount: u64,
        source: &PaymentSource,
        options: &TransactionOptions,
    ) -> Result<Response>;

    /// Reserve funds without capturing
    async fn authorize(
        &self,
        amount: u64,
        source: &PaymentSource,
        options: &TransactionOptions,
    ) -> Result<Response>;

    /// Settle a prior authorization (full amount when `amount` is `None`)
    async fn capture(
        &self,
        amount: Option<u64>,
        authorization: &str,
        options: &TransactionOptions,
    ) -> Result<Response>;

    /// Cancel an uncaptured authorization
    async fn void(&self, authorization: &str, options: &TransactionOptions) -> Result<Response>;

    /// Return captured funds
    async fn refund(
        &self,
        amount: u64,
        authorization: &str,
        options: &TransactionOptions,
    ) -> Result<Response>;

    /// Authorize a nominal amount and void it
    async fn verify(
        &self,
        card: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<MultiResponse> {
        let source = PaymentSource::Card(card.clone());
        let mut multi = MultiResponse::use_first_response();

        let auth = self
            .authorize(crate::VERIFY_AMOUNT, &source, options)
            .await?;
        let authorization = auth.authorization.clone();
        let authorized = auth.success;
        multi.process(auth, false);

        if let (true, Some(authorization)) = (authorized, authorization) {
            let void = self.void(&authorization, options).await?;
            multi.process(void, true);
        }

        Ok(multi)
    }

    /// Store a card on file
    async fn store(&self, card: &CreditCard, options: &TransactionOptions)
        -> Result<StoreResponse>;

    /// Remove a stored card, or the whole customer when `card_id` is `None`
    async fn unstore(&self, customer_id: &str, card_id: Option<&str>) -> Result<Response>;

    /// Whether `scrub` is implemented
    fn supports_scrubbing(&self) -> bool {
        false
    }

    /// Redact sensitive fields from a transcript
    fn scrub(&self, transcript: &str) -> String {
        transcript.to_string()
    }
}
