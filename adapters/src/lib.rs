//! # Openpay Adapter
//!
//! Card gateway connectivity layer for the Openpay REST API:
//! - Purchase, authorize, capture, void, refund and verify
//! - Card-on-file store/unstore (customer + card tokens)
//! - Normalized responses with chained authorizations
//! - Transcript capture and PCI-safe scrubbing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │            PaymentGateway (generic trait)           │
//! └────────────┬────────────────────────────────────────┘
//!              │
//! ┌────────────▼─────────────┐      ┌──────────────────┐
//! │      OpenpayGateway      │─────►│    Transcript    │
//! │ transformers ─► commit   │      │     Recorder     │
//! └────────────┬─────────────┘      └────────┬─────────┘
//!              │                             │
//! ┌────────────▼─────────────┐      ┌────────▼─────────┐
//! │  Response / MultiResponse│      │     scrub()      │
//! └──────────────────────────┘      └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod connector;
pub mod error;
pub mod metrics;
pub mod openpay;
pub mod response;
pub mod scrub;
pub mod settings;
pub mod transcript;
pub mod types;

pub use connector::PaymentGateway;
pub use error::{Error, Result};
pub use openpay::OpenpayGateway;
pub use response::{MultiResponse, Response, StoreResponse};
pub use scrub::scrub;
pub use settings::{Country, OpenpayConfig};
pub use transcript::TranscriptRecorder;
pub use types::*;

/// Default request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Default transaction currency
pub const DEFAULT_CURRENCY: &str = "MXN";

/// Amount (minor units) authorized by `verify` before it is voided
pub const VERIFY_AMOUNT: u64 = 100;
