//! Gateway configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `OPENPAY_*` environment variables (e.g. `OPENPAY_API_KEY`,
//! `OPENPAY_MERCHANT_ID`, `OPENPAY_PRODUCTION=true`).

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;

/// Openpay operating country
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    /// Mexico (openpay.mx)
    #[default]
    Mx,
    /// Colombia (openpay.co)
    Co,
    /// Peru (openpay.pe)
    Pe,
}

impl Country {
    fn domain(&self) -> &'static str {
        match self {
            Country::Mx => "mx",
            Country::Co => "co",
            Country::Pe => "pe",
        }
    }
}

/// Openpay gateway configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenpayConfig {
    /// Private API key (basic-auth user)
    pub api_key: String,
    /// Merchant id (first path segment)
    pub merchant_id: String,
    /// Use the production endpoint
    #[serde(default)]
    pub production: bool,
    /// Operating country
    #[serde(default)]
    pub country: Country,
    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Endpoint override (must end with `/`)
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_timeout() -> u64 {
    crate::DEFAULT_REQUEST_TIMEOUT_SECONDS
}

impl OpenpayConfig {
    /// Sandbox config for Mexico
    pub fn new(api_key: impl Into<String>, merchant_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            merchant_id: merchant_id.into(),
            production: false,
            country: Country::Mx,
            timeout_seconds: default_timeout(),
            base_url: None,
        }
    }

    /// Point the gateway at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = Some(base_url);
        self
    }

    /// Load from `OPENPAY_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::builder()?.add_source(Self::environment()).build()?.try_deserialize()?)
    }

    /// Load from a TOML file, with environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        Ok(Self::builder()?
            .add_source(File::with_name(path).format(FileFormat::Toml))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?)
    }

    /// Load from TOML text (no environment overrides)
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Ok(Self::builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }

    fn builder() -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("production", false)?
            .set_default("country", "mx")?
            .set_default("timeout_seconds", crate::DEFAULT_REQUEST_TIMEOUT_SECONDS)
    }

    fn environment() -> Environment {
        Environment::with_prefix("OPENPAY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Base endpoint, always ending with `/`
    pub fn endpoint(&self) -> String {
        if let Some(base_url) = &self.base_url {
            return if base_url.ends_with('/') {
                base_url.clone()
            } else {
                format!("{}/", base_url)
            };
        }
        let host = if self.production { "api" } else { "sandbox-api" };
        format!("https://{}.openpay.{}/v1/", host, self.country.domain())
    }
}

impl fmt::Debug for OpenpayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenpayConfig")
            .field("api_key", &"[FILTERED]")
            .field("merchant_id", &self.merchant_id)
            .field("production", &self.production)
            .field("country", &self.country)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("base_url", &self.base_url)
            .finish()
    }
}
