//! Estimator configuration loaded from `estimator.toml`.
//!
//! [`EstimatorConfig`] holds every tunable. Missing fields fall back to
//! defaults and a missing file means all defaults. `CIRCLE_TOKEN` in the
//! environment takes precedence over the token in the file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::estimate::{DEFAULT_CREDIT_PRICE, PricingTable};
use crate::provider::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const DEFAULT_CONFIG_FILE: &str = "estimator.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorConfig {
    /// API token used when a request does not carry its own.
    #[serde(default)]
    pub circle_token: String,

    /// Provider host, without the `/api/...` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Dollars per credit.
    #[serde(default = "default_credit_price")]
    pub credit_price: f64,

    /// Timeout applied to each outbound call independently.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Appended to every successful response.
    #[serde(default = "default_disclaimer")]
    pub disclaimer: String,

    /// Extra or corrected rates, merged over the built-in table.
    #[serde(default)]
    pub pricing: HashMap<String, HashMap<String, f64>>,
}

// Public CircleCI; self-hosted installs override this.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_credit_price() -> f64 {
    DEFAULT_CREDIT_PRICE
}

// Per call, not per estimate.
fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

// Shown verbatim under every estimate.
fn default_disclaimer() -> String {
    "NOTICE - THIS IS A COST ESTIMATE. THERE IS NO GUARANTEE THIS ESTIMATE IS CORRECT.".to_string()
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            circle_token: String::new(),
            base_url: default_base_url(),
            credit_price: default_credit_price(),
            request_timeout_secs: default_request_timeout_secs(),
            disclaimer: default_disclaimer(),
            pricing: HashMap::new(),
        }
    }
}

impl EstimatorConfig {
    /// Read `path` if it exists, then apply the environment override and
    /// validate rates.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<EstimatorConfig>(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(token) = std::env::var("CIRCLE_TOKEN")
            && !token.is_empty()
        {
            config.circle_token = token;
        }

        anyhow::ensure!(
            config.credit_price >= 0.0,
            "credit_price must not be negative"
        );
        anyhow::ensure!(
            config
                .pricing
                .values()
                .flat_map(|classes| classes.values())
                .all(|rate| *rate >= 0.0),
            "pricing rates must not be negative"
        );

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Built-in rates with this config's overrides applied.
    pub fn pricing_table(&self) -> PricingTable {
        PricingTable::default().merged_with(&self.pricing)
    }
}
