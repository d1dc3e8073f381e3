//! Runtime configuration for the ledger services.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting the [`OverdrawPolicy`] (`clamp` or `reject`).
pub const OVERDRAW_POLICY_ENV: &str = "DEPOT_OVERDRAW_POLICY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown overdraw policy '{0}' (expected 'clamp' or 'reject')")]
    UnknownPolicy(String),

    #[error("invalid ledger config: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// What to do when a withdrawal asks for more than a location holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverdrawPolicy {
    /// Withdraw what is there and floor the location at zero.
    #[default]
    Clamp,
    /// Fail the whole operation with `InsufficientStock`.
    Reject,
}

impl FromStr for OverdrawPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(OverdrawPolicy::Clamp),
            "reject" => Ok(OverdrawPolicy::Reject),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub overdraw_policy: OverdrawPolicy,
}

impl LedgerConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// An unparseable value is logged and ignored rather than aborting startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(OVERDRAW_POLICY_ENV) {
            match raw.parse() {
                Ok(policy) => config.overdraw_policy = policy,
                Err(err) => tracing::warn!(
                    variable = OVERDRAW_POLICY_ENV,
                    error = %err,
                    "ignoring invalid ledger setting"
                ),
            }
        }
        config
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_overdraw_policy(mut self, policy: OverdrawPolicy) -> Self {
        self.overdraw_policy = policy;
        self
    }
}
