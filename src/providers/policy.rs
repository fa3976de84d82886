//! Missing-value handling for providers whose fetches may legitimately fail.
//!
//! The policy is decided once, when the provider is built, from the `optional`
//! and `fallback_value` options. `optional` takes precedence when both are set.

use crate::config::{self, StaticConfig};
use crate::errors::{ResolveError, Result};
use tracing::{debug, warn};

/// What to do when a backend fetch fails
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MissingValuePolicy {
    /// Propagate the failure
    #[default]
    Fail,
    /// Report the value as absent, without an error
    Optional,
    /// Substitute the configured value
    Fallback(String),
}

impl MissingValuePolicy {
    /// Derive the policy from provider options
    ///
    /// `optional` is parsed leniently; values that are not a recognised boolean
    /// leave it unset. `fallback_value` only needs to be present, so an empty
    /// fallback is still a fallback.
    pub fn from_config(cfg: &dyn StaticConfig) -> Self {
        let optional = config::parse_bool(&cfg.string(config::OPTIONAL)).unwrap_or(false);

        if optional {
            Self::Optional
        } else if cfg.exists(config::FALLBACK_VALUE) {
            Self::Fallback(cfg.string(config::FALLBACK_VALUE))
        } else {
            Self::Fail
        }
    }

    /// Resolve a failed fetch for the secret `name`
    ///
    /// Returns `Ok(None)` for a suppressed miss and `Ok(Some(bytes))` for a
    /// substituted value.
    pub fn apply(&self, name: &str, err: ResolveError) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Optional => {
                debug!(secret = %name, error = %err, "Secret is optional, suppressing fetch failure");
                Ok(None)
            }
            Self::Fallback(value) => {
                warn!(secret = %name, error = %err, "Failed to fetch secret, using fallback value");
                Ok(Some(value.clone().into_bytes()))
            }
            Self::Fail => {
                Err(ResolveError::SecretAccess { name: name.to_string(), source: Box::new(err) })
            }
        }
    }
}
