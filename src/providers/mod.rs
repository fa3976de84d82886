//! Pluggable secret providers
//!
//! Every backend implements [`SecretProvider`], a small read-only contract:
//!
//! - **get_string**: fetch one secret value as text
//! - **get_string_map**: fetch a secret and parse it as a structured document
//! - **get_optional_string**: like `get_string`, but reports a suppressed
//!   (optional) miss as `None` instead of an empty string
//! - **get_optional_string_map**: the same for structured values
//!
//! ## Supported Backends
//!
//! - **Kubernetes**: `namespace/secret/key` against the cluster secret store
//! - **GCP Secret Manager**: `project/secret`, versioned, with optional and
//!   fallback handling for missing values
//!
//! Providers are immutable once built and can be shared across tasks behind an
//! `Arc<dyn SecretProvider>`.

pub mod gcp;
pub mod kubernetes;
pub mod policy;
pub mod shape;

use crate::errors::{ResolveError, Result};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use gcp::GcpSecretsProvider;
pub use kubernetes::KubernetesProvider;
pub use policy::MissingValuePolicy;

/// Structured secret content
pub type StringMap = serde_json::Map<String, serde_json::Value>;

/// Type of secret provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Kubernetes secrets
    Kubernetes,
    /// GCP Secret Manager
    GcpSecrets,
}

impl ProviderKind {
    /// URI scheme that selects this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kubernetes => "k8s",
            Self::GcpSecrets => "gcpsecrets",
        }
    }

    /// Resolve a reference scheme, with or without the `ref+` prefix
    pub fn from_scheme(scheme: &str) -> Result<Self> {
        let name = scheme.strip_prefix("ref+").unwrap_or(scheme);
        name.parse().map_err(|_| ResolveError::UnknownScheme { scheme: scheme.to_string() })
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "k8s" => Ok(Self::Kubernetes),
            "gcpsecrets" => Ok(Self::GcpSecrets),
            _ => Err(format!("Unknown secret provider: {}", s)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for secret providers
///
/// Implementations must be Send + Sync for use in async contexts.
#[async_trait]
pub trait SecretProvider: Send + Sync + fmt::Debug {
    /// Get the provider type identifier
    fn kind(&self) -> ProviderKind;

    /// Fetch the secret addressed by `path` as text
    async fn get_string(&self, path: &str) -> Result<String>;

    /// Fetch the secret addressed by `path` and parse it as a mapping
    async fn get_string_map(&self, path: &str) -> Result<StringMap>;

    /// Fetch the secret addressed by `path`, returning `None` when the miss was
    /// suppressed by the provider's missing-value policy
    async fn get_optional_string(&self, path: &str) -> Result<Option<String>> {
        self.get_string(path).await.map(Some)
    }

    /// Like `get_string_map`, returning `None` when the miss was suppressed
    async fn get_optional_string_map(&self, path: &str) -> Result<Option<StringMap>> {
        self.get_string_map(path).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [ProviderKind::Kubernetes, ProviderKind::GcpSecrets] {
            let parsed: ProviderKind = kind.as_str().parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_from_scheme_accepts_ref_prefix() {
        assert_eq!(ProviderKind::from_scheme("ref+k8s").unwrap(), ProviderKind::Kubernetes);
        assert_eq!(ProviderKind::from_scheme("gcpsecrets").unwrap(), ProviderKind::GcpSecrets);
    }

    #[test]
    fn test_from_scheme_unknown() {
        let err = ProviderKind::from_scheme("ref+awssecrets").unwrap_err();
        assert!(matches!(err, ResolveError::UnknownScheme { ref scheme } if scheme == "ref+awssecrets"));
    }
}
