//! GCP Secret Manager provider
//!
//! Fetches secret versions from Google Cloud Secret Manager.
//!
//! ## Configuration
//!
//! Provider options:
//! - `version` - Secret version to read (default: `latest`)
//! - `optional` - When true, a failed fetch yields no value instead of an error
//! - `fallback_value` - Value returned when a fetch fails
//!
//! ## Path Format
//!
//! `<project>/<secret>`, for example `my-project/db-credentials`.
//!
//! ## Structured Secrets
//!
//! `get_string_map` parses the payload as YAML or JSON and returns the whole
//! mapping; callers project individual keys out of it.

pub mod client;

pub use client::{SecretManagerAccessor, SecretVersionAccessor, SecretVersionName, LATEST_VERSION};

use super::{MissingValuePolicy, ProviderKind, SecretProvider, StringMap};
use crate::config::{self, StaticConfig};
use crate::errors::{ResolveError, Result};
use crate::providers::shape;
use async_trait::async_trait;
use std::sync::Arc;

const PATH_FORMAT: &str = "<project>/<secret>";

/// Parsed `<project>/<secret>` path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretName<'a> {
    pub project: &'a str,
    pub secret: &'a str,
}

impl<'a> SecretName<'a> {
    /// Split on the first `/` into a non-empty project and secret
    pub fn parse(path: &'a str) -> Result<Self> {
        match path.split_once('/') {
            Some((project, secret)) if !project.is_empty() && !secret.is_empty() => {
                Ok(Self { project, secret })
            }
            _ => Err(ResolveError::invalid_path(path, PATH_FORMAT)),
        }
    }
}

/// Provider for GCP Secret Manager
#[derive(Debug)]
pub struct GcpSecretsProvider {
    accessor: Arc<dyn SecretVersionAccessor>,
    version: String,
    policy: MissingValuePolicy,
}

impl GcpSecretsProvider {
    /// Build a provider from its options using the Secret Manager API
    pub fn new(cfg: &dyn StaticConfig) -> Self {
        Self::with_accessor(cfg, Arc::new(SecretManagerAccessor))
    }

    /// Build a provider with an explicit accessor
    pub fn with_accessor(cfg: &dyn StaticConfig, accessor: Arc<dyn SecretVersionAccessor>) -> Self {
        let version = Some(cfg.string(config::VERSION))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| LATEST_VERSION.to_string());

        Self { accessor, version, policy: MissingValuePolicy::from_config(cfg) }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn policy(&self) -> &MissingValuePolicy {
        &self.policy
    }

    /// Fetch the payload for `path`, applying the missing-value policy
    ///
    /// `Ok(None)` means the fetch failed and the provider is optional.
    async fn payload(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let target = SecretName::parse(path)?;
        let name = SecretVersionName::new(target.project, target.secret, self.version.as_str());

        match self.accessor.access(&name).await {
            Ok(data) => Ok(Some(data)),
            Err(e) => self.policy.apply(&name.to_string(), e),
        }
    }
}

#[async_trait]
impl SecretProvider for GcpSecretsProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GcpSecrets
    }

    async fn get_string(&self, path: &str) -> Result<String> {
        Ok(self.get_optional_string(path).await?.unwrap_or_default())
    }

    async fn get_string_map(&self, path: &str) -> Result<StringMap> {
        Ok(self.get_optional_string_map(path).await?.unwrap_or_default())
    }

    async fn get_optional_string(&self, path: &str) -> Result<Option<String>> {
        self.payload(path).await?.map(shape::decode_text).transpose()
    }

    async fn get_optional_string_map(&self, path: &str) -> Result<Option<StringMap>> {
        self.payload(path).await?.map(|data| shape::parse_string_map(&data)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;

    #[test]
    fn test_parse_name() {
        let name = SecretName::parse("my-project/db-credentials").unwrap();
        assert_eq!(name.project, "my-project");
        assert_eq!(name.secret, "db-credentials");
    }

    #[test]
    fn test_parse_name_splits_on_first_separator() {
        let name = SecretName::parse("my-project/a/b").unwrap();
        assert_eq!(name.project, "my-project");
        assert_eq!(name.secret, "a/b");
    }

    #[test]
    fn test_parse_name_invalid() {
        for path in ["", "my-project", "my-project/", "/db-credentials"] {
            let err = SecretName::parse(path).unwrap_err();
            assert!(matches!(err, ResolveError::InvalidPath { .. }), "{path}");
        }
    }

    #[test]
    fn test_version_defaults_to_latest() {
        let provider = GcpSecretsProvider::new(&MapConfig::new());
        assert_eq!(provider.version(), "latest");

        let provider = GcpSecretsProvider::new(&MapConfig::new().with("version", ""));
        assert_eq!(provider.version(), "latest");

        let provider = GcpSecretsProvider::new(&MapConfig::new().with("version", "7"));
        assert_eq!(provider.version(), "7");
    }

    #[test]
    fn test_policy_resolved_at_construction() {
        let provider = GcpSecretsProvider::new(&MapConfig::new().with("optional", "1"));
        assert_eq!(provider.policy(), &MissingValuePolicy::Optional);
        assert_eq!(provider.kind(), ProviderKind::GcpSecrets);
    }
}
