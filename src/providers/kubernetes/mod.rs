//! Kubernetes secret provider
//!
//! Reads one key out of a Secret object in the cluster selected by the
//! provider's kubeconfig and context.
//!
//! ## Configuration
//!
//! Provider options:
//! - `kubeConfigPath` - Optional explicit kubeconfig file
//! - `kubeContext` - Optional context name (uses the current context if unset)
//!
//! Environment variables:
//! - `KUBECONFIG` - Kubeconfig file used when `kubeConfigPath` is unset
//!
//! ## Path Format
//!
//! `<namespace>/<secret>/<key>`, for example `payments/db-credentials/password`.
//!
//! Structured values (`get_string_map`) are not supported by this provider.

pub mod client;
pub mod credentials;

pub use client::{KubeSecretReader, SecretData, SecretObjectReader, SecretObjectRequest};
pub use credentials::{CredentialSources, ResolvedKubeconfig};

use super::{ProviderKind, SecretProvider, StringMap};
use crate::config::{self, HostEnvironment, StaticConfig};
use crate::errors::{ResolveError, Result};
use crate::providers::shape;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

const PATH_FORMAT: &str = "<namespace>/<secret>/<key>";

/// Parsed `<namespace>/<secret>/<key>` path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretPath<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub key: &'a str,
}

impl<'a> SecretPath<'a> {
    /// Split a path into exactly three non-empty segments
    pub fn parse(path: &'a str) -> Result<Self> {
        let mut segments = path.split('/');

        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(namespace), Some(name), Some(key), None)
                if !namespace.is_empty() && !name.is_empty() && !key.is_empty() =>
            {
                Ok(Self { namespace, name, key })
            }
            _ => Err(ResolveError::invalid_path(path, PATH_FORMAT)),
        }
    }
}

/// Provider for Kubernetes secrets
pub struct KubernetesProvider {
    reader: Arc<dyn SecretObjectReader>,
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
}

impl std::fmt::Debug for KubernetesProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubernetesProvider")
            .field("kubeconfig", &self.kubeconfig)
            .field("context", &self.context)
            .field("reader", &self.reader)
            .finish()
    }
}

impl KubernetesProvider {
    /// Build a provider from its options, the process environment and the
    /// Kubernetes API reader
    pub fn new(cfg: &dyn StaticConfig) -> Self {
        Self::with_reader(cfg, &HostEnvironment::from_process(), Arc::new(KubeSecretReader))
    }

    /// Build a provider with an explicit host snapshot and reader
    ///
    /// A kubeconfig that cannot be located is logged and leaves the provider
    /// without credentials; every lookup then fails with
    /// [`ResolveError::NoCredentialPath`].
    pub fn with_reader(
        cfg: &dyn StaticConfig,
        host: &HostEnvironment,
        reader: Arc<dyn SecretObjectReader>,
    ) -> Self {
        let kubeconfig = match CredentialSources::new(cfg, host).resolve() {
            Ok(resolved) => {
                debug!(
                    kubeconfig = %resolved.path.display(),
                    origin = %resolved.origin,
                    "Resolved kubeconfig"
                );
                Some(resolved.path)
            }
            Err(e) => {
                warn!(error = %e, "An error occurred getting the kubeconfig path");
                None
            }
        };

        let context = Some(cfg.string(config::KUBE_CONTEXT)).filter(|c| !c.is_empty());

        Self { reader, kubeconfig, context }
    }

    /// Kubeconfig in use, if one was found
    pub fn kubeconfig(&self) -> Option<&PathBuf> {
        self.kubeconfig.as_ref()
    }

    /// Context override, if configured
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

#[async_trait]
impl SecretProvider for KubernetesProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kubernetes
    }

    async fn get_string(&self, path: &str) -> Result<String> {
        let target = SecretPath::parse(path)?;
        let kubeconfig = self.kubeconfig.as_deref().ok_or(ResolveError::NoCredentialPath)?;

        if self.context.is_none() {
            info!("kubeContext was not provided, using the current context");
        }

        let request = SecretObjectRequest {
            namespace: target.namespace,
            name: target.name,
            kubeconfig,
            context: self.context.as_deref(),
        };
        let mut data = self.reader.read_secret(&request).await?;

        let value = data.remove(target.key).ok_or_else(|| {
            ResolveError::key_not_found(target.namespace, target.name, target.key)
        })?;

        debug!(
            namespace = %target.namespace,
            secret = %target.name,
            key = %target.key,
            context = self.context.as_deref().unwrap_or("current"),
            "Retrieved secret from Kubernetes"
        );

        shape::decode_text(value)
    }

    async fn get_string_map(&self, _path: &str) -> Result<StringMap> {
        Err(ResolveError::Unsupported {
            provider: ProviderKind::Kubernetes,
            operation: "structured values from URI fragments",
        })
    }
}
