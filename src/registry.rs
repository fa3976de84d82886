//! Provider registry
//!
//! Maps a reference scheme to a provider and resolves whole references.
//! The registry owns the backend accessors handed to the providers it builds,
//! so tests can swap in fakes without touching the process environment.

use crate::config::{HostEnvironment, StaticConfig};
use crate::errors::Result;
use crate::providers::gcp::{SecretManagerAccessor, SecretVersionAccessor};
use crate::providers::kubernetes::{KubeSecretReader, SecretObjectReader};
use crate::providers::{
    shape, GcpSecretsProvider, KubernetesProvider, ProviderKind, SecretProvider,
};
use crate::reference::SecretRef;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Builds providers and resolves references against them
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    kube_reader: Arc<dyn SecretObjectReader>,
    gcp_accessor: Arc<dyn SecretVersionAccessor>,
    host: HostEnvironment,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(
            Arc::new(KubeSecretReader),
            Arc::new(SecretManagerAccessor),
            HostEnvironment::from_process(),
        )
    }
}

impl ProviderRegistry {
    pub fn new(
        kube_reader: Arc<dyn SecretObjectReader>,
        gcp_accessor: Arc<dyn SecretVersionAccessor>,
        host: HostEnvironment,
    ) -> Self {
        Self { kube_reader, gcp_accessor, host }
    }

    /// Build the provider for `kind` from its options
    pub fn provider(&self, kind: ProviderKind, cfg: &dyn StaticConfig) -> Arc<dyn SecretProvider> {
        match kind {
            ProviderKind::Kubernetes => {
                Arc::new(KubernetesProvider::with_reader(cfg, &self.host, self.kube_reader.clone()))
            }
            ProviderKind::GcpSecrets => {
                Arc::new(GcpSecretsProvider::with_accessor(cfg, self.gcp_accessor.clone()))
            }
        }
    }

    /// Resolve a reference string
    ///
    /// Without a fragment the secret is returned as a string. With a fragment
    /// the secret is parsed as a mapping and the fragment's key path is
    /// projected out of it. An optional secret that could not be fetched
    /// resolves to `Null` either way.
    pub async fn resolve(&self, reference: &str) -> Result<Value> {
        let secret_ref = SecretRef::parse(reference)?;
        self.resolve_ref(&secret_ref).await
    }

    /// Resolve an already parsed reference
    pub async fn resolve_ref(&self, secret_ref: &SecretRef) -> Result<Value> {
        let provider = self.provider(secret_ref.kind, &secret_ref.options);

        debug!(
            provider = %secret_ref.kind,
            path = %secret_ref.path,
            fragment = ?secret_ref.fragment,
            "Resolving secret reference"
        );

        match &secret_ref.fragment {
            Some(fragment) => match provider.get_optional_string_map(&secret_ref.path).await? {
                Some(map) => shape::project(&map, fragment),
                None => Ok(Value::Null),
            },
            None => Ok(provider
                .get_optional_string(&secret_ref.path)
                .await?
                .map_or(Value::Null, Value::String)),
        }
    }
}
