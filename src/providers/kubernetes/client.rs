//! Kubernetes secret reads
//!
//! [`KubeSecretReader`] talks to the cluster through `kube` when the `k8s`
//! feature is enabled. A fresh client is built for every read, scoped to the
//! kubeconfig file and context of the request.

use crate::errors::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

#[cfg(feature = "k8s")]
use crate::errors::{BackendStage, ResolveError};
#[cfg(feature = "k8s")]
use k8s_openapi::api::core::v1::Secret;
#[cfg(feature = "k8s")]
use kube::config::{KubeConfigOptions, Kubeconfig};
#[cfg(feature = "k8s")]
use kube::{Api, Client, Config};
#[cfg(feature = "k8s")]
use tracing::debug;

/// Key-value payload of one Secret object
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Coordinates of one Secret read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretObjectRequest<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub kubeconfig: &'a Path,
    /// Context override; `None` uses the kubeconfig's current context
    pub context: Option<&'a str>,
}

/// Reads whole Secret objects from a cluster
#[async_trait]
pub trait SecretObjectReader: Send + Sync + fmt::Debug {
    async fn read_secret(&self, request: &SecretObjectRequest<'_>) -> Result<SecretData>;
}

/// [`SecretObjectReader`] backed by the Kubernetes API
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeSecretReader;

#[cfg(feature = "k8s")]
impl KubeSecretReader {
    async fn client_for(request: &SecretObjectRequest<'_>) -> Result<Client> {
        let kubeconfig = Kubeconfig::read_from(request.kubeconfig)
            .map_err(|e| ResolveError::backend(BackendStage::KubeconfigLoad, e))?;

        let options = KubeConfigOptions {
            context: request.context.map(str::to_string),
            ..Default::default()
        };

        let config = Config::from_custom_kubeconfig(kubeconfig, &options)
            .await
            .map_err(|e| ResolveError::backend(BackendStage::KubeconfigLoad, e))?;

        Client::try_from(config).map_err(|e| ResolveError::backend(BackendStage::KubeClient, e))
    }
}

#[cfg(feature = "k8s")]
#[async_trait]
impl SecretObjectReader for KubeSecretReader {
    async fn read_secret(&self, request: &SecretObjectRequest<'_>) -> Result<SecretData> {
        let client = Self::client_for(request).await?;

        debug!(
            namespace = %request.namespace,
            secret = %request.name,
            kubeconfig = %request.kubeconfig.display(),
            "Fetching secret from Kubernetes"
        );

        let secrets: Api<Secret> = Api::namespaced(client, request.namespace);
        let secret = secrets
            .get(request.name)
            .await
            .map_err(|e| ResolveError::backend(BackendStage::KubeFetch, e))?;

        Ok(secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect())
    }
}

#[cfg(not(feature = "k8s"))]
#[async_trait]
impl SecretObjectReader for KubeSecretReader {
    async fn read_secret(&self, _request: &SecretObjectRequest<'_>) -> Result<SecretData> {
        Err(crate::errors::ResolveError::BackendUnavailable {
            backend: "Kubernetes",
            feature: "k8s",
        })
    }
}

#[cfg(all(test, not(feature = "k8s")))]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[tokio::test]
    async fn test_reader_without_feature_reports_capability() {
        let request = SecretObjectRequest {
            namespace: "default",
            name: "db",
            kubeconfig: Path::new("/dev/null"),
            context: None,
        };

        let err = KubeSecretReader.read_secret(&request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capability);
        assert!(err.to_string().contains("'k8s' feature"));
    }
}
