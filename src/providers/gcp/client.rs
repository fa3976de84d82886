//! Secret Manager version access
//!
//! [`SecretManagerAccessor`] calls Google Cloud Secret Manager through
//! `google-secretmanager1` when the `gcp` feature is enabled. Authentication
//! uses Application Default Credentials, which checks:
//! 1. `GOOGLE_APPLICATION_CREDENTIALS` env var
//! 2. Default service account on GCE/Cloud Run/GKE
//!
//! A new hub is built for every access.

use crate::errors::Result;
use async_trait::async_trait;
use std::fmt;

#[cfg(feature = "gcp")]
use crate::errors::{BackendStage, ResolveError};
#[cfg(feature = "gcp")]
use google_secretmanager1::{hyper_rustls, hyper_util, SecretManager};
#[cfg(feature = "gcp")]
use tracing::debug;
#[cfg(feature = "gcp")]
use yup_oauth2::authenticator::ApplicationDefaultCredentialsTypes;

/// Version selected when none is configured
pub const LATEST_VERSION: &str = "latest";

/// Fully qualified secret version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretVersionName {
    pub project: String,
    pub secret: String,
    pub version: String,
}

impl SecretVersionName {
    pub fn new<P, S, V>(project: P, secret: S, version: V) -> Self
    where
        P: Into<String>,
        S: Into<String>,
        V: Into<String>,
    {
        Self { project: project.into(), secret: secret.into(), version: version.into() }
    }
}

impl fmt::Display for SecretVersionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/secrets/{}/versions/{}", self.project, self.secret, self.version)
    }
}

/// Reads the payload of one secret version
#[async_trait]
pub trait SecretVersionAccessor: Send + Sync + fmt::Debug {
    async fn access(&self, name: &SecretVersionName) -> Result<Vec<u8>>;
}

/// [`SecretVersionAccessor`] backed by the Secret Manager API
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretManagerAccessor;

#[cfg(feature = "gcp")]
type Hub = SecretManager<
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
>;

#[cfg(feature = "gcp")]
impl SecretManagerAccessor {
    async fn hub() -> Result<Hub> {
        let client =
            hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
                .build(
                    hyper_rustls::HttpsConnectorBuilder::new()
                        .with_native_roots()
                        .map_err(|e| ResolveError::backend(BackendStage::SecretManagerClient, e))?
                        .https_or_http()
                        .enable_http2()
                        .build(),
                );

        let opts = yup_oauth2::ApplicationDefaultCredentialsFlowOpts::default();
        let auth = match yup_oauth2::ApplicationDefaultCredentialsAuthenticator::builder(opts).await
        {
            ApplicationDefaultCredentialsTypes::ServiceAccount(builder) => builder.build().await,
            ApplicationDefaultCredentialsTypes::InstanceMetadata(builder) => builder.build().await,
        }
        .map_err(|e| ResolveError::backend(BackendStage::SecretManagerClient, e))?;

        Ok(SecretManager::new(client, auth))
    }
}

#[cfg(feature = "gcp")]
#[async_trait]
impl SecretVersionAccessor for SecretManagerAccessor {
    async fn access(&self, name: &SecretVersionName) -> Result<Vec<u8>> {
        let hub = Self::hub().await?;
        let resource_name = name.to_string();

        debug!(resource_name = %resource_name, "Fetching secret from GCP Secret Manager");

        let (_, response) = hub
            .projects()
            .secrets_versions_access(&resource_name)
            .doit()
            .await
            .map_err(|e| ResolveError::backend(BackendStage::SecretManagerAccess, e))?;

        Ok(response.payload.and_then(|payload| payload.data).unwrap_or_default())
    }
}

#[cfg(not(feature = "gcp"))]
#[async_trait]
impl SecretVersionAccessor for SecretManagerAccessor {
    async fn access(&self, _name: &SecretVersionName) -> Result<Vec<u8>> {
        Err(crate::errors::ResolveError::BackendUnavailable {
            backend: "GCP Secret Manager",
            feature: "gcp",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name() {
        let name = SecretVersionName::new("my-project", "db-password", LATEST_VERSION);
        assert_eq!(name.to_string(), "projects/my-project/secrets/db-password/versions/latest");

        let name = SecretVersionName::new("my-project", "db-password", "3");
        assert_eq!(name.to_string(), "projects/my-project/secrets/db-password/versions/3");
    }

    #[cfg(not(feature = "gcp"))]
    #[tokio::test]
    async fn test_accessor_without_feature_reports_capability() {
        let name = SecretVersionName::new("p", "s", LATEST_VERSION);
        let err = SecretManagerAccessor.access(&name).await.unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Capability);
    }
}
