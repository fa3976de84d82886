//! # Error Handling
//!
//! Error types for secret resolution. Every failure is scoped to a single
//! lookup and carries an [`ErrorKind`] tag so callers can branch on the class
//! of failure instead of matching message text.

use std::fmt;
use std::path::PathBuf;

use crate::providers::ProviderKind;

/// Boxed lower-level cause carried by backend errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Custom result type for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Broad class of a resolution failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad path syntax, missing kubeconfig, unresolvable home directory
    Configuration,
    /// Client construction, network or auth failure against a backend
    Backend,
    /// The secret was fetched but its content does not satisfy the request
    Data,
    /// The provider cannot perform the requested operation at all
    Capability,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Backend => write!(f, "backend"),
            ErrorKind::Data => write!(f, "data"),
            ErrorKind::Capability => write!(f, "capability"),
        }
    }
}

/// Where an explicitly configured kubeconfig path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    /// The `kubeConfigPath` provider option
    ConfigOption,
    /// The `KUBECONFIG` environment variable
    Environment,
    /// `~/.kube/config`
    DefaultPath,
}

impl fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialOrigin::ConfigOption => write!(f, "kubeConfigPath option"),
            CredentialOrigin::Environment => write!(f, "KUBECONFIG environment variable"),
            CredentialOrigin::DefaultPath => write!(f, "default kubeconfig path"),
        }
    }
}

/// Stage of a backend call that produced a [`ResolveError::Backend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStage {
    KubeconfigLoad,
    KubeClient,
    KubeFetch,
    SecretManagerClient,
    SecretManagerAccess,
}

impl fmt::Display for BackendStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStage::KubeconfigLoad => write!(f, "unable to build kubeconfig"),
            BackendStage::KubeClient => write!(f, "unable to create the Kubernetes client"),
            BackendStage::KubeFetch => write!(f, "unable to get the secret from Kubernetes"),
            BackendStage::SecretManagerClient => {
                write!(f, "unable to create the Secret Manager client")
            }
            BackendStage::SecretManagerAccess => {
                write!(f, "unable to access the secret version")
            }
        }
    }
}

/// Main error type for secret resolution
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("invalid path '{path}': path must be in the format {expected}")]
    InvalidPath { path: String, expected: &'static str },

    #[error("invalid secret reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("no provider is registered for scheme '{scheme}'")]
    UnknownScheme { scheme: String },

    #[error("{origin} is set but path {} does not exist", .path.display())]
    KubeconfigMissing { origin: CredentialOrigin, path: PathBuf },

    #[error("unable to determine the user's home directory")]
    HomeDirUnavailable,

    #[error(
        "no kubeconfig was found: kubeConfigPath option and KUBECONFIG are unset \
         and default path {} does not exist",
        .default_path.display()
    )]
    KubeconfigNotFound { default_path: PathBuf },

    #[error("no kubeconfig path was found")]
    NoCredentialPath,

    #[error("{stage}: {source}")]
    Backend {
        stage: BackendStage,
        #[source]
        source: BoxError,
    },

    #[error("failed to get secret {name}: {source}")]
    SecretAccess {
        name: String,
        #[source]
        source: Box<ResolveError>,
    },

    #[error("key {key} does not exist in {namespace}/{secret}")]
    KeyNotFound { namespace: String, secret: String, key: String },

    #[error("key path '{path}' does not exist in the secret")]
    FragmentNotFound { path: String },

    #[error("failed to unmarshal secret: {0}")]
    MalformedPayload(#[source] serde_yaml::Error),

    #[error("secret payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("the {provider} provider does not support {operation}")]
    Unsupported { provider: ProviderKind, operation: &'static str },

    #[error("{backend} support is not compiled in; enable the '{feature}' feature")]
    BackendUnavailable { backend: &'static str, feature: &'static str },
}

impl ResolveError {
    /// Create an invalid path error
    pub fn invalid_path<S: Into<String>>(path: S, expected: &'static str) -> Self {
        Self::InvalidPath { path: path.into(), expected }
    }

    /// Create an invalid reference error
    pub fn invalid_reference<R: Into<String>, S: Into<String>>(reference: R, reason: S) -> Self {
        Self::InvalidReference { reference: reference.into(), reason: reason.into() }
    }

    /// Wrap a lower-level error with the backend stage it failed in
    pub fn backend<E>(stage: BackendStage, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Backend { stage, source: source.into() }
    }

    /// Create a key not found error
    pub fn key_not_found<N, S, K>(namespace: N, secret: S, key: K) -> Self
    where
        N: Into<String>,
        S: Into<String>,
        K: Into<String>,
    {
        Self::KeyNotFound { namespace: namespace.into(), secret: secret.into(), key: key.into() }
    }

    /// Class of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPath { .. }
            | Self::InvalidReference { .. }
            | Self::UnknownScheme { .. }
            | Self::KubeconfigMissing { .. }
            | Self::HomeDirUnavailable
            | Self::KubeconfigNotFound { .. }
            | Self::NoCredentialPath => ErrorKind::Configuration,
            Self::Backend { .. } | Self::SecretAccess { .. } => ErrorKind::Backend,
            Self::KeyNotFound { .. }
            | Self::FragmentNotFound { .. }
            | Self::MalformedPayload(_)
            | Self::InvalidUtf8(_) => ErrorKind::Data,
            Self::Unsupported { .. } | Self::BackendUnavailable { .. } => ErrorKind::Capability,
        }
    }
}
