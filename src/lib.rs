//! # secret-resolver
//!
//! Pluggable resolution of secret values from remote secret stores, addressed
//! by compact references such as `ref+k8s://namespace/secret/key` or
//! `ref+gcpsecrets://project/secret#/nested/key`.
//!
//! ## Architecture
//!
//! ```text
//! SecretRef → ProviderRegistry → SecretProvider → backend accessor
//!                                     ↓
//!                       missing-value policy / value shaping
//! ```
//!
//! ## Core Components
//!
//! - **Providers**: [`KubernetesProvider`] and [`GcpSecretsProvider`] behind the
//!   shared [`SecretProvider`] trait
//! - **Backend accessors**: trait seams over the Kubernetes API and Secret
//!   Manager, feature-gated (`k8s`, `gcp`)
//! - **Registry**: scheme dispatch and fragment projection
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use secret_resolver::{ProviderRegistry, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let registry = ProviderRegistry::default();
//!     let password = registry.resolve("ref+k8s://payments/db/password").await?;
//!     println!("{password}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod providers;
pub mod reference;
pub mod registry;

pub use config::{HostEnvironment, MapConfig, StaticConfig};
pub use errors::{ErrorKind, ResolveError, Result};
pub use providers::{
    GcpSecretsProvider, KubernetesProvider, MissingValuePolicy, ProviderKind, SecretProvider,
    StringMap,
};
pub use reference::SecretRef;
pub use registry::ProviderRegistry;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
