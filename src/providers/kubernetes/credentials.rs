//! Kubeconfig discovery
//!
//! Checks sources in the following priority order:
//! 1. `kubeConfigPath` provider option
//! 2. `KUBECONFIG` environment variable
//! 3. `~/.kube/config`
//!
//! The first source that is set decides the outcome. An explicit path that
//! does not exist is an error, even if a later source would have worked.

use crate::config::{self, HostEnvironment, StaticConfig};
use crate::errors::{CredentialOrigin, ResolveError, Result};
use std::path::{Path, PathBuf};

/// A kubeconfig file that was found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKubeconfig {
    pub path: PathBuf,
    pub origin: CredentialOrigin,
}

/// The candidate kubeconfig locations for one provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSources {
    pub explicit: Option<PathBuf>,
    pub environment: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
}

impl CredentialSources {
    /// Collect sources from provider options and a host snapshot
    pub fn new(cfg: &dyn StaticConfig, host: &HostEnvironment) -> Self {
        let explicit = Some(cfg.string(config::KUBE_CONFIG_PATH))
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        Self { explicit, environment: host.kubeconfig.clone(), home_dir: host.home_dir.clone() }
    }

    /// Pick the kubeconfig to use
    pub fn resolve(&self) -> Result<ResolvedKubeconfig> {
        if let Some(path) = &self.explicit {
            return require_existing(path, CredentialOrigin::ConfigOption);
        }

        if let Some(path) = &self.environment {
            return require_existing(path, CredentialOrigin::Environment);
        }

        let home = self.home_dir.as_ref().ok_or(ResolveError::HomeDirUnavailable)?;
        let default_path = home.join(".kube").join("config");

        if default_path.exists() {
            Ok(ResolvedKubeconfig { path: default_path, origin: CredentialOrigin::DefaultPath })
        } else {
            Err(ResolveError::KubeconfigNotFound { default_path })
        }
    }
}

fn require_existing(path: &Path, origin: CredentialOrigin) -> Result<ResolvedKubeconfig> {
    if path.exists() {
        Ok(ResolvedKubeconfig { path: path.to_path_buf(), origin })
    } else {
        Err(ResolveError::KubeconfigMissing { origin, path: path.to_path_buf() })
    }
}
