//! # Configuration
//!
//! Providers are configured through [`StaticConfig`], a read-only bag of named
//! options (in practice the query parameters of a secret reference). Host-level
//! settings that the cluster provider consults are captured once in a
//! [`HostEnvironment`] snapshot instead of being read ad hoc from the process.

use std::collections::HashMap;
use std::path::PathBuf;

/// Option naming an explicit kubeconfig file
pub const KUBE_CONFIG_PATH: &str = "kubeConfigPath";
/// Option naming the kubeconfig context to use
pub const KUBE_CONTEXT: &str = "kubeContext";
/// Option selecting a Secret Manager version
pub const VERSION: &str = "version";
/// Option suppressing fetch failures
pub const OPTIONAL: &str = "optional";
/// Option substituting a value on fetch failure
pub const FALLBACK_VALUE: &str = "fallback_value";

/// Environment variable consulted for the kubeconfig path
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Read-only provider configuration
///
/// `string` returns an empty string for unset options so that presence and
/// emptiness can be told apart only through `exists`.
pub trait StaticConfig: Send + Sync {
    /// Value of an option, or the empty string when unset
    fn string(&self, name: &str) -> String;

    /// Whether an option was supplied at all, even with an empty value
    fn exists(&self, name: &str) -> bool;
}

/// [`StaticConfig`] backed by an in-memory map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace an option
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.values.insert(name.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (name, value) in iter {
            config.insert(name, value);
        }
        config
    }
}

impl StaticConfig for MapConfig {
    fn string(&self, name: &str) -> String {
        self.values.get(name).cloned().unwrap_or_default()
    }

    fn exists(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Lenient boolean parsing: accepts the usual spellings of true and false and
/// returns `None` for anything else.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Host settings used to locate cluster credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    /// Value of `KUBECONFIG`, if set and non-empty
    pub kubeconfig: Option<PathBuf>,
    /// The resolving user's home directory
    pub home_dir: Option<PathBuf>,
}

impl HostEnvironment {
    /// Snapshot the current process environment
    pub fn from_process() -> Self {
        let kubeconfig = std::env::var_os(KUBECONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let home_dir = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self { kubeconfig, home_dir }
    }

    pub fn with_kubeconfig<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.kubeconfig = Some(path.into());
        self
    }

    pub fn with_home_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.home_dir = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_config_distinguishes_empty_from_unset() {
        let config = MapConfig::new().with(FALLBACK_VALUE, "");

        assert!(config.exists(FALLBACK_VALUE));
        assert_eq!(config.string(FALLBACK_VALUE), "");
        assert!(!config.exists(VERSION));
        assert_eq!(config.string(VERSION), "");
    }

    #[test]
    fn test_map_config_last_value_wins() {
        let config: MapConfig = vec![(VERSION, "1"), (VERSION, "2")].into_iter().collect();
        assert_eq!(config.string(VERSION), "2");
    }

    #[test]
    fn test_parse_bool() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        for value in ["", "yes", "on", "tRuE", " true"] {
            assert_eq!(parse_bool(value), None, "{value}");
        }
    }

    #[test]
    fn test_host_environment_builders() {
        let host = HostEnvironment::default()
            .with_kubeconfig("/etc/kube/config")
            .with_home_dir("/home/ci");

        assert_eq!(host.kubeconfig, Some(PathBuf::from("/etc/kube/config")));
        assert_eq!(host.home_dir, Some(PathBuf::from("/home/ci")));
    }
}
