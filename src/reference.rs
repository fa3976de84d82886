//! Secret references
//!
//! A reference names a provider, a provider-specific path, the provider's
//! options and, optionally, a key path into a structured secret:
//!
//! ```text
//! ref+k8s://payments/db-credentials/password?kubeContext=prod
//! ref+gcpsecrets://my-project/app-config?version=3&optional=true#/db/password
//! ```

use crate::config::MapConfig;
use crate::errors::{ResolveError, Result};
use crate::providers::ProviderKind;
use percent_encoding::percent_decode_str;
use url::Url;

/// A parsed secret reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub kind: ProviderKind,
    /// Provider-specific path, without a leading `/`
    pub path: String,
    /// Provider options taken from the query string
    pub options: MapConfig,
    /// Key path into a structured secret, e.g. `/db/password`
    pub fragment: Option<String>,
}

impl SecretRef {
    pub fn parse(reference: &str) -> Result<Self> {
        let url = Url::parse(reference)
            .map_err(|e| ResolveError::invalid_reference(reference, e.to_string()))?;

        let kind = ProviderKind::from_scheme(url.scheme())?;

        let host = url.host_str().unwrap_or_default();
        let path = decode(reference, &format!("{}{}", host, url.path()))?
            .trim_start_matches('/')
            .to_string();
        if path.is_empty() {
            return Err(ResolveError::invalid_reference(reference, "missing secret path"));
        }

        let options = url.query_pairs().collect();
        let fragment = match url.fragment().filter(|f| !f.is_empty()) {
            Some(fragment) => Some(decode(reference, fragment)?),
            None => None,
        };

        Ok(Self { kind, path, options, fragment })
    }
}

/// Undo the percent-encoding `Url` applies to paths and fragments
fn decode(reference: &str, text: &str) -> Result<String> {
    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ResolveError::invalid_reference(reference, e.to_string()))
}

impl std::str::FromStr for SecretRef {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;

    #[test]
    fn test_parse_kubernetes_reference() {
        let secret_ref =
            SecretRef::parse("ref+k8s://payments/db-credentials/password?kubeContext=prod")
                .unwrap();

        assert_eq!(secret_ref.kind, ProviderKind::Kubernetes);
        assert_eq!(secret_ref.path, "payments/db-credentials/password");
        assert_eq!(secret_ref.options.string("kubeContext"), "prod");
        assert_eq!(secret_ref.fragment, None);
    }

    #[test]
    fn test_parse_gcp_reference_with_fragment() {
        let secret_ref: SecretRef =
            "ref+gcpsecrets://my-project/app-config?version=3&fallback_value=a%20b#/db/password"
                .parse()
                .unwrap();

        assert_eq!(secret_ref.kind, ProviderKind::GcpSecrets);
        assert_eq!(secret_ref.path, "my-project/app-config");
        assert_eq!(secret_ref.options.string("version"), "3");
        assert_eq!(secret_ref.options.string("fallback_value"), "a b");
        assert_eq!(secret_ref.fragment.as_deref(), Some("/db/password"));
    }

    #[test]
    fn test_parse_keeps_empty_option_values() {
        let secret_ref = SecretRef::parse("gcpsecrets://p/s?fallback_value=").unwrap();
        assert!(secret_ref.options.exists("fallback_value"));
        assert_eq!(secret_ref.options.string("fallback_value"), "");
    }

    #[test]
    fn test_parse_decodes_path_and_fragment() {
        let secret_ref = SecretRef::parse("ref+gcpsecrets://p/team%2Dapi#/my key").unwrap();
        assert_eq!(secret_ref.path, "p/team-api");
        assert_eq!(secret_ref.fragment.as_deref(), Some("/my key"));

        let secret_ref = SecretRef::parse("ref+gcpsecrets://p/cfg#/db%20pass/x").unwrap();
        assert_eq!(secret_ref.fragment.as_deref(), Some("/db pass/x"));
    }

    #[test]
    fn test_parse_rejects_non_utf8_escapes() {
        let err = SecretRef::parse("ref+gcpsecrets://p/cfg#/%FF").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidReference { .. }));
    }

    #[test]
    fn test_parse_empty_fragment_is_none() {
        let secret_ref = SecretRef::parse("ref+gcpsecrets://p/s#").unwrap();
        assert_eq!(secret_ref.fragment, None);
    }

    #[test]
    fn test_parse_unknown_scheme() {
        let err = SecretRef::parse("ref+vault://secret/data/app").unwrap_err();
        assert!(matches!(err, ResolveError::UnknownScheme { .. }));
    }

    #[test]
    fn test_parse_invalid_reference() {
        let err = SecretRef::parse("not a reference").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidReference { .. }));

        let err = SecretRef::parse("ref+k8s://").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidReference { .. }));
    }
}
