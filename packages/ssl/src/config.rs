//! Context configuration
//!
//! [`ContextConfig`] carries the trust material for one context build.
//! [`SslSettings`] holds the agent-level settings that seed it and can be
//! read from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, SslError};
use crate::revocation::RevocationPolicy;
use crate::types::{Certificate, Crl, KeyPair};

/// Trust material and policy for building a context
#[derive(Debug, Clone, Default)]
pub struct ContextConfig {
    /// CA certificate pool, any order
    pub cacerts: Vec<Certificate>,
    /// CRL pool, any order
    pub crls: Vec<Crl>,
    /// Client (leaf) certificate
    pub client_cert: Option<Certificate>,
    /// Client private key
    pub private_key: Option<KeyPair>,
    /// Revocation policy; defaults to full chain
    pub revocation: RevocationPolicy,
    /// Also trust the bundled public web roots during the handshake
    pub include_system_store: bool,
}

impl ContextConfig {
    /// Empty configuration with full-chain revocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a configuration from agent settings.
    pub fn from_settings(settings: &SslSettings) -> Self {
        Self {
            revocation: settings.certificate_revocation,
            include_system_store: settings.include_system_store,
            ..Self::default()
        }
    }

    /// Set the CA certificate pool
    #[must_use]
    pub fn with_cacerts(self, cacerts: impl IntoIterator<Item = Certificate>) -> Self {
        Self {
            cacerts: cacerts.into_iter().collect(),
            ..self
        }
    }

    /// Set the CRL pool
    #[must_use]
    pub fn with_crls(self, crls: impl IntoIterator<Item = Crl>) -> Self {
        Self {
            crls: crls.into_iter().collect(),
            ..self
        }
    }

    /// Set the client certificate
    #[must_use]
    pub fn with_client_cert(self, client_cert: Certificate) -> Self {
        Self {
            client_cert: Some(client_cert),
            ..self
        }
    }

    /// Set the client private key
    #[must_use]
    pub fn with_private_key(self, private_key: KeyPair) -> Self {
        Self {
            private_key: Some(private_key),
            ..self
        }
    }

    /// Set the revocation policy
    #[must_use]
    pub fn with_revocation(self, revocation: RevocationPolicy) -> Self {
        Self { revocation, ..self }
    }

    /// Trust the bundled public web roots as well
    #[must_use]
    pub fn with_system_store(self, include_system_store: bool) -> Self {
        Self {
            include_system_store,
            ..self
        }
    }
}

/// Agent SSL settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SslSettings {
    /// `true`/`"chain"`, `"leaf"` or `false`
    pub certificate_revocation: RevocationPolicy,
    /// Trust the bundled public web roots as well
    pub include_system_store: bool,
}

impl SslSettings {
    /// Read settings from a JSON document; absent keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, SslError> {
        serde_json::from_str(json)
            .map_err(|e| SslError::Parse(ParseError::new("settings", e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContextConfig::new();
        assert!(config.cacerts.is_empty());
        assert!(config.crls.is_empty());
        assert!(config.client_cert.is_none());
        assert!(config.private_key.is_none());
        assert_eq!(config.revocation, RevocationPolicy::FullChain);
        assert!(!config.include_system_store);
    }

    #[test]
    fn test_settings_from_json() {
        let settings = SslSettings::from_json(r#"{"certificate_revocation": "leaf"}"#)
            .expect("valid settings");
        assert_eq!(settings.certificate_revocation, RevocationPolicy::LeafOnly);
        assert!(!settings.include_system_store);

        let config = ContextConfig::from_settings(&settings);
        assert_eq!(config.revocation, RevocationPolicy::LeafOnly);
    }

    #[test]
    fn test_settings_reject_unknown_policy() {
        let err = SslSettings::from_json(r#"{"certificate_revocation": "often"}"#)
            .expect_err("bad value");
        assert!(matches!(err, SslError::Parse(_)));
    }

    #[test]
    fn test_settings_accept_boolean_revocation() {
        let settings = SslSettings::from_json(r#"{"certificate_revocation": false}"#)
            .expect("valid settings");
        assert_eq!(settings.certificate_revocation, RevocationPolicy::Disabled);
    }
}
