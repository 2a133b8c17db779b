//! CRL-based revocation checking
//!
//! CRLs are matched to chain links by issuer name, never by position, so
//! they may be supplied in any order.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chain::Chain;
use crate::error::VerifyError;
use crate::types::{Certificate, Crl};

/// How much of the chain must pass revocation checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RevocationPolicy {
    /// No CRL is consulted
    Disabled,
    /// Only the leaf is checked against its issuer's CRL
    LeafOnly,
    /// Every non-root certificate is checked against its issuer's CRL
    #[default]
    FullChain,
}

impl RevocationPolicy {
    /// Setting value as written in agent configuration.
    pub fn as_setting(&self) -> &'static str {
        match self {
            Self::Disabled => "false",
            Self::LeafOnly => "leaf",
            Self::FullChain => "chain",
        }
    }
}

impl fmt::Display for RevocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_setting())
    }
}

/// Unrecognized revocation setting value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid certificate revocation value '{0}': expected true, false, leaf or chain")]
pub struct InvalidRevocationPolicy(pub String);

impl FromStr for RevocationPolicy {
    type Err = InvalidRevocationPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" | "chain" => Ok(Self::FullChain),
            "leaf" => Ok(Self::LeafOnly),
            "false" => Ok(Self::Disabled),
            _ => Err(InvalidRevocationPolicy(s.to_string())),
        }
    }
}

impl From<bool> for RevocationPolicy {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::FullChain
        } else {
            Self::Disabled
        }
    }
}

impl Serialize for RevocationPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            other => serializer.serialize_str(other.as_setting()),
        }
    }
}

impl<'de> Deserialize<'de> for RevocationPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Setting {
            Flag(bool),
            Named(String),
        }

        match Setting::deserialize(deserializer)? {
            Setting::Flag(enabled) => Ok(enabled.into()),
            Setting::Named(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// CRLs indexed by issuer name
///
/// When one issuer has several CRLs, the most recent `thisUpdate` wins, ties
/// broken by DER encoding.
#[derive(Debug)]
pub struct CrlIndex<'a> {
    by_issuer: HashMap<&'a str, &'a Crl>,
}

impl<'a> CrlIndex<'a> {
    /// Index `crls` by issuer.
    pub fn new(crls: &'a [Crl]) -> Self {
        let mut by_issuer: HashMap<&'a str, &'a Crl> = HashMap::with_capacity(crls.len());
        for crl in crls {
            by_issuer
                .entry(crl.issuer.as_str())
                .and_modify(|current| {
                    if (crl.last_update, &crl.der) > (current.last_update, &current.der) {
                        *current = crl;
                    }
                })
                .or_insert(crl);
        }
        Self { by_issuer }
    }

    /// CRL issued by `issuer`, if supplied.
    #[inline]
    pub fn issued_by(&self, issuer: &str) -> Option<&'a Crl> {
        self.by_issuer.get(issuer).copied()
    }
}

/// Apply `policy` to `chain` using `crls` at time `now`
///
/// Links are checked leaf first. For each checked certificate the CRL of its
/// issuer must be present, signed by that issuer, inside its update window,
/// and must not list the certificate's serial number.
pub fn check(
    chain: &Chain,
    crls: &[Crl],
    policy: RevocationPolicy,
    now: SystemTime,
) -> Result<(), VerifyError> {
    let checked_links = match policy {
        RevocationPolicy::Disabled => return Ok(()),
        RevocationPolicy::LeafOnly => 1,
        RevocationPolicy::FullChain => chain.len().saturating_sub(1),
    };

    let index = CrlIndex::new(crls);
    for (cert, issuer) in chain.links().take(checked_links) {
        check_link(cert, issuer, &index, now)?;
    }

    tracing::debug!(
        "Revocation check ({policy}) passed for {} link(s)",
        checked_links.min(chain.len().saturating_sub(1))
    );
    Ok(())
}

fn check_link(
    cert: &Certificate,
    issuer: &Certificate,
    index: &CrlIndex<'_>,
    now: SystemTime,
) -> Result<(), VerifyError> {
    let Some(crl) = index.issued_by(cert.issuer.as_str()) else {
        return Err(VerifyError::CrlMissing {
            issuer: cert.issuer.clone(),
        });
    };

    if !crl.is_signed_by(&issuer.public_key) {
        return Err(VerifyError::CrlInvalidSignature {
            issuer: crl.issuer.clone(),
        });
    }

    if crl.is_not_yet_valid_at(now) {
        return Err(VerifyError::CrlNotYetValid {
            issuer: crl.issuer.clone(),
        });
    }

    if crl.is_expired_at(now) {
        return Err(VerifyError::CrlExpired {
            issuer: crl.issuer.clone(),
        });
    }

    if crl.is_revoked(&cert.serial_number) {
        tracing::warn!(
            "Certificate {} (serial {}) found in CRL from {}",
            cert.subject,
            cert.serial_hex(),
            crl.issuer
        );
        return Err(VerifyError::Revoked {
            subject: cert.subject.clone(),
        });
    }

    Ok(())
}
