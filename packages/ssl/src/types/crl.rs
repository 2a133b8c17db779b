//! Parsed certificate revocation list

use std::collections::HashSet;
use std::time::SystemTime;

use super::key::{PublicKey, Signature};
use super::name::DistinguishedName;

/// A parsed CRL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crl {
    /// Issuing CA identity
    pub issuer: DistinguishedName,
    /// `thisUpdate`
    pub last_update: SystemTime,
    /// `nextUpdate`; a CRL without one never expires
    pub next_update: Option<SystemTime>,
    /// Revoked serial numbers, big-endian content octets
    pub revoked_serials: HashSet<Vec<u8>>,
    /// Issuer's signature over `tbs_der`
    pub signature: Signature,
    /// DER of the to-be-signed portion
    pub tbs_der: Vec<u8>,
    /// DER of the whole CRL
    pub der: Vec<u8>,
}

impl Crl {
    /// Whether `issuer_key` produced this CRL's signature.
    pub fn is_signed_by(&self, issuer_key: &PublicKey) -> bool {
        issuer_key.verify(&self.signature, &self.tbs_der)
    }

    /// Whether `serial` appears in the revoked set.
    #[inline]
    pub fn is_revoked(&self, serial: &[u8]) -> bool {
        self.revoked_serials.contains(serial)
    }

    /// Whether `now` falls before `thisUpdate`.
    #[inline]
    pub fn is_not_yet_valid_at(&self, now: SystemTime) -> bool {
        now < self.last_update
    }

    /// Whether `now` falls after `nextUpdate`.
    #[inline]
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.next_update.is_some_and(|next| now > next)
    }
}
