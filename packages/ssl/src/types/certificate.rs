//! Parsed certificate value type

use std::time::SystemTime;

use super::key::{PublicKey, Signature};
use super::name::DistinguishedName;

/// A parsed X.509 certificate
///
/// Produced by the decoding collaborator and never mutated by the verifier.
/// `tbs_der` is the exact byte string the issuer signed; `der` is the full
/// encoding handed to the handshake layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Subject identity
    pub subject: DistinguishedName,
    /// Issuer identity
    pub issuer: DistinguishedName,
    /// Serial number, big-endian content octets of the DER INTEGER
    pub serial_number: Vec<u8>,
    /// Start of the validity window
    pub not_before: SystemTime,
    /// End of the validity window
    pub not_after: SystemTime,
    /// BasicConstraints `cA` flag
    pub is_ca: bool,
    /// Subject public key
    pub public_key: PublicKey,
    /// Issuer's signature over `tbs_der`
    pub signature: Signature,
    /// DER of the to-be-signed portion
    pub tbs_der: Vec<u8>,
    /// DER of the whole certificate
    pub der: Vec<u8>,
}

impl Certificate {
    /// Subject equals issuer.
    #[inline]
    pub fn is_self_signed(&self) -> bool {
        self.subject == self.issuer
    }

    /// Whether `issuer_key` produced this certificate's signature.
    pub fn is_signed_by(&self, issuer_key: &PublicKey) -> bool {
        issuer_key.verify(&self.signature, &self.tbs_der)
    }

    /// Whether `now` falls before the validity window.
    #[inline]
    pub fn is_not_yet_valid_at(&self, now: SystemTime) -> bool {
        now < self.not_before
    }

    /// Whether `now` falls after the validity window.
    #[inline]
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now > self.not_after
    }

    /// Serial number as lowercase hex.
    pub fn serial_hex(&self) -> String {
        hex::encode(&self.serial_number)
    }
}
