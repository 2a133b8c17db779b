//! Parsed certificate signing request

use super::key::{PublicKey, Signature};
use super::name::DistinguishedName;

/// A parsed PKCS#10 certificate signing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    /// Requested subject
    pub subject: DistinguishedName,
    /// Embedded public key
    pub public_key: PublicKey,
    /// Self-signature over `info_der`
    pub signature: Signature,
    /// DER of the `CertificationRequestInfo`
    pub info_der: Vec<u8>,
    /// DER of the whole request
    pub der: Vec<u8>,
}

impl CertificateRequest {
    /// Whether the self-signature verifies under the embedded key.
    pub fn is_self_signature_intact(&self) -> bool {
        self.public_key.verify(&self.signature, &self.info_der)
    }
}
