//! Public keys, signatures and private key pairs
//!
//! Signature checks run through `ring`. Keys are carried as the raw
//! subject-public-key bits of an SPKI structure: the `RSAPublicKey` DER for
//! RSA, the uncompressed point for EC and the 32 raw bytes for Ed25519.

use std::fmt;

use ring::signature::{self, UnparsedPublicKey, VerificationAlgorithm};
use zeroize::Zeroizing;

/// Asymmetric key algorithm family
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// RSA (`rsaEncryption`)
    Rsa,
    /// Elliptic curve (`id-ecPublicKey`)
    Ec,
    /// Ed25519
    Ed25519,
    /// Anything else, by dotted OID
    Other(String),
}

impl KeyAlgorithm {
    /// Short algorithm name used in messages.
    pub fn name(&self) -> &str {
        match self {
            Self::Rsa => "RSA",
            Self::Ec => "EC",
            Self::Ed25519 => "Ed25519",
            Self::Other(oid) => oid,
        }
    }

    /// Whether keys of this family may authenticate the client.
    #[inline]
    pub fn is_client_auth_supported(&self) -> bool {
        matches!(self, Self::Rsa)
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signature algorithm named by a certificate, CRL or request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// `sha256WithRSAEncryption`
    RsaPkcs1Sha256,
    /// `sha384WithRSAEncryption`
    RsaPkcs1Sha384,
    /// `sha512WithRSAEncryption`
    RsaPkcs1Sha512,
    /// `ecdsa-with-SHA256`
    EcdsaSha256,
    /// `ecdsa-with-SHA384`
    EcdsaSha384,
    /// `id-Ed25519`
    Ed25519,
    /// Unsupported algorithm, by dotted OID. Never verifies.
    Unsupported(String),
}

impl SignatureAlgorithm {
    /// Map a dotted signature algorithm OID.
    pub fn from_oid(oid: &str) -> Self {
        match oid {
            "1.2.840.113549.1.1.11" => Self::RsaPkcs1Sha256,
            "1.2.840.113549.1.1.12" => Self::RsaPkcs1Sha384,
            "1.2.840.113549.1.1.13" => Self::RsaPkcs1Sha512,
            "1.2.840.10045.4.3.2" => Self::EcdsaSha256,
            "1.2.840.10045.4.3.3" => Self::EcdsaSha384,
            "1.3.101.112" => Self::Ed25519,
            other => Self::Unsupported(other.to_string()),
        }
    }

    // P-256 points are 65 bytes uncompressed, P-384 points 97.
    fn verification_algorithm(
        &self,
        key: &PublicKey,
    ) -> Option<&'static dyn VerificationAlgorithm> {
        let p384 = key.key.len() == 97;
        let alg: &'static dyn VerificationAlgorithm = match (self, &key.algorithm) {
            (Self::RsaPkcs1Sha256, KeyAlgorithm::Rsa) => &signature::RSA_PKCS1_2048_8192_SHA256,
            (Self::RsaPkcs1Sha384, KeyAlgorithm::Rsa) => &signature::RSA_PKCS1_2048_8192_SHA384,
            (Self::RsaPkcs1Sha512, KeyAlgorithm::Rsa) => &signature::RSA_PKCS1_2048_8192_SHA512,
            (Self::EcdsaSha256, KeyAlgorithm::Ec) if p384 => &signature::ECDSA_P384_SHA256_ASN1,
            (Self::EcdsaSha256, KeyAlgorithm::Ec) => &signature::ECDSA_P256_SHA256_ASN1,
            (Self::EcdsaSha384, KeyAlgorithm::Ec) if p384 => &signature::ECDSA_P384_SHA384_ASN1,
            (Self::EcdsaSha384, KeyAlgorithm::Ec) => &signature::ECDSA_P256_SHA384_ASN1,
            (Self::Ed25519, KeyAlgorithm::Ed25519) => &signature::ED25519,
            _ => return None,
        };
        Some(alg)
    }
}

/// A signature together with the algorithm that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Algorithm named by the signed object
    pub algorithm: SignatureAlgorithm,
    /// Raw signature bytes
    pub value: Vec<u8>,
}

/// Subject public key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    /// Key family
    pub algorithm: KeyAlgorithm,
    /// Subject-public-key bits
    pub key: Vec<u8>,
}

impl PublicKey {
    /// Check `signature` over `message` under this key.
    ///
    /// Algorithm/key combinations that do not fit together never verify.
    pub fn verify(&self, signature: &Signature, message: &[u8]) -> bool {
        match signature.algorithm.verification_algorithm(self) {
            Some(alg) => UnparsedPublicKey::new(alg, &self.key)
                .verify(message, &signature.value)
                .is_ok(),
            None => {
                tracing::debug!(
                    "No verifier for {:?} signature under {} key",
                    signature.algorithm,
                    self.algorithm
                );
                false
            }
        }
    }

    /// Short hex fingerprint of the key bits, for log lines.
    pub fn fingerprint(&self) -> String {
        let digest = ring::digest::digest(&ring::digest::SHA256, &self.key);
        hex::encode(&digest.as_ref()[..8])
    }
}

/// How private key material was encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEncoding {
    /// `RSA PRIVATE KEY` (PKCS#1)
    Pkcs1,
    /// `PRIVATE KEY` (PKCS#8)
    Pkcs8,
    /// `EC PRIVATE KEY` (SEC1)
    Sec1,
}

/// Private key with its public projection
///
/// The material is zeroized on drop and never shows up in `Debug` output.
#[derive(Clone)]
pub struct KeyPair {
    algorithm: KeyAlgorithm,
    encoding: KeyEncoding,
    material: Zeroizing<Vec<u8>>,
    public_key: PublicKey,
}

impl KeyPair {
    /// Assemble a key pair from decoded parts.
    pub fn new(
        algorithm: KeyAlgorithm,
        encoding: KeyEncoding,
        material: Vec<u8>,
        public_key: PublicKey,
    ) -> Self {
        Self {
            algorithm,
            encoding,
            material: Zeroizing::new(material),
            public_key,
        }
    }

    /// Key family
    #[inline]
    pub fn algorithm(&self) -> &KeyAlgorithm {
        &self.algorithm
    }

    /// Encoding of the private material
    #[inline]
    pub fn encoding(&self) -> KeyEncoding {
        self.encoding
    }

    /// DER private key material
    #[inline]
    pub fn material(&self) -> &[u8] {
        &self.material
    }

    /// Public projection used for key matching and request checks
    #[inline]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm)
            .field("encoding", &self.encoding)
            .field("material", &"<redacted>")
            .field("public_key", &self.public_key.fingerprint())
            .finish()
    }
}
