//! Public key and private key extraction
//!
//! Subject public keys are reduced to their algorithm family and raw key
//! bits. Private keys are decoded far enough to derive the public projection
//! that key matching compares against a certificate.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::DecodePrivateKey;
use ring::signature::{Ed25519KeyPair, KeyPair as _, RsaKeyPair};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::ParseError;
use crate::types::{KeyAlgorithm, KeyEncoding, KeyPair, PublicKey, Signature, SignatureAlgorithm};

const RSA_ENCRYPTION_OID: &str = "1.2.840.113549.1.1.1";
const EC_PUBLIC_KEY_OID: &str = "1.2.840.10045.2.1";
const ED25519_OID: &str = "1.3.101.112";

/// Map a SubjectPublicKeyInfo to the crate's public key type
pub fn extract_public_key(spki: &SubjectPublicKeyInfoOwned) -> PublicKey {
    let oid = spki.algorithm.oid.to_string();
    let algorithm = match oid.as_str() {
        RSA_ENCRYPTION_OID => KeyAlgorithm::Rsa,
        EC_PUBLIC_KEY_OID => KeyAlgorithm::Ec,
        ED25519_OID => KeyAlgorithm::Ed25519,
        _ => KeyAlgorithm::Other(oid),
    };

    PublicKey {
        algorithm,
        key: spki.subject_public_key.raw_bytes().to_vec(),
    }
}

/// Build a signature from its algorithm identifier OID and value bits
pub fn extract_signature(algorithm_oid: &str, value: &der::asn1::BitString) -> Signature {
    Signature {
        algorithm: SignatureAlgorithm::from_oid(algorithm_oid),
        value: value.raw_bytes().to_vec(),
    }
}

/// Decode a DER private key in the given encoding
pub fn extract_key_pair(der: &[u8], encoding: KeyEncoding) -> Result<KeyPair, ParseError> {
    match encoding {
        KeyEncoding::Pkcs1 => {
            let rsa = RsaKeyPair::from_der(der)
                .map_err(|e| ParseError::new("private key", format!("RSA key rejected: {e}")))?;
            Ok(rsa_key_pair(&rsa, encoding, der))
        }
        KeyEncoding::Pkcs8 => extract_pkcs8_key_pair(der),
        KeyEncoding::Sec1 => {
            let secret = p256::SecretKey::from_sec1_der(der)
                .map_err(|e| ParseError::new("private key", format!("EC key rejected: {e}")))?;
            Ok(ec_key_pair(&secret, encoding, der))
        }
    }
}

fn extract_pkcs8_key_pair(der: &[u8]) -> Result<KeyPair, ParseError> {
    if let Ok(rsa) = RsaKeyPair::from_pkcs8(der) {
        return Ok(rsa_key_pair(&rsa, KeyEncoding::Pkcs8, der));
    }

    if let Ok(secret) = p256::SecretKey::from_pkcs8_der(der) {
        return Ok(ec_key_pair(&secret, KeyEncoding::Pkcs8, der));
    }

    if let Ok(ed) = Ed25519KeyPair::from_pkcs8_maybe_unchecked(der) {
        let public_key = PublicKey {
            algorithm: KeyAlgorithm::Ed25519,
            key: ed.public_key().as_ref().to_vec(),
        };
        return Ok(KeyPair::new(
            KeyAlgorithm::Ed25519,
            KeyEncoding::Pkcs8,
            der.to_vec(),
            public_key,
        ));
    }

    tracing::warn!("PKCS#8 key is not RSA, P-256 or Ed25519");
    Err(ParseError::new(
        "private key",
        "unrecognized PKCS#8 key algorithm",
    ))
}

fn rsa_key_pair(rsa: &RsaKeyPair, encoding: KeyEncoding, der: &[u8]) -> KeyPair {
    // ring exposes the public half as RSAPublicKey DER, the same bytes an
    // SPKI carries in its subjectPublicKey bit string
    let public_key = PublicKey {
        algorithm: KeyAlgorithm::Rsa,
        key: rsa.public_key().as_ref().to_vec(),
    };
    KeyPair::new(KeyAlgorithm::Rsa, encoding, der.to_vec(), public_key)
}

fn ec_key_pair(secret: &p256::SecretKey, encoding: KeyEncoding, der: &[u8]) -> KeyPair {
    let point = secret.public_key().to_encoded_point(false);
    let public_key = PublicKey {
        algorithm: KeyAlgorithm::Ec,
        key: point.as_bytes().to_vec(),
    };
    KeyPair::new(KeyAlgorithm::Ec, encoding, der.to_vec(), public_key)
}
