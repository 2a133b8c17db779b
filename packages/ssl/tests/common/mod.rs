//! Shared fixtures for integration tests
//!
//! Fixture validity runs from 2020-01-01 to 2099-12-31. "signed" and
//! "revoked" are issued by "Test CA Subauthority", which is issued by the
//! self-signed "Test CA". The Subauthority CRL revokes "revoked". Every CRL
//! carries a CRL number except "unnumbered-crl".

#![allow(dead_code)]

use std::time::{Duration, SystemTime};

use cryypt_ssl::parser;
use cryypt_ssl::{Certificate, CertificateRequest, Crl, FixedClock, KeyPair, SslProvider};

pub const CA: &str = include_str!("../fixtures/ca.pem");
pub const INTERMEDIATE: &str = include_str!("../fixtures/intermediate.pem");
pub const SIGNED: &str = include_str!("../fixtures/signed.pem");
pub const REVOKED: &str = include_str!("../fixtures/revoked.pem");
pub const TAMPERED_CERT: &str = include_str!("../fixtures/tampered-cert.pem");
pub const UNKNOWN_CA: &str = include_str!("../fixtures/unknown-ca.pem");
pub const SIGNED_KEY: &str = include_str!("../fixtures/signed-key.pem");
pub const SIGNED_KEY_PKCS8: &str = include_str!("../fixtures/signed-key-pkcs8.pem");
pub const REQUEST_KEY: &str = include_str!("../fixtures/request-key.pem");
pub const EC_KEY: &str = include_str!("../fixtures/ec-key.pem");
pub const CRL: &str = include_str!("../fixtures/crl.pem");
pub const INTERMEDIATE_CRL: &str = include_str!("../fixtures/intermediate-crl.pem");
pub const UNKNOWN_CRL: &str = include_str!("../fixtures/unknown-crl.pem");
pub const UNNUMBERED_CRL: &str = include_str!("../fixtures/unnumbered-crl.pem");
pub const REQUEST: &str = include_str!("../fixtures/request.pem");
pub const TAMPERED_REQUEST: &str = include_str!("../fixtures/tampered-csr.pem");

pub const YEAR: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub fn cert(pem: &str) -> Certificate {
    parser::parse_certificate_pem(pem).expect("fixture certificate parses")
}

pub fn crl(pem: &str) -> Crl {
    parser::parse_crl_pem(pem).expect("fixture CRL parses")
}

pub fn key(pem: &str) -> KeyPair {
    parser::parse_private_key_pem(pem).expect("fixture key parses")
}

pub fn request(pem: &str) -> CertificateRequest {
    parser::parse_request_pem(pem).expect("fixture request parses")
}

pub fn ca() -> Certificate {
    cert(CA)
}

pub fn intermediate() -> Certificate {
    cert(INTERMEDIATE)
}

pub fn signed() -> Certificate {
    cert(SIGNED)
}

/// Root and intermediate, root first.
pub fn ca_pool() -> Vec<Certificate> {
    vec![ca(), intermediate()]
}

/// CRLs covering both links of the "signed" chain.
pub fn full_crls() -> Vec<Crl> {
    vec![crl(CRL), crl(INTERMEDIATE_CRL)]
}

/// Mid-December 2029, inside every fixture's window.
pub fn fixture_now() -> SystemTime {
    SystemTime::UNIX_EPOCH + 60 * YEAR
}

pub fn provider() -> SslProvider {
    SslProvider::new().with_clock(FixedClock(fixture_now()))
}
