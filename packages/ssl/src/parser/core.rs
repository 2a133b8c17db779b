//! Core certificate parsing operations
//!
//! Decodes DER certificates with x509-cert and lifts the fields the
//! verification pipeline needs into a [`Certificate`].

use der::{Decode, Encode};
use x509_cert::Certificate as X509CertCert;
use x509_cert::ext::pkix::BasicConstraints;

use super::key_extraction::{extract_public_key, extract_signature};
use super::name_extraction::extract_distinguished_name;
use crate::error::ParseError;
use crate::types::Certificate;

const BASIC_CONSTRAINTS_OID: &str = "2.5.29.19";

/// Parse a DER certificate
pub fn parse_certificate_der(der: &[u8]) -> Result<Certificate, ParseError> {
    let cert = X509CertCert::from_der(der)
        .map_err(|e| ParseError::new("certificate", format!("X.509 parsing failed: {e}")))?;
    let tbs = &cert.tbs_certificate;

    let tbs_der = tbs
        .to_der()
        .map_err(|e| ParseError::new("certificate", format!("Failed to encode TBS: {e}")))?;

    let is_ca = extract_ca_flag(&cert)?;

    let parsed = Certificate {
        subject: extract_distinguished_name(&tbs.subject),
        issuer: extract_distinguished_name(&tbs.issuer),
        serial_number: tbs.serial_number.as_bytes().to_vec(),
        not_before: tbs.validity.not_before.to_system_time(),
        not_after: tbs.validity.not_after.to_system_time(),
        is_ca,
        public_key: extract_public_key(&tbs.subject_public_key_info),
        signature: extract_signature(&cert.signature_algorithm.oid.to_string(), &cert.signature),
        tbs_der,
        der: der.to_vec(),
    };

    tracing::debug!(
        "Parsed certificate {} (serial {}, issuer {})",
        parsed.subject,
        parsed.serial_hex(),
        parsed.issuer
    );

    Ok(parsed)
}

// BasicConstraints absent means "not a CA"
fn extract_ca_flag(cert: &X509CertCert) -> Result<bool, ParseError> {
    let Some(extensions) = &cert.tbs_certificate.extensions else {
        return Ok(false);
    };

    for ext in extensions {
        if ext.extn_id.to_string() == BASIC_CONSTRAINTS_OID {
            let constraints = BasicConstraints::from_der(ext.extn_value.as_bytes()).map_err(|e| {
                ParseError::new("certificate", format!("Invalid BasicConstraints: {e}"))
            })?;
            return Ok(constraints.ca);
        }
    }

    Ok(false)
}
