//! CRL parsing

use std::collections::HashSet;

use der::{Decode, Encode};
use x509_cert::crl::CertificateList;

use super::key_extraction::extract_signature;
use super::name_extraction::extract_distinguished_name;
use crate::error::ParseError;
use crate::types::Crl;

const CRL_NUMBER_OID: &str = "2.5.29.20";

/// Parse a DER certificate revocation list
///
/// The `cRLNumber` extension is mandatory; the handshake layer refuses CRLs
/// without one.
pub fn parse_crl_der(der: &[u8]) -> Result<Crl, ParseError> {
    let crl = CertificateList::from_der(der)
        .map_err(|e| ParseError::new("CRL", format!("CRL parsing failed: {e}")))?;
    let tbs = &crl.tbs_cert_list;

    let has_crl_number = tbs
        .crl_extensions
        .iter()
        .flatten()
        .any(|ext| ext.extn_id.to_string() == CRL_NUMBER_OID);
    if !has_crl_number {
        return Err(ParseError::new("CRL", "missing CRL number extension"));
    }

    let tbs_der = tbs
        .to_der()
        .map_err(|e| ParseError::new("CRL", format!("Failed to encode TBS: {e}")))?;

    // Extract revoked certificate serial numbers
    let revoked_serials: HashSet<Vec<u8>> = tbs
        .revoked_certificates
        .iter()
        .flatten()
        .map(|revoked| revoked.serial_number.as_bytes().to_vec())
        .collect();

    let parsed = Crl {
        issuer: extract_distinguished_name(&tbs.issuer),
        last_update: tbs.this_update.to_system_time(),
        next_update: tbs.next_update.as_ref().map(|time| time.to_system_time()),
        revoked_serials,
        signature: extract_signature(&crl.signature_algorithm.oid.to_string(), &crl.signature),
        tbs_der,
        der: der.to_vec(),
    };

    tracing::debug!(
        "Parsed CRL from {} with {} revoked certificates, next update: {:?}",
        parsed.issuer,
        parsed.revoked_serials.len(),
        parsed.next_update
    );

    Ok(parsed)
}
