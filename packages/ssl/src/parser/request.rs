//! Certificate signing request parsing

use der::{Decode, Encode};
use x509_cert::request::CertReq;

use super::key_extraction::{extract_public_key, extract_signature};
use super::name_extraction::extract_distinguished_name;
use crate::error::ParseError;
use crate::types::CertificateRequest;

/// Parse a DER PKCS#10 request
pub fn parse_request_der(der: &[u8]) -> Result<CertificateRequest, ParseError> {
    let request = CertReq::from_der(der)
        .map_err(|e| ParseError::new("certificate request", format!("CSR parsing failed: {e}")))?;

    let info_der = request.info.to_der().map_err(|e| {
        ParseError::new("certificate request", format!("Failed to encode request info: {e}"))
    })?;

    Ok(CertificateRequest {
        subject: extract_distinguished_name(&request.info.subject),
        public_key: extract_public_key(&request.info.public_key),
        signature: extract_signature(&request.algorithm.oid.to_string(), &request.signature),
        info_der,
        der: der.to_vec(),
    })
}
