//! Error types for context construction and chain verification
//!
//! Two classes exist. `VerifyError` is the verification pipeline's verdict on
//! the trust material and always names the offending certificate or CRL
//! issuer. Everything else in `SslError` is a usage error: the caller handed
//! over inputs that are inconsistent regardless of any chain cryptography.

use thiserror::Error;

use crate::types::DistinguishedName;

/// Where in the chain an issuer lookup came up empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuerPosition {
    /// The leaf's own issuer is absent from the pool
    Leaf,
    /// A CA further up the chain is absent from the pool
    Upstream,
}

/// Chain verification failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// No pool certificate carries the wanted issuer as its subject
    #[error("The issuer '{issuer}' of certificate '{subject}' {}", issuer_gap(.position))]
    IssuerNotFound {
        /// Issuer that could not be found
        issuer: DistinguishedName,
        /// Certificate whose issuer is missing
        subject: DistinguishedName,
        /// Which link the lookup failed from
        position: IssuerPosition,
    },

    /// Issuer links loop back on themselves without a self-signed root
    #[error("The issuer chain of certificate '{subject}' loops without reaching a root")]
    IssuerLoop {
        /// Certificate at which the loop was detected
        subject: DistinguishedName,
    },

    /// Chain grew past the resolver's depth limit without reaching a root
    #[error("The issuer chain of certificate '{subject}' exceeds {depth} certificates")]
    ChainTooDeep {
        /// Certificate at which resolution stopped
        subject: DistinguishedName,
        /// Depth limit that was hit
        depth: usize,
    },

    /// Signature does not verify under the issuer's key
    #[error("Invalid signature for certificate '{subject}'")]
    InvalidSignature {
        /// Certificate whose signature failed
        subject: DistinguishedName,
    },

    /// Validity window starts in the future
    #[error("The certificate '{subject}' is not yet valid, verify time is synchronized")]
    NotYetValid {
        /// Offending certificate
        subject: DistinguishedName,
    },

    /// Validity window ended in the past
    #[error("The certificate '{subject}' has expired, verify time is synchronized")]
    Expired {
        /// Offending certificate
        subject: DistinguishedName,
    },

    /// Issuing certificate lacks the CA basic constraint
    #[error("Certificate '{subject}' failed verification (24): invalid CA certificate")]
    InvalidCa {
        /// Offending CA certificate
        subject: DistinguishedName,
    },

    /// Revocation policy requires a CRL from this issuer
    #[error("The CRL issued by '{issuer}' is missing")]
    CrlMissing {
        /// Issuer whose CRL is missing
        issuer: DistinguishedName,
    },

    /// CRL signature does not verify under the issuer's key
    #[error("Invalid signature for CRL issued by '{issuer}'")]
    CrlInvalidSignature {
        /// CRL issuer
        issuer: DistinguishedName,
    },

    /// CRL `thisUpdate` is in the future
    #[error("The CRL issued by '{issuer}' is not yet valid, verify time is synchronized")]
    CrlNotYetValid {
        /// CRL issuer
        issuer: DistinguishedName,
    },

    /// CRL `nextUpdate` is in the past
    #[error("The CRL issued by '{issuer}' has expired, verify time is synchronized")]
    CrlExpired {
        /// CRL issuer
        issuer: DistinguishedName,
    },

    /// Serial number listed in the issuer's CRL
    #[error("Certificate '{subject}' is revoked")]
    Revoked {
        /// Revoked certificate
        subject: DistinguishedName,
    },
}

fn issuer_gap(position: &IssuerPosition) -> &'static str {
    match position {
        IssuerPosition::Leaf => "cannot be found locally",
        IssuerPosition::Upstream => "is missing",
    }
}

impl VerifyError {
    /// DN of the object the failure is about: the certificate for
    /// certificate failures, the CRL issuer for CRL failures.
    pub fn subject(&self) -> &DistinguishedName {
        match self {
            Self::IssuerNotFound { subject, .. }
            | Self::IssuerLoop { subject }
            | Self::ChainTooDeep { subject, .. }
            | Self::InvalidSignature { subject }
            | Self::NotYetValid { subject }
            | Self::Expired { subject }
            | Self::InvalidCa { subject }
            | Self::Revoked { subject } => subject,
            Self::CrlMissing { issuer }
            | Self::CrlInvalidSignature { issuer }
            | Self::CrlNotYetValid { issuer }
            | Self::CrlExpired { issuer } => issuer,
        }
    }

    /// Equivalent OpenSSL `X509_V_ERR_*` code.
    pub fn code(&self) -> u32 {
        match self {
            Self::IssuerNotFound {
                position: IssuerPosition::Leaf,
                ..
            } => 20,
            Self::IssuerNotFound {
                position: IssuerPosition::Upstream,
                ..
            }
            | Self::IssuerLoop { .. } => 2,
            Self::CrlMissing { .. } => 3,
            Self::InvalidSignature { .. } => 7,
            Self::CrlInvalidSignature { .. } => 8,
            Self::NotYetValid { .. } => 9,
            Self::Expired { .. } => 10,
            Self::CrlNotYetValid { .. } => 11,
            Self::CrlExpired { .. } => 12,
            Self::ChainTooDeep { .. } => 22,
            Self::Revoked { .. } => 23,
            Self::InvalidCa { .. } => 24,
        }
    }
}

/// Failure decoding PEM/DER input into value types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse {kind}: {reason}")]
pub struct ParseError {
    /// What was being decoded
    pub kind: &'static str,
    /// Decoder message
    pub reason: String,
}

impl ParseError {
    /// Create a parse error for `kind`.
    pub fn new(kind: &'static str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Errors from the context factory and request verifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SslError {
    /// Private key algorithm cannot authenticate the client
    #[error("Unsupported key '{0}'")]
    UnsupportedKeyType(String),

    /// Client certificate does not belong to the private key
    #[error("The certificate for '{0}' does not match its private key")]
    KeyMismatch(DistinguishedName),

    /// Request was tampered with or signed by a different key
    #[error("The CSR for host '{0}' does not match the public key")]
    CsrKeyMismatch(DistinguishedName),

    /// Fully verified context requested without a client certificate
    #[error("Client certificate is missing")]
    MissingClientCert,

    /// Trust material failed verification
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// Input could not be decoded
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Handshake-layer configuration could not be built
    #[error("TLS configuration failed: {0}")]
    TlsConfig(String),
}

impl SslError {
    /// Whether this is a verification verdict rather than a usage error.
    #[inline]
    pub fn is_verification(&self) -> bool {
        matches!(self, Self::Verify(_))
    }

    /// The verification failure, if this is one.
    pub fn as_verify(&self) -> Option<&VerifyError> {
        match self {
            Self::Verify(e) => Some(e),
            _ => None,
        }
    }
}

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, SslError>;
