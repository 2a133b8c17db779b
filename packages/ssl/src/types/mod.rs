//! Immutable value types for parsed certificates, CRLs, keys and requests

pub mod certificate;
pub mod crl;
pub mod key;
pub mod name;
pub mod request;

pub use certificate::Certificate;
pub use crl::Crl;
pub use key::{KeyAlgorithm, KeyEncoding, KeyPair, PublicKey, Signature, SignatureAlgorithm};
pub use name::DistinguishedName;
pub use request::CertificateRequest;
