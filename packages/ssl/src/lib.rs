#![allow(clippy::collapsible_if)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::result_large_err)]
#![allow(clippy::uninlined_format_args)]

//! # Cyrup SSL Trust Material
//!
//! Builds mutual-TLS client contexts from an unordered pool of CA
//! certificates and CRLs.
//!
//! ## Features
//!
//! - **Chain resolution**: leaf-to-root issuer discovery that does not depend
//!   on pool order
//! - **Verification pipeline**: signature, validity window, basic
//!   constraints and revocation stages, first failure wins
//! - **Revocation policy**: disabled, leaf only or full chain
//! - **Context factory**: insecure, root-only and fully verified contexts
//! - **Request verification**: CSR integrity and key binding
//! - **rustls hand-off**: [`SslContext::client_config`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cryypt_ssl::{ContextConfig, RevocationPolicy, SslProvider, parser};
//!
//! let config = ContextConfig::new()
//!     .with_cacerts(parser::parse_certificates_pem(&ca_bundle)?)
//!     .with_crls(parser::parse_crls_pem(&crl_bundle)?)
//!     .with_client_cert(parser::parse_certificate_pem(&client_pem)?)
//!     .with_private_key(parser::parse_private_key_pem(&key_pem)?)
//!     .with_revocation(RevocationPolicy::LeafOnly);
//!
//! let context = SslProvider::new().create_context(config)?;
//! let tls = context.client_config()?;
//! ```

pub mod chain;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod parser;
pub mod provider;
pub mod revocation;
mod tls_config;
pub mod types;
pub mod verifier;

// Re-export core types
pub use chain::{Chain, MAX_CHAIN_DEPTH};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ContextConfig, SslSettings};
pub use context::SslContext;
pub use error::{IssuerPosition, ParseError, Result, SslError, VerifyError};
pub use provider::SslProvider;
pub use revocation::RevocationPolicy;
pub use types::{
    Certificate, CertificateRequest, Crl, DistinguishedName, KeyAlgorithm, KeyEncoding, KeyPair,
    PublicKey,
};
pub use verifier::{Verifier, VerifyStage};
