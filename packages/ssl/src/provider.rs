//! SSL context factory and certificate request verification
//!
//! Three constructors differ in how eagerly they validate:
//!
//! - [`SslProvider::create_insecure_context`]: nothing to validate, peer
//!   verification off.
//! - [`SslProvider::create_root_context`]: stores trust material verbatim for
//!   the handshake layer to verify against the live peer later.
//! - [`SslProvider::create_context`]: resolves and fully verifies the client
//!   chain before returning.
//!
//! The root and verified paths stay separate; they do not share a validation
//! switch.

use std::sync::Arc;

use crate::chain;
use crate::clock::{Clock, SystemClock};
use crate::config::ContextConfig;
use crate::context::{SslContext, SslContextParts};
use crate::error::{Result, SslError};
use crate::revocation::RevocationPolicy;
use crate::types::{Certificate, CertificateRequest, PublicKey};
use crate::verifier::Verifier;

/// Builds [`SslContext`]s and verifies certificate requests
#[derive(Debug, Clone)]
pub struct SslProvider {
    clock: Arc<dyn Clock>,
    verifier: Arc<Verifier>,
}

impl Default for SslProvider {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            verifier: Arc::new(Verifier::default()),
        }
    }
}

impl SslProvider {
    /// Provider using the wall clock and the stock pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `clock` for temporal checks.
    #[must_use]
    pub fn with_clock(self, clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            ..self
        }
    }

    /// Use a custom verification pipeline.
    #[must_use]
    pub fn with_verifier(self, verifier: Verifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
            ..self
        }
    }

    /// Context for connections that intentionally skip authentication
    pub fn create_insecure_context(&self) -> SslContext {
        tracing::warn!("Creating insecure SSL context, peer verification disabled");
        SslContextParts {
            verify_peer: false,
            revocation: RevocationPolicy::Disabled,
            ..SslContextParts::default()
        }
        .into()
    }

    /// Context trusting `config.cacerts` and `config.crls` as given
    ///
    /// Nothing is validated here: expired or otherwise unusable material is
    /// stored unchanged, and the handshake layer verifies the live peer
    /// against it. Client credentials in `config` are ignored.
    pub fn create_root_context(&self, config: ContextConfig) -> SslContext {
        tracing::debug!(
            "Creating root SSL context with {} CA certificate(s), {} CRL(s), revocation {}",
            config.cacerts.len(),
            config.crls.len(),
            config.revocation
        );
        SslContextParts {
            cacerts: config.cacerts,
            crls: config.crls,
            verify_peer: true,
            revocation: config.revocation,
            include_system_store: config.include_system_store,
            ..SslContextParts::default()
        }
        .into()
    }

    /// Context trusting the bundled public web roots plus `cacerts`
    ///
    /// Public roots ship without CRLs, so revocation is not checked.
    pub fn create_system_context(&self, cacerts: Vec<Certificate>) -> SslContext {
        tracing::debug!(
            "Creating system SSL context with {} additional CA certificate(s)",
            cacerts.len()
        );
        SslContextParts {
            cacerts,
            verify_peer: true,
            revocation: RevocationPolicy::Disabled,
            include_system_store: true,
            ..SslContextParts::default()
        }
        .into()
    }

    /// Fully verified client-authentication context
    ///
    /// Checks the private key type and that it matches the client
    /// certificate, resolves the client chain from `config.cacerts`, runs
    /// the verification pipeline over it, and only then assembles the
    /// context.
    pub fn create_context(&self, config: ContextConfig) -> Result<SslContext> {
        let ContextConfig {
            cacerts,
            crls,
            client_cert,
            private_key,
            revocation,
            include_system_store,
        } = config;

        if let Some(key) = &private_key {
            if !key.algorithm().is_client_auth_supported() {
                return Err(SslError::UnsupportedKeyType(key.algorithm().to_string()));
            }
        }

        let client_cert = client_cert.ok_or(SslError::MissingClientCert)?;

        if let Some(key) = &private_key {
            if client_cert.public_key != *key.public_key() {
                tracing::warn!(
                    "Private key {} does not match certificate {}",
                    key.public_key().fingerprint(),
                    client_cert.subject
                );
                return Err(SslError::KeyMismatch(client_cert.subject.clone()));
            }
        }

        let client_chain = chain::resolve(&client_cert, &cacerts)?;
        self.verifier
            .verify(&client_chain, &crls, revocation, self.clock.now())?;

        tracing::info!(
            "Verified client chain for {} ({} link(s), revocation {})",
            client_cert.subject,
            client_chain.len(),
            revocation
        );

        Ok(SslContextParts {
            cacerts,
            crls,
            private_key,
            client_cert: Some(client_cert),
            client_chain,
            verify_peer: true,
            revocation,
            include_system_store,
        }
        .into())
    }

    /// Check that `csr` is intact and carries `public_key`
    ///
    /// Returns the request unchanged on success.
    pub fn verify_request(
        &self,
        csr: CertificateRequest,
        public_key: &PublicKey,
    ) -> Result<CertificateRequest> {
        if !csr.is_self_signature_intact() || csr.public_key != *public_key {
            tracing::warn!("Certificate request for {} failed verification", csr.subject);
            return Err(SslError::CsrKeyMismatch(csr.subject));
        }
        Ok(csr)
    }
}
