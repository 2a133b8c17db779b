//! rustls configuration built from an [`SslContext`]
//!
//! The handshake layer does its own, deferred verification of the live peer
//! against the context's trust material. Contexts with peer verification
//! disabled get a verifier that accepts any server certificate.

use std::sync::Arc;

use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, ring as ring_provider};
use rustls::pki_types::{
    CertificateDer, CertificateRevocationListDer, PrivateKeyDer, PrivatePkcs1KeyDer,
    PrivatePkcs8KeyDer, PrivateSec1KeyDer, ServerName, UnixTime,
};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

use crate::context::SslContext;
use crate::error::SslError;
use crate::revocation::RevocationPolicy;
use crate::types::{KeyEncoding, KeyPair};

fn tls_error(e: impl std::fmt::Display) -> SslError {
    SslError::TlsConfig(e.to_string())
}

impl SslContext {
    /// Build a rustls client configuration from this context
    ///
    /// The client presents the verified chain (without its self-signed root)
    /// when both a client certificate and a private key are present.
    pub fn client_config(&self) -> Result<ClientConfig, SslError> {
        let provider = Arc::new(ring_provider::default_provider());

        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()
            .map_err(tls_error)?;

        let builder = if self.verify_peer() {
            builder.with_webpki_verifier(self.server_verifier(provider)?)
        } else {
            tracing::warn!("Building client configuration without server verification");
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert { provider }))
        };

        match (self.client_cert(), self.private_key()) {
            (Some(_), Some(key)) => builder
                .with_client_auth_cert(self.presented_chain(), private_key_der(key))
                .map_err(tls_error),
            _ => Ok(builder.with_no_client_auth()),
        }
    }

    fn server_verifier(
        &self,
        provider: Arc<CryptoProvider>,
    ) -> Result<Arc<WebPkiServerVerifier>, SslError> {
        let mut roots = RootCertStore::empty();
        let (added, ignored) = roots.add_parsable_certificates(
            self.cacerts()
                .iter()
                .map(|cert| CertificateDer::from(cert.der.clone())),
        );
        if ignored > 0 {
            tracing::warn!("Ignored {ignored} unparsable CA certificate(s), kept {added}");
        }

        if self.include_system_store() {
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        }

        let crls = self
            .crls()
            .iter()
            .map(|crl| CertificateRevocationListDer::from(crl.der.clone()));

        let builder = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider);
        let builder = match self.revocation() {
            RevocationPolicy::Disabled => builder,
            RevocationPolicy::LeafOnly => builder.with_crls(crls).only_check_end_entity_revocation(),
            RevocationPolicy::FullChain => builder.with_crls(crls),
        };

        builder.build().map_err(tls_error)
    }

    fn presented_chain(&self) -> Vec<CertificateDer<'static>> {
        let chain = self.client_chain();
        let presented = if chain.len() > 1 {
            &chain.certificates()[..chain.len() - 1]
        } else {
            chain.certificates()
        };

        if presented.is_empty() {
            // Unverified contexts carry the bare client certificate
            return self
                .client_cert()
                .map(|cert| vec![CertificateDer::from(cert.der.clone())])
                .unwrap_or_default();
        }

        presented
            .iter()
            .map(|cert| CertificateDer::from(cert.der.clone()))
            .collect()
    }
}

fn private_key_der(key: &KeyPair) -> PrivateKeyDer<'static> {
    let material = key.material().to_vec();
    match key.encoding() {
        KeyEncoding::Pkcs1 => PrivateKeyDer::Pkcs1(PrivatePkcs1KeyDer::from(material)),
        KeyEncoding::Pkcs8 => PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(material)),
        KeyEncoding::Sec1 => PrivateKeyDer::Sec1(PrivateSec1KeyDer::from(material)),
    }
}

/// Server verifier for contexts that skip peer authentication
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        tracing::debug!("Accepting unverified server certificate for {:?}", server_name);
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
