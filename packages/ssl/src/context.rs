//! Immutable SSL context handed to the handshake layer

use crate::chain::Chain;
use crate::revocation::RevocationPolicy;
use crate::types::{Certificate, Crl, KeyPair};

/// Trust material assembled by [`SslProvider`](crate::SslProvider)
///
/// Built once and never mutated. A context from
/// [`create_context`](crate::SslProvider::create_context) only ever holds a
/// chain that passed every verification stage; the other constructors make
/// no such promise.
#[derive(Debug, Clone)]
pub struct SslContext {
    cacerts: Vec<Certificate>,
    crls: Vec<Crl>,
    private_key: Option<KeyPair>,
    client_cert: Option<Certificate>,
    client_chain: Chain,
    verify_peer: bool,
    revocation: RevocationPolicy,
    include_system_store: bool,
}

/// Field-by-field assembly used by the provider
#[derive(Debug, Default)]
pub(crate) struct SslContextParts {
    pub cacerts: Vec<Certificate>,
    pub crls: Vec<Crl>,
    pub private_key: Option<KeyPair>,
    pub client_cert: Option<Certificate>,
    pub client_chain: Chain,
    pub verify_peer: bool,
    pub revocation: RevocationPolicy,
    pub include_system_store: bool,
}

impl From<SslContextParts> for SslContext {
    fn from(parts: SslContextParts) -> Self {
        Self {
            cacerts: parts.cacerts,
            crls: parts.crls,
            private_key: parts.private_key,
            client_cert: parts.client_cert,
            client_chain: parts.client_chain,
            verify_peer: parts.verify_peer,
            revocation: parts.revocation,
            include_system_store: parts.include_system_store,
        }
    }
}

impl SslContext {
    /// Trusted CA certificates, as supplied
    #[inline]
    pub fn cacerts(&self) -> &[Certificate] {
        &self.cacerts
    }

    /// CRLs, as supplied
    #[inline]
    pub fn crls(&self) -> &[Crl] {
        &self.crls
    }

    /// Client private key
    #[inline]
    pub fn private_key(&self) -> Option<&KeyPair> {
        self.private_key.as_ref()
    }

    /// Client certificate
    #[inline]
    pub fn client_cert(&self) -> Option<&Certificate> {
        self.client_cert.as_ref()
    }

    /// Verified client chain, leaf to root; empty unless eagerly verified
    #[inline]
    pub fn client_chain(&self) -> &Chain {
        &self.client_chain
    }

    /// Whether the handshake layer must verify the peer
    #[inline]
    pub fn verify_peer(&self) -> bool {
        self.verify_peer
    }

    /// Revocation policy the handshake layer applies to the peer
    #[inline]
    pub fn revocation(&self) -> RevocationPolicy {
        self.revocation
    }

    /// Whether the public web roots are trusted alongside `cacerts`
    #[inline]
    pub fn include_system_store(&self) -> bool {
        self.include_system_store
    }
}
