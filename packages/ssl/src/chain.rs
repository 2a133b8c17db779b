//! Issuer chain resolution over an unordered certificate pool
//!
//! The pool is indexed by subject name so discovery is a lookup per link, not
//! a scan, and the resolved chain never depends on the order the pool was
//! supplied in.

use std::collections::{HashMap, HashSet};

use crate::error::{IssuerPosition, VerifyError};
use crate::types::{Certificate, DistinguishedName};

/// Maximum chain depth to prevent runaway resolution.
pub const MAX_CHAIN_DEPTH: usize = 32;

/// Ordered leaf-to-root certificate chain
///
/// For every adjacent pair, the child's issuer equals the parent's subject.
/// The last element is self-signed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chain {
    certs: Vec<Certificate>,
}

impl Chain {
    /// Leaf certificate, absent only for the empty chain.
    #[inline]
    pub fn leaf(&self) -> Option<&Certificate> {
        self.certs.first()
    }

    /// Root certificate, absent only for the empty chain.
    #[inline]
    pub fn root(&self) -> Option<&Certificate> {
        self.certs.last()
    }

    /// Number of certificates.
    #[inline]
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Whether the chain holds no certificates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    /// Certificates in leaf-to-root order.
    #[inline]
    pub fn certificates(&self) -> &[Certificate] {
        &self.certs
    }

    /// Iterate leaf to root.
    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certs.iter()
    }

    /// `(child, issuer)` pairs, leaf first.
    pub fn links(&self) -> impl Iterator<Item = (&Certificate, &Certificate)> {
        self.certs.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// The issuing certificate of the certificate at `index`, if the chain has one.
    #[inline]
    pub fn issuer_of(&self, index: usize) -> Option<&Certificate> {
        self.certs.get(index + 1)
    }

    /// Subject names, leaf first.
    pub fn subjects(&self) -> Vec<&DistinguishedName> {
        self.certs.iter().map(|cert| &cert.subject).collect()
    }

    /// Consume into the owned certificates.
    pub fn into_certificates(self) -> Vec<Certificate> {
        self.certs
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Certificate;
    type IntoIter = std::slice::Iter<'a, Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certs.iter()
    }
}

/// Pool index from subject name to candidate issuers
///
/// Candidates sharing a subject are kept in DER order so that picking among
/// them is deterministic.
#[derive(Debug)]
pub struct IssuerIndex<'a> {
    by_subject: HashMap<&'a str, Vec<&'a Certificate>>,
}

impl<'a> IssuerIndex<'a> {
    /// Index `pool` by subject name.
    pub fn new(pool: &'a [Certificate]) -> Self {
        let mut by_subject: HashMap<&'a str, Vec<&'a Certificate>> =
            HashMap::with_capacity(pool.len());
        for cert in pool {
            by_subject
                .entry(cert.subject.as_str())
                .or_default()
                .push(cert);
        }
        for candidates in by_subject.values_mut() {
            candidates.sort_by(|a, b| a.der.cmp(&b.der));
            candidates.dedup_by(|a, b| a.der == b.der);
        }
        Self { by_subject }
    }

    /// Find the issuer of `child`.
    ///
    /// Among several certificates with the wanted subject, the first one
    /// whose key verifies `child`'s signature wins; failing that, the first
    /// in DER order is returned and the signature stage reports the mismatch.
    pub fn issuer_of(&self, child: &Certificate) -> Option<&'a Certificate> {
        let candidates = self.by_subject.get(child.issuer.as_str())?;
        if candidates.len() > 1 {
            if let Some(verified) = candidates
                .iter()
                .find(|candidate| child.is_signed_by(&candidate.public_key))
            {
                return Some(*verified);
            }
        }
        candidates.first().copied()
    }
}

/// Resolve the chain from `start` up to a self-signed root using `pool`
///
/// Fails with [`VerifyError::IssuerNotFound`] naming the first link whose
/// issuer is absent, [`VerifyError::IssuerLoop`] if issuer links cycle, or
/// [`VerifyError::ChainTooDeep`] past [`MAX_CHAIN_DEPTH`] certificates.
pub fn resolve(start: &Certificate, pool: &[Certificate]) -> Result<Chain, VerifyError> {
    let index = IssuerIndex::new(pool);
    let mut certs = vec![start.clone()];
    let mut seen: HashSet<&str> = HashSet::from([start.subject.as_str()]);

    loop {
        let current = certs.last().unwrap_or(start);
        if current.is_self_signed() {
            break;
        }

        let position = if certs.len() == 1 {
            IssuerPosition::Leaf
        } else {
            IssuerPosition::Upstream
        };

        let Some(issuer) = index.issuer_of(current) else {
            return Err(VerifyError::IssuerNotFound {
                issuer: current.issuer.clone(),
                subject: current.subject.clone(),
                position,
            });
        };

        if !seen.insert(issuer.subject.as_str()) {
            return Err(VerifyError::IssuerLoop {
                subject: current.subject.clone(),
            });
        }

        if certs.len() >= MAX_CHAIN_DEPTH {
            return Err(VerifyError::ChainTooDeep {
                subject: current.subject.clone(),
                depth: MAX_CHAIN_DEPTH,
            });
        }

        tracing::debug!("Resolved issuer {} for {}", issuer.subject, current.subject);
        certs.push(issuer.clone());
    }

    Ok(Chain { certs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyAlgorithm, PublicKey, Signature, SignatureAlgorithm};
    use std::time::{Duration, SystemTime};

    fn cert(subject: &str, issuer: &str) -> Certificate {
        Certificate {
            subject: DistinguishedName::from_common_name(subject),
            issuer: DistinguishedName::from_common_name(issuer),
            serial_number: vec![1],
            not_before: SystemTime::UNIX_EPOCH,
            not_after: SystemTime::UNIX_EPOCH + Duration::from_secs(u32::MAX as u64),
            is_ca: subject != "leaf",
            public_key: PublicKey {
                algorithm: KeyAlgorithm::Rsa,
                key: subject.as_bytes().to_vec(),
            },
            signature: Signature {
                algorithm: SignatureAlgorithm::RsaPkcs1Sha256,
                value: vec![],
            },
            tbs_der: vec![],
            der: format!("{subject}<-{issuer}").into_bytes(),
        }
    }

    #[test]
    fn test_resolves_leaf_to_root() {
        let pool = vec![cert("root", "root"), cert("int", "root")];
        let chain = resolve(&cert("leaf", "int"), &pool).expect("chain resolves");
        let subjects: Vec<&str> = chain.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec!["/CN=leaf", "/CN=int", "/CN=root"]);
        assert_eq!(chain.links().count(), 2);
    }

    #[test]
    fn test_self_signed_start_is_a_one_link_chain() {
        let root = cert("root", "root");
        let chain = resolve(&root, &[]).expect("chain resolves");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.leaf(), chain.root());
    }

    #[test]
    fn test_missing_leaf_issuer_is_local() {
        let pool = vec![cert("root", "root")];
        let err = resolve(&cert("leaf", "int"), &pool).expect_err("issuer absent");
        assert_eq!(
            err,
            VerifyError::IssuerNotFound {
                issuer: "/CN=int".into(),
                subject: "/CN=leaf".into(),
                position: IssuerPosition::Leaf,
            }
        );
    }

    #[test]
    fn test_missing_upstream_issuer() {
        let pool = vec![cert("int", "root")];
        let err = resolve(&cert("leaf", "int"), &pool).expect_err("root absent");
        assert_eq!(
            err,
            VerifyError::IssuerNotFound {
                issuer: "/CN=root".into(),
                subject: "/CN=int".into(),
                position: IssuerPosition::Upstream,
            }
        );
    }

    #[test]
    fn test_issuer_loop_is_detected() {
        let pool = vec![cert("a", "b"), cert("b", "a")];
        let err = resolve(&cert("leaf", "a"), &pool).expect_err("loop");
        assert!(matches!(err, VerifyError::IssuerLoop { .. }));
    }

    #[test]
    fn test_long_chain_without_loop_hits_depth_limit() {
        let pool: Vec<Certificate> = (0..MAX_CHAIN_DEPTH + 8)
            .map(|i| cert(&format!("ca{i}"), &format!("ca{}", i + 1)))
            .collect();
        let err = resolve(&cert("leaf", "ca0"), &pool).expect_err("too deep");
        assert_eq!(
            err,
            VerifyError::ChainTooDeep {
                subject: DistinguishedName::from_common_name(&format!("ca{}", MAX_CHAIN_DEPTH - 2)),
                depth: MAX_CHAIN_DEPTH,
            }
        );
        assert_eq!(err.code(), 22);
        assert!(err.to_string().contains("exceeds 32 certificates"));
    }

    #[test]
    fn test_duplicates_resolve_deterministically() {
        let mut first = cert("int", "root");
        first.der = b"b".to_vec();
        let mut second = cert("int", "root");
        second.der = b"a".to_vec();
        let root = cert("root", "root");
        let leaf = cert("leaf", "int");

        let forward = resolve(&leaf, &[first.clone(), second.clone(), root.clone()])
            .expect("chain resolves");
        let backward = resolve(&leaf, &[root, second, first]).expect("chain resolves");
        assert_eq!(forward, backward);
        assert_eq!(forward.certificates()[1].der, b"a".to_vec());
    }
}
