//! Chain verification pipeline
//!
//! Stages run in a fixed order (signature, temporal validity, basic
//! constraints, revocation) and the first failure ends the run. Each stage is
//! a [`VerifyStage`] so it can be exercised or replaced on its own.

use std::fmt;
use std::time::SystemTime;

use crate::chain::Chain;
use crate::error::VerifyError;
use crate::revocation::{self, RevocationPolicy};
use crate::types::Crl;

/// Inputs shared by every stage of one verification run
#[derive(Debug, Clone, Copy)]
pub struct VerifyContext<'a> {
    /// Resolved leaf-to-root chain
    pub chain: &'a Chain,
    /// Candidate CRLs, any order
    pub crls: &'a [Crl],
    /// Revocation policy to apply
    pub policy: RevocationPolicy,
    /// Verification time
    pub now: SystemTime,
}

/// One step of the verification pipeline
pub trait VerifyStage: fmt::Debug + Send + Sync {
    /// Stage name for log lines
    fn name(&self) -> &'static str;

    /// Run the stage
    fn check(&self, ctx: &VerifyContext<'_>) -> Result<(), VerifyError>;
}

/// Every certificate's signature verifies under its issuer's key; the root
/// verifies under its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureStage;

impl VerifyStage for SignatureStage {
    fn name(&self) -> &'static str {
        "signature"
    }

    fn check(&self, ctx: &VerifyContext<'_>) -> Result<(), VerifyError> {
        for (index, cert) in ctx.chain.iter().enumerate() {
            let signer = ctx.chain.issuer_of(index).unwrap_or(cert);
            if !cert.is_signed_by(&signer.public_key) {
                return Err(VerifyError::InvalidSignature {
                    subject: cert.subject.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Every certificate is inside its validity window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidityStage;

impl VerifyStage for ValidityStage {
    fn name(&self) -> &'static str {
        "validity"
    }

    fn check(&self, ctx: &VerifyContext<'_>) -> Result<(), VerifyError> {
        for cert in ctx.chain {
            if cert.is_not_yet_valid_at(ctx.now) {
                return Err(VerifyError::NotYetValid {
                    subject: cert.subject.clone(),
                });
            }
            if cert.is_expired_at(ctx.now) {
                return Err(VerifyError::Expired {
                    subject: cert.subject.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Every certificate above the leaf carries the CA basic constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConstraintsStage;

impl VerifyStage for BasicConstraintsStage {
    fn name(&self) -> &'static str {
        "basic constraints"
    }

    fn check(&self, ctx: &VerifyContext<'_>) -> Result<(), VerifyError> {
        match ctx.chain.iter().skip(1).find(|cert| !cert.is_ca) {
            Some(cert) => Err(VerifyError::InvalidCa {
                subject: cert.subject.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// CRL checks according to the revocation policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevocationStage;

impl VerifyStage for RevocationStage {
    fn name(&self) -> &'static str {
        "revocation"
    }

    fn check(&self, ctx: &VerifyContext<'_>) -> Result<(), VerifyError> {
        revocation::check(ctx.chain, ctx.crls, ctx.policy, ctx.now)
    }
}

/// Ordered set of stages applied to a resolved chain
#[derive(Debug)]
pub struct Verifier {
    stages: Vec<Box<dyn VerifyStage>>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::with_stages(vec![
            Box::new(SignatureStage),
            Box::new(ValidityStage),
            Box::new(BasicConstraintsStage),
            Box::new(RevocationStage),
        ])
    }
}

impl Verifier {
    /// Pipeline running `stages` in the given order.
    pub fn with_stages(stages: Vec<Box<dyn VerifyStage>>) -> Self {
        Self { stages }
    }

    /// Stage names in run order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage against `chain`, stopping at the first failure.
    pub fn verify(
        &self,
        chain: &Chain,
        crls: &[Crl],
        policy: RevocationPolicy,
        now: SystemTime,
    ) -> Result<(), VerifyError> {
        let ctx = VerifyContext {
            chain,
            crls,
            policy,
            now,
        };

        for stage in &self.stages {
            if let Err(e) = stage.check(&ctx) {
                tracing::warn!("Chain verification failed at {} stage: {}", stage.name(), e);
                return Err(e);
            }
        }

        Ok(())
    }
}
