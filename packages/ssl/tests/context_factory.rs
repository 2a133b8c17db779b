//! Context factory behavior across the three constructors

mod common;

use std::sync::Arc;
use std::thread;
use std::time::SystemTime;

use common::*;
use cryypt_ssl::{
    ContextConfig, FixedClock, KeyAlgorithm, RevocationPolicy, SslError, SslSettings, VerifyError,
};

fn verified_config() -> ContextConfig {
    ContextConfig::new()
        .with_cacerts(ca_pool())
        .with_crls(full_crls())
        .with_client_cert(signed())
        .with_private_key(key(SIGNED_KEY))
}

fn verify_error(result: cryypt_ssl::Result<cryypt_ssl::SslContext>) -> VerifyError {
    match result {
        Err(SslError::Verify(e)) => e,
        other => panic!("expected a verification error, got {other:?}"),
    }
}

#[test]
fn test_insecure_context_has_no_trust_material() {
    let context = provider().create_insecure_context();
    assert!(context.cacerts().is_empty());
    assert!(context.crls().is_empty());
    assert!(context.private_key().is_none());
    assert!(context.client_cert().is_none());
    assert!(!context.verify_peer());
}

#[test]
fn test_root_context_stores_material_unvalidated() {
    let far_future = FixedClock(SystemTime::UNIX_EPOCH + 200 * YEAR);
    let provider = provider().with_clock(far_future);

    let config = ContextConfig::new()
        .with_cacerts(vec![ca(), cert(UNKNOWN_CA)])
        .with_crls(vec![crl(UNKNOWN_CRL)])
        .with_revocation(RevocationPolicy::LeafOnly);
    let context = provider.create_root_context(config);

    assert_eq!(context.cacerts().len(), 2);
    assert_eq!(context.cacerts()[1].subject, "/CN=Unknown CA");
    assert_eq!(context.crls().len(), 1);
    assert!(context.verify_peer());
    assert_eq!(context.revocation(), RevocationPolicy::LeafOnly);
    assert!(context.client_chain().is_empty());
}

#[test]
fn test_root_context_keeps_expired_ca() {
    let mut expired = ca();
    expired.not_after = SystemTime::UNIX_EPOCH;
    let context = provider().create_root_context(ContextConfig::new().with_cacerts(vec![expired]));
    assert_eq!(context.cacerts()[0].not_after, SystemTime::UNIX_EPOCH);
}

#[test]
fn test_system_context_trusts_public_roots() {
    let context = provider().create_system_context(vec![ca()]);
    assert!(context.include_system_store());
    assert!(context.verify_peer());
    assert_eq!(context.revocation(), RevocationPolicy::Disabled);
    assert_eq!(context.cacerts().len(), 1);
}

#[test]
fn test_verified_context_holds_full_chain() {
    let context = provider()
        .create_context(verified_config())
        .expect("fixture chain verifies");
    assert!(context.verify_peer());
    assert_eq!(
        context.client_chain().subjects(),
        vec!["/CN=signed", "/CN=Test CA Subauthority", "/CN=Test CA"]
    );
    assert_eq!(
        context.client_cert().map(|c| c.subject.as_str()),
        Some("/CN=signed")
    );
    assert!(context.private_key().is_some());
}

#[test]
fn test_pkcs8_key_matches_certificate() {
    let config = verified_config().with_private_key(key(SIGNED_KEY_PKCS8));
    assert!(provider().create_context(config).is_ok());
}

#[test]
fn test_private_key_is_optional() {
    let config = ContextConfig {
        private_key: None,
        ..verified_config()
    };
    let context = provider().create_context(config).expect("chain verifies");
    assert!(context.private_key().is_none());
}

#[test]
fn test_tampered_signature_is_rejected() {
    // The tampered certificate carries another key, so skip the key match
    let config = ContextConfig {
        private_key: None,
        ..verified_config().with_client_cert(cert(TAMPERED_CERT))
    };
    let err = verify_error(provider().create_context(config));
    assert_eq!(
        err,
        VerifyError::InvalidSignature {
            subject: "/CN=signed".into()
        }
    );
}

#[test]
fn test_corrupted_intermediate_signature() {
    let mut broken = intermediate();
    broken.signature.value[0] ^= 0xff;
    let config = verified_config().with_cacerts(vec![ca(), broken]);
    let err = verify_error(provider().create_context(config));
    assert_eq!(
        err,
        VerifyError::InvalidSignature {
            subject: "/CN=Test CA Subauthority".into()
        }
    );
}

#[test]
fn test_corrupted_root_self_signature() {
    let mut broken = ca();
    broken.signature.value[0] ^= 0xff;
    let config = verified_config().with_cacerts(vec![broken, intermediate()]);
    let err = verify_error(provider().create_context(config));
    assert_eq!(
        err,
        VerifyError::InvalidSignature {
            subject: "/CN=Test CA".into()
        }
    );
    assert_eq!(err.code(), 7);
}

#[test]
fn test_not_yet_valid_intermediate() {
    let mut future = intermediate();
    future.not_before = fixture_now() + YEAR;
    let config = verified_config().with_cacerts(vec![ca(), future]);
    let err = verify_error(provider().create_context(config));
    assert_eq!(
        err,
        VerifyError::NotYetValid {
            subject: "/CN=Test CA Subauthority".into()
        }
    );
    assert_eq!(err.code(), 9);
}

#[test]
fn test_expired_leaf() {
    let mut expired = signed();
    expired.not_after = fixture_now() - YEAR;
    let config = verified_config().with_client_cert(expired);
    let err = verify_error(provider().create_context(config));
    assert_eq!(
        err,
        VerifyError::Expired {
            subject: "/CN=signed".into()
        }
    );
}

#[test]
fn test_wall_clock_past_fixture_window_expires_chain() {
    let provider = provider().with_clock(FixedClock(SystemTime::UNIX_EPOCH + 200 * YEAR));
    let err = verify_error(provider.create_context(verified_config()));
    assert!(matches!(err, VerifyError::Expired { .. }));
}

#[test]
fn test_intermediate_without_ca_flag() {
    let mut not_ca = intermediate();
    not_ca.is_ca = false;
    let config = verified_config().with_cacerts(vec![ca(), not_ca]);
    let err = verify_error(provider().create_context(config));
    assert_eq!(
        err.to_string(),
        "Certificate '/CN=Test CA Subauthority' failed verification (24): invalid CA certificate"
    );
}

#[test]
fn test_missing_issuer_is_a_verification_error() {
    let config = verified_config().with_cacerts(vec![ca()]);
    let err = provider()
        .create_context(config)
        .expect_err("intermediate absent");
    assert!(err.is_verification());
    assert_eq!(
        err.to_string(),
        "The issuer '/CN=Test CA Subauthority' of certificate '/CN=signed' cannot be found locally"
    );
}

#[test]
fn test_ec_key_is_rejected_before_chain_work() {
    // Empty pool: chain resolution would fail if it ran
    let config = ContextConfig::new()
        .with_client_cert(signed())
        .with_private_key(key(EC_KEY));
    let err = provider().create_context(config).expect_err("EC key");
    assert_eq!(err, SslError::UnsupportedKeyType("EC".to_string()));
    assert_eq!(err.to_string(), "Unsupported key 'EC'");
}

#[test]
fn test_generated_ec_key_is_rejected() {
    let generated = rcgen::KeyPair::generate().expect("key generation");
    let ec_key = key(&generated.serialize_pem());
    assert_eq!(ec_key.algorithm(), &KeyAlgorithm::Ec);

    let err = provider()
        .create_context(verified_config().with_private_key(ec_key))
        .expect_err("EC key");
    assert!(matches!(err, SslError::UnsupportedKeyType(_)));
}

#[test]
fn test_foreign_key_does_not_match_certificate() {
    let config = verified_config().with_private_key(key(REQUEST_KEY));
    let err = provider().create_context(config).expect_err("wrong key");
    assert_eq!(err, SslError::KeyMismatch("/CN=signed".into()));
    assert!(!err.is_verification());
}

#[test]
fn test_settings_seed_the_configuration() {
    let settings =
        SslSettings::from_json(r#"{"certificate_revocation": false}"#).expect("valid settings");
    let config = ContextConfig::from_settings(&settings)
        .with_cacerts(ca_pool())
        .with_client_cert(signed())
        .with_private_key(key(SIGNED_KEY));
    let context = provider().create_context(config).expect("no CRLs needed");
    assert_eq!(context.revocation(), RevocationPolicy::Disabled);
}

#[test]
fn test_provider_is_shared_across_threads() {
    let provider = Arc::new(provider());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let provider = Arc::clone(&provider);
            thread::spawn(move || {
                provider
                    .create_context(verified_config())
                    .map(|context| context.client_chain().len())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread completes"), Ok(3));
    }
}
