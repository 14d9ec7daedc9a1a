//! Building and validating certification paths end to end.
#![cfg(feature = "ed25519")]

mod common;

use bcx509::path::{
    CertificateBundle, PathBuilder, PathValidationConfig, PathValidator,
    ValidationError,
};
use bcx509::x509::{
    oid, BasicConstraints, CertificatePolicies, Ed25519Crypto, Extension,
    GeneralName, GeneralNames, GeneralSubtree, KeyUsage, NameConstraints,
    PolicyInformation, SubjectAltName,
};
use bcx509::Oid;
use common::{at, validity, Spec};

fn config() -> PathValidationConfig {
    PathValidationConfig::default().with_time(at(2030))
}

#[test]
fn self_signed_root_validates() {
    let root = Spec::new("cn=Root,o=Example,c=DE", 1, "cn=Root,o=Example,c=DE", 1)
        .ca().issue();
    assert!(root.is_self_signed(&Ed25519Crypto::new()));

    let builder = PathBuilder::new(
        vec![root.clone()].into(), CertificateBundle::new()
    );
    let path = builder.shortest_path_to_target(&root).unwrap();
    assert_eq!(path.len(), 1);

    let res = PathValidator::new(
        &Ed25519Crypto::new(), &path, config()
    ).validate().unwrap();
    assert_eq!(res.certificate(), &root);
    assert_eq!(res.public_key_info(), root.subject_public_key_info());
}

#[test]
fn build_and_validate_chain() {
    let root = Spec::new("cn=Root", 1, "cn=Root", 1).ca().issue();
    let inter = Spec::new("cn=Inter", 2, "cn=Root", 1).ca().issue();
    let unrelated = Spec::new("cn=Other", 5, "cn=Root", 1).ca().issue();
    let leaf = Spec::new("cn=Leaf", 3, "cn=Inter", 2)
        .with_extension(Extension::new(true, KeyUsage::DIGITAL_SIGNATURE))
        .issue();

    let builder = PathBuilder::new(
        vec![root.clone()].into(),
        vec![unrelated, inter.clone()].into(),
    );
    let paths = builder.all_paths_to_target(&leaf);
    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    assert_eq!(path.trust_anchor(), Some(&root));
    assert_eq!(path.certificates()[1], inter);
    assert_eq!(path.target(), Some(&leaf));

    let res = PathValidator::new(
        &Ed25519Crypto::new(), path,
        config().with_trust_anchor(root.clone())
    ).validate().unwrap();
    assert_eq!(res.certificate(), &leaf);
}

#[test]
fn expired_leaf_fails() {
    let root = Spec::new("cn=Root", 1, "cn=Root", 1).ca().issue();
    let leaf = Spec::new("cn=Leaf", 3, "cn=Root", 1)
        .with_validity(validity(2020, 2025))
        .issue();
    let path = vec![root, leaf].into();
    assert_eq!(
        PathValidator::new(
            &Ed25519Crypto::new(), &path, config()
        ).validate().unwrap_err(),
        ValidationError::ExpiredOrNotYetValid { index: 1 }
    );
}

#[test]
fn non_ca_intermediate_fails() {
    let root = Spec::new("cn=Root", 1, "cn=Root", 1).ca().issue();
    let inter = Spec::new("cn=Inter", 2, "cn=Root", 1)
        .with_extension(Extension::new(true, BasicConstraints::default()))
        .issue();
    let leaf = Spec::new("cn=Leaf", 3, "cn=Inter", 2).issue();
    let path = vec![root, inter, leaf].into();
    match PathValidator::new(
        &Ed25519Crypto::new(), &path, config()
    ).validate() {
        Err(ValidationError::InvalidCaConstraints { index, .. }) => {
            assert_eq!(index, 1)
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn name_constraints_on_alt_names() {
    let root = Spec::new("cn=Root", 1, "cn=Root", 1).ca().issue();
    let inter = Spec::new("cn=Inter", 2, "cn=Root", 1).ca()
        .with_extension(Extension::new(true, NameConstraints {
            permitted: Some(vec![GeneralSubtree::new(
                GeneralName::dns("example.com").unwrap()
            )]),
            excluded: None,
        }))
        .issue();
    let leaf = |name: &str| {
        Spec::new("cn=Leaf", 3, "cn=Inter", 2)
            .with_extension(Extension::new(true, SubjectAltName(
                GeneralNames::single(GeneralName::dns(name).unwrap())
            )))
            .issue()
    };

    let good = vec![root.clone(), inter.clone(), leaf("www.example.com")].into();
    assert!(
        PathValidator::new(&Ed25519Crypto::new(), &good, config())
            .validate().is_ok()
    );

    let bad = vec![root, inter, leaf("www.example.net")].into();
    assert!(matches!(
        PathValidator::new(&Ed25519Crypto::new(), &bad, config())
            .validate().unwrap_err(),
        ValidationError::NameConstraintViolation { index: 2, .. }
    ));
}

#[test]
fn certificate_policies() {
    let policy: Oid = "1.3.6.1.4.1.99999.1".parse().unwrap();
    let policies = |items: Vec<Oid>| {
        Extension::new(false, CertificatePolicies::new(
            items.into_iter().map(PolicyInformation::new).collect()
        ))
    };
    let root = Spec::new("cn=Root", 1, "cn=Root", 1).ca().issue();
    let inter = Spec::new("cn=Inter", 2, "cn=Root", 1).ca()
        .with_extension(policies(vec![oid::ANY_POLICY.to_bytes_oid()]))
        .issue();
    let leaf = Spec::new("cn=Leaf", 3, "cn=Inter", 2)
        .with_extension(policies(vec![policy.clone()]))
        .issue();
    let path = vec![root, inter, leaf].into();

    let res = PathValidator::new(
        &Ed25519Crypto::new(), &path,
        config()
            .with_initial_explicit_policy(true)
            .with_user_initial_policy_set(vec![policy.clone()])
    ).validate().unwrap();
    assert_eq!(res.policies(), &[policy]);

    assert!(matches!(
        PathValidator::new(
            &Ed25519Crypto::new(), &path,
            config()
                .with_initial_explicit_policy(true)
                .with_user_initial_policy_set(vec!["1.2.3".parse().unwrap()])
        ).validate().unwrap_err(),
        ValidationError::PolicyValidation(_)
    ));
}
