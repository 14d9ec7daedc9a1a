//! Issuing and validating attribute certificates end to end.
#![cfg(feature = "ed25519")]

mod common;

use bcx509::Integer;
use bcx509::path::{AcValidationConfig, AcValidationError, AcValidator};
use bcx509::x501::{oid as attr_oid, Attribute, AttributeValue, Attributes};
use bcx509::x509::{
    AlgorithmIdentifier, AttCertIssuer, AttCertValidityPeriod,
    AttributeCertificate, AttributeCertificateInfo, Ed25519Crypto,
    Extension, GeneralName, GeneralNames, Holder, KeyUsage, RoleSyntax,
    Target, TargetInformation,
};
use common::{at, keys, Spec};

struct Pki {
    root: bcx509::x509::Certificate,
    holder: bcx509::x509::Certificate,
    aa: bcx509::x509::Certificate,
}

impl Pki {
    fn new() -> Self {
        Pki {
            root: Spec::new("cn=Root", 1, "cn=Root", 1).ca().issue(),
            holder: Spec::new("cn=Alice,o=Example", 2, "cn=Root", 1).issue(),
            aa: Spec::new("cn=Authority,o=Example", 3, "cn=Root", 1)
                .with_extension(
                    Extension::new(true, KeyUsage::DIGITAL_SIGNATURE)
                )
                .issue(),
        }
    }

    fn config(&self) -> AcValidationConfig {
        AcValidationConfig::new(
            vec![self.root.clone(), self.holder.clone()].into(),
            vec![self.root.clone(), self.aa.clone()].into(),
        ).with_time(at(2030))
    }

    fn info(&self) -> AttributeCertificateInfo {
        let role = Attribute::new(
            attr_oid::AT_ROLE.to_bytes_oid(),
            vec![AttributeValue::Role(RoleSyntax::new(
                GeneralName::uri("urn:example:role:admin").unwrap()
            ))]
        ).unwrap();
        AttributeCertificateInfo::new(
            Holder::from_certificate(&self.holder),
            AttCertIssuer::from_issuer_name(GeneralNames::single(
                GeneralName::DirectoryName(self.aa.subject().clone())
            )),
            Integer::from(42u32),
            AttCertValidityPeriod::new(at(2025), at(2035)),
            Attributes::new().with_additional(role),
        )
    }

    fn issue(&self, info: AttributeCertificateInfo) -> AttributeCertificate {
        let (key, _) = keys(3);
        let cert = info.sign(
            &Ed25519Crypto::new(), &AlgorithmIdentifier::ed25519(), &key
        ).unwrap();
        AttributeCertificate::from_der(cert.to_der()).unwrap()
    }
}

#[test]
fn issue_decode_validate() {
    let pki = Pki::new();
    let cert = pki.issue(pki.info());
    assert_eq!(cert.serial_number(), &Integer::from(42u32));
    assert!(cert.holder().refers_to(&pki.holder));

    let role = cert.attributes().first_of(&attr_oid::AT_ROLE).unwrap();
    match *role.first_value() {
        AttributeValue::Role(ref role) => {
            assert_eq!(
                role.role_name,
                GeneralName::uri("urn:example:role:admin").unwrap()
            );
        }
        ref other => panic!("unexpected value {:?}", other)
    }

    let res = AcValidator::new(
        &Ed25519Crypto::new(), &cert, pki.config()
    ).validate().unwrap();
    assert_eq!(res.certificate(), &pki.aa);
}

#[test]
fn signature_by_other_key_fails() {
    let pki = Pki::new();
    let (key, _) = keys(9);
    let cert = pki.info().sign(
        &Ed25519Crypto::new(), &AlgorithmIdentifier::ed25519(), &key
    ).unwrap();
    assert_eq!(
        AcValidator::new(&Ed25519Crypto::new(), &cert, pki.config())
            .validate().unwrap_err(),
        AcValidationError::SignatureVerification
    );
}

#[test]
fn expired_attribute_certificate_fails() {
    let pki = Pki::new();
    let cert = pki.issue(pki.info());
    assert_eq!(
        AcValidator::new(
            &Ed25519Crypto::new(), &cert, pki.config().with_time(at(2040))
        ).validate().unwrap_err(),
        AcValidationError::ExpiredOrNotYetValid
    );
}

#[test]
fn targeted_certificate() {
    let pki = Pki::new();
    let service = GeneralName::dns("service.example").unwrap();
    let cert = pki.issue(pki.info().with_extension(Extension::new(
        true, TargetInformation::new(vec![Target::Name(service.clone())])
    )).unwrap());

    assert_eq!(
        AcValidator::new(&Ed25519Crypto::new(), &cert, pki.config())
            .validate().unwrap_err(),
        AcValidationError::NotTargeted
    );
    assert!(
        AcValidator::new(
            &Ed25519Crypto::new(), &cert, pki.config().with_target(service)
        ).validate().is_ok()
    );
}
