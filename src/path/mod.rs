//! Building and validating certification paths.
//!
//! A [`CertificationPath`] is an ordered list of certificates starting at
//! a trust anchor and ending at a target certificate. Each certificate is
//! issued by the one before it.
//!
//! Paths are found by a [`PathBuilder`] from a bundle of trust anchors and
//! a bundle of intermediate certificates. A [`PathValidator`] then checks
//! a path following the algorithm of RFC 5280, section 6.1, including the
//! processing of certificate policies via a [`PolicyTree`] and of name
//! constraints.
//!
//! Finally, the [`AcValidator`] checks attribute certificates using the
//! paths of both their holder and their issuer.

pub use self::ac::{AcValidationConfig, AcValidationError, AcValidator};
pub use self::builder::{PathBuilder, PathBuildingError};
pub use self::policy::{PolicyNode, PolicyTree};
pub use self::validation::{
    PathValidationConfig, PathValidationResult, PathValidator,
    ValidationError,
};

use crate::x509::Certificate;

pub mod builder;
pub mod validation;

mod ac;
mod policy;
mod subtrees;


//------------ CertificationPath ---------------------------------------------

/// An ordered list of certificates from a trust anchor to a target.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CertificationPath {
    certificates: Vec<Certificate>,
}

impl CertificationPath {
    /// Creates a path from certificates ordered from anchor to target.
    pub fn new(certificates: Vec<Certificate>) -> Self {
        CertificationPath { certificates }
    }

    /// Returns the path with `cert` added as the new target.
    pub fn with_appended(mut self, cert: Certificate) -> Self {
        self.certificates.push(cert);
        self
    }

    pub fn trust_anchor(&self) -> Option<&Certificate> {
        self.certificates.first()
    }

    pub fn target(&self) -> Option<&Certificate> {
        self.certificates.last()
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Certificate> + '_ {
        self.certificates.iter()
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

impl From<Vec<Certificate>> for CertificationPath {
    fn from(certificates: Vec<Certificate>) -> Self {
        Self::new(certificates)
    }
}


//------------ CertificateBundle ---------------------------------------------

/// An unordered collection of certificates.
#[derive(Clone, Debug, Default)]
pub struct CertificateBundle {
    certificates: Vec<Certificate>,
}

impl CertificateBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a certificate unless it is already part of the bundle.
    pub fn push(&mut self, cert: Certificate) {
        if !self.contains(&cert) {
            self.certificates.push(cert)
        }
    }

    /// Returns whether the bundle contains `cert`.
    ///
    /// Certificates are the same if their signed content is.
    pub fn contains(&self, cert: &Certificate) -> bool {
        self.certificates.iter().any(|item| item.tbs_der() == cert.tbs_der())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Certificate> + '_ {
        self.certificates.iter()
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Returns the certificates that may have issued `cert`.
    pub fn issuers_of<'a>(
        &'a self, cert: &'a Certificate
    ) -> impl Iterator<Item = &'a Certificate> + 'a {
        self.certificates.iter().filter(move |item| may_have_issued(item, cert))
    }
}

impl FromIterator<Certificate> for CertificateBundle {
    fn from_iter<I: IntoIterator<Item = Certificate>>(iter: I) -> Self {
        let mut res = Self::new();
        iter.into_iter().for_each(|cert| res.push(cert));
        res
    }
}

impl From<Vec<Certificate>> for CertificateBundle {
    fn from(certificates: Vec<Certificate>) -> Self {
        certificates.into_iter().collect()
    }
}

/// Returns whether `issuer` may have issued `cert`.
///
/// The subject of the issuer must match the issuer of the certificate. If
/// the certificate has an authority key identifier and the issuer a
/// subject key identifier, they must be equal, too. Signatures are not
/// checked.
fn may_have_issued(issuer: &Certificate, cert: &Certificate) -> bool {
    if issuer.subject() != cert.issuer() {
        return false
    }
    let aki = cert.extensions().authority_key_identifier().and_then(|aki| {
        aki.key_identifier.as_ref()
    });
    match (aki, issuer.extensions().subject_key_identifier()) {
        (Some(aki), Some(ski)) => aki == ski,
        _ => true
    }
}


//============ Testing =======================================================

/// Helpers for creating certificates in tests.
#[cfg(all(test, feature = "ed25519"))]
pub(crate) mod testing {
    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use crate::int::Integer;
    use crate::x501::Name;
    use crate::x509::{
        AlgorithmIdentifier, AuthorityKeyIdentifier, BasicConstraints,
        Certificate, Ed25519Crypto, Extension, KeyIdentifier, KeyUsage,
        TbsCertificate, Time, Validity,
    };

    pub fn validity() -> Validity {
        Validity::new(
            Time::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            Time::new(Utc.with_ymd_and_hms(2060, 1, 1, 0, 0, 0).unwrap()),
        )
    }

    fn key_id(seed: u8) -> KeyIdentifier {
        KeyIdentifier::new(Bytes::copy_from_slice(&[seed; 20]))
    }

    /// Creates a certificate signed by the key derived from `issuer_seed`.
    pub fn make(
        subject: &str, seed: u8, issuer: &str, issuer_seed: u8,
        validity: Validity, extensions: Vec<Extension>,
    ) -> Certificate {
        let (_, public) = Ed25519Crypto::key_pair_from_seed(&[seed; 32]);
        let (private, _) = Ed25519Crypto::key_pair_from_seed(
            &[issuer_seed; 32]
        );
        let subject: Name = subject.parse().unwrap();
        let issuer: Name = issuer.parse().unwrap();
        let mut tbs = TbsCertificate::new(
            Integer::from(u32::from(seed)), issuer, validity, subject, public
        ).with_extension(
            Extension::new(false, key_id(seed))
        ).unwrap().with_extension(Extension::new(
            false,
            AuthorityKeyIdentifier::from_key_identifier(key_id(issuer_seed))
        )).unwrap();
        for ext in extensions {
            tbs.add_extension(ext).unwrap();
        }
        tbs.sign(
            &Ed25519Crypto::new(), &AlgorithmIdentifier::ed25519(), &private
        ).unwrap()
    }

    fn ca_extensions() -> Vec<Extension> {
        vec![
            Extension::new(true, BasicConstraints::ca(None)),
            Extension::new(true, KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN),
        ]
    }

    pub fn self_signed(subject: &str, seed: u8) -> Certificate {
        make(subject, seed, subject, seed, validity(), ca_extensions())
    }

    pub fn ca(
        subject: &str, seed: u8, issuer: &str, issuer_seed: u8
    ) -> Certificate {
        make(subject, seed, issuer, issuer_seed, validity(), ca_extensions())
    }

    pub fn ee(
        subject: &str, seed: u8, issuer: &str, issuer_seed: u8
    ) -> Certificate {
        make(
            subject, seed, issuer, issuer_seed, validity(),
            vec![Extension::new(true, KeyUsage::DIGITAL_SIGNATURE)]
        )
    }
}
