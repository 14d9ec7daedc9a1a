//! Validating attribute certificates.
//!
//! This is a private module. Its public items are re-exported by the parent.

use chrono::{DateTime, Utc};
use log::{info, trace, warn};
use crate::error::Error;
use crate::oid::Oid;
use crate::x509::{
    AttributeCertificate, Crypto, CryptoError, GeneralName, KeyUsage,
};
use super::CertificationPath;
use super::validation::{
    PathValidationConfig, PathValidationResult, PathValidator,
    ValidationError,
};


//------------ AcValidationConfig --------------------------------------------

/// The inputs for validating an attribute certificate.
#[derive(Clone, Debug)]
pub struct AcValidationConfig {
    /// The path to the public key certificate of the holder.
    holder_path: CertificationPath,

    /// The path to the certificate of the attribute authority.
    issuer_path: CertificationPath,

    time: Option<DateTime<Utc>>,

    /// The names under which the validating party acts as a target.
    targets: Vec<GeneralName>,

    path_config: PathValidationConfig,
}

impl AcValidationConfig {
    pub fn new(
        holder_path: CertificationPath, issuer_path: CertificationPath
    ) -> Self {
        AcValidationConfig {
            holder_path, issuer_path,
            time: None,
            targets: Vec::new(),
            path_config: PathValidationConfig::default(),
        }
    }

    pub fn holder_path(&self) -> &CertificationPath {
        &self.holder_path
    }

    pub fn issuer_path(&self) -> &CertificationPath {
        &self.issuer_path
    }

    /// Returns the time to validate at.
    ///
    /// If no time was set, this is the current time.
    pub fn time(&self) -> DateTime<Utc> {
        self.time.unwrap_or_else(Utc::now)
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn targets(&self) -> &[GeneralName] {
        &self.targets
    }

    /// Adds a name the attribute certificate may be targeted at.
    pub fn with_target(mut self, target: GeneralName) -> Self {
        self.targets.push(target);
        self
    }

    /// Sets the configuration for validating both paths.
    ///
    /// The time of the path configuration is replaced with the time of
    /// this configuration.
    pub fn with_path_config(mut self, config: PathValidationConfig) -> Self {
        self.path_config = config;
        self
    }
}


//------------ AcValidator ---------------------------------------------------

/// Validates an attribute certificate.
///
/// The validator checks that
///
/// * the holder’s certification path is valid and its target is the
///   certificate the holder field refers to,
/// * the issuer’s certification path is valid and its target is the
///   attribute authority named as issuer,
/// * the attribute authority isn’t a CA and may create signatures,
/// * the signature and validity period are correct,
/// * the validating party is targeted if the certificate is targeted, and
/// * there are no unknown critical extensions.
pub struct AcValidator<'a> {
    crypto: &'a dyn Crypto,
    cert: &'a AttributeCertificate,
    config: AcValidationConfig,
}

impl<'a> AcValidator<'a> {
    pub fn new(
        crypto: &'a dyn Crypto,
        cert: &'a AttributeCertificate,
        config: AcValidationConfig,
    ) -> Self {
        AcValidator { crypto, cert, config }
    }

    /// Validates the attribute certificate.
    ///
    /// Returns the validation result of the issuer path on success.
    pub fn validate(&self) -> Result<PathValidationResult, AcValidationError> {
        match self.process() {
            Ok(res) => {
                info!(
                    "validated attribute certificate {} issued by {}",
                    self.cert.serial_number(), res.certificate().subject()
                );
                Ok(res)
            }
            Err(err) => {
                warn!("attribute certificate validation failed: {}", err);
                Err(err)
            }
        }
    }

    fn process(&self) -> Result<PathValidationResult, AcValidationError> {
        let time = self.config.time();
        let path_config = self.config.path_config.clone().with_time(time);

        trace!("validating holder path");
        let holder = PathValidator::new(
            self.crypto, &self.config.holder_path, path_config.clone()
        ).validate().map_err(AcValidationError::HolderPath)?;
        if !self.cert.holder().refers_to(holder.certificate()) {
            return Err(AcValidationError::HolderMismatch)
        }

        trace!("validating issuer path");
        let issuer = PathValidator::new(
            self.crypto, &self.config.issuer_path, path_config
        ).validate().map_err(AcValidationError::IssuerPath)?;
        let aa = issuer.certificate();
        let named = self.cert.issuer().issuer_name().and_then(|names| {
            names.directory_name()
        });
        if named != Some(aa.subject()) {
            return Err(AcValidationError::IssuerMismatch)
        }
        if aa.is_ca() {
            return Err(AcValidationError::InvalidIssuer(
                "attribute authority is a CA".into()
            ))
        }
        if let Some(usage) = aa.extensions().key_usage() {
            if !usage.contains(KeyUsage::DIGITAL_SIGNATURE) {
                return Err(AcValidationError::InvalidIssuer(
                    "digitalSignature not set in key usage".into()
                ))
            }
        }

        trace!("verifying attribute certificate signature");
        match self.cert.verify_signature(self.crypto, issuer.public_key_info()) {
            Ok(true) => { }
            Ok(false) => return Err(AcValidationError::SignatureVerification),
            Err(Error::Crypto(err)) => return Err(err.into()),
            Err(_) => return Err(AcValidationError::SignatureVerification),
        }
        if !self.cert.validity().contains(time) {
            return Err(AcValidationError::ExpiredOrNotYetValid)
        }

        if let Some(targets) = self.cert.extensions().target_information() {
            if !self.config.targets.iter().any(|name| {
                targets.names_target(name)
            }) {
                return Err(AcValidationError::NotTargeted)
            }
        }
        if let Some(ext) = self.cert.extensions().unknown_critical().next() {
            return Err(AcValidationError::UnknownCriticalExtension(ext.id()))
        }
        Ok(issuer)
    }
}


//------------ AcValidationError ---------------------------------------------

/// An attribute certificate failed validation.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum AcValidationError {
    #[error("invalid holder path: {0}")]
    HolderPath(ValidationError),

    #[error("invalid issuer path: {0}")]
    IssuerPath(ValidationError),

    #[error("holder doesn’t refer to the target of the holder path")]
    HolderMismatch,

    #[error("issuer doesn’t name the target of the issuer path")]
    IssuerMismatch,

    #[error("invalid attribute authority: {0}")]
    InvalidIssuer(String),

    #[error("invalid attribute certificate signature")]
    SignatureVerification,

    #[error("attribute certificate is expired or not yet valid")]
    ExpiredOrNotYetValid,

    #[error("attribute certificate isn’t targeted at us")]
    NotTargeted,

    #[error("unknown critical extension {0}")]
    UnknownCriticalExtension(Oid),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}


//============ Tests =========================================================

#[cfg(all(test, feature = "ed25519"))]
mod test {
    use chrono::TimeZone;
    use crate::int::Integer;
    use crate::x501::Attributes;
    use crate::x509::{
        AlgorithmIdentifier, AttCertIssuer, AttCertValidityPeriod,
        AttributeCertificateInfo, Ed25519Crypto, Extension, GeneralNames,
        Holder, Target, TargetInformation,
    };
    use crate::path::testing::{ca, ee, self_signed};
    use super::*;

    fn period(from: i32, to: i32) -> AttCertValidityPeriod {
        AttCertValidityPeriod::new(
            Utc.with_ymd_and_hms(from, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(to, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    struct Setup {
        root: crate::x509::Certificate,
        holder: crate::x509::Certificate,
        aa: crate::x509::Certificate,
    }

    impl Setup {
        fn new() -> Self {
            Setup {
                root: self_signed("cn=Root", 1),
                holder: ee("cn=Holder", 2, "cn=Root", 1),
                aa: ee("cn=AA", 3, "cn=Root", 1),
            }
        }

        fn config(&self) -> AcValidationConfig {
            AcValidationConfig::new(
                vec![self.root.clone(), self.holder.clone()].into(),
                vec![self.root.clone(), self.aa.clone()].into(),
            ).with_time(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
        }

        fn info(&self) -> AttributeCertificateInfo {
            AttributeCertificateInfo::new(
                Holder::from_certificate(&self.holder),
                AttCertIssuer::from_issuer_name(GeneralNames::single(
                    GeneralName::DirectoryName(self.aa.subject().clone())
                )),
                Integer::from(7u32),
                period(2024, 2034),
                Attributes::new(),
            )
        }
    }

    fn sign(info: AttributeCertificateInfo, seed: u8) -> AttributeCertificate {
        let (key, _) = Ed25519Crypto::key_pair_from_seed(&[seed; 32]);
        info.sign(
            &Ed25519Crypto::new(), &AlgorithmIdentifier::ed25519(), &key
        ).unwrap()
    }

    fn validate(
        cert: &AttributeCertificate, config: AcValidationConfig
    ) -> Result<PathValidationResult, AcValidationError> {
        AcValidator::new(&Ed25519Crypto::new(), cert, config).validate()
    }

    #[test]
    fn valid() {
        let setup = Setup::new();
        let cert = sign(setup.info(), 3);
        let res = validate(&cert, setup.config()).unwrap();
        assert_eq!(res.certificate(), &setup.aa);
    }

    #[test]
    fn failures() {
        let setup = Setup::new();

        assert_eq!(
            validate(&sign(setup.info(), 4), setup.config()).unwrap_err(),
            AcValidationError::SignatureVerification
        );

        let base = setup.info();
        let info = AttributeCertificateInfo::new(
            Holder::from_certificate(&setup.aa),
            base.issuer().clone(), Integer::from(7u32),
            *base.validity(), Attributes::new(),
        );
        assert_eq!(
            validate(&sign(info, 3), setup.config()).unwrap_err(),
            AcValidationError::HolderMismatch
        );

        let info = AttributeCertificateInfo::new(
            Holder::from_certificate(&setup.holder),
            AttCertIssuer::from_issuer_name(GeneralNames::single(
                GeneralName::DirectoryName("cn=Other".parse().unwrap())
            )),
            Integer::from(7u32), period(2024, 2034), Attributes::new(),
        );
        assert_eq!(
            validate(&sign(info, 3), setup.config()).unwrap_err(),
            AcValidationError::IssuerMismatch
        );

        let info = AttributeCertificateInfo::new(
            base.holder().clone(), base.issuer().clone(), Integer::from(7u32),
            period(2030, 2034), Attributes::new(),
        );
        assert_eq!(
            validate(&sign(info, 3), setup.config()).unwrap_err(),
            AcValidationError::ExpiredOrNotYetValid
        );

        let cert = sign(setup.info(), 3);
        let config = AcValidationConfig::new(
            vec![setup.root.clone(), setup.holder.clone()].into(),
            vec![setup.root.clone(), ca("cn=AA", 3, "cn=Root", 1)].into(),
        ).with_time(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert!(matches!(
            validate(&cert, config).unwrap_err(),
            AcValidationError::InvalidIssuer(_)
        ));

        let config = AcValidationConfig::new(
            vec![setup.root.clone(), ee("cn=Holder", 2, "cn=Else", 9)].into(),
            vec![setup.root.clone(), setup.aa.clone()].into(),
        );
        assert!(matches!(
            validate(&cert, config).unwrap_err(),
            AcValidationError::HolderPath(_)
        ));
    }

    #[test]
    fn targeting() {
        let setup = Setup::new();
        let server = GeneralName::dns("server.example").unwrap();
        let info = setup.info().with_extension(Extension::new(
            true, TargetInformation::new(vec![Target::Name(server.clone())])
        )).unwrap();
        let cert = sign(info, 3);
        assert_eq!(
            validate(&cert, setup.config()).unwrap_err(),
            AcValidationError::NotTargeted
        );
        assert!(validate(&cert, setup.config().with_target(server)).is_ok());
    }
}
