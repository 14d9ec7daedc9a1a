//! Attribute certificates.
//!
//! This is a private module. Its public items are re-exported by the parent.
//!
//! Attribute certificates as defined in RFC 5755 bind attributes to a
//! holder. They are issued by an attribute authority whose public key
//! certificate is used to verify the signature. Validation of attribute
//! certificates lives in [`crate::path`].

use bytes::Bytes;
use chrono::{DateTime, Timelike, Utc};
use crate::element::Element;
use crate::error::{Error, UnexpectedTypeError};
use crate::ident::Tag;
use crate::int::Integer;
use crate::string::BitString;
use crate::time::GeneralizedTime;
use crate::x501::{Attribute, Attributes};
use super::algorithm::{
    AlgorithmIdentifier, PrivateKeyInfo, PublicKeyInfo, Signature
};
use super::cert::Certificate;
use super::crypto::Crypto;
use super::ext::{Extension, Extensions};
use super::general_name::{GeneralName, GeneralNames};


//------------ AttributeCertificate ------------------------------------------

/// A signed attribute certificate.
///
/// ```text
/// AttributeCertificate ::= SEQUENCE {
///      acinfo               AttributeCertificateInfo,
///      signatureAlgorithm   AlgorithmIdentifier,
///      signatureValue       BIT STRING }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeCertificate {
    info: AttributeCertificateInfo,
    info_der: Bytes,
    signature_algorithm: AlgorithmIdentifier,
    signature: BitString,
}

impl AttributeCertificate {
    pub fn from_der(data: impl Into<Bytes>) -> Result<Self, Error> {
        Self::from_element(&Element::from_der(data)?)
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let info_element = fields.take()?;
        let info = AttributeCertificateInfo::from_element(info_element)?;
        let signature_algorithm = AlgorithmIdentifier::from_element(
            fields.take()?
        )?;
        let signature = fields.take()?.expect_bit_string()?.clone();
        fields.finish()?;
        Ok(AttributeCertificate {
            info,
            info_der: info_element.to_der(),
            signature_algorithm,
            signature,
        })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            self.info.to_element(),
            self.signature_algorithm.to_element(),
            Element::BitString(self.signature.clone()),
        ])
    }

    pub fn to_der(&self) -> Bytes {
        self.to_element().to_der()
    }

    pub fn info(&self) -> &AttributeCertificateInfo {
        &self.info
    }

    pub fn holder(&self) -> &Holder {
        &self.info.holder
    }

    pub fn issuer(&self) -> &AttCertIssuer {
        &self.info.issuer
    }

    pub fn serial_number(&self) -> &Integer {
        &self.info.serial_number
    }

    pub fn validity(&self) -> &AttCertValidityPeriod {
        &self.info.validity
    }

    pub fn attributes(&self) -> &Attributes {
        &self.info.attributes
    }

    pub fn extensions(&self) -> &Extensions {
        &self.info.extensions
    }

    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.signature_algorithm
    }

    pub fn signature_value(&self) -> Signature {
        Signature::new(self.signature.octet_bytes())
    }

    /// Verifies the signature with the public key of the issuer.
    pub fn verify_signature(
        &self, crypto: &dyn Crypto, key: &PublicKeyInfo
    ) -> Result<bool, Error> {
        if self.signature_algorithm != self.info.signature
            || self.signature.unused() != 0
        {
            return Ok(false)
        }
        Ok(crypto.verify(
            &self.info_der, &self.signature_value(), key,
            &self.signature_algorithm
        )?)
    }
}


//------------ AttributeCertificateInfo --------------------------------------

/// The signed content of an attribute certificate.
///
/// ```text
/// AttributeCertificateInfo ::= SEQUENCE {
///      version              AttCertVersion, -- version is v2
///      holder               Holder,
///      issuer               AttCertIssuer,
///      signature            AlgorithmIdentifier,
///      serialNumber         CertificateSerialNumber,
///      attrCertValidityPeriod   AttCertValidityPeriod,
///      attributes           SEQUENCE OF Attribute,
///      issuerUniqueID       UniqueIdentifier OPTIONAL,
///      extensions           Extensions OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeCertificateInfo {
    holder: Holder,
    issuer: AttCertIssuer,
    signature: AlgorithmIdentifier,
    serial_number: Integer,
    validity: AttCertValidityPeriod,
    attributes: Attributes,
    issuer_unique_id: Option<BitString>,
    extensions: Extensions,
}

impl AttributeCertificateInfo {
    /// The encoded value of the only supported version, v2.
    const VERSION: u32 = 1;

    pub fn new(
        holder: Holder,
        issuer: AttCertIssuer,
        serial_number: Integer,
        validity: AttCertValidityPeriod,
        attributes: Attributes,
    ) -> Self {
        AttributeCertificateInfo {
            holder,
            issuer,
            signature: AlgorithmIdentifier::ed25519(),
            serial_number,
            validity,
            attributes,
            issuer_unique_id: None,
            extensions: Extensions::new(),
        }
    }

    /// Signs the content and returns the attribute certificate.
    pub fn sign(
        mut self,
        crypto: &dyn Crypto,
        algorithm: &AlgorithmIdentifier,
        key: &PrivateKeyInfo,
    ) -> Result<AttributeCertificate, Error> {
        self.signature = algorithm.clone();
        let info_der = self.to_element().to_der();
        let signature = crypto.sign(&info_der, key, algorithm)?;
        Ok(AttributeCertificate {
            info: self,
            info_der,
            signature_algorithm: algorithm.clone(),
            signature: signature.to_bit_string(),
        })
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let version = fields.take()?.expect_integer()?.to_u32()?;
        if version != Self::VERSION {
            return Err(Error::invalid(format_args!(
                "unsupported attribute certificate version {}", version
            )))
        }
        let holder = Holder::from_element(fields.take()?)?;
        let issuer = AttCertIssuer::from_element(fields.take()?)?;
        let signature = AlgorithmIdentifier::from_element(fields.take()?)?;
        let serial_number = fields.take()?.expect_integer()?.clone();
        let validity = AttCertValidityPeriod::from_element(fields.take()?)?;
        let attributes = Attributes::from_element(fields.take()?)?;
        let issuer_unique_id = fields.take_opt_tag(&Tag::BIT_STRING).map(|item| {
            item.expect_bit_string().cloned()
        }).transpose()?;
        let extensions = match fields.take_opt_tag(&Tag::SEQUENCE) {
            Some(item) => Extensions::from_element(item)?,
            None => Extensions::new()
        };
        fields.finish()?;
        Ok(AttributeCertificateInfo {
            holder, issuer, signature, serial_number, validity, attributes,
            issuer_unique_id, extensions
        })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            [
                Element::Integer(Integer::from(Self::VERSION)),
                self.holder.to_element(),
                self.issuer.to_element(),
                self.signature.to_element(),
                Element::Integer(self.serial_number.clone()),
                self.validity.to_element(),
                self.attributes.to_sequence_element(),
            ].into_iter().chain(
                self.issuer_unique_id.clone().map(Element::BitString)
            ).chain(
                (!self.extensions.is_empty()).then(|| {
                    self.extensions.to_element()
                })
            )
        )
    }

    pub fn holder(&self) -> &Holder {
        &self.holder
    }

    pub fn issuer(&self) -> &AttCertIssuer {
        &self.issuer
    }

    pub fn signature(&self) -> &AlgorithmIdentifier {
        &self.signature
    }

    pub fn serial_number(&self) -> &Integer {
        &self.serial_number
    }

    pub fn validity(&self) -> &AttCertValidityPeriod {
        &self.validity
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Adds an attribute, keeping any existing ones of the same type.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes = std::mem::take(
            &mut self.attributes
        ).with_additional(attribute);
    }

    pub fn issuer_unique_id(&self) -> Option<&BitString> {
        self.issuer_unique_id.as_ref()
    }

    pub fn set_issuer_unique_id(&mut self, id: Option<BitString>) {
        self.issuer_unique_id = id
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Returns the value with `extension` added.
    ///
    /// Fails if an extension with the same OID is already present.
    pub fn with_extension(
        mut self, extension: Extension
    ) -> Result<Self, Error> {
        self.extensions = self.extensions.with_extension(extension)?;
        Ok(self)
    }
}


//------------ Holder --------------------------------------------------------

/// The holder of an attribute certificate.
///
/// ```text
/// Holder ::= SEQUENCE {
///      baseCertificateID   [0] IssuerSerial OPTIONAL,
///      entityName          [1] GeneralNames OPTIONAL,
///      objectDigestInfo    [2] ObjectDigestInfo OPTIONAL }
/// ```
///
/// The object digest info is kept as its element.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Holder {
    pub base_certificate_id: Option<IssuerSerial>,
    pub entity_name: Option<GeneralNames>,
    pub object_digest_info: Option<Element>,
}

impl Holder {
    /// Creates a holder referring to the public key certificate `cert`.
    pub fn from_certificate(cert: &Certificate) -> Self {
        Holder {
            base_certificate_id: Some(IssuerSerial::for_certificate(cert)),
            .. Default::default()
        }
    }

    /// Creates a holder identified by its names.
    pub fn from_entity_name(names: GeneralNames) -> Self {
        Holder { entity_name: Some(names), .. Default::default() }
    }

    /// Returns whether the holder refers to the certificate `cert`.
    ///
    /// If the base certificate ID is present, it has to identify the
    /// certificate. Otherwise the entity name must contain the subject of
    /// the certificate as a directory name.
    pub fn refers_to(&self, cert: &Certificate) -> bool {
        if let Some(ref id) = self.base_certificate_id {
            return id.identifies(cert)
        }
        match self.entity_name {
            Some(ref names) => {
                names.iter().any(|name| match *name {
                    GeneralName::DirectoryName(ref name) => {
                        name == cert.subject()
                    }
                    _ => false
                })
            }
            None => false
        }
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let base_certificate_id = fields.take_opt_implicit(
            0, Tag::SEQUENCE
        )?.map(|item| IssuerSerial::from_element(&item)).transpose()?;
        let entity_name = fields.take_opt_implicit(
            1, Tag::SEQUENCE
        )?.map(|item| GeneralNames::from_element(&item)).transpose()?;
        let object_digest_info = fields.take_opt_tag(&Tag::ctx(2)).cloned();
        fields.finish()?;
        if base_certificate_id.is_none() && entity_name.is_none()
            && object_digest_info.is_none()
        {
            return Err(Error::invalid("empty attribute certificate holder"))
        }
        Ok(Holder { base_certificate_id, entity_name, object_digest_info })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            self.base_certificate_id.as_ref().map(|id| {
                id.to_element().implicit(0)
            }).into_iter().chain(
                self.entity_name.as_ref().map(|names| {
                    names.to_element().implicit(1)
                })
            ).chain(self.object_digest_info.clone())
        )
    }
}


//------------ IssuerSerial --------------------------------------------------

/// A reference to a public key certificate via issuer and serial number.
///
/// ```text
/// IssuerSerial  ::=  SEQUENCE {
///      issuer         GeneralNames,
///      serial         CertificateSerialNumber,
///      issuerUID      UniqueIdentifier OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssuerSerial {
    pub issuer: GeneralNames,
    pub serial: Integer,
    pub issuer_uid: Option<BitString>,
}

impl IssuerSerial {
    /// Creates the reference to `cert`.
    pub fn for_certificate(cert: &Certificate) -> Self {
        IssuerSerial {
            issuer: GeneralNames::single(
                GeneralName::DirectoryName(cert.issuer().clone())
            ),
            serial: cert.serial_number().clone(),
            issuer_uid: cert.tbs().issuer_unique_id().cloned(),
        }
    }

    /// Returns whether the reference identifies `cert`.
    pub fn identifies(&self, cert: &Certificate) -> bool {
        self.issuer.directory_name() == Some(cert.issuer())
            && self.serial == *cert.serial_number()
            && match self.issuer_uid {
                Some(ref uid) => cert.tbs().issuer_unique_id() == Some(uid),
                None => true
            }
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let issuer = GeneralNames::from_element(fields.take()?)?;
        let serial = fields.take()?.expect_integer()?.clone();
        let issuer_uid = fields.take_opt_tag(&Tag::BIT_STRING).map(|item| {
            item.expect_bit_string().cloned()
        }).transpose()?;
        fields.finish()?;
        Ok(IssuerSerial { issuer, serial, issuer_uid })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            [
                self.issuer.to_element(),
                Element::Integer(self.serial.clone()),
            ].into_iter().chain(self.issuer_uid.clone().map(Element::BitString))
        )
    }
}


//------------ AttCertIssuer -------------------------------------------------

/// The issuer of an attribute certificate.
///
/// ```text
/// AttCertIssuer ::= CHOICE {
///      v1Form   GeneralNames,  -- MUST NOT be used in this profile
///      v2Form   [0] V2Form     -- v2 only }
///
/// V2Form ::= SEQUENCE {
///      issuerName            GeneralNames  OPTIONAL,
///      baseCertificateID     [0] IssuerSerial  OPTIONAL,
///      objectDigestInfo      [1] ObjectDigestInfo  OPTIONAL }
/// ```
///
/// The v1 form is accepted when decoding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttCertIssuer {
    V1Form(GeneralNames),
    V2Form(V2Form),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct V2Form {
    pub issuer_name: Option<GeneralNames>,
    pub base_certificate_id: Option<IssuerSerial>,
    pub object_digest_info: Option<Element>,
}

impl AttCertIssuer {
    /// Creates a v2 form issuer containing only the issuer name.
    pub fn from_issuer_name(names: GeneralNames) -> Self {
        AttCertIssuer::V2Form(V2Form {
            issuer_name: Some(names), .. Default::default()
        })
    }

    /// Returns the issuer names.
    pub fn issuer_name(&self) -> Option<&GeneralNames> {
        match *self {
            AttCertIssuer::V1Form(ref names) => Some(names),
            AttCertIssuer::V2Form(ref form) => form.issuer_name.as_ref(),
        }
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        if element.is_ctx(0) {
            let inner = element.expect_implicit(0, Tag::SEQUENCE)?;
            let mut fields = inner.expect_sequence()?.fields();
            let issuer_name = fields.take_opt_tag(&Tag::SEQUENCE).map(
                GeneralNames::from_element
            ).transpose()?;
            let base_certificate_id = fields.take_opt_implicit(
                0, Tag::SEQUENCE
            )?.map(|item| IssuerSerial::from_element(&item)).transpose()?;
            let object_digest_info = fields.take_opt_tag(
                &Tag::ctx(1)
            ).cloned();
            fields.finish()?;
            Ok(AttCertIssuer::V2Form(V2Form {
                issuer_name, base_certificate_id, object_digest_info
            }))
        }
        else if element.tag() == Tag::SEQUENCE {
            GeneralNames::from_element(element).map(AttCertIssuer::V1Form)
        }
        else {
            Err(UnexpectedTypeError::new(
                "AttCertIssuer", element.tag()
            ).into())
        }
    }

    pub fn to_element(&self) -> Element {
        match *self {
            AttCertIssuer::V1Form(ref names) => names.to_element(),
            AttCertIssuer::V2Form(ref form) => {
                Element::sequence(
                    form.issuer_name.as_ref().map(
                        GeneralNames::to_element
                    ).into_iter().chain(
                        form.base_certificate_id.as_ref().map(|id| {
                            id.to_element().implicit(0)
                        })
                    ).chain(form.object_digest_info.clone())
                ).implicit(0)
            }
        }
    }
}


//------------ AttCertValidityPeriod -----------------------------------------

/// The validity period of an attribute certificate.
///
/// ```text
/// AttCertValidityPeriod  ::= SEQUENCE {
///      notBeforeTime  GeneralizedTime,
///      notAfterTime   GeneralizedTime }
/// ```
///
/// Both ends are included. Times are kept with a resolution of one second.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AttCertValidityPeriod {
    not_before: GeneralizedTime,
    not_after: GeneralizedTime,
}

impl AttCertValidityPeriod {
    pub fn new(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        AttCertValidityPeriod {
            not_before: Self::truncated(not_before),
            not_after: Self::truncated(not_after),
        }
    }

    fn truncated(time: DateTime<Utc>) -> GeneralizedTime {
        GeneralizedTime::new(time.with_nanosecond(0).unwrap_or(time))
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before.to_datetime()
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after.to_datetime()
    }

    /// Returns whether `time` is within the period.
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.not_before() <= time && time <= self.not_after()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let not_before = fields.take()?.expect_generalized_time()?;
        let not_after = fields.take()?.expect_generalized_time()?;
        fields.finish()?;
        Ok(AttCertValidityPeriod { not_before, not_after })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            Element::GeneralizedTime(self.not_before),
            Element::GeneralizedTime(self.not_after),
        ])
    }
}


//------------ RoleSyntax ----------------------------------------------------

/// The value of the role attribute.
///
/// ```text
/// RoleSyntax ::= SEQUENCE {
///      roleAuthority  [0] GeneralNames OPTIONAL,
///      roleName       [1] GeneralName }
/// ```
///
/// Since GeneralName is a CHOICE, the role name is explicitly tagged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleSyntax {
    pub role_authority: Option<GeneralNames>,
    pub role_name: GeneralName,
}

impl RoleSyntax {
    pub fn new(role_name: GeneralName) -> Self {
        RoleSyntax { role_authority: None, role_name }
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let role_authority = fields.take_opt_implicit(
            0, Tag::SEQUENCE
        )?.map(|item| GeneralNames::from_element(&item)).transpose()?;
        let role_name = GeneralName::from_element(
            &fields.take()?.expect_explicit(1)?
        )?;
        fields.finish()?;
        Ok(RoleSyntax { role_authority, role_name })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            self.role_authority.as_ref().map(|names| {
                names.to_element().implicit(0)
            }).into_iter().chain(Some(self.role_name.to_element().explicit(1)))
        )
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use chrono::TimeZone;
    use crate::x501::{AttributeValue, oid as attr_oid};
    use crate::x509::TargetInformation;
    use super::*;

    fn validity() -> AttCertValidityPeriod {
        AttCertValidityPeriod::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2034, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn info() -> AttributeCertificateInfo {
        let role = RoleSyntax::new(GeneralName::uri("urn:role:admin").unwrap());
        AttributeCertificateInfo::new(
            Holder::from_entity_name(GeneralNames::single(
                GeneralName::DirectoryName("cn=Holder".parse().unwrap())
            )),
            AttCertIssuer::from_issuer_name(GeneralNames::single(
                GeneralName::DirectoryName("cn=AA".parse().unwrap())
            )),
            Integer::from(42u32),
            validity(),
            Attributes::new().with_additional(
                Attribute::new(
                    attr_oid::AT_ROLE.to_bytes_oid(),
                    vec![AttributeValue::Role(role)]
                ).unwrap()
            ),
        )
    }

    #[test]
    fn info_encoding() {
        let info = info().with_extension(Extension::new(
            true, TargetInformation::default()
        )).unwrap();
        let decoded = AttributeCertificateInfo::from_element(
            &Element::from_der(info.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, info);
        assert_eq!(
            decoded.issuer().issuer_name().unwrap().directory_name(),
            Some(&"cn=AA".parse().unwrap())
        );
        assert!(decoded.extensions().target_information().is_some());
    }

    #[test]
    fn role_syntax() {
        let role = RoleSyntax {
            role_authority: Some(GeneralNames::single(
                GeneralName::dns("example.com").unwrap()
            )),
            role_name: GeneralName::uri("urn:role:admin").unwrap(),
        };
        let der = role.to_element().to_der();
        assert_eq!(&der[..4], b"\x30\x21\xa0\x0d");
        assert_eq!(
            RoleSyntax::from_element(&Element::from_der(der).unwrap()).unwrap(),
            role
        );
    }

    #[test]
    fn validity_period() {
        let period = validity();
        assert!(period.contains(
            Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap()
        ));
        assert!(!period.contains(
            Utc.with_ymd_and_hms(2035, 1, 1, 0, 0, 0).unwrap()
        ));
        assert_eq!(
            period.to_element().to_der().as_ref(),
            &b"\x30\x22\x18\x0f20240101000000Z\x18\x0f20340101000000Z"[..]
        );
    }

    #[test]
    fn wrong_version() {
        let element = info().to_element();
        let element = Element::Sequence(
            element.expect_sequence().unwrap().clone().with_replaced(
                0, Element::Integer(Integer::from(0u32))
            ).unwrap()
        );
        assert!(AttributeCertificateInfo::from_element(&element).is_err());
    }
}
