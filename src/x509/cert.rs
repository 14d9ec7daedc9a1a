//! Public key certificates.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::element::Element;
use crate::error::Error;
use crate::ident::Tag;
use crate::int::Integer;
use crate::string::BitString;
use crate::x501::Name;
use super::algorithm::{
    AlgorithmIdentifier, PrivateKeyInfo, PublicKeyInfo, Signature
};
use super::crypto::Crypto;
use super::ext::{Extension, Extensions};
use super::time::Validity;


//------------ TbsCertificate ------------------------------------------------

/// The signed content of a certificate.
///
/// ```text
/// TBSCertificate  ::=  SEQUENCE  {
///      version         [0]  EXPLICIT Version DEFAULT v1,
///      serialNumber         CertificateSerialNumber,
///      signature            AlgorithmIdentifier,
///      issuer               Name,
///      validity             Validity,
///      subject              Name,
///      subjectPublicKeyInfo SubjectPublicKeyInfo,
///      issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
///      subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
///      extensions      [3]  EXPLICIT Extensions OPTIONAL }
/// ```
///
/// The version isn’t stored but derived from the content: a certificate
/// with extensions is a v3 certificate, one with unique identifiers but
/// no extensions is v2, and everything else is v1.
///
/// A value can be built via [`new`][Self::new] and the `set_*` methods
/// and then turned into a [`Certificate`] via [`sign`][Self::sign].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TbsCertificate {
    serial_number: Integer,
    signature: AlgorithmIdentifier,
    issuer: Name,
    validity: Validity,
    subject: Name,
    subject_public_key_info: PublicKeyInfo,
    issuer_unique_id: Option<BitString>,
    subject_unique_id: Option<BitString>,
    extensions: Extensions,
}

/// # Creation and Conversion
///
impl TbsCertificate {
    /// Creates a new value without unique identifiers and extensions.
    ///
    /// The signature algorithm is left as Ed25519 until the value is
    /// signed.
    pub fn new(
        serial_number: Integer,
        issuer: Name,
        validity: Validity,
        subject: Name,
        subject_public_key_info: PublicKeyInfo,
    ) -> Self {
        TbsCertificate {
            serial_number,
            signature: AlgorithmIdentifier::ed25519(),
            issuer,
            validity,
            subject,
            subject_public_key_info,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Extensions::new(),
        }
    }

    /// Signs the value and returns the certificate.
    ///
    /// The signature algorithm of the value is replaced with `algorithm`
    /// before signing.
    pub fn sign(
        mut self,
        crypto: &dyn Crypto,
        algorithm: &AlgorithmIdentifier,
        key: &PrivateKeyInfo,
    ) -> Result<Certificate, Error> {
        self.signature = algorithm.clone();
        let tbs_der = self.to_element().to_der();
        let signature = crypto.sign(&tbs_der, key, algorithm)?;
        Ok(Certificate {
            tbs: self,
            tbs_der,
            signature_algorithm: algorithm.clone(),
            signature: signature.to_bit_string(),
        })
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let version = match fields.take_opt_explicit(0)? {
            Some(item) => item.expect_integer()?.to_u32()?,
            None => 0
        };
        if version > 2 {
            return Err(Error::invalid(format_args!(
                "unknown certificate version {}", version
            )))
        }
        let serial_number = fields.take()?.expect_integer()?.clone();
        let signature = AlgorithmIdentifier::from_element(fields.take()?)?;
        let issuer = Name::from_element(fields.take()?)?;
        let validity = Validity::from_element(fields.take()?)?;
        let subject = Name::from_element(fields.take()?)?;
        let subject_public_key_info = PublicKeyInfo::from_element(
            fields.take()?
        )?;
        let issuer_unique_id = fields.take_opt_implicit(
            1, Tag::BIT_STRING
        )?.map(|item| item.expect_bit_string().cloned()).transpose()?;
        let subject_unique_id = fields.take_opt_implicit(
            2, Tag::BIT_STRING
        )?.map(|item| item.expect_bit_string().cloned()).transpose()?;
        let extensions = fields.take_opt_explicit(3)?;
        fields.finish()?;

        if version < 1
            && (issuer_unique_id.is_some() || subject_unique_id.is_some())
        {
            return Err(Error::invalid("unique identifiers in v1 certificate"))
        }
        let extensions = match extensions {
            Some(item) => {
                if version < 2 {
                    return Err(Error::invalid(
                        "extensions in certificate before v3"
                    ))
                }
                Extensions::from_element(&item)?
            }
            None => Extensions::new()
        };

        Ok(TbsCertificate {
            serial_number, signature, issuer, validity, subject,
            subject_public_key_info, issuer_unique_id, subject_unique_id,
            extensions
        })
    }

    pub fn to_element(&self) -> Element {
        let version = self.version();
        Element::sequence(
            (version > 0).then(|| {
                Element::Integer(Integer::from(version)).explicit(0)
            }).into_iter().chain([
                Element::Integer(self.serial_number.clone()),
                self.signature.to_element(),
                self.issuer.to_element(),
                self.validity.to_element(),
                self.subject.to_element(),
                self.subject_public_key_info.to_element(),
            ]).chain(
                self.issuer_unique_id.clone().map(|id| {
                    Element::BitString(id).implicit(1)
                })
            ).chain(
                self.subject_unique_id.clone().map(|id| {
                    Element::BitString(id).implicit(2)
                })
            ).chain(
                (!self.extensions.is_empty()).then(|| {
                    self.extensions.to_element().explicit(3)
                })
            )
        )
    }
}

/// # Data Access
///
impl TbsCertificate {
    /// Returns the version: 0 for v1, 1 for v2, or 2 for v3.
    pub fn version(&self) -> u32 {
        if !self.extensions.is_empty() {
            2
        }
        else if self.issuer_unique_id.is_some()
            || self.subject_unique_id.is_some()
        {
            1
        }
        else {
            0
        }
    }

    pub fn serial_number(&self) -> &Integer {
        &self.serial_number
    }

    pub fn set_serial_number(&mut self, serial_number: Integer) {
        self.serial_number = serial_number
    }

    /// Returns the signature algorithm inside the signed content.
    pub fn signature(&self) -> &AlgorithmIdentifier {
        &self.signature
    }

    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    pub fn set_issuer(&mut self, issuer: Name) {
        self.issuer = issuer
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    pub fn set_validity(&mut self, validity: Validity) {
        self.validity = validity
    }

    pub fn subject(&self) -> &Name {
        &self.subject
    }

    pub fn set_subject(&mut self, subject: Name) {
        self.subject = subject
    }

    pub fn subject_public_key_info(&self) -> &PublicKeyInfo {
        &self.subject_public_key_info
    }

    pub fn set_subject_public_key_info(&mut self, info: PublicKeyInfo) {
        self.subject_public_key_info = info
    }

    pub fn issuer_unique_id(&self) -> Option<&BitString> {
        self.issuer_unique_id.as_ref()
    }

    pub fn set_issuer_unique_id(&mut self, id: Option<BitString>) {
        self.issuer_unique_id = id
    }

    pub fn subject_unique_id(&self) -> Option<&BitString> {
        self.subject_unique_id.as_ref()
    }

    pub fn set_subject_unique_id(&mut self, id: Option<BitString>) {
        self.subject_unique_id = id
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn set_extensions(&mut self, extensions: Extensions) {
        self.extensions = extensions
    }

    /// Adds an extension.
    ///
    /// Fails if an extension with the same OID is already present.
    pub fn add_extension(&mut self, extension: Extension) -> Result<(), Error> {
        self.extensions = std::mem::take(
            &mut self.extensions
        ).with_extension(extension)?;
        Ok(())
    }

    /// Returns the value with `extension` added.
    pub fn with_extension(
        mut self, extension: Extension
    ) -> Result<Self, Error> {
        self.add_extension(extension)?;
        Ok(self)
    }
}


//------------ Certificate ---------------------------------------------------

/// A signed public key certificate.
///
/// ```text
/// Certificate  ::=  SEQUENCE  {
///      tbsCertificate       TBSCertificate,
///      signatureAlgorithm   AlgorithmIdentifier,
///      signatureValue       BIT STRING  }
/// ```
///
/// Besides the decoded content, the certificate keeps the DER encoding of
/// the signed content for verifying the signature. Since decoding from
/// DER rejects non-canonical data, this encoding is identical to the
/// signed octets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Certificate {
    tbs: TbsCertificate,
    tbs_der: Bytes,
    signature_algorithm: AlgorithmIdentifier,
    signature: BitString,
}

impl Certificate {
    /// Decodes a DER-encoded certificate.
    pub fn from_der(data: impl Into<Bytes>) -> Result<Self, Error> {
        Self::from_element(&Element::from_der(data)?)
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let tbs_element = fields.take()?;
        let tbs = TbsCertificate::from_element(tbs_element)?;
        let signature_algorithm = AlgorithmIdentifier::from_element(
            fields.take()?
        )?;
        let signature = fields.take()?.expect_bit_string()?.clone();
        fields.finish()?;
        Ok(Certificate {
            tbs,
            tbs_der: tbs_element.to_der(),
            signature_algorithm,
            signature,
        })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            self.tbs.to_element(),
            self.signature_algorithm.to_element(),
            Element::BitString(self.signature.clone()),
        ])
    }

    pub fn to_der(&self) -> Bytes {
        self.to_element().to_der()
    }

    pub fn tbs(&self) -> &TbsCertificate {
        &self.tbs
    }

    /// Returns the DER encoding of the signed content.
    pub fn tbs_der(&self) -> &Bytes {
        &self.tbs_der
    }

    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.signature_algorithm
    }

    pub fn signature_value(&self) -> Signature {
        Signature::new(self.signature.octet_bytes())
    }

    pub fn serial_number(&self) -> &Integer {
        self.tbs.serial_number()
    }

    pub fn issuer(&self) -> &Name {
        self.tbs.issuer()
    }

    pub fn subject(&self) -> &Name {
        self.tbs.subject()
    }

    pub fn validity(&self) -> &Validity {
        self.tbs.validity()
    }

    pub fn subject_public_key_info(&self) -> &PublicKeyInfo {
        self.tbs.subject_public_key_info()
    }

    pub fn extensions(&self) -> &Extensions {
        self.tbs.extensions()
    }

    /// Returns whether the certificate is for a CA.
    ///
    /// This is the case if the basic constraints extension is present with
    /// the cA flag set.
    pub fn is_ca(&self) -> bool {
        self.extensions().basic_constraints().map(|bc| bc.ca).unwrap_or(false)
    }

    /// Returns whether issuer and subject are the same name.
    pub fn is_self_issued(&self) -> bool {
        self.issuer() == self.subject()
    }

    /// Verifies the signature with the given public key.
    ///
    /// Returns `Ok(false)` if the signature is wrong or the two signature
    /// algorithms of the certificate differ.
    pub fn verify_signature(
        &self, crypto: &dyn Crypto, key: &PublicKeyInfo
    ) -> Result<bool, Error> {
        if self.signature_algorithm != *self.tbs.signature() {
            return Ok(false)
        }
        if self.signature.unused() != 0 {
            return Ok(false)
        }
        Ok(crypto.verify(
            &self.tbs_der, &self.signature_value(), key,
            &self.signature_algorithm
        )?)
    }

    /// Returns whether the certificate is self-issued and signed by its
    /// own key.
    ///
    /// Errors during verification count as a wrong signature.
    pub fn is_self_signed(&self, crypto: &dyn Crypto) -> bool {
        self.is_self_issued()
            && self.verify_signature(
                crypto, self.subject_public_key_info()
            ).unwrap_or(false)
    }
}


//============ Tests =========================================================

#[cfg(all(test, feature = "ed25519"))]
mod test {
    use crate::x509::{BasicConstraints, Ed25519Crypto, KeyUsage, oid};
    use crate::x509::time::Time;
    use chrono::{TimeZone, Utc};
    use super::*;

    fn validity() -> Validity {
        Validity::new(
            Time::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            Time::new(Utc.with_ymd_and_hms(2060, 1, 1, 0, 0, 0).unwrap()),
        )
    }

    #[test]
    fn sign_and_decode() {
        let crypto = Ed25519Crypto::new();
        let (private, public) = Ed25519Crypto::key_pair_from_seed(&[1; 32]);
        let name: Name = "cn=Root,o=Example,c=DE".parse().unwrap();
        let tbs = TbsCertificate::new(
            Integer::from(1u32), name.clone(), validity(), name, public
        ).with_extension(
            Extension::new(true, BasicConstraints::ca(None))
        ).unwrap().with_extension(
            Extension::new(true, KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN)
        ).unwrap();
        assert_eq!(tbs.version(), 2);
        let cert = tbs.sign(
            &crypto, &AlgorithmIdentifier::ed25519(), &private
        ).unwrap();
        assert!(cert.is_self_signed(&crypto));
        assert!(cert.is_ca());

        let decoded = Certificate::from_der(cert.to_der()).unwrap();
        assert_eq!(decoded, cert);
        assert_eq!(decoded.to_der(), cert.to_der());
        assert!(decoded.is_self_signed(&crypto));
        assert_eq!(
            decoded.extensions().key_usage(),
            Some(&(KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN))
        );
        assert!(decoded.extensions().is_critical(&oid::CE_BASIC_CONSTRAINTS));
    }

    #[test]
    fn versions() {
        let (_, public) = Ed25519Crypto::key_pair_from_seed(&[1; 32]);
        let name: Name = "cn=Test".parse().unwrap();
        let mut tbs = TbsCertificate::new(
            Integer::from(7u32), name.clone(), validity(), name, public
        );
        assert_eq!(tbs.version(), 0);
        let der = tbs.to_element().to_der();
        assert_eq!(&der[2..5], b"\x02\x01\x07");

        tbs.set_subject_unique_id(Some(BitString::from_octets(
            Bytes::from_static(b"\x01")
        )));
        assert_eq!(tbs.version(), 1);
        let element = Element::from_der(tbs.to_element().to_der()).unwrap();
        assert_eq!(
            element.expect_sequence().unwrap().at(0).unwrap().to_der().as_ref(),
            b"\xa0\x03\x02\x01\x01"
        );
        let decoded = TbsCertificate::from_element(&element).unwrap();
        assert_eq!(decoded, tbs);
        assert_eq!(decoded.version(), 1);
    }

    #[test]
    fn tampered_signature() {
        let crypto = Ed25519Crypto::new();
        let (private, public) = Ed25519Crypto::key_pair_from_seed(&[1; 32]);
        let (_, other) = Ed25519Crypto::key_pair_from_seed(&[2; 32]);
        let name: Name = "cn=Test".parse().unwrap();
        let cert = TbsCertificate::new(
            Integer::from(1u32), name.clone(), validity(), name, public
        ).sign(&crypto, &AlgorithmIdentifier::ed25519(), &private).unwrap();
        assert!(!cert.verify_signature(&crypto, &other).unwrap());

        let mut tbs = cert.tbs().clone();
        tbs.set_serial_number(Integer::from(2u32));
        let forged = Certificate {
            tbs_der: tbs.to_element().to_der(),
            tbs,
            .. cert
        };
        assert!(!forged.is_self_signed(&crypto));
    }
}
