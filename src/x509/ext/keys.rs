//! Extensions concerning keys and their use.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::ops;
use bytes::Bytes;
use crate::element::Element;
use crate::error::Error;
use crate::ident::Tag;
use crate::int::Integer;
use crate::oid::Oid;
use crate::string::{BitString, OctetString};
use crate::x509::general_name::GeneralNames;


//------------ KeyIdentifier -------------------------------------------------

/// An identifier of a public key.
///
/// This is the value of the subject key identifier extension and part of
/// the authority key identifier extension.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyIdentifier(Bytes);

impl KeyIdentifier {
    pub fn new(bytes: Bytes) -> Self {
        KeyIdentifier(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        Ok(KeyIdentifier(element.expect_octet_string()?.to_bytes()))
    }

    pub fn to_element(&self) -> Element {
        Element::OctetString(OctetString::new(self.0.clone()))
    }
}


//------------ AuthorityKeyIdentifier ----------------------------------------

/// The authority key identifier extension.
///
/// ```text
/// AuthorityKeyIdentifier ::= SEQUENCE {
///     keyIdentifier             [0] KeyIdentifier           OPTIONAL,
///     authorityCertIssuer       [1] GeneralNames            OPTIONAL,
///     authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL  }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<KeyIdentifier>,
    pub authority_cert_issuer: Option<GeneralNames>,
    pub authority_cert_serial_number: Option<Integer>,
}

impl AuthorityKeyIdentifier {
    /// Creates a value containing only a key identifier.
    pub fn from_key_identifier(key_identifier: KeyIdentifier) -> Self {
        AuthorityKeyIdentifier {
            key_identifier: Some(key_identifier),
            .. Default::default()
        }
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let key_identifier = fields.take_opt_implicit(
            0, Tag::OCTET_STRING
        )?.map(|item| KeyIdentifier::from_element(&item)).transpose()?;
        let authority_cert_issuer = fields.take_opt_implicit(
            1, Tag::SEQUENCE
        )?.map(|item| GeneralNames::from_element(&item)).transpose()?;
        let authority_cert_serial_number = fields.take_opt_implicit(
            2, Tag::INTEGER
        )?.map(|item| item.expect_integer().cloned()).transpose()?;
        fields.finish()?;
        Ok(AuthorityKeyIdentifier {
            key_identifier, authority_cert_issuer,
            authority_cert_serial_number
        })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            self.key_identifier.as_ref().map(|item| {
                item.to_element().implicit(0)
            }).into_iter().chain(
                self.authority_cert_issuer.as_ref().map(|item| {
                    item.to_element().implicit(1)
                })
            ).chain(
                self.authority_cert_serial_number.as_ref().map(|item| {
                    Element::Integer(item.clone()).implicit(2)
                })
            )
        )
    }
}


//------------ KeyUsage ------------------------------------------------------

/// The key usage extension.
///
/// ```text
/// KeyUsage ::= BIT STRING {
///      digitalSignature        (0),
///      nonRepudiation          (1),
///      keyEncipherment         (2),
///      dataEncipherment        (3),
///      keyAgreement            (4),
///      keyCertSign             (5),
///      cRLSign                 (6),
///      encipherOnly            (7),
///      decipherOnly            (8) }
/// ```
///
/// Values can be combined with `|`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct KeyUsage(u16);

impl KeyUsage {
    pub const DIGITAL_SIGNATURE: KeyUsage = KeyUsage(1 << 0);
    pub const NON_REPUDIATION: KeyUsage = KeyUsage(1 << 1);
    pub const KEY_ENCIPHERMENT: KeyUsage = KeyUsage(1 << 2);
    pub const DATA_ENCIPHERMENT: KeyUsage = KeyUsage(1 << 3);
    pub const KEY_AGREEMENT: KeyUsage = KeyUsage(1 << 4);
    pub const KEY_CERT_SIGN: KeyUsage = KeyUsage(1 << 5);
    pub const CRL_SIGN: KeyUsage = KeyUsage(1 << 6);
    pub const ENCIPHER_ONLY: KeyUsage = KeyUsage(1 << 7);
    pub const DECIPHER_ONLY: KeyUsage = KeyUsage(1 << 8);

    /// Returns whether all usages in `other` are present in `self`.
    pub fn contains(self, other: KeyUsage) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let bits = element.expect_bit_string()?;
        if (9..bits.bit_len()).any(|idx| bits.bit(idx)) {
            return Err(Error::invalid("unknown key usage bit"))
        }
        Ok(KeyUsage((0..9).fold(0, |res, idx| {
            if bits.bit(idx) { res | 1 << idx } else { res }
        })))
    }

    pub fn to_element(self) -> Element {
        Element::BitString(
            BitString::from_bits(
                (0..9).map(|idx| self.0 & (1 << idx) != 0)
            ).without_trailing_zeroes()
        )
    }
}

impl ops::BitOr for KeyUsage {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        KeyUsage(self.0 | other.0)
    }
}


//------------ ExtendedKeyUsage ----------------------------------------------

/// The extended key usage extension.
///
/// ```text
/// ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtendedKeyUsage(Vec<Oid>);

impl ExtendedKeyUsage {
    pub fn new(purposes: Vec<Oid>) -> Self {
        ExtendedKeyUsage(purposes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Oid> + '_ {
        self.0.iter()
    }

    /// Returns whether `purpose` or any extended key usage is included.
    pub fn allows<T: AsRef<[u8]>>(&self, purpose: &Oid<T>) -> bool {
        self.0.iter().any(|item| {
            item == purpose
                || *item == crate::x509::oid::ANY_EXTENDED_KEY_USAGE
        })
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let purposes = element.expect_sequence()?.iter().map(|item| {
            item.expect_oid().cloned()
        }).collect::<Result<Vec<_>, _>>()?;
        if purposes.is_empty() {
            return Err(Error::invalid("empty extended key usage"))
        }
        Ok(ExtendedKeyUsage(purposes))
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(self.0.iter().map(Element::from))
    }
}


//------------ BasicConstraints ----------------------------------------------

/// The basic constraints extension.
///
/// ```text
/// BasicConstraints ::= SEQUENCE {
///      cA                      BOOLEAN DEFAULT FALSE,
///      pathLenConstraint       INTEGER (0..MAX) OPTIONAL }
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: Option<u32>,
}

impl BasicConstraints {
    /// Creates the constraints of a CA certificate.
    pub fn ca(path_len_constraint: Option<u32>) -> Self {
        BasicConstraints { ca: true, path_len_constraint }
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let ca = fields.take_opt_tag(&Tag::BOOLEAN).map(|item| {
            item.expect_boolean()
        }).transpose()?.unwrap_or(false);
        let path_len_constraint = match fields.take_opt_tag(&Tag::INTEGER) {
            Some(item) => Some(item.expect_integer()?.to_u32()?),
            None => None,
        };
        fields.finish()?;
        Ok(BasicConstraints { ca, path_len_constraint })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            self.ca.then_some(Element::Boolean(true)).into_iter().chain(
                self.path_len_constraint.map(|len| {
                    Element::Integer(Integer::from(len))
                })
            )
        )
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_usage() {
        let usage = KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN;
        assert_eq!(usage.to_element().to_der().as_ref(), b"\x03\x02\x01\x06");
        assert_eq!(KeyUsage::from_element(&usage.to_element()).unwrap(), usage);
        assert!(usage.contains(KeyUsage::KEY_CERT_SIGN));
        assert!(!usage.contains(KeyUsage::DIGITAL_SIGNATURE));
        let decipher = KeyUsage::DECIPHER_ONLY.to_element();
        assert_eq!(decipher.to_der().as_ref(), b"\x03\x03\x07\x00\x80");
        assert_eq!(
            KeyUsage::from_element(&decipher).unwrap(),
            KeyUsage::DECIPHER_ONLY
        );
    }

    #[test]
    fn basic_constraints() {
        assert_eq!(
            BasicConstraints::default().to_element().to_der().as_ref(),
            b"\x30\x00"
        );
        let ca = BasicConstraints::ca(Some(2));
        assert_eq!(
            ca.to_element().to_der().as_ref(),
            b"\x30\x06\x01\x01\xff\x02\x01\x02"
        );
        assert_eq!(BasicConstraints::from_element(&ca.to_element()).unwrap(), ca);
    }

    #[test]
    fn authority_key_identifier() {
        let aki = AuthorityKeyIdentifier::from_key_identifier(
            KeyIdentifier::new(Bytes::from_static(b"\x01\x02"))
        );
        let der = aki.to_element().to_der();
        assert_eq!(der.as_ref(), b"\x30\x04\x80\x02\x01\x02");
        let decoded = AuthorityKeyIdentifier::from_element(
            &Element::from_der(der).unwrap()
        ).unwrap();
        assert_eq!(decoded, aki);
    }

    #[test]
    fn extended_key_usage() {
        let eku = ExtendedKeyUsage::new(vec![
            crate::x509::oid::KP_SERVER_AUTH.to_bytes_oid()
        ]);
        assert!(eku.allows(&crate::x509::oid::KP_SERVER_AUTH));
        assert!(!eku.allows(&crate::x509::oid::KP_CODE_SIGNING));
        assert_eq!(ExtendedKeyUsage::from_element(&eku.to_element()).unwrap(), eku);
    }
}
