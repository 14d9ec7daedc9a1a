//! Certificate extensions.
//!
//! Extensions are kept in [`Extensions`], an ordered list of
//! [`Extension`]s with at most one extension per OID. The value of each
//! extension is decoded into an [`ExtensionValue`] if its OID is one of
//! the extensions known to this crate. Values of all other extensions are
//! kept as their raw octets.

pub use self::ac::{NoRevAvail, Target, TargetInformation};
pub use self::access::{
    AccessDescription, CrlDistributionPoints, DistributionPoint,
    DistributionPointName, InfoAccess,
};
pub use self::keys::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage,
    KeyIdentifier, KeyUsage,
};
pub use self::names::{GeneralSubtree, NameConstraints};
pub use self::policy::{
    CertificatePolicies, InhibitAnyPolicy, NoticeReference,
    PolicyConstraints, PolicyInformation, PolicyMapping, PolicyMappings,
    PolicyQualifier, UserNotice,
};

use crate::element::Element;
use crate::error::Error;
use crate::ident::Tag;
use crate::oid::Oid;
use crate::string::OctetString;
use crate::x509::general_name::GeneralNames;
use crate::x509::oid;

mod ac;
mod access;
mod keys;
mod names;
mod policy;


//------------ ExtensionValue ------------------------------------------------

/// Defines the extension value enum and the typed getters of extensions.
///
/// Each line names the variant, the type of its value, the OID constant
/// from [`crate::x509::oid`], and the name of the getter.
macro_rules! extension_values {
    ( $( $variant:ident($typ:ty) => $oid:ident, $getter:ident; )* ) => {
        /// The decoded value of an extension.
        #[derive(Clone, Debug, Eq, PartialEq)]
        pub enum ExtensionValue {
            $( $variant($typ), )*

            /// The value of an extension not known to this crate.
            Unknown { id: Oid, value: OctetString },
        }

        impl ExtensionValue {
            /// Decodes the content of the extnValue OCTET STRING.
            pub fn decode(
                id: &Oid, content: &OctetString
            ) -> Result<Self, Error> {
                $(
                    if *id == oid::$oid {
                        return Ok(ExtensionValue::$variant(
                            <$typ>::from_element(
                                &Element::from_der(content.to_bytes())?
                            )?
                        ))
                    }
                )*
                Ok(ExtensionValue::Unknown {
                    id: id.clone(), value: content.clone()
                })
            }

            /// Returns the OID of the extension.
            pub fn oid(&self) -> Oid {
                match *self {
                    $(
                        ExtensionValue::$variant(_) => {
                            oid::$oid.to_bytes_oid()
                        }
                    )*
                    ExtensionValue::Unknown { ref id, .. } => id.clone(),
                }
            }

            /// Returns whether the extension is known to this crate.
            pub fn is_known(&self) -> bool {
                !matches!(*self, ExtensionValue::Unknown { .. })
            }

            /// Returns the content of the extnValue OCTET STRING.
            pub fn to_octets(&self) -> OctetString {
                match *self {
                    $(
                        ExtensionValue::$variant(ref value) => {
                            OctetString::new(value.to_element().to_der())
                        }
                    )*
                    ExtensionValue::Unknown { ref value, .. } => {
                        value.clone()
                    }
                }
            }
        }

        $(
            impl From<$typ> for ExtensionValue {
                fn from(value: $typ) -> Self {
                    ExtensionValue::$variant(value)
                }
            }
        )*

        impl Extensions {
            $(
                pub fn $getter(&self) -> Option<&$typ> {
                    match *self.get(&oid::$oid)?.value() {
                        ExtensionValue::$variant(ref value) => Some(value),
                        _ => None
                    }
                }
            )*
        }
    }
}

extension_values! {
    AuthorityKeyIdentifier(AuthorityKeyIdentifier)
        => CE_AUTHORITY_KEY_IDENTIFIER, authority_key_identifier;
    SubjectKeyIdentifier(KeyIdentifier)
        => CE_SUBJECT_KEY_IDENTIFIER, subject_key_identifier;
    KeyUsage(KeyUsage) => CE_KEY_USAGE, key_usage;
    CertificatePolicies(CertificatePolicies)
        => CE_CERTIFICATE_POLICIES, certificate_policies;
    PolicyMappings(PolicyMappings) => CE_POLICY_MAPPINGS, policy_mappings;
    SubjectAltName(SubjectAltName)
        => CE_SUBJECT_ALT_NAME, subject_alt_name;
    IssuerAltName(IssuerAltName) => CE_ISSUER_ALT_NAME, issuer_alt_name;
    BasicConstraints(BasicConstraints)
        => CE_BASIC_CONSTRAINTS, basic_constraints;
    NameConstraints(NameConstraints)
        => CE_NAME_CONSTRAINTS, name_constraints;
    PolicyConstraints(PolicyConstraints)
        => CE_POLICY_CONSTRAINTS, policy_constraints;
    ExtendedKeyUsage(ExtendedKeyUsage)
        => CE_EXT_KEY_USAGE, extended_key_usage;
    CrlDistributionPoints(CrlDistributionPoints)
        => CE_CRL_DISTRIBUTION_POINTS, crl_distribution_points;
    InhibitAnyPolicy(InhibitAnyPolicy)
        => CE_INHIBIT_ANY_POLICY, inhibit_any_policy;
    AuthorityInfoAccess(AuthorityInfoAccess)
        => PE_AUTHORITY_INFO_ACCESS, authority_info_access;
    SubjectInfoAccess(SubjectInfoAccess)
        => PE_SUBJECT_INFO_ACCESS, subject_info_access;
    TargetInformation(TargetInformation)
        => CE_TARGET_INFORMATION, target_information;
    NoRevAvail(NoRevAvail) => CE_NO_REV_AVAIL, no_rev_avail;
}


//------------ Alternative Names and Information Access ----------------------

/// Defines newtypes around a shared syntax.
///
/// The subject and issuer alternative names share the GeneralNames
/// syntax and the two information access extensions share theirs. Each
/// needs its own type so that the value enum can convert from it.
macro_rules! syntax_newtype {
    ( $( $(#[$attr:meta])* $name:ident($inner:ty); )* ) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Debug, Eq, PartialEq)]
            pub struct $name(pub $inner);

            impl $name {
                pub fn from_element(element: &Element) -> Result<Self, Error> {
                    <$inner>::from_element(element).map($name)
                }

                pub fn to_element(&self) -> Element {
                    self.0.to_element()
                }
            }

            impl std::ops::Deref for $name {
                type Target = $inner;

                fn deref(&self) -> &$inner {
                    &self.0
                }
            }
        )*
    }
}

syntax_newtype! {
    /// The subject alternative name extension.
    SubjectAltName(GeneralNames);

    /// The issuer alternative name extension.
    IssuerAltName(GeneralNames);

    /// The authority information access extension.
    AuthorityInfoAccess(InfoAccess);

    /// The subject information access extension.
    SubjectInfoAccess(InfoAccess);
}


//------------ Extension -----------------------------------------------------

/// A single extension.
///
/// ```text
/// Extension  ::=  SEQUENCE  {
///      extnID      OBJECT IDENTIFIER,
///      critical    BOOLEAN DEFAULT FALSE,
///      extnValue   OCTET STRING }
/// ```
///
/// An explicitly encoded FALSE for the critical flag is accepted when
/// decoding. It is always left out when encoding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Extension {
    critical: bool,
    value: ExtensionValue,
}

impl Extension {
    pub fn new(critical: bool, value: impl Into<ExtensionValue>) -> Self {
        Extension { critical, value: value.into() }
    }

    pub fn id(&self) -> Oid {
        self.value.oid()
    }

    pub fn is_critical(&self) -> bool {
        self.critical
    }

    pub fn value(&self) -> &ExtensionValue {
        &self.value
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let id = fields.take()?.expect_oid()?;
        let critical = match fields.take_opt_tag(&Tag::BOOLEAN) {
            Some(item) => item.expect_boolean()?,
            None => false
        };
        let content = fields.take()?.expect_octet_string()?;
        fields.finish()?;
        Ok(Extension {
            critical,
            value: ExtensionValue::decode(id, content)?,
        })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            Some(Element::from(&self.id())).into_iter()
                .chain(self.critical.then_some(Element::Boolean(true)))
                .chain(Some(Element::OctetString(self.value.to_octets())))
        )
    }
}


//------------ Extensions ----------------------------------------------------

/// An ordered list of extensions with unique OIDs.
///
/// ```text
/// Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Extensions {
    items: Vec<Extension>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the extensions with `extension` appended.
    ///
    /// Fails if there already is an extension with the same OID.
    pub fn with_extension(mut self, extension: Extension) -> Result<Self, Error> {
        let id = extension.id();
        if self.get(&id).is_some() {
            return Err(Error::DuplicateExtension(id))
        }
        self.items.push(extension);
        Ok(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the extension with the given OID.
    pub fn get<T: AsRef<[u8]>>(&self, id: &Oid<T>) -> Option<&Extension> {
        self.items.iter().find(|item| item.id() == *id)
    }

    /// Returns whether the extension with the given OID is critical.
    pub fn is_critical<T: AsRef<[u8]>>(&self, id: &Oid<T>) -> bool {
        self.get(id).map(Extension::is_critical).unwrap_or(false)
    }

    /// Returns the critical extensions not known to this crate.
    pub fn unknown_critical(&self) -> impl Iterator<Item = &Extension> + '_ {
        self.items.iter().filter(|item| {
            item.critical && !item.value.is_known()
        })
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        element.expect_sequence()?.iter().try_fold(
            Extensions::new(),
            |res, item| res.with_extension(Extension::from_element(item)?)
        )
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(self.items.iter().map(Extension::to_element))
    }
}

impl FromIterator<Extension> for Extensions {
    /// Collects extensions, keeping the first of any duplicates.
    fn from_iter<I: IntoIterator<Item = Extension>>(iter: I) -> Self {
        iter.into_iter().fold(Extensions::new(), |res, item| {
            if res.get(&item.id()).is_some() {
                res
            }
            else {
                let mut res = res;
                res.items.push(item);
                res
            }
        })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use crate::x509::general_name::GeneralName;
    use super::*;

    #[test]
    fn extension_encoding() {
        let ext = Extension::new(true, BasicConstraints::ca(None));
        let der = ext.to_element().to_der();
        assert_eq!(
            der.as_ref(),
            b"\x30\x0f\x06\x03\x55\x1d\x13\x01\x01\xff\x04\x05\x30\x03\x01\x01\xff"
        );
        let decoded = Extension::from_element(
            &Element::from_der(der).unwrap()
        ).unwrap();
        assert_eq!(decoded, ext);

        // Explicit FALSE is accepted and dropped again.
        let decoded = Extension::from_element(&Element::from_der(
            &b"\x30\x0c\x06\x03\x55\x1d\x13\x01\x01\x00\x04\x02\x30\x00"[..]
        ).unwrap()).unwrap();
        assert!(!decoded.is_critical());
        assert_eq!(
            decoded.to_element().to_der().as_ref(),
            b"\x30\x09\x06\x03\x55\x1d\x13\x04\x02\x30\x00"
        );
    }

    #[test]
    fn unknown_extensions() {
        let id: Oid = "1.2.3.4".parse().unwrap();
        let ext = Extension::from_element(&Element::from_der(
            &b"\x30\x0c\x06\x03\x2a\x03\x04\x01\x01\xff\x04\x02\x05\x00"[..]
        ).unwrap()).unwrap();
        assert_eq!(ext.id(), id);
        assert!(!ext.value().is_known());
        let exts = Extensions::new().with_extension(ext).unwrap();
        assert_eq!(exts.unknown_critical().count(), 1);
        assert_eq!(
            exts.to_element().to_der().as_ref(),
            b"\x30\x0e\x30\x0c\x06\x03\x2a\x03\x04\x01\x01\xff\x04\x02\x05\x00"
        );
    }

    #[test]
    fn duplicates() {
        let exts = Extensions::new().with_extension(
            Extension::new(false, KeyIdentifier::new(Bytes::from_static(b"a")))
        ).unwrap();
        assert!(matches!(
            exts.clone().with_extension(Extension::new(
                false, KeyIdentifier::new(Bytes::from_static(b"b"))
            )),
            Err(Error::DuplicateExtension(_))
        ));
        let element = Element::sequence([
            exts.iter().next().unwrap().to_element(),
            exts.iter().next().unwrap().to_element(),
        ]);
        assert!(matches!(
            Extensions::from_element(&element),
            Err(Error::DuplicateExtension(_))
        ));
    }

    #[test]
    fn typed_getters() {
        let exts = Extensions::new().with_extension(
            Extension::new(false, SubjectAltName(GeneralNames::single(
                GeneralName::dns("example.com").unwrap()
            )))
        ).unwrap().with_extension(
            Extension::new(true, KeyUsage::KEY_CERT_SIGN)
        ).unwrap();
        let decoded = Extensions::from_element(
            &Element::from_der(exts.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, exts);
        assert_eq!(decoded.subject_alt_name().unwrap().len(), 1);
        assert_eq!(decoded.key_usage(), Some(&KeyUsage::KEY_CERT_SIGN));
        assert!(decoded.is_critical(&oid::CE_KEY_USAGE));
        assert!(decoded.basic_constraints().is_none());
    }
}
