//! Extensions pointing to further information.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::element::Element;
use crate::error::{Error, UnexpectedTypeError};
use crate::ident::Tag;
use crate::oid::Oid;
use crate::string::BitString;
use crate::x501::RelativeDistinguishedName;
use crate::x509::general_name::{GeneralName, GeneralNames};


//------------ CrlDistributionPoints -----------------------------------------

/// The CRL distribution points extension.
///
/// ```text
/// CRLDistributionPoints ::= SEQUENCE SIZE (1..MAX) OF DistributionPoint
///
/// DistributionPoint ::= SEQUENCE {
///      distributionPoint       [0]     DistributionPointName OPTIONAL,
///      reasons                 [1]     ReasonFlags OPTIONAL,
///      cRLIssuer               [2]     GeneralNames OPTIONAL }
///
/// DistributionPointName ::= CHOICE {
///      fullName                [0]     GeneralNames,
///      nameRelativeToCRLIssuer [1]     RelativeDistinguishedName }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CrlDistributionPoints(Vec<DistributionPoint>);

impl CrlDistributionPoints {
    pub fn new(points: Vec<DistributionPoint>) -> Self {
        CrlDistributionPoints(points)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DistributionPoint> + '_ {
        self.0.iter()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let points = element.expect_sequence()?.iter().map(
            DistributionPoint::from_element
        ).collect::<Result<Vec<_>, _>>()?;
        if points.is_empty() {
            return Err(Error::invalid("empty CRL distribution points"))
        }
        Ok(CrlDistributionPoints(points))
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(self.0.iter().map(DistributionPoint::to_element))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DistributionPoint {
    pub distribution_point: Option<DistributionPointName>,
    pub reasons: Option<BitString>,
    pub crl_issuer: Option<GeneralNames>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DistributionPointName {
    FullName(GeneralNames),
    NameRelativeToCrlIssuer(RelativeDistinguishedName),
}

impl DistributionPoint {
    /// Creates a distribution point with a single URI.
    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        Ok(DistributionPoint {
            distribution_point: Some(DistributionPointName::FullName(
                GeneralNames::single(GeneralName::uri(uri)?)
            )),
            .. Default::default()
        })
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let distribution_point = match fields.take_opt_explicit(0)? {
            Some(item) if item.is_ctx(0) => {
                Some(DistributionPointName::FullName(
                    GeneralNames::from_implicit(&item, 0)?
                ))
            }
            Some(item) if item.is_ctx(1) => {
                Some(DistributionPointName::NameRelativeToCrlIssuer(
                    RelativeDistinguishedName::from_element(
                        &item.expect_implicit(1, Tag::SET)?
                    )?
                ))
            }
            Some(item) => {
                return Err(UnexpectedTypeError::new(
                    "DistributionPointName", item.tag()
                ).into())
            }
            None => None
        };
        let reasons = match fields.take_opt_implicit(1, Tag::BIT_STRING)? {
            Some(item) => Some(item.expect_bit_string()?.clone()),
            None => None
        };
        let crl_issuer = match fields.take_opt_tag(&Tag::ctx(2)) {
            Some(item) => Some(GeneralNames::from_implicit(item, 2)?),
            None => None
        };
        fields.finish()?;
        Ok(DistributionPoint { distribution_point, reasons, crl_issuer })
    }

    pub fn to_element(&self) -> Element {
        let name = self.distribution_point.as_ref().map(|name| {
            let res = match *name {
                DistributionPointName::FullName(ref names) => {
                    names.to_element().implicit(0)
                }
                DistributionPointName::NameRelativeToCrlIssuer(ref rdn) => {
                    rdn.to_element().implicit(1)
                }
            };
            res.explicit(0)
        });
        Element::sequence(
            name.into_iter().chain(
                self.reasons.clone().map(|reasons| {
                    Element::BitString(reasons).implicit(1)
                })
            ).chain(
                self.crl_issuer.as_ref().map(|names| {
                    names.to_element().implicit(2)
                })
            )
        )
    }
}


//------------ InfoAccess ----------------------------------------------------

/// The authority or subject information access extension.
///
/// ```text
/// AuthorityInfoAccessSyntax  ::=
///         SEQUENCE SIZE (1..MAX) OF AccessDescription
///
/// AccessDescription  ::=  SEQUENCE {
///         accessMethod          OBJECT IDENTIFIER,
///         accessLocation        GeneralName  }
/// ```
///
/// Both extensions share the same syntax.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InfoAccess(Vec<AccessDescription>);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessDescription {
    pub access_method: Oid,
    pub access_location: GeneralName,
}

impl InfoAccess {
    pub fn new(items: Vec<AccessDescription>) -> Self {
        InfoAccess(items)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessDescription> + '_ {
        self.0.iter()
    }

    /// Returns the locations for the given access method.
    pub fn locations<'a, T: AsRef<[u8]>>(
        &'a self, method: &'a Oid<T>
    ) -> impl Iterator<Item = &'a GeneralName> + 'a {
        self.0.iter().filter(move |item| item.access_method == *method)
            .map(|item| &item.access_location)
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let items = element.expect_sequence()?.iter().map(|item| {
            let mut fields = item.expect_sequence()?.fields();
            let access_method = fields.take()?.expect_oid()?.clone();
            let access_location = GeneralName::from_element(fields.take()?)?;
            fields.finish()?;
            Ok(AccessDescription { access_method, access_location })
        }).collect::<Result<Vec<_>, Error>>()?;
        if items.is_empty() {
            return Err(Error::invalid("empty information access"))
        }
        Ok(InfoAccess(items))
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(self.0.iter().map(|item| {
            Element::sequence([
                Element::from(&item.access_method),
                item.access_location.to_element(),
            ])
        }))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::x509::oid;
    use super::*;

    #[test]
    fn distribution_points() {
        let points = CrlDistributionPoints::new(vec![
            DistributionPoint::from_uri("http://example.com/ca.crl").unwrap(),
            DistributionPoint {
                distribution_point: Some(
                    DistributionPointName::NameRelativeToCrlIssuer(
                        RelativeDistinguishedName::new(vec![
                            crate::x501::AttributeTypeAndValue::from_str_value(
                                &crate::x501::oid::AT_COMMON_NAME, "CRL1"
                            ).unwrap()
                        ]).unwrap()
                    )
                ),
                reasons: Some(BitString::from_bits([false, true])),
                crl_issuer: Some(GeneralNames::single(
                    GeneralName::DirectoryName("cn=CA".parse().unwrap())
                )),
            },
        ]);
        let decoded = CrlDistributionPoints::from_element(
            &Element::from_der(points.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, points);
    }

    #[test]
    fn info_access() {
        let access = InfoAccess::new(vec![
            AccessDescription {
                access_method: oid::AD_CA_ISSUERS.to_bytes_oid(),
                access_location: GeneralName::uri(
                    "http://example.com/ca.cer"
                ).unwrap(),
            },
            AccessDescription {
                access_method: oid::AD_OCSP.to_bytes_oid(),
                access_location: GeneralName::uri(
                    "http://ocsp.example.com/"
                ).unwrap(),
            },
        ]);
        assert_eq!(access.locations(&oid::AD_OCSP).count(), 1);
        let decoded = InfoAccess::from_element(
            &Element::from_der(access.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, access);
    }
}
