//! Extensions concerning certificate policies.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::element::Element;
use crate::error::Error;
use crate::ident::Tag;
use crate::int::Integer;
use crate::oid::Oid;
use crate::string::{AnyString, Ia5String};
use crate::x509::oid;


//------------ CertificatePolicies -------------------------------------------

/// The certificate policies extension.
///
/// ```text
/// certificatePolicies ::= SEQUENCE SIZE (1..MAX) OF PolicyInformation
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificatePolicies(Vec<PolicyInformation>);

impl CertificatePolicies {
    pub fn new(policies: Vec<PolicyInformation>) -> Self {
        CertificatePolicies(policies)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PolicyInformation> + '_ {
        self.0.iter()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let policies = element.expect_sequence()?.iter().map(
            PolicyInformation::from_element
        ).collect::<Result<Vec<_>, _>>()?;
        if policies.is_empty() {
            return Err(Error::invalid("empty certificate policies"))
        }
        for (idx, policy) in policies.iter().enumerate() {
            if policies[..idx].iter().any(|other| {
                other.policy_identifier == policy.policy_identifier
            }) {
                return Err(Error::invalid(format_args!(
                    "duplicate policy {}", policy.policy_identifier
                )))
            }
        }
        Ok(CertificatePolicies(policies))
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(self.0.iter().map(PolicyInformation::to_element))
    }
}


//------------ PolicyInformation ---------------------------------------------

/// A policy with its optional qualifiers.
///
/// ```text
/// PolicyInformation ::= SEQUENCE {
///      policyIdentifier   CertPolicyId,
///      policyQualifiers   SEQUENCE SIZE (1..MAX) OF
///                              PolicyQualifierInfo OPTIONAL }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyInformation {
    pub policy_identifier: Oid,
    pub qualifiers: Vec<PolicyQualifier>,
}

impl PolicyInformation {
    /// Creates a policy without qualifiers.
    pub fn new(policy_identifier: Oid) -> Self {
        PolicyInformation { policy_identifier, qualifiers: Vec::new() }
    }

    /// Returns whether this is the special anyPolicy.
    pub fn is_any_policy(&self) -> bool {
        self.policy_identifier == oid::ANY_POLICY
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let policy_identifier = fields.take()?.expect_oid()?.clone();
        let qualifiers = match fields.take_opt_tag(&Tag::SEQUENCE) {
            Some(item) => {
                item.expect_sequence()?.iter().map(
                    PolicyQualifier::from_element
                ).collect::<Result<_, _>>()?
            }
            None => Vec::new(),
        };
        fields.finish()?;
        Ok(PolicyInformation { policy_identifier, qualifiers })
    }

    pub fn to_element(&self) -> Element {
        let qualifiers = (!self.qualifiers.is_empty()).then(|| {
            Element::sequence(
                self.qualifiers.iter().map(PolicyQualifier::to_element)
            )
        });
        Element::sequence(
            Some(Element::from(&self.policy_identifier)).into_iter()
                .chain(qualifiers)
        )
    }
}


//------------ PolicyQualifier -----------------------------------------------

/// A policy qualifier.
///
/// ```text
/// PolicyQualifierInfo ::= SEQUENCE {
///      policyQualifierId  PolicyQualifierId,
///      qualifier          ANY DEFINED BY policyQualifierId }
///
/// Qualifier ::= CHOICE {
///      cPSuri           CPSuri,
///      userNotice       UserNotice }
///
/// CPSuri ::= IA5String
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PolicyQualifier {
    Cps(Ia5String),
    UserNotice(UserNotice),
    Other { id: Oid, qualifier: Element },
}

impl PolicyQualifier {
    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let id = fields.take()?.expect_oid()?.clone();
        let qualifier = fields.take()?;
        fields.finish()?;
        if id == oid::QT_CPS {
            match *qualifier.expect_string()? {
                AnyString::Ia5(ref uri) => Ok(PolicyQualifier::Cps(uri.clone())),
                ref other => {
                    Err(crate::error::UnexpectedTypeError::new(
                        "IA5String", other.tag()
                    ).into())
                }
            }
        }
        else if id == oid::QT_UNOTICE {
            UserNotice::from_element(qualifier).map(PolicyQualifier::UserNotice)
        }
        else {
            Ok(PolicyQualifier::Other { id, qualifier: qualifier.clone() })
        }
    }

    pub fn to_element(&self) -> Element {
        match *self {
            PolicyQualifier::Cps(ref uri) => {
                Element::sequence([
                    Element::from(&oid::QT_CPS),
                    Element::String(AnyString::Ia5(uri.clone())),
                ])
            }
            PolicyQualifier::UserNotice(ref notice) => {
                Element::sequence([
                    Element::from(&oid::QT_UNOTICE), notice.to_element()
                ])
            }
            PolicyQualifier::Other { ref id, ref qualifier } => {
                Element::sequence([Element::from(id), qualifier.clone()])
            }
        }
    }
}


//------------ UserNotice ----------------------------------------------------

/// A user notice policy qualifier.
///
/// ```text
/// UserNotice ::= SEQUENCE {
///      noticeRef        NoticeReference OPTIONAL,
///      explicitText     DisplayText OPTIONAL }
///
/// NoticeReference ::= SEQUENCE {
///      organization     DisplayText,
///      noticeNumbers    SEQUENCE OF INTEGER }
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserNotice {
    pub notice_ref: Option<NoticeReference>,
    pub explicit_text: Option<AnyString>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NoticeReference {
    pub organization: AnyString,
    pub notice_numbers: Vec<Integer>,
}

impl UserNotice {
    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let notice_ref = match fields.take_opt_tag(&Tag::SEQUENCE) {
            Some(item) => {
                let mut inner = item.expect_sequence()?.fields();
                let organization = inner.take()?.expect_string()?.clone();
                let notice_numbers = inner.take()?.expect_sequence()?.iter()
                    .map(|item| item.expect_integer().cloned())
                    .collect::<Result<_, _>>()?;
                inner.finish()?;
                Some(NoticeReference { organization, notice_numbers })
            }
            None => None
        };
        let explicit_text = if fields.is_empty() {
            None
        }
        else {
            Some(fields.take()?.expect_string()?.clone())
        };
        fields.finish()?;
        Ok(UserNotice { notice_ref, explicit_text })
    }

    pub fn to_element(&self) -> Element {
        let notice_ref = self.notice_ref.as_ref().map(|notice_ref| {
            Element::sequence([
                Element::String(notice_ref.organization.clone()),
                Element::sequence(
                    notice_ref.notice_numbers.iter().cloned().map(
                        Element::Integer
                    )
                ),
            ])
        });
        Element::sequence(
            notice_ref.into_iter().chain(
                self.explicit_text.clone().map(Element::String)
            )
        )
    }
}


//------------ PolicyMappings ------------------------------------------------

/// The policy mappings extension.
///
/// ```text
/// PolicyMappings ::= SEQUENCE SIZE (1..MAX) OF SEQUENCE {
///      issuerDomainPolicy      CertPolicyId,
///      subjectDomainPolicy     CertPolicyId }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyMappings(Vec<PolicyMapping>);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyMapping {
    pub issuer_domain_policy: Oid,
    pub subject_domain_policy: Oid,
}

impl PolicyMappings {
    pub fn new(mappings: Vec<PolicyMapping>) -> Self {
        PolicyMappings(mappings)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PolicyMapping> + '_ {
        self.0.iter()
    }

    /// Returns the subject policies the issuer policy is mapped to.
    pub fn mapped_to<'a>(
        &'a self, issuer_policy: &'a Oid
    ) -> impl Iterator<Item = &'a Oid> + 'a {
        self.0.iter().filter(move |item| {
            item.issuer_domain_policy == *issuer_policy
        }).map(|item| &item.subject_domain_policy)
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mappings = element.expect_sequence()?.iter().map(|item| -> Result<_, Error> {
            let mut fields = item.expect_sequence()?.fields();
            let issuer_domain_policy = fields.take()?.expect_oid()?.clone();
            let subject_domain_policy = fields.take()?.expect_oid()?.clone();
            fields.finish()?;
            Ok(PolicyMapping { issuer_domain_policy, subject_domain_policy })
        }).collect::<Result<Vec<_>, Error>>()?;
        if mappings.is_empty() {
            return Err(Error::invalid("empty policy mappings"))
        }
        Ok(PolicyMappings(mappings))
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(self.0.iter().map(|item| {
            Element::sequence([
                Element::from(&item.issuer_domain_policy),
                Element::from(&item.subject_domain_policy),
            ])
        }))
    }
}


//------------ PolicyConstraints ---------------------------------------------

/// The policy constraints extension.
///
/// ```text
/// PolicyConstraints ::= SEQUENCE {
///      requireExplicitPolicy           [0] SkipCerts OPTIONAL,
///      inhibitPolicyMapping            [1] SkipCerts OPTIONAL }
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PolicyConstraints {
    pub require_explicit_policy: Option<u32>,
    pub inhibit_policy_mapping: Option<u32>,
}

impl PolicyConstraints {
    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let require_explicit_policy = skip_certs(
            fields.take_opt_implicit(0, Tag::INTEGER)?
        )?;
        let inhibit_policy_mapping = skip_certs(
            fields.take_opt_implicit(1, Tag::INTEGER)?
        )?;
        fields.finish()?;
        if require_explicit_policy.is_none()
            && inhibit_policy_mapping.is_none()
        {
            return Err(Error::invalid("empty policy constraints"))
        }
        Ok(PolicyConstraints {
            require_explicit_policy, inhibit_policy_mapping
        })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            self.require_explicit_policy.map(|skip| {
                Element::Integer(skip.into()).implicit(0)
            }).into_iter().chain(
                self.inhibit_policy_mapping.map(|skip| {
                    Element::Integer(skip.into()).implicit(1)
                })
            )
        )
    }
}

fn skip_certs(element: Option<Element>) -> Result<Option<u32>, Error> {
    match element {
        Some(element) => Ok(Some(element.expect_integer()?.to_u32()?)),
        None => Ok(None)
    }
}


//------------ InhibitAnyPolicy ----------------------------------------------

/// The inhibit anyPolicy extension.
///
/// ```text
/// InhibitAnyPolicy ::= SkipCerts
///
/// SkipCerts ::= INTEGER (0..MAX)
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct InhibitAnyPolicy(pub u32);

impl InhibitAnyPolicy {
    pub fn from_element(element: &Element) -> Result<Self, Error> {
        Ok(InhibitAnyPolicy(element.expect_integer()?.to_u32()?))
    }

    pub fn to_element(self) -> Element {
        Element::Integer(Integer::from(self.0))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn certificate_policies() {
        let policies = CertificatePolicies::new(vec![
            PolicyInformation {
                policy_identifier: "1.2.3.4".parse().unwrap(),
                qualifiers: vec![
                    PolicyQualifier::Cps(
                        Ia5String::from_str("https://example.com/cps").unwrap()
                    ),
                    PolicyQualifier::UserNotice(UserNotice {
                        notice_ref: Some(NoticeReference {
                            organization: AnyString::utf8("Example"),
                            notice_numbers: vec![Integer::from(1)],
                        }),
                        explicit_text: Some(AnyString::utf8("Be nice")),
                    }),
                ],
            },
            PolicyInformation::new(oid::ANY_POLICY.to_bytes_oid()),
        ]);
        let decoded = CertificatePolicies::from_element(
            &Element::from_der(policies.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, policies);
        assert!(decoded.iter().nth(1).unwrap().is_any_policy());
    }

    #[test]
    fn duplicate_policies() {
        let policy = PolicyInformation::new("1.2.3".parse().unwrap());
        let element = CertificatePolicies::new(
            vec![policy.clone(), policy]
        ).to_element();
        assert!(CertificatePolicies::from_element(&element).is_err());
    }

    #[test]
    fn policy_constraints() {
        let constraints = PolicyConstraints {
            require_explicit_policy: Some(0),
            inhibit_policy_mapping: None,
        };
        let der = constraints.to_element().to_der();
        assert_eq!(der.as_ref(), b"\x30\x03\x80\x01\x00");
        assert_eq!(
            PolicyConstraints::from_element(
                &Element::from_der(der).unwrap()
            ).unwrap(),
            constraints
        );
        assert!(
            PolicyConstraints::from_element(&Element::sequence([])).is_err()
        );
    }

    #[test]
    fn policy_mappings() {
        let mappings = PolicyMappings::new(vec![PolicyMapping {
            issuer_domain_policy: "1.2.3".parse().unwrap(),
            subject_domain_policy: "1.2.4".parse().unwrap(),
        }]);
        let issuer: Oid = "1.2.3".parse().unwrap();
        assert_eq!(mappings.mapped_to(&issuer).count(), 1);
        assert_eq!(
            PolicyMappings::from_element(&mappings.to_element()).unwrap(),
            mappings
        );
    }
}
