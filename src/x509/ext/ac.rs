//! Extensions used by attribute certificates.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::element::Element;
use crate::error::{Error, UnexpectedTypeError};
use crate::x509::general_name::GeneralName;


//------------ TargetInformation ---------------------------------------------

/// The AC targeting extension.
///
/// ```text
/// Targets ::= SEQUENCE OF Target
///
/// Target  ::= CHOICE {
///      targetName     [0] GeneralName,
///      targetGroup    [1] GeneralName,
///      targetCert     [2] TargetCert  }
/// ```
///
/// The extension value is a SEQUENCE OF Targets. When decoding, all the
/// sequences are flattened into a single list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TargetInformation(Vec<Target>);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    Name(GeneralName),
    Group(GeneralName),

    /// A target certificate, kept as the complete tagged element.
    Cert(Element),
}

impl TargetInformation {
    pub fn new(targets: Vec<Target>) -> Self {
        TargetInformation(targets)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> + '_ {
        self.0.iter()
    }

    /// Returns whether `name` is one of the target names.
    pub fn names_target(&self, name: &GeneralName) -> bool {
        self.0.iter().any(|target| match *target {
            Target::Name(ref target) => target == name,
            _ => false
        })
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut res = Vec::new();
        for targets in element.expect_sequence()?.iter() {
            for target in targets.expect_sequence()?.iter() {
                res.push(Target::from_element(target)?);
            }
        }
        Ok(TargetInformation(res))
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            Element::sequence(self.0.iter().map(Target::to_element))
        ])
    }
}

impl Target {
    pub fn from_element(element: &Element) -> Result<Self, Error> {
        if element.is_ctx(0) {
            Ok(Target::Name(
                GeneralName::from_element(&element.expect_explicit(0)?)?
            ))
        }
        else if element.is_ctx(1) {
            Ok(Target::Group(
                GeneralName::from_element(&element.expect_explicit(1)?)?
            ))
        }
        else if element.is_ctx(2) {
            Ok(Target::Cert(element.clone()))
        }
        else {
            Err(UnexpectedTypeError::new("Target", element.tag()).into())
        }
    }

    pub fn to_element(&self) -> Element {
        match *self {
            Target::Name(ref name) => name.to_element().explicit(0),
            Target::Group(ref name) => name.to_element().explicit(1),
            Target::Cert(ref element) => element.clone(),
        }
    }
}


//------------ NoRevAvail ----------------------------------------------------

/// The no revocation available extension.
///
/// Its value is always a NULL.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct NoRevAvail;

impl NoRevAvail {
    pub fn from_element(element: &Element) -> Result<Self, Error> {
        element.expect_null()?;
        Ok(NoRevAvail)
    }

    pub fn to_element(self) -> Element {
        Element::Null
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn target_information() {
        let server = GeneralName::dns("www.example.com").unwrap();
        let targets = TargetInformation::new(vec![
            Target::Name(server.clone()),
            Target::Group(GeneralName::dns("example.com").unwrap()),
        ]);
        let decoded = TargetInformation::from_element(
            &Element::from_der(targets.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, targets);
        assert!(decoded.names_target(&server));
        assert!(!decoded.names_target(
            &GeneralName::dns("example.com").unwrap()
        ));
    }

    #[test]
    fn no_rev_avail() {
        assert_eq!(NoRevAvail.to_element().to_der().as_ref(), b"\x05\x00");
        assert!(NoRevAvail::from_element(&Element::Null).is_ok());
        assert!(NoRevAvail::from_element(&Element::Boolean(true)).is_err());
    }
}
