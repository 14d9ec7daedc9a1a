//! The name constraints extension.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::element::Element;
use crate::error::Error;
use crate::ident::Tag;
use crate::int::Integer;
use crate::x509::general_name::GeneralName;


//------------ NameConstraints -----------------------------------------------

/// The name constraints extension.
///
/// ```text
/// NameConstraints ::= SEQUENCE {
///      permittedSubtrees       [0]     GeneralSubtrees OPTIONAL,
///      excludedSubtrees        [1]     GeneralSubtrees OPTIONAL }
///
/// GeneralSubtrees ::= SEQUENCE SIZE (1..MAX) OF GeneralSubtree
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NameConstraints {
    pub permitted: Option<Vec<GeneralSubtree>>,
    pub excluded: Option<Vec<GeneralSubtree>>,
}

impl NameConstraints {
    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let permitted = fields.take_opt_implicit(0, Tag::SEQUENCE)?.map(|item| {
            subtrees_from_element(&item)
        }).transpose()?;
        let excluded = fields.take_opt_implicit(1, Tag::SEQUENCE)?.map(|item| {
            subtrees_from_element(&item)
        }).transpose()?;
        fields.finish()?;
        if permitted.is_none() && excluded.is_none() {
            return Err(Error::invalid("empty name constraints"))
        }
        Ok(NameConstraints { permitted, excluded })
    }

    pub fn to_element(&self) -> Element {
        let encode = |subtrees: &Vec<GeneralSubtree>, number| {
            Element::sequence(
                subtrees.iter().map(GeneralSubtree::to_element)
            ).implicit(number)
        };
        Element::sequence(
            self.permitted.as_ref().map(|item| encode(item, 0)).into_iter()
                .chain(self.excluded.as_ref().map(|item| encode(item, 1)))
        )
    }
}

fn subtrees_from_element(
    element: &Element
) -> Result<Vec<GeneralSubtree>, Error> {
    let res = element.expect_sequence()?.iter().map(
        GeneralSubtree::from_element
    ).collect::<Result<Vec<_>, _>>()?;
    if res.is_empty() {
        return Err(Error::invalid("empty general subtrees"))
    }
    Ok(res)
}


//------------ GeneralSubtree ------------------------------------------------

/// A subtree of names.
///
/// ```text
/// GeneralSubtree ::= SEQUENCE {
///      base                    GeneralName,
///      minimum         [0]     BaseDistance DEFAULT 0,
///      maximum         [1]     BaseDistance OPTIONAL }
/// ```
///
/// RFC 5280 requires the minimum to be zero and the maximum to be absent.
/// Both are kept but ignored when checking names.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneralSubtree {
    pub base: GeneralName,
    pub minimum: u32,
    pub maximum: Option<u32>,
}

impl GeneralSubtree {
    pub fn new(base: GeneralName) -> Self {
        GeneralSubtree { base, minimum: 0, maximum: None }
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let base = GeneralName::from_element(fields.take()?)?;
        let minimum = match fields.take_opt_implicit(0, Tag::INTEGER)? {
            Some(item) => item.expect_integer()?.to_u32()?,
            None => 0
        };
        let maximum = match fields.take_opt_implicit(1, Tag::INTEGER)? {
            Some(item) => Some(item.expect_integer()?.to_u32()?),
            None => None
        };
        fields.finish()?;
        Ok(GeneralSubtree { base, minimum, maximum })
    }

    pub fn to_element(&self) -> Element {
        let minimum = (self.minimum != 0).then(|| {
            Element::Integer(Integer::from(self.minimum)).implicit(0)
        });
        let maximum = self.maximum.map(|maximum| {
            Element::Integer(Integer::from(maximum)).implicit(1)
        });
        Element::sequence(
            Some(self.base.to_element()).into_iter()
                .chain(minimum).chain(maximum)
        )
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn name_constraints() {
        let constraints = NameConstraints {
            permitted: Some(vec![
                GeneralSubtree::new(GeneralName::dns("example.com").unwrap()),
                GeneralSubtree::new(GeneralName::DirectoryName(
                    "o=Example,c=DE".parse().unwrap()
                )),
            ]),
            excluded: Some(vec![GeneralSubtree {
                base: GeneralName::email("example.org").unwrap(),
                minimum: 1,
                maximum: Some(3),
            }]),
        };
        let decoded = NameConstraints::from_element(
            &Element::from_der(constraints.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, constraints);
        assert!(
            NameConstraints::from_element(&Element::sequence([])).is_err()
        );
    }
}
