//! The registry of known attribute types.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::oid::{ConstOid, Oid};
use crate::stringprep::MatchingRule;
use super::oid;


//------------ Syntax --------------------------------------------------------

/// The syntax of the values of an attribute type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Syntax {
    /// The DirectoryString CHOICE of character string types.
    DirectoryString,

    /// A PrintableString.
    Printable,

    /// An IA5String.
    Ia5,

    /// The RoleSyntax of RFC 5755.
    Role,

    /// Any value, kept as an element.
    Opaque,
}


//------------ AttributeType -------------------------------------------------

/// Information about a known attribute type.
#[derive(Clone, Copy, Debug)]
pub struct AttributeType {
    /// The object identifier of the type.
    pub oid: ConstOid,

    /// The names of the type.
    ///
    /// The first name is the one used when printing names.
    pub names: &'static [&'static str],

    /// The syntax of values of the type.
    pub syntax: Syntax,

    /// The rule for comparing values of the type.
    pub rule: MatchingRule,
}

impl AttributeType {
    /// Returns the preferred name of the type.
    pub fn name(&self) -> &'static str {
        self.names[0]
    }

    /// Looks up a type by its object identifier.
    pub fn by_oid<T: AsRef<[u8]>>(
        oid: &Oid<T>
    ) -> Option<&'static AttributeType> {
        ATTRIBUTE_TYPES.iter().find(|item| item.oid == *oid)
    }

    /// Looks up a type by one of its names.
    ///
    /// Names are compared ignoring ASCII case.
    pub fn by_name(name: &str) -> Option<&'static AttributeType> {
        ATTRIBUTE_TYPES.iter().find(|item| {
            item.names.iter().any(|known| known.eq_ignore_ascii_case(name))
        })
    }

    /// Returns the matching rule for values of the given type.
    ///
    /// Values of unknown types are compared by their encoding.
    pub fn rule_for<T: AsRef<[u8]>>(oid: &Oid<T>) -> MatchingRule {
        Self::by_oid(oid).map(|item| item.rule).unwrap_or(MatchingRule::Binary)
    }

    /// Returns the syntax of values of the given type.
    pub fn syntax_for<T: AsRef<[u8]>>(oid: &Oid<T>) -> Syntax {
        Self::by_oid(oid).map(|item| item.syntax).unwrap_or(Syntax::Opaque)
    }
}


//------------ The Registry --------------------------------------------------

macro_rules! attribute_types {
    ( $( $oid:expr, [ $( $name:expr ),* ], $syntax:ident, $rule:ident; )* ) => {
        static ATTRIBUTE_TYPES: &[AttributeType] = &[
            $(
                AttributeType {
                    oid: $oid,
                    names: &[ $( $name ),* ],
                    syntax: Syntax::$syntax,
                    rule: MatchingRule::$rule,
                },
            )*
        ];
    }
}

attribute_types! {
    oid::AT_COMMON_NAME, ["cn", "commonName"], DirectoryString, CaseIgnore;
    oid::AT_SURNAME, ["sn", "surname"], DirectoryString, CaseIgnore;
    oid::AT_SERIAL_NUMBER, ["serialNumber"], Printable, CaseIgnore;
    oid::AT_COUNTRY_NAME, ["c", "countryName"], Printable, CaseIgnore;
    oid::AT_LOCALITY_NAME, ["l", "localityName"], DirectoryString, CaseIgnore;
    oid::AT_STATE_OR_PROVINCE_NAME,
        ["st", "stateOrProvinceName"], DirectoryString, CaseIgnore;
    oid::AT_STREET_ADDRESS, ["street", "streetAddress"],
        DirectoryString, CaseIgnore;
    oid::AT_ORGANIZATION_NAME, ["o", "organizationName"],
        DirectoryString, CaseIgnore;
    oid::AT_ORGANIZATIONAL_UNIT_NAME, ["ou", "organizationalUnitName"],
        DirectoryString, CaseIgnore;
    oid::AT_TITLE, ["title"], DirectoryString, CaseIgnore;
    oid::AT_DESCRIPTION, ["description"], DirectoryString, CaseIgnore;
    oid::AT_NAME, ["name"], DirectoryString, CaseIgnore;
    oid::AT_GIVEN_NAME, ["givenName"], DirectoryString, CaseIgnore;
    oid::AT_INITIALS, ["initials"], DirectoryString, CaseIgnore;
    oid::AT_GENERATION_QUALIFIER, ["generationQualifier"],
        DirectoryString, CaseIgnore;
    oid::AT_DN_QUALIFIER, ["dnQualifier"], Printable, CaseIgnore;
    oid::AT_PSEUDONYM, ["pseudonym"], DirectoryString, CaseIgnore;
    oid::AT_ROLE, ["role"], Role, Binary;
    oid::AT_DOMAIN_COMPONENT, ["dc", "domainComponent"], Ia5, CaseIgnore;
    oid::AT_USER_ID, ["uid", "userId"], DirectoryString, CaseIgnore;
    oid::AT_EMAIL_ADDRESS, ["emailAddress", "email"], Ia5, CaseIgnore;
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup() {
        let cn = AttributeType::by_name("CN").unwrap();
        assert_eq!(cn.oid, oid::AT_COMMON_NAME);
        assert_eq!(cn.name(), "cn");
        assert_eq!(
            AttributeType::by_name("givenname").unwrap().oid,
            oid::AT_GIVEN_NAME
        );
        assert!(AttributeType::by_name("frobnicate").is_none());
        assert_eq!(
            AttributeType::by_oid(&oid::AT_EMAIL_ADDRESS).unwrap().syntax,
            Syntax::Ia5
        );
        let unknown = "1.2.3.4".parse::<Oid>().unwrap();
        assert_eq!(AttributeType::rule_for(&unknown), MatchingRule::Binary);
        assert_eq!(AttributeType::syntax_for(&unknown), Syntax::Opaque);
    }
}
