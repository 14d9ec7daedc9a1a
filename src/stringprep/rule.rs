//! Matching rules.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::element::Element;
use super::{Folding, prepare};


//------------ MatchingRule --------------------------------------------------

/// A rule for comparing attribute values.
///
/// The rule determines whether an assertion value matches a stored
/// attribute value. Comparison is total: values that can’t be compared
/// under the rule, such as non-string values for a string rule, are
/// compared by their DER encoding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchingRule {
    /// The caseIgnoreMatch rule.
    ///
    /// Strings are prepared with case folding before being compared.
    CaseIgnore,

    /// The caseExactMatch rule.
    ///
    /// Strings are prepared without case folding.
    CaseExact,

    /// The octetStringMatch rule applied to the complete encoding.
    Binary,
}

impl MatchingRule {
    /// Returns whether `assertion` matches `value`.
    pub fn compare(self, assertion: &Element, value: &Element) -> bool {
        let folding = match self {
            MatchingRule::CaseIgnore => Folding::Case,
            MatchingRule::CaseExact => Folding::None,
            MatchingRule::Binary => return binary(assertion, value),
        };
        match (assertion.expect_string(), value.expect_string()) {
            (Ok(left), Ok(right)) => {
                prepare(&left.to_unicode(), folding)
                    == prepare(&right.to_unicode(), folding)
            }
            _ => binary(assertion, value)
        }
    }

    /// Returns whether two Rust strings match.
    ///
    /// For the binary rule, the strings are compared unchanged.
    pub fn compare_str(self, assertion: &str, value: &str) -> bool {
        match self {
            MatchingRule::CaseIgnore => {
                prepare(assertion, Folding::Case)
                    == prepare(value, Folding::Case)
            }
            MatchingRule::CaseExact => {
                prepare(assertion, Folding::None)
                    == prepare(value, Folding::None)
            }
            MatchingRule::Binary => assertion == value
        }
    }
}

fn binary(left: &Element, right: &Element) -> bool {
    left.to_der() == right.to_der()
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::int::Integer;
    use crate::string::{AnyString, BmpString};
    use super::*;

    #[test]
    fn case_ignore() {
        let rule = MatchingRule::CaseIgnore;
        assert!(rule.compare(
            &Element::from(AnyString::printable_or_utf8("Example  Org")),
            &Element::utf8(" example org"),
        ));
        assert!(rule.compare(
            &Element::String(AnyString::Bmp(
                BmpString::from_str("EXAMPLE").unwrap()
            )),
            &Element::utf8("example"),
        ));
        assert!(!rule.compare(&Element::utf8("a"), &Element::utf8("b")));
    }

    #[test]
    fn case_exact() {
        let rule = MatchingRule::CaseExact;
        assert!(rule.compare(&Element::utf8("A  b"), &Element::utf8("A b")));
        assert!(!rule.compare(&Element::utf8("A"), &Element::utf8("a")));
        assert!(rule.compare_str("x\u{FB01}", "xfi"));
    }

    #[test]
    fn binary_and_fallback() {
        let int = Element::Integer(Integer::from(5));
        assert!(MatchingRule::Binary.compare(&int, &int.clone()));
        assert!(!MatchingRule::Binary.compare(
            &Element::utf8("a"),
            &Element::from(AnyString::printable_or_utf8("a"))
        ));
        assert!(!MatchingRule::CaseIgnore.compare(&int, &Element::utf8("5")));
    }
}
