//! String preparation for attribute value matching.
//!
//! Before two directory strings can be compared, they have to be brought
//! into a canonical form. RFC 4518 defines this as a sequence of six
//! stages applied in order:
//!
//! 1. [`transcode`]: the ASN.1 string is converted into Unicode,
//! 2. [`map`]: certain characters are removed or replaced by a space,
//!    and optionally case is folded,
//! 3. [`normalize`]: the string is normalized into Unicode form KC,
//! 4. [`prohibit`]: strings with prohibited characters are rejected,
//! 5. [`check_bidi`]: bidirectional characters are checked,
//! 6. [`insignificant_space`]: spaces are normalized.
//!
//! We currently accept all characters, so stages 4 and 5 leave the string
//! unchanged.
//!
//! The function [`prepare`] runs stages 2 through 6 on a Rust string.
//! Comparison of values happens via [`MatchingRule`].

pub use self::rule::MatchingRule;

use unicode_normalization::UnicodeNormalization;
use crate::string::AnyString;

mod rule;


//------------ Folding -------------------------------------------------------

/// Whether case is folded during mapping.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Folding {
    /// Keep the case of all characters.
    None,

    /// Map all characters to lower case.
    Case,
}


//------------ Stages --------------------------------------------------------

/// Converts a string of any type into Unicode.
pub fn transcode(value: &AnyString) -> String {
    value.to_unicode()
}

/// Maps characters.
///
/// Soft hyphens, joiners, variation selectors, most control characters and
/// zero width spaces are removed. Tabs, line breaks and all separator
/// characters are replaced by a space. If `folding` asks for it, case is
/// folded, too.
pub fn map(s: &str, folding: Folding) -> String {
    let mut res = String::with_capacity(s.len());
    for ch in s.chars() {
        if maps_to_nothing(ch) {
            continue
        }
        if maps_to_space(ch) {
            res.push(' ');
        }
        else if folding == Folding::Case {
            res.extend(ch.to_lowercase());
        }
        else {
            res.push(ch);
        }
    }
    res
}

/// Normalizes the string into Unicode Normalization Form KC.
pub fn normalize(s: &str) -> String {
    s.nfkc().collect()
}

/// Checks for prohibited characters.
///
/// Unassigned code points and the characters RFC 4518 prohibits are
/// currently accepted, so the string is returned as is.
pub fn prohibit(s: String) -> String {
    s
}

/// Checks bidirectional characters.
///
/// This is currently a no-op.
pub fn check_bidi(s: String) -> String {
    s
}

/// Handles insignificant spaces.
///
/// A string without any non-space characters becomes exactly two spaces.
/// Otherwise, leading and trailing spaces are removed, each run of inner
/// spaces is replaced by a single space, and the result is surrounded by
/// one space on either side.
pub fn insignificant_space(s: &str) -> String {
    let mut words = s.split(' ').filter(|word| !word.is_empty()).peekable();
    if words.peek().is_none() {
        return String::from("  ")
    }
    let mut res = String::with_capacity(s.len() + 2);
    res.push(' ');
    for word in words {
        res.push_str(word);
        res.push(' ');
    }
    res
}

/// Prepares a string for comparison.
///
/// This runs stages two to six. The function is idempotent: preparing
/// an already prepared string doesn’t change it.
pub fn prepare(s: &str, folding: Folding) -> String {
    let mut s = normalize(&map(s, folding));
    if folding == Folding::Case {
        // Compatibility characters may decompose into upper case.
        s = normalize(&s.to_lowercase());
    }
    let s = check_bidi(prohibit(s));
    insignificant_space(&s)
}

/// Prepares a string value of any type for comparison.
pub fn prepare_value(value: &AnyString, folding: Folding) -> String {
    prepare(&transcode(value), folding)
}


//------------ Helpers -------------------------------------------------------

fn maps_to_nothing(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x0000..=0x0008 | 0x000E..=0x001F | 0x007F..=0x0084
        | 0x0086..=0x009F | 0x00AD | 0x034F | 0x06DD | 0x070F
        | 0x1806 | 0x180B..=0x180E | 0x200B..=0x200F | 0x202A..=0x202E
        | 0x2060..=0x2063 | 0x206A..=0x206F | 0xFE00..=0xFE0F | 0xFEFF
        | 0xFFF9..=0xFFFC | 0x1D173..=0x1D17A | 0xE0001 | 0xE0020..=0xE007F
    )
}

fn maps_to_space(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x0009..=0x000D | 0x0085 | 0x00A0 | 0x1680 | 0x2000..=0x200A
        | 0x2028 | 0x2029 | 0x202F | 0x205F | 0x3000
    )
}


//============ Tests =========================================================
