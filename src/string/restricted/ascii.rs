//! Character sets that are subsets of ASCII.

use std::borrow::Cow;
use crate::ident::Tag;
use super::{CharSet, CharSetError, RestrictedString};


//------------ ascii_charset -------------------------------------------------

/// Defines a character set that is a subset of ASCII.
///
/// Each octet is one character and the string’s octets are identical to
/// the octets of its UTF-8 representation.
macro_rules! ascii_charset {
    (
        $(#[$attr:meta])*
        $string:ident, $charset:ident, $tag:expr, $check:expr
    ) => {
        $(#[$attr])*
        pub type $string = RestrictedString<$charset>;

        #[doc = concat!("The character set of [`", stringify!($string), "`].")]
        #[derive(Clone, Copy, Debug)]
        pub struct $charset;

        impl CharSet for $charset {
            const TAG: Tag = $tag;

            fn next_char<I: Iterator<Item=u8>>(
                iter: &mut I
            ) -> Result<Option<char>, CharSetError> {
                let check: fn(u8) -> bool = $check;
                match iter.next() {
                    Some(ch) if check(ch) => Ok(Some(char::from(ch))),
                    Some(_) => Err(CharSetError::default()),
                    None => Ok(None)
                }
            }

            fn from_str(s: &str) -> Result<Cow<[u8]>, CharSetError> {
                let check: fn(u8) -> bool = $check;
                if s.bytes().all(check) {
                    Ok(Cow::Borrowed(s.as_bytes()))
                }
                else {
                    Err(CharSetError::default())
                }
            }
        }
    }
}


//------------ Definitions ---------------------------------------------------

ascii_charset!(
    /// A restricted character string allowing a subset of ASCII characters.
    ///
    /// This character string allows the following characters from the ASCII
    /// character set and encodes them with their ASCII value:
    ///
    /// * the letters `A` to `Z` and `a` to `z`,
    /// * the digits `0` to `9`,
    /// * the space character ` `,
    /// * the symbols `'`, `(`, `)`, `+`, `,`, `-`, `.`, `/`, `:`, `=`,
    ///   and `?`.
    PrintableString, PrintableCharSet, Tag::PRINTABLE_STRING,
    is_printable
);

ascii_charset!(
    /// A restricted character string containing ASCII characters.
    ///
    /// IA5 is the international name for ASCII, so all 128 code points are
    /// allowed.
    Ia5String, Ia5CharSet, Tag::IA5_STRING,
    |ch| ch < 0x80
);

ascii_charset!(
    /// A restricted character string containing only digits and spaces.
    NumericString, NumericCharSet, Tag::NUMERIC_STRING,
    |ch| ch == b' ' || ch.is_ascii_digit()
);

ascii_charset!(
    /// A restricted character string with the printing ASCII characters.
    ///
    /// These are the characters from 0x20 to 0x7E, i.e., ASCII minus the
    /// control characters.
    VisibleString, VisibleCharSet, Tag::VISIBLE_STRING,
    |ch| (0x20..=0x7E).contains(&ch)
);

/// Returns whether a character is allowed in a PrintableString.
pub fn is_printable(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || // A-Z a-z 0-9
    ch == b' ' || ch == b'\'' || ch == b'(' || ch == b')' ||
    ch == b'+' || ch == b',' || ch == b'-' || ch == b'.' ||
    ch == b'/' || ch == b':' || ch == b'=' || ch == b'?'
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use super::*;

    #[test]
    fn printable() {
        assert!(PrintableString::from_str("Hello (World) 1+2=3?").is_ok());
        assert!(PrintableString::from_str("foo@bar").is_err());
        assert!(PrintableString::from_str("a*").is_err());
        assert!(
            PrintableString::from_content(Bytes::from_static(b"ab&")).is_err()
        );
    }

    #[test]
    fn others() {
        assert!(NumericString::from_str("12 34").is_ok());
        assert!(NumericString::from_str("12a").is_err());
        assert!(Ia5String::from_str("foo@example.com\t").is_ok());
        assert!(Ia5String::from_str("föo").is_err());
        assert!(VisibleString::from_str("a~b").is_ok());
        assert!(VisibleString::from_str("a\nb").is_err());
        assert_eq!(
            Ia5String::from_str("example").unwrap().to_string(), "example"
        );
    }
}
