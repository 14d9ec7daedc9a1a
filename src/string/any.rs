//! A character string of any type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::ident::Tag;
use super::restricted::{
    BmpString, CharSetError, CharacterString, GeneralString, GraphicString,
    Ia5String, NumericString, PrintableString, TeletexString,
    UniversalString, Utf8String, VideotexString, VisibleString,
};


//------------ AnyString -----------------------------------------------------

/// A value of one of the restricted character string types.
///
/// This is used wherever a value may be any kind of string, most notably
/// for the DirectoryString CHOICE of X.520 and for decoded element trees.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AnyString {
    Utf8(Utf8String),
    Numeric(NumericString),
    Printable(PrintableString),
    Teletex(TeletexString),
    Videotex(VideotexString),
    Ia5(Ia5String),
    Graphic(GraphicString),
    Visible(VisibleString),
    General(GeneralString),
    Universal(UniversalString),
    Character(CharacterString),
    Bmp(BmpString),
}

impl AnyString {
    /// Creates a string from content octets of the universal type `number`.
    ///
    /// Returns `Ok(None)` if the number isn’t that of a string type.
    pub fn from_content(
        number: u32, content: Bytes
    ) -> Result<Option<Self>, CharSetError> {
        Ok(Some(match number {
            12 => AnyString::Utf8(Utf8String::from_content(content)?),
            18 => AnyString::Numeric(NumericString::from_content(content)?),
            19 => {
                AnyString::Printable(PrintableString::from_content(content)?)
            }
            20 => AnyString::Teletex(TeletexString::from_content(content)?),
            21 => {
                AnyString::Videotex(VideotexString::from_content(content)?)
            }
            22 => AnyString::Ia5(Ia5String::from_content(content)?),
            25 => AnyString::Graphic(GraphicString::from_content(content)?),
            26 => AnyString::Visible(VisibleString::from_content(content)?),
            27 => AnyString::General(GeneralString::from_content(content)?),
            28 => {
                AnyString::Universal(UniversalString::from_content(content)?)
            }
            29 => {
                AnyString::Character(CharacterString::from_content(content)?)
            }
            30 => AnyString::Bmp(BmpString::from_content(content)?),
            _ => return Ok(None)
        }))
    }

    /// Creates a UTF8String value.
    pub fn utf8(s: &str) -> Self {
        // UTF-8 accepts every str.
        match Utf8String::from_str(s) {
            Ok(s) => AnyString::Utf8(s),
            Err(_) => unreachable!(),
        }
    }

    /// Creates a PrintableString if possible or a UTF8String otherwise.
    pub fn printable_or_utf8(s: &str) -> Self {
        match PrintableString::from_str(s) {
            Ok(s) => AnyString::Printable(s),
            Err(_) => Self::utf8(s),
        }
    }

    /// Returns the tag of the string’s type.
    pub fn tag(&self) -> Tag {
        match *self {
            AnyString::Utf8(_) => Tag::UTF8_STRING,
            AnyString::Numeric(_) => Tag::NUMERIC_STRING,
            AnyString::Printable(_) => Tag::PRINTABLE_STRING,
            AnyString::Teletex(_) => Tag::TELETEX_STRING,
            AnyString::Videotex(_) => Tag::VIDEOTEX_STRING,
            AnyString::Ia5(_) => Tag::IA5_STRING,
            AnyString::Graphic(_) => Tag::GRAPHIC_STRING,
            AnyString::Visible(_) => Tag::VISIBLE_STRING,
            AnyString::General(_) => Tag::GENERAL_STRING,
            AnyString::Universal(_) => Tag::UNIVERSAL_STRING,
            AnyString::Character(_) => Tag::CHARACTER_STRING,
            AnyString::Bmp(_) => Tag::BMP_STRING,
        }
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        match *self {
            AnyString::Utf8(ref s) => s.as_slice(),
            AnyString::Numeric(ref s) => s.as_slice(),
            AnyString::Printable(ref s) => s.as_slice(),
            AnyString::Teletex(ref s) => s.as_slice(),
            AnyString::Videotex(ref s) => s.as_slice(),
            AnyString::Ia5(ref s) => s.as_slice(),
            AnyString::Graphic(ref s) => s.as_slice(),
            AnyString::Visible(ref s) => s.as_slice(),
            AnyString::General(ref s) => s.as_slice(),
            AnyString::Universal(ref s) => s.as_slice(),
            AnyString::Character(ref s) => s.as_slice(),
            AnyString::Bmp(ref s) => s.as_slice(),
        }
    }

    /// Transcodes the string into a Rust string.
    pub fn to_unicode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnyString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AnyString::Utf8(ref s) => s.fmt(f),
            AnyString::Numeric(ref s) => s.fmt(f),
            AnyString::Printable(ref s) => s.fmt(f),
            AnyString::Teletex(ref s) => s.fmt(f),
            AnyString::Videotex(ref s) => s.fmt(f),
            AnyString::Ia5(ref s) => s.fmt(f),
            AnyString::Graphic(ref s) => s.fmt(f),
            AnyString::Visible(ref s) => s.fmt(f),
            AnyString::General(ref s) => s.fmt(f),
            AnyString::Universal(ref s) => s.fmt(f),
            AnyString::Character(ref s) => s.fmt(f),
            AnyString::Bmp(ref s) => s.fmt(f),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_content() {
        let s = AnyString::from_content(
            30, Bytes::from_static(b"\x00h\x00i")
        ).unwrap().unwrap();
        assert_eq!(s.tag(), Tag::BMP_STRING);
        assert_eq!(s.to_unicode(), "hi");
        assert!(AnyString::from_content(4, Bytes::new()).unwrap().is_none());
        assert!(
            AnyString::from_content(19, Bytes::from_static(b"@")).is_err()
        );
    }

    #[test]
    fn printable_or_utf8() {
        assert_eq!(
            AnyString::printable_or_utf8("Example").tag(),
            Tag::PRINTABLE_STRING
        );
        assert_eq!(
            AnyString::printable_or_utf8("foo@example").tag(),
            Tag::UTF8_STRING
        );
    }
}
