//! Character string types without a checked repertoire.
//!
//! The character sets of these types are defined through ISO 2022 escape
//! sequences which we don’t interpret. Instead, every octet is accepted and
//! transcoded as ISO 8859-1.

use std::borrow::Cow;
use crate::ident::Tag;
use super::{CharSet, CharSetError, RestrictedString};


//------------ latin1_charset ------------------------------------------------

macro_rules! latin1_charset {
    (
        $(#[$attr:meta])*
        $string:ident, $charset:ident, $tag:expr
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
                Ok(iter.next().map(char::from))
            }

            fn from_str(s: &str) -> Result<Cow<[u8]>, CharSetError> {
                latin1_from_str(s)
            }
        }
    }
}

latin1_charset!(
    /// The TeletexString type, also known as T61String.
    TeletexString, TeletexCharSet, Tag::TELETEX_STRING
);

latin1_charset!(
    /// The VideotexString type.
    VideotexString, VideotexCharSet, Tag::VIDEOTEX_STRING
);

latin1_charset!(
    /// The GraphicString type.
    GraphicString, GraphicCharSet, Tag::GRAPHIC_STRING
);

latin1_charset!(
    /// The GeneralString type.
    GeneralString, GeneralCharSet, Tag::GENERAL_STRING
);

latin1_charset!(
    /// The CHARACTER STRING type.
    CharacterString, CharacterCharSet, Tag::CHARACTER_STRING
);

latin1_charset!(
    /// The ObjectDescriptor type.
    ///
    /// This is a GraphicString with a tag of its own.
    ObjectDescriptor, ObjectDescriptorCharSet, Tag::OBJECT_DESCRIPTOR
);


/// Encodes a string as ISO 8859-1.
fn latin1_from_str(s: &str) -> Result<Cow<[u8]>, CharSetError> {
    if s.is_ascii() {
        return Ok(Cow::Borrowed(s.as_bytes()))
    }
    s.chars().map(|ch| {
        u8::try_from(u32::from(ch)).map_err(|_| CharSetError::default())
    }).collect::<Result<Vec<_>, _>>().map(Cow::Owned)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use super::*;

    #[test]
    fn transcode() {
        let s = TeletexString::from_content(
            Bytes::from_static(b"caf\xe9")
        ).unwrap();
        assert_eq!(s.to_string(), "café");
        assert_eq!(TeletexString::from_str("café").unwrap().as_slice(),
            b"caf\xe9"
        );
        assert!(GeneralString::from_str("€").is_err());
    }
}
