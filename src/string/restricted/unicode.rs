//! Character strings covering Unicode.

use std::str;
use std::borrow::Cow;
use crate::ident::Tag;
use super::{CharSet, CharSetError, RestrictedString};


//------------ Utf8String ----------------------------------------------------

/// A restricted character string containing UTF-8 encoded text.
///
/// Any Unicode scalar value can be used. The octets have to be valid UTF-8.
pub type Utf8String = RestrictedString<Utf8CharSet>;

/// The character set of [`Utf8String`].
#[derive(Clone, Copy, Debug)]
pub struct Utf8CharSet;

impl CharSet for Utf8CharSet {
    const TAG: Tag = Tag::UTF8_STRING;

    fn next_char<I: Iterator<Item=u8>>(
        iter: &mut I
    ) -> Result<Option<char>, CharSetError> {
        let first = match iter.next() {
            Some(first) => first,
            None => return Ok(None)
        };
        let len = match first {
            0x00..=0x7F => return Ok(Some(char::from(first))),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(CharSetError::default())
        };
        let mut buf = [first, 0, 0, 0];
        for item in &mut buf[1..len] {
            *item = iter.next().ok_or(CharSetError::default())?;
        }
        // from_utf8 catches overlong forms and surrogates.
        let s = str::from_utf8(&buf[..len]).map_err(|_| {
            CharSetError::default()
        })?;
        Ok(s.chars().next())
    }

    fn from_str(s: &str) -> Result<Cow<[u8]>, CharSetError> {
        Ok(Cow::Borrowed(s.as_bytes()))
    }

    fn check<I: Iterator<Item=u8>>(iter: &mut I) -> Result<(), CharSetError> {
        let octets: Vec<u8> = iter.collect();
        str::from_utf8(&octets).map(|_| ()).map_err(|_| {
            CharSetError::default()
        })
    }
}


//------------ BmpString -----------------------------------------------------

/// A restricted character string with characters of the Basic Multilingual
/// Plane.
///
/// Each character is encoded in two octets as big-endian UCS-2. Surrogate
/// code points are not allowed.
pub type BmpString = RestrictedString<BmpCharSet>;

/// The character set of [`BmpString`].
#[derive(Clone, Copy, Debug)]
pub struct BmpCharSet;

impl CharSet for BmpCharSet {
    const TAG: Tag = Tag::BMP_STRING;

    fn next_char<I: Iterator<Item=u8>>(
        iter: &mut I
    ) -> Result<Option<char>, CharSetError> {
        let first = match iter.next() {
            Some(first) => first,
            None => return Ok(None)
        };
        let second = iter.next().ok_or(CharSetError::default())?;
        char::from_u32(u32::from(first) << 8 | u32::from(second)).map(Some)
            .ok_or(CharSetError::default())
    }

    fn from_str(s: &str) -> Result<Cow<[u8]>, CharSetError> {
        let mut res = Vec::with_capacity(s.len() * 2);
        for ch in s.chars() {
            let ch = u16::try_from(u32::from(ch)).map_err(|_| {
                CharSetError::default()
            })?;
            res.extend_from_slice(&ch.to_be_bytes());
        }
        Ok(Cow::Owned(res))
    }
}


//------------ UniversalString -----------------------------------------------

/// A restricted character string with all of Unicode encoded as UCS-4.
///
/// Each character is encoded in four octets as big-endian UCS-4.
pub type UniversalString = RestrictedString<UniversalCharSet>;

/// The character set of [`UniversalString`].
#[derive(Clone, Copy, Debug)]
pub struct UniversalCharSet;

impl CharSet for UniversalCharSet {
    const TAG: Tag = Tag::UNIVERSAL_STRING;

    fn next_char<I: Iterator<Item=u8>>(
        iter: &mut I
    ) -> Result<Option<char>, CharSetError> {
        let first = match iter.next() {
            Some(first) => first,
            None => return Ok(None)
        };
        let mut res = u32::from(first);
        for _ in 0..3 {
            res = res << 8 | u32::from(
                iter.next().ok_or(CharSetError::default())?
            );
        }
        char::from_u32(res).map(Some).ok_or(CharSetError::default())
    }

    fn from_str(s: &str) -> Result<Cow<[u8]>, CharSetError> {
        Ok(Cow::Owned(
            s.chars().flat_map(|ch| u32::from(ch).to_be_bytes()).collect()
        ))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use super::*;

    #[test]
    fn utf8() {
        assert!(Utf8String::from_content(Bytes::from_static(b"\xc3\xa9")).is_ok());
        assert!(Utf8String::from_content(Bytes::from_static(b"\xc3")).is_err());
        assert!(
            Utf8String::from_content(Bytes::from_static(b"\xed\xa0\x80"))
                .is_err()
        );
        let s = Utf8String::from_str("Grüße").unwrap();
        assert_eq!(s.chars().count(), 5);
        assert_eq!(s.to_string(), "Grüße");
    }

    #[test]
    fn bmp() {
        let s = BmpString::from_str("aé").unwrap();
        assert_eq!(s.as_slice(), b"\x00a\x00\xe9");
        assert_eq!(s.to_string(), "aé");
        assert!(BmpString::from_content(Bytes::from_static(b"\x00")).is_err());
        assert!(
            BmpString::from_content(Bytes::from_static(b"\xd8\x00")).is_err()
        );
        assert!(BmpString::from_str("😀").is_err());
    }

    #[test]
    fn universal() {
        let s = UniversalString::from_str("😀").unwrap();
        assert_eq!(s.as_slice(), b"\x00\x01\xf6\x00");
        assert_eq!(s.to_string(), "😀");
        assert!(
            UniversalString::from_content(Bytes::from_static(b"\0\0\0"))
                .is_err()
        );
        assert!(
            UniversalString::from_content(Bytes::from_static(b"\0\x11\0\0"))
                .is_err()
        );
    }
}
