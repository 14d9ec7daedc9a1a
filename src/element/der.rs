//! Pre-encoded values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::{DecodeError, Source};
use crate::ident::{Ident, Tag};
use crate::length::Length;
use crate::mode::Mode;
use super::Element;


//------------ DerData -------------------------------------------------------

/// The complete DER encoding of a single value.
///
/// This allows embedding values that have been encoded elsewhere, e.g., a
/// signed structure whose octets must be kept exactly, into an element
/// tree. Upon creation, only the identifier and length octets are checked;
/// the content is not parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DerData {
    /// The identifier of the value.
    ident: Ident,

    /// The length of the identifier and length octets.
    header_len: usize,

    /// The complete encoding.
    bytes: Bytes,
}

impl DerData {
    /// Creates a value from the complete encoding.
    ///
    /// Returns an error unless `bytes` contains exactly one value with a
    /// definite length.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, DecodeError> {
        let bytes = bytes.into();
        let mut source = Source::new(bytes.clone());
        let ident = Ident::take_from(&mut source)?;
        let length = Length::take_from(&mut source, Mode::Der)?;
        let header_len = source.cursor();
        match length.definite() {
            Some(len) if len == source.remaining() => { }
            Some(len) if len > source.remaining() => {
                return Err(source.content_err("unexpected end of data"))
            }
            _ => {
                return Err(source.content_err("trailing data"))
            }
        }
        Ok(DerData { ident, header_len, bytes })
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> &Tag {
        self.ident.tag()
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(&self) -> bool {
        self.ident.is_constructed()
    }

    /// Returns the complete encoding.
    pub fn as_slice(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Returns the content octets.
    pub fn content(&self) -> &[u8] {
        &self.bytes[self.header_len..]
    }

    /// Converts the value into the complete encoding.
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Decodes the value into an element.
    pub fn to_element(&self) -> Result<Element, DecodeError> {
        Element::from_der(self.bytes.clone())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::encode::Values;

    #[test]
    fn new() {
        let der = DerData::new(&b"\x30\x03\x02\x01\x05"[..]).unwrap();
        assert!(der.is_constructed());
        assert_eq!(der.tag(), &Tag::SEQUENCE);
        assert_eq!(der.content(), b"\x02\x01\x05");
        assert!(DerData::new(&b"\x30\x04\x02\x01\x05"[..]).is_err());
        assert!(DerData::new(&b"\x30\x02\x02\x01\x05"[..]).is_err());
        assert!(DerData::new(&b"\x30\x80\x00\x00"[..]).is_err());
    }

    #[test]
    fn embedded() {
        let der = DerData::new(&b"\x02\x01\x05"[..]).unwrap();
        let element = Element::sequence(vec![
            Element::Der(der.clone()), Element::Der(der).implicit(0)
        ]);
        assert_eq!(
            element.to_vec(Mode::Der), b"\x30\x06\x02\x01\x05\x80\x01\x05"
        );
    }
}
