//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::decode::{DecodeError, Source};
use crate::encode::Target;
use crate::mode::Mode;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-value marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets. A first octet of 0xFF is reserved and
/// always illegal.
///
/// Under DER rules, a definite length must be encoded in the minimum number
/// of octets and the indefinite form is not allowed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    /// A length value in its definite form.
    Definite(usize),

    /// A length value in its indefinite form.
    Indefinite,
}

impl Length {
    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns whether the length is indefinite.
    pub fn is_indefinite(self) -> bool {
        matches!(self, Length::Indefinite)
    }

    /// Takes a length from the beginning of a source.
    pub fn take_from(
        source: &mut Source, mode: Mode
    ) -> Result<Self, DecodeError> {
        let pos = source.pos();
        let len = match source.take_u8()? {
            // Bit 7 clear: the octet is the length.
            n if (n & 0x80) == 0 => return Ok(Length::Definite(n as usize)),

            0x80 => {
                if mode.allows_indefinite() {
                    return Ok(Length::Indefinite)
                }
                return Err(DecodeError::content(
                    "indefinite length in DER", pos
                ))
            }

            0xFF => {
                return Err(DecodeError::content("illegal length octets", pos))
            }

            // Anything else: clear left bit, number of octets.
            n => (n & 0x7F) as usize
        };

        let octets = source.take_bytes(len)?;
        if mode.is_der() {
            // The second octet can’t be zero and it can’t be less than
            // 0x80 if it is the last octet as well. In both cases, there
            // is a shorter encoding.
            if octets[0] == 0 || (octets[0] < 0x80 && len == 1) {
                return Err(DecodeError::content(
                    "non-minimal length in DER", pos
                ))
            }
        }
        let octets = crate::int::strip_zeros(octets.as_ref());
        if octets.len() > std::mem::size_of::<usize>() {
            return Err(DecodeError::content("excessive length", pos))
        }
        Ok(Length::Definite(octets.iter().fold(0, |res, &octet| {
            (res << 8) | usize::from(octet)
        })))
    }

    /// Decodes the length octets starting at `cursor` in `data`.
    ///
    /// Returns the length and the cursor pointing just past it.
    pub fn decode_at(
        data: &[u8], cursor: usize, mode: Mode
    ) -> Result<(Self, usize), DecodeError> {
        let mut source = Source::with_cursor(
            Bytes::copy_from_slice(data), cursor
        );
        let res = Self::take_from(&mut source, mode)?;
        Ok((res, source.cursor()))
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Definite(len) if len > 0x7F => {
                1 + significant_octets(len)
            }
            _ => 1
        }
    }

    /// Writes the encoded length to a target.
    ///
    /// Definite lengths are always written in their minimal form.
    pub fn write_encoded<T: Target>(
        self, target: &mut T
    ) -> Result<(), T::Error> {
        match self {
            Length::Indefinite => target.write_all(b"\x80"),
            Length::Definite(len) if len > 0x7F => {
                let count = significant_octets(len);
                target.write_all(&[0x80 | count as u8])?;
                let octets = len.to_be_bytes();
                target.write_all(&octets[octets.len() - count..])
            }
            Length::Definite(len) => target.write_all(&[len as u8]),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Length::Definite(len) => len.fmt(f),
            Length::Indefinite => f.write_str("indefinite"),
        }
    }
}


//------------ Helpers -------------------------------------------------------

/// Returns the number of octets necessary to encode `len`.
fn significant_octets(len: usize) -> usize {
    ((usize::BITS - len.leading_zeros()) as usize).div_ceil(8).max(1)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn take_from(
        data: &[u8], mode: Mode
    ) -> Result<Option<usize>, DecodeError> {
        let (res, cursor) = Length::decode_at(data, 0, mode)?;
        assert_eq!(cursor, data.len(), "trailing data");
        Ok(res.definite())
    }

    #[test]
    fn ber_take_from() {
        let ber = Mode::Ber;
        assert_eq!(take_from(b"\x00", ber).unwrap(), Some(0x00));
        assert_eq!(take_from(b"\x12", ber).unwrap(), Some(0x12));
        assert_eq!(take_from(b"\x7f", ber).unwrap(), Some(0x7f));
        assert_eq!(take_from(b"\x80", ber).unwrap(), None);
        assert_eq!(take_from(b"\x81\x00", ber).unwrap(), Some(0));
        assert_eq!(take_from(b"\x81\xF0", ber).unwrap(), Some(0xF0));
        assert_eq!(take_from(b"\x82\x00\x00", ber).unwrap(), Some(0));
        assert_eq!(take_from(b"\x82\xF0\x0E", ber).unwrap(), Some(0xF00E));
        assert_eq!(take_from(b"\x82\x00\x0E", ber).unwrap(), Some(0x0E));
        assert!(take_from(b"\xFF", ber).is_err());
        assert!(take_from(b"\x82\x01", ber).is_err());
    }

    #[test]
    fn der_take_from() {
        let der = Mode::Der;
        assert_eq!(take_from(b"\x00", der).unwrap(), Some(0x00));
        assert_eq!(take_from(b"\x12", der).unwrap(), Some(0x12));
        assert_eq!(take_from(b"\x7f", der).unwrap(), Some(0x7f));
        assert!(take_from(b"\x80", der).is_err());
        assert!(take_from(b"\x81\x00", der).is_err());
        assert!(take_from(b"\x81\x7f", der).is_err());
        assert_eq!(take_from(b"\x81\x80", der).unwrap(), Some(0x80));
        assert_eq!(take_from(b"\x81\xF0", der).unwrap(), Some(0xF0));
        assert!(take_from(b"\x82\x00\x00", der).is_err());
        assert_eq!(take_from(b"\x82\xF0\x0E", der).unwrap(), Some(0xF00E));
        assert!(take_from(b"\x82\x00\x0E", der).is_err());
        assert!(take_from(b"\xFF", der).is_err());
    }

    #[test]
    fn encode() {
        fn step(l: Length, res: &[u8]) {
            let mut vec = Vec::new();
            crate::encode::infallible(l.write_encoded(&mut vec));
            assert_eq!(vec.as_slice(), res, "encoding failed for {l:?}");
            assert_eq!(l.encoded_len(), res.len());
        }

        step(Length::Indefinite, b"\x80");
        step(Length::Definite(0), b"\x00");
        step(Length::Definite(0x12), b"\x12");
        step(Length::Definite(0x7f), b"\x7f");
        step(Length::Definite(0x80), b"\x81\x80");
        step(Length::Definite(0xdead), b"\x82\xde\xad");
        step(Length::Definite(0x01_0000), b"\x83\x01\x00\x00");
    }
}
