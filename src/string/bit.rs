//! BER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::ContentError;
use crate::encode::{PrimitiveContent, Target};
use crate::ident::Tag;
use crate::int::Unsigned;
use crate::mode::Mode;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike
/// [`OctetString`][crate::string::OctetString]s, they do not need to contain
/// a multiple of eight bits.
///
/// You can create a bit string from its content octets via
/// [`from_content`][Self::from_content] or from the bits themselves via
/// [`new`][Self::new] or [`from_bits`][Self::from_bits].
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// When encoded in BER, bit strings can either be a primitive or
/// constructed value.
///
/// If encoded as a primitive value, the first octet of the
/// content contains the number of unused bits in the last octet and the
/// following octets contain the bits with the first bit in the most
/// significant bit of the octet. The number of unused bits must be at most
/// seven and it must be zero for an empty bit string. In DER, the unused
/// bits must be zero.
///
/// In the constructed encoding, the bit string is represented as a sequence
/// of bit strings which in turn may either be constructed or primitive
/// encodings. The only limitation in this nesting is that only the last
/// primitively encoded bit string may have a non-zero number of unused bits.
/// With DER, only the primitive form is allowed.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Unused bits in the last octet are cleared. Returns an error if
    /// `unused` is greater than seven or non-zero for empty `bits`.
    pub fn new(unused: u8, bits: Bytes) -> Result<Self, ContentError> {
        Self::check(unused, bits.as_ref())?;
        let mask = !((1u16 << unused) - 1) as u8;
        match bits.last() {
            Some(&last) if last & mask != last => {
                let mut vec = bits.to_vec();
                if let Some(last) = vec.last_mut() {
                    *last &= mask
                }
                Ok(BitString { unused, bits: vec.into() })
            }
            _ => Ok(BitString { unused, bits })
        }
    }

    /// Creates a bit string from whole octets.
    pub fn from_octets(bits: Bytes) -> Self {
        BitString { unused: 0, bits }
    }

    /// Creates a bit string from a sequence of bits.
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut octets = Vec::new();
        let mut len = 0usize;
        for bit in bits {
            if len % 8 == 0 {
                octets.push(0u8)
            }
            if bit {
                if let Some(last) = octets.last_mut() {
                    *last |= 0x80 >> (len % 8)
                }
            }
            len += 1;
        }
        BitString {
            unused: ((8 - len % 8) % 8) as u8,
            bits: octets.into()
        }
    }

    /// Creates a bit string from its content octets.
    ///
    /// In DER mode, the unused bits of the last octet must be zero.
    pub fn from_content(
        content: Bytes, mode: Mode
    ) -> Result<Self, ContentError> {
        let unused = match content.first() {
            Some(&unused) => unused,
            None => return Err("empty bit string content".into())
        };
        let bits = content.slice(1..);
        Self::check(unused, bits.as_ref())?;
        if mode.is_der() {
            if let Some(last) = bits.last() {
                if last & ((1u16 << unused) - 1) as u8 != 0 {
                    return Err("non-zero padding bits in DER".into())
                }
            }
        }
        Ok(BitString { unused, bits })
    }

    fn check(unused: u8, bits: &[u8]) -> Result<(), ContentError> {
        if unused > 7 {
            Err("invalid number of unused bits".into())
        }
        else if bits.is_empty() && unused != 0 {
            Err("unused bits in empty bit string".into())
        }
        else {
            Ok(())
        }
    }

    /// Returns the value of the given bit.
    ///
    /// Bits past the end of the string are always unset.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        self.bits[bit >> 3] & (0x80 >> (bit & 7)) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - (self.unused as usize)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }

    /// Returns `length` bits starting at bit `start` as an unsigned integer.
    ///
    /// The bit at `start` becomes the most significant bit of the result.
    /// Bits past the end of the string are read as zero.
    pub fn range(&self, start: usize, length: usize) -> Unsigned {
        let mut octets = vec![0u8; length.div_ceil(8)];
        let shift = octets.len() * 8 - length;
        for idx in 0..length {
            if self.bit(start + idx) {
                let pos = idx + shift;
                octets[pos >> 3] |= 0x80 >> (pos & 7);
            }
        }
        Unsigned::from_magnitude(&octets)
    }

    /// Returns a bit string with all trailing zero bits removed.
    ///
    /// This is the canonical form of a value of a BIT STRING type with
    /// named bits.
    pub fn without_trailing_zeroes(&self) -> Self {
        let len = match (0..self.bit_len()).rev().find(|&idx| self.bit(idx)) {
            Some(last) => last + 1,
            None => return BitString { unused: 0, bits: Bytes::new() }
        };
        let octet_len = len.div_ceil(8);
        let unused = (octet_len * 8 - len) as u8;
        let mut bits = self.bits.slice(..octet_len).to_vec();
        if let Some(last) = bits.last_mut() {
            *last &= !((1u16 << unused) - 1) as u8;
        }
        BitString { unused, bits: bits.into() }
    }
}


//--- PrimitiveContent

impl PrimitiveContent for BitString {
    const TAG: Tag = Tag::BIT_STRING;

    fn encoded_len(&self, _: Mode) -> usize {
        self.bits.len() + 1
    }

    fn write_encoded<T: Target>(
        &self, _: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(&[self.unused])?;
        target.write_all(self.bits.as_ref())
    }
}


//============ Tests =========================================================
