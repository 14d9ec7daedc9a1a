//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.
//!
//! Both [`Integer`] and [`Unsigned`] keep the minimal content octets of the
//! encoded value and work on them directly. The module also contains a few
//! helpers for arbitrary-precision magnitudes that are shared with the tag
//! number and object identifier code.

use std::{cmp, error, fmt, str};
use bytes::Bytes;
use crate::decode::ContentError;
use crate::encode::{PrimitiveContent, Target};
use crate::ident::Tag;
use crate::mode::Mode;


//------------ Integer -------------------------------------------------------

/// A BER encoded integer.
///
/// As integers are variable length in BER, this type is just a simple wrapper
/// atop the underlying `Bytes` value containing the raw content. A value of
/// this type is a signed integer of arbitrary size. If a value is defined as
/// an unsigned integer, i.e., as `INTEGER (0..MAX)`, you should use the
/// sibling type [`Unsigned`] instead.
///
/// Values can be converted into Rust’s primitive integer types via the
/// `to_*` methods which fail with [`IntegerRangeError`] if the value
/// doesn’t fit.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit. The encoding must be minimal: the first nine bits of a
/// multi-octet integer must not all be the same. This is required in both
/// BER and DER.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from its content octets.
    ///
    /// Returns an error if the content is empty or not minimally encoded.
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        check_head(content.as_ref())?;
        Ok(Integer(content))
    }

    /// Creates an integer from a `i128`.
    pub fn from_i128(value: i128) -> Self {
        Integer(Bytes::copy_from_slice(
            minimal_twos(&value.to_be_bytes())
        ))
    }

    /// Creates an integer from a `i64`.
    pub fn from_i64(value: i64) -> Self {
        Self::from_i128(value.into())
    }

    /// Creates an integer from a `u64`.
    pub fn from_u64(value: u64) -> Self {
        Self::from_i128(value.into())
    }

    /// Creates a non-negative integer from a big-endian magnitude.
    pub fn from_magnitude(magnitude: &[u8]) -> Self {
        Unsigned::from_magnitude(magnitude).into()
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the integer into its content octets.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns whether the integer is less than zero.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|x| x & 0x80 != 0).unwrap_or(false)
    }

    /// Returns whether the integer is zero.
    pub fn is_zero(&self) -> bool {
        self.0.as_ref() == b"\0"
    }

    /// Returns the big-endian magnitude of the integer.
    ///
    /// The magnitude of zero is empty.
    pub fn magnitude(&self) -> Vec<u8> {
        if self.is_negative() {
            let mut res = self.0.to_vec();
            negate(&mut res);
            strip_zeros(&res).into()
        }
        else {
            strip_zeros(self.0.as_ref()).into()
        }
    }

    /// Converts the integer into a `i128`.
    pub fn to_i128(&self) -> Result<i128, IntegerRangeError> {
        if self.0.len() > 16 {
            return Err(IntegerRangeError(()))
        }
        let mut res = if self.is_negative() { -1i128 } else { 0 };
        for &octet in self.0.iter() {
            res = (res << 8) | i128::from(octet);
        }
        Ok(res)
    }

    /// Converts the integer into a `i64`.
    pub fn to_i64(&self) -> Result<i64, IntegerRangeError> {
        i64::try_from(self.to_i128()?).map_err(|_| IntegerRangeError(()))
    }

    /// Converts the integer into a `i32`.
    pub fn to_i32(&self) -> Result<i32, IntegerRangeError> {
        i32::try_from(self.to_i128()?).map_err(|_| IntegerRangeError(()))
    }

    /// Converts the integer into a `u64`.
    pub fn to_u64(&self) -> Result<u64, IntegerRangeError> {
        Unsigned::try_from(self.clone())?.to_u64()
    }

    /// Converts the integer into a `u32`.
    pub fn to_u32(&self) -> Result<u32, IntegerRangeError> {
        Unsigned::try_from(self.clone())?.to_u32()
    }
}


//--- From and TryFrom

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self::from_i64(value.into())
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Self::from_u64(value.into())
    }
}

impl From<Unsigned> for Integer {
    fn from(value: Unsigned) -> Self {
        Integer(value.0)
    }
}

impl TryFrom<Integer> for Unsigned {
    type Error = IntegerRangeError;

    fn try_from(value: Integer) -> Result<Self, Self::Error> {
        if value.is_negative() {
            Err(IntegerRangeError(()))
        }
        else {
            Ok(Unsigned(value.0))
        }
    }
}


//--- FromStr

impl str::FromStr for Integer {
    type Err = ContentError;

    /// Parses an integer from its decimal representation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(digits) => (true, digits),
            None => (false, s)
        };
        let magnitude = from_decimal(digits).ok_or(
            ContentError::from_static("invalid decimal integer")
        )?;
        if negative {
            let mut res = vec![0];
            res.extend_from_slice(&magnitude);
            negate(&mut res);
            Ok(Integer(Bytes::copy_from_slice(minimal_twos(&res))))
        }
        else {
            Ok(Self::from_magnitude(&magnitude))
        }
    }
}


//--- PartialOrd and Ord

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => cmp::Ordering::Greater,
            (true, false) => cmp::Ordering::Less,
            (false, false) => {
                self.0.len().cmp(&other.0.len()).then_with(|| {
                    self.0.as_ref().cmp(other.0.as_ref())
                })
            }
            (true, true) => {
                // Longer negative values are smaller. Equal length two’s
                // complement values compare like their octets.
                other.0.len().cmp(&self.0.len()).then_with(|| {
                    self.0.as_ref().cmp(other.0.as_ref())
                })
            }
        }
    }
}


//--- PrimitiveContent

impl PrimitiveContent for Integer {
    const TAG: Tag = Tag::INTEGER;

    fn encoded_len(&self, _mode: Mode) -> usize {
        self.0.len()
    }

    fn write_encoded<T: Target>(
        &self, _mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self.0.as_ref())
    }
}


//--- Display and Debug

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        f.write_str(&to_decimal(&self.magnitude()))
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Integer({})", self)
    }
}


//------------ Unsigned ------------------------------------------------------

/// A BER encoded unsigned integer.
///
/// As integers are variable length in BER, this type is just a simple wrapper
/// atop the underlying `Bytes` value containing the raw content. It
/// guarantees that the wrapped integer is greater or equal to 0. This equals
/// an integer defined as `INTEGER (0..MAX)` in ASN.1.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit and, for an unsigned integer, has to be unset.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Unsigned(Bytes);

impl Unsigned {
    /// Creates an unsigned integer from its content octets.
    ///
    /// Returns an error if the content is empty, not minimally encoded or
    /// negative.
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        check_head(content.as_ref())?;
        if content[0] & 0x80 != 0 {
            return Err(ContentError::from_static("negative unsigned integer"))
        }
        Ok(Unsigned(content))
    }

    /// Creates an unsigned integer from a big-endian magnitude.
    ///
    /// Leading zero octets are ignored. An empty magnitude results in zero.
    pub fn from_magnitude(magnitude: &[u8]) -> Self {
        let magnitude = strip_zeros(magnitude);
        match magnitude.first() {
            None => Unsigned(Bytes::from_static(b"\0")),
            Some(first) if first & 0x80 != 0 => {
                let mut res = Vec::with_capacity(magnitude.len() + 1);
                res.push(0);
                res.extend_from_slice(magnitude);
                Unsigned(res.into())
            }
            Some(_) => Unsigned(Bytes::copy_from_slice(magnitude))
        }
    }

    /// Creates an unsigned integer from a `u128`.
    pub fn from_u128(value: u128) -> Self {
        Self::from_magnitude(&value.to_be_bytes())
    }

    /// Creates an unsigned integer from a `u64`.
    pub fn from_u64(value: u64) -> Self {
        Self::from_magnitude(&value.to_be_bytes())
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the value into its content octets.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns the big-endian magnitude without leading zero octets.
    ///
    /// The magnitude of zero is empty.
    pub fn magnitude(&self) -> &[u8] {
        strip_zeros(self.0.as_ref())
    }

    /// Returns whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.magnitude().is_empty()
    }

    /// Converts the value into a `u128`.
    pub fn to_u128(&self) -> Result<u128, IntegerRangeError> {
        let magnitude = self.magnitude();
        if magnitude.len() > 16 {
            return Err(IntegerRangeError(()))
        }
        Ok(magnitude.iter().fold(0, |res, &octet| {
            (res << 8) | u128::from(octet)
        }))
    }

    /// Converts the value into a `u64`.
    pub fn to_u64(&self) -> Result<u64, IntegerRangeError> {
        u64::try_from(self.to_u128()?).map_err(|_| IntegerRangeError(()))
    }

    /// Converts the value into a `u32`.
    pub fn to_u32(&self) -> Result<u32, IntegerRangeError> {
        u32::try_from(self.to_u128()?).map_err(|_| IntegerRangeError(()))
    }

    /// Converts the value into a `usize`.
    pub fn to_usize(&self) -> Result<usize, IntegerRangeError> {
        usize::try_from(self.to_u128()?).map_err(|_| IntegerRangeError(()))
    }
}


//--- From

impl From<u64> for Unsigned {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u32> for Unsigned {
    fn from(value: u32) -> Self {
        Self::from_u64(value.into())
    }
}


//--- FromStr

impl str::FromStr for Unsigned {
    type Err = ContentError;

    /// Parses a value from its decimal representation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_decimal(s).map(|mag| Self::from_magnitude(&mag)).ok_or(
            ContentError::from_static("invalid decimal integer")
        )
    }
}


//--- PartialOrd and Ord

impl PartialOrd for Unsigned {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Unsigned {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| {
            self.0.as_ref().cmp(other.0.as_ref())
        })
    }
}


//--- PrimitiveContent

impl PrimitiveContent for Unsigned {
    const TAG: Tag = Tag::INTEGER;

    fn encoded_len(&self, _mode: Mode) -> usize {
        self.0.len()
    }

    fn write_encoded<T: Target>(
        &self, _mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self.0.as_ref())
    }
}


//--- Display and Debug

impl fmt::Display for Unsigned {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&to_decimal(self.magnitude()))
    }
}

impl fmt::Debug for Unsigned {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unsigned({})", self)
    }
}

impl fmt::LowerHex for Unsigned {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let magnitude = self.magnitude();
        if magnitude.is_empty() {
            return f.write_str("00")
        }
        for octet in magnitude {
            write!(f, "{:02x}", octet)?;
        }
        Ok(())
    }
}


//------------ IntegerRangeError ---------------------------------------------

/// A value didn’t fit into the requested integer type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IntegerRangeError(());

impl fmt::Display for IntegerRangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("integer out of range")
    }
}

impl error::Error for IntegerRangeError { }


//------------ Helpers -------------------------------------------------------

/// Checks that integer content octets are present and minimal.
///
/// The first nine bits of a multi-octet integer must not all be the same.
/// If we insist on this rule, we can simply compare content octets for
/// equality.
fn check_head(content: &[u8]) -> Result<(), ContentError> {
    match (content.first(), content.get(1).map(|x| x & 0x80 != 0)) {
        (None, _) => Err("empty integer".into()),
        (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
            Err("non-minimal integer".into())
        }
        _ => Ok(())
    }
}

/// Strips redundant leading octets of a two’s complement value.
fn minimal_twos(octets: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < octets.len() {
        let redundant = match octets[start] {
            0 => octets[start + 1] & 0x80 == 0,
            0xFF => octets[start + 1] & 0x80 != 0,
            _ => false,
        };
        if !redundant {
            break
        }
        start += 1;
    }
    &octets[start..]
}

/// Strips leading zero octets of a magnitude.
pub(crate) fn strip_zeros(magnitude: &[u8]) -> &[u8] {
    let start = magnitude.iter().position(|&x| x != 0).unwrap_or(
        magnitude.len()
    );
    &magnitude[start..]
}

/// Negates a two’s complement value in place.
fn negate(octets: &mut [u8]) {
    let mut carry = true;
    for octet in octets.iter_mut().rev() {
        *octet = !*octet;
        if carry {
            let (res, overflow) = octet.overflowing_add(1);
            *octet = res;
            carry = overflow;
        }
    }
}

/// Multiplies a magnitude by `mul` and adds `add`.
pub(crate) fn mul_add_small(magnitude: &mut Vec<u8>, mul: u32, add: u32) {
    let mut carry = u64::from(add);
    for octet in magnitude.iter_mut().rev() {
        let value = u64::from(*octet) * u64::from(mul) + carry;
        *octet = value as u8;
        carry = value >> 8;
    }
    while carry > 0 {
        magnitude.insert(0, carry as u8);
        carry >>= 8;
    }
}

/// Subtracts `sub` from a magnitude that is at least as large.
pub(crate) fn sub_small(magnitude: &[u8], sub: u32) -> Vec<u8> {
    let mut res = magnitude.to_vec();
    let mut borrow = i64::from(sub);
    for octet in res.iter_mut().rev() {
        if borrow == 0 {
            break
        }
        let value = i64::from(*octet) - (borrow & 0xFF);
        borrow >>= 8;
        if value < 0 {
            *octet = (value + 0x100) as u8;
            borrow += 1;
        }
        else {
            *octet = value as u8;
        }
    }
    strip_zeros(&res).into()
}

/// Divides a magnitude by `div` returning quotient and remainder.
///
/// The quotient is returned without leading zero octets.
pub(crate) fn divmod_small(magnitude: &[u8], div: u32) -> (Vec<u8>, u32) {
    let div = u64::from(div);
    let mut rem = 0u64;
    let mut quotient = Vec::with_capacity(magnitude.len());
    for &octet in magnitude {
        let cur = (rem << 8) | u64::from(octet);
        quotient.push((cur / div) as u8);
        rem = cur % div;
    }
    (strip_zeros(&quotient).into(), rem as u32)
}

/// Formats a magnitude as a decimal number.
pub(crate) fn to_decimal(magnitude: &[u8]) -> String {
    let mut magnitude = strip_zeros(magnitude).to_vec();
    if magnitude.is_empty() {
        return "0".into()
    }
    let mut digits = Vec::new();
    while !magnitude.is_empty() {
        let (quotient, rem) = divmod_small(&magnitude, 10);
        digits.push(b'0' + rem as u8);
        magnitude = quotient;
    }
    digits.iter().rev().map(|&x| char::from(x)).collect()
}

/// Parses a decimal number into a magnitude.
///
/// Returns `None` if the string is empty or contains non-digits.
pub(crate) fn from_decimal(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() {
        return None
    }
    let mut res = Vec::new();
    for ch in s.bytes() {
        if !ch.is_ascii_digit() {
            return None
        }
        mul_add_small(&mut res, 10, u32::from(ch - b'0'));
    }
    Some(res)
}

/// Collects the low seven bits of base 128 groups into a magnitude.
pub(crate) fn from_base128(groups: &[u8]) -> Vec<u8> {
    let mut res = Vec::new();
    for &group in groups {
        mul_add_small(&mut res, 128, u32::from(group & 0x7F));
    }
    strip_zeros(&res).into()
}

/// Converts a magnitude into base 128 groups with continuation bits.
///
/// Zero is encoded as a single zero octet.
pub(crate) fn to_base128(magnitude: &[u8]) -> Vec<u8> {
    let mut magnitude = strip_zeros(magnitude).to_vec();
    let mut res = Vec::new();
    loop {
        let (quotient, rem) = divmod_small(&magnitude, 128);
        res.push(rem as u8 | if res.is_empty() { 0 } else { 0x80 });
        if quotient.is_empty() {
            break
        }
        magnitude = quotient;
    }
    res.reverse();
    res
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn int(content: &'static [u8]) -> Integer {
        Integer::from_content(Bytes::from_static(content)).unwrap()
    }

    #[test]
    fn integer_content() {
        assert!(Integer::from_content(Bytes::new()).is_err());
        assert!(Integer::from_content(Bytes::from_static(b"\0\x7f")).is_err());
        assert!(Integer::from_content(Bytes::from_static(b"\xff\x80")).is_err());
        assert!(Integer::from_content(Bytes::from_static(b"\0\x80")).is_ok());
        assert!(Integer::from_content(Bytes::from_static(b"\xff\x7f")).is_ok());
    }

    #[test]
    fn integer_conversions() {
        assert_eq!(Integer::from_i64(0).as_slice(), b"\0");
        assert_eq!(Integer::from_i64(127).as_slice(), b"\x7f");
        assert_eq!(Integer::from_i64(128).as_slice(), b"\0\x80");
        assert_eq!(Integer::from_i64(-1).as_slice(), b"\xff");
        assert_eq!(Integer::from_i64(-128).as_slice(), b"\x80");
        assert_eq!(Integer::from_i64(-129).as_slice(), b"\xff\x7f");
        assert_eq!(int(b"\xff\x7f").to_i64().unwrap(), -129);
        assert_eq!(int(b"\x01\x00").to_i32().unwrap(), 256);
        assert_eq!(int(b"\xff").to_u64(), Err(IntegerRangeError(())));
        assert_eq!(
            int(b"\x01\0\0\0\0").to_u32(), Err(IntegerRangeError(()))
        );
        assert_eq!(
            Integer::from_u64(u64::MAX).to_u64().unwrap(), u64::MAX
        );
        assert!(Integer::from_u64(u64::MAX).to_i64().is_err());
    }

    #[test]
    fn integer_display_and_parse() {
        assert_eq!(int(b"\xff\x7f").to_string(), "-129");
        assert_eq!(int(b"\0").to_string(), "0");
        let big = "-340282366920938463463374607431768211457";
        let value: Integer = big.parse().unwrap();
        assert_eq!(value.to_string(), big);
        assert!(value.to_i128().is_err());
        assert_eq!(
            "-128".parse::<Integer>().unwrap().as_slice(), b"\x80"
        );
        assert!("12a".parse::<Integer>().is_err());
    }

    #[test]
    fn integer_ordering() {
        let mut values: Vec<_> = [300i64, -1, 0, -300, 5].iter().map(|&x| {
            Integer::from_i64(x)
        }).collect();
        values.sort();
        let values: Vec<_> = values.iter().map(|x| {
            x.to_i64().unwrap()
        }).collect();
        assert_eq!(values, [-300, -1, 0, 5, 300]);
    }

    #[test]
    fn unsigned() {
        assert!(Unsigned::from_content(Bytes::from_static(b"\x80")).is_err());
        assert_eq!(Unsigned::from_u64(0x80).as_slice(), b"\0\x80");
        assert_eq!(Unsigned::from_magnitude(b"").as_slice(), b"\0");
        assert_eq!(Unsigned::from_magnitude(b"\0\0\x05").as_slice(), b"\x05");
        assert_eq!(Unsigned::from_u64(0xdead).to_u32().unwrap(), 0xdead);
        assert_eq!(format!("{:x}", Unsigned::from_u64(0xdead)), "dead");
        assert_eq!(
            "18446744073709551616".parse::<Unsigned>().unwrap().magnitude(),
            b"\x01\0\0\0\0\0\0\0\0"
        );
        assert!(Unsigned::from_u64(3) < Unsigned::from_u64(256));
    }

    #[test]
    fn base128() {
        assert_eq!(to_base128(b""), b"\0");
        assert_eq!(to_base128(b"\x7f"), b"\x7f");
        assert_eq!(to_base128(b"\x80"), b"\x81\x00");
        assert_eq!(from_base128(b"\x81\x00"), b"\x80");
        assert_eq!(from_base128(b"\x80\x80\x00"), b"");
    }

    #[test]
    fn small_arithmetic() {
        assert_eq!(sub_small(b"\x01\x00", 80), b"\xb0");
        assert_eq!(sub_small(b"\x50", 80), b"");
        assert_eq!(divmod_small(b"\x01\x00", 10), (vec![25], 6));
        let mut value = vec![0xff];
        mul_add_small(&mut value, 256, 1);
        assert_eq!(value, [0xff, 0x01]);
    }
}
