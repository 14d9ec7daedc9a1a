//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ANS.1 to uniquely identify all sorts of things, as
//! well as its sibling [`RelativeOid`]. Both types are also re-exported at
//! the top-level.

use std::{cmp, error, fmt, hash, str};
use bytes::Bytes;
use crate::decode::ContentError;
use crate::encode::{PrimitiveContent, Target};
use crate::ident::Tag;
use crate::int;
use crate::mode::Mode;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’ or with
/// the integers separated by white space and enclosed in curly braces such
/// as ‘{ 1 3 6 1 5 5 7 1 }’. Individual integers or sequences of integers
/// can also be given names which then are used instead of the integers.
///
/// Values of this type keep a single object identifer in its BER encoding,
/// i.e., in some form of byte sequence. Because different representations
/// may be useful, the type is actually generic over something that can
/// become a reference to a bytes slice.
///
/// The main use for object identifiers is to compare them to predefined
/// values. For this purpose, you typically define your known object
/// identifiers in a `oid` submodule as contants of `Oid<&'static [u8]>` –
/// or its type alias [`ConstOid`]. The crate ships with a `mkoid` binary
/// which accepts object identifiers in ‘dot integer’ notation and produces
/// the `u8` array for their encoded value.
///
/// Components are arbitrary-precision integers. Parsing from a string via
/// `FromStr` checks the rules for the first two components: the first
/// component must be 0, 1, or 2 and, unless it is 2, the second component
/// must be less than 40. Violations result in an [`InvalidArcError`].
///
/// # BER Encoding
///
/// The first two components are combined into the first subidentifier as
/// `40 * first + second`. Each subidentifier is encoded in base 128 with
/// the left-most bit of all but the last octet set. The content must not be
/// empty, must not end with an octet that has the left-most bit set, and
/// no subidentifier may start with 0x80.
#[derive(Clone, Copy)]
pub struct Oid<T: AsRef<[u8]>=Bytes>(pub T);

/// A type alias for `Oid<&'static [u8]>.
///
/// This is useful when defining object identifier constants.
pub type ConstOid = Oid<&'static [u8]>;


/// # Decoding and Conversion
///
impl Oid<Bytes> {
    /// Creates an object identifier from its content octets.
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        check_content(content.as_ref())?;
        Ok(Oid(content))
    }
}

impl<T: AsRef<[u8]>> Oid<T> {
    /// Returns the content octets of the identifier.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the identifier into one atop a bytes value.
    pub fn to_bytes_oid(&self) -> Oid<Bytes> {
        Oid(Bytes::copy_from_slice(self.0.as_ref()))
    }

    /// Returns whether the identifier starts with `prefix`.
    pub fn starts_with<U: AsRef<[u8]>>(&self, prefix: &Oid<U>) -> bool {
        self.0.as_ref().starts_with(prefix.0.as_ref())
    }
}

/// # Access to Sub-identifiers
///
impl<T: AsRef<[u8]>> Oid<T> {
    /// Returns an iterator to the components of this object identifiers.
    ///
    /// # Panics
    ///
    /// The returned identifier will eventually panic if `self` does not
    /// contain a correctly encoded object identifier.
    pub fn iter(&self) -> Iter {
        Iter::new(self.0.as_ref(), Position::First)
    }
}


//--- AsRef

impl<T: AsRef<[u8]>> AsRef<[u8]> for Oid<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- FromStr

impl str::FromStr for Oid<Bytes> {
    type Err = InvalidArcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = s.split('.');
        let (first, second) = match (components.next(), components.next()) {
            (Some(first), Some(second)) => (first, second),
            _ => return Err(InvalidArcError("at least two arcs required"))
        };
        let first = match first {
            "0" => 0,
            "1" => 1,
            "2" => 2,
            _ => {
                return Err(InvalidArcError("first arc must be 0, 1, or 2"))
            }
        };
        let mut second = parse_arc(second)?;
        if first < 2 && int::strip_zeros(&second).len() > 1
            || first < 2 && second.first().copied().unwrap_or(0) >= 40
        {
            return Err(InvalidArcError(
                "second arc must be less than 40 for first arcs 0 and 1"
            ))
        }
        int::mul_add_small(&mut second, 1, 40 * first);

        let mut res = int::to_base128(&second);
        for component in components {
            res.extend_from_slice(&int::to_base128(&parse_arc(component)?));
        }
        Ok(Oid(res.into()))
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<Oid<U>> for Oid<T> {
    fn eq(&self, other: &Oid<U>) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> Eq for Oid<T> { }


//--- PartialOrd and Ord

impl<T: AsRef<[u8]>> PartialOrd for Oid<T> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: AsRef<[u8]>> Ord for Oid<T> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.as_ref().cmp(other.0.as_ref())
    }
}


//--- Hash

impl<T: AsRef<[u8]>> hash::Hash for Oid<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- Display and Debug

impl<T: AsRef<[u8]>> fmt::Display for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for component in self.iter() {
            if first {
                first = false
            }
            else {
                f.write_str(".")?;
            }
            component.fmt(f)?;
        }
        Ok(())
    }
}

impl<T: AsRef<[u8]>> fmt::Debug for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}


//--- PrimitiveContent

impl<T: AsRef<[u8]>> PrimitiveContent for Oid<T> {
    const TAG: Tag = Tag::OID;

    fn encoded_len(&self, _: Mode) -> usize {
        self.0.as_ref().len()
    }

    fn write_encoded<W: Target>(
        &self, _: Mode, target: &mut W
    ) -> Result<(), W::Error> {
        target.write_all(self.0.as_ref())
    }
}


//------------ RelativeOid ---------------------------------------------------

/// A relative object identifier.
///
/// This is a sequence of components relative to some object identifier
/// known from context. Unlike [`Oid`], there is no special treatment of the
/// first two components: each component is encoded as its own
/// subidentifier.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct RelativeOid(Bytes);

impl RelativeOid {
    /// Creates a relative identifier from its content octets.
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        check_content(content.as_ref())?;
        Ok(RelativeOid(content))
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns an iterator over the components.
    pub fn iter(&self) -> Iter {
        Iter::new(self.0.as_ref(), Position::Other)
    }
}

impl str::FromStr for RelativeOid {
    type Err = InvalidArcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut res = Vec::new();
        for component in s.split('.') {
            res.extend_from_slice(&int::to_base128(&parse_arc(component)?));
        }
        Ok(RelativeOid(res.into()))
    }
}

impl fmt::Display for RelativeOid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, component) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            component.fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RelativeOid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RelativeOid({})", self)
    }
}

impl PrimitiveContent for RelativeOid {
    const TAG: Tag = Tag::RELATIVE_OID;

    fn encoded_len(&self, _: Mode) -> usize {
        self.0.len()
    }

    fn write_encoded<W: Target>(
        &self, _: Mode, target: &mut W
    ) -> Result<(), W::Error> {
        target.write_all(self.0.as_ref())
    }
}


//------------ Component -----------------------------------------------------

/// A component of an object identifier.
///
/// Although these components are integers, they are encoded in a slightly
/// inconvenient way. Because of this we don’t convert them to native integers
/// but rather keep them as references to the underlying octets.
///
/// This type allows comparison and formatting, which hopefully is all you’ll
/// need. If you insist, the method `to_u32` allows you to try to convert a
/// component to a native integer.
#[derive(Clone, Copy, Debug)]
pub struct Component<'a> {
    /// The position of the component in the object identifer.
    position: Position,

    /// The octets of the subidentifer.
    slice: &'a [u8],
}

/// The position of the component in the object identifier.
///
/// As the first two components of the object identifer are encoded in the
/// first subidentifier of the encoded value, we have three different cases.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Position {
    /// This is the first component of the identifier.
    ///
    /// This is 0 if the integer value of the subidentifer is 0..39,
    /// 1 for 40..79, and 2 for anything else.
    First,

    /// This is the second component of the identifier.
    ///
    /// This is the integer value of the subidentifer module 40 if the value
    /// is below 80 and otherwise the value minus 80.
    Second,

    /// This is any later component of the identifier.
    ///
    /// This is identical to the integer value of the subidentifier.
    Other,
}

impl<'a> Component<'a> {
    /// Creates a new component.
    fn new(slice: &'a [u8], position: Position) -> Self {
        Component { slice, position }
    }

    /// Returns the big-endian magnitude of the component’s value.
    pub fn magnitude(self) -> Vec<u8> {
        let value = int::from_base128(self.slice);
        let small = if value.len() > 1 { None } else {
            Some(u32::from(value.first().copied().unwrap_or(0)))
        };
        match (self.position, small) {
            (Position::First, Some(n)) if n < 80 => vec![(n / 40) as u8],
            (Position::First, _) => vec![2],
            (Position::Second, Some(n)) if n < 80 => vec![(n % 40) as u8],
            (Position::Second, _) => int::sub_small(&value, 80),
            (Position::Other, _) => value,
        }
    }

    /// Attempts to convert the component to `u32`.
    ///
    /// Since the component’s value can be larger than the maximum value of
    /// a `u32`, this may fail in which case the method will return `None`.
    pub fn to_u32(self) -> Option<u32> {
        let magnitude = self.magnitude();
        let magnitude = int::strip_zeros(&magnitude);
        if magnitude.len() > 4 {
            return None
        }
        Some(magnitude.iter().fold(0, |res, &octet| {
            (res << 8) | u32::from(octet)
        }))
    }
}


//--- PartialEq and Eq

impl<'a> PartialEq for Component<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.slice == other.slice
    }
}

impl<'a> Eq for Component<'a> { }


//--- Display

impl<'a> fmt::Display for Component<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&int::to_decimal(&self.magnitude()))
    }
}


//------------ Iter ----------------------------------------------------------

/// An iterator over the sub-identifiers in an object identifier.
pub struct Iter<'a> {
    /// The remainder of the object identifier’s encoded octets.
    slice: &'a [u8],

    /// The position of the next component.
    position: Position,

    /// The first subidentifier if it still needs to produce its second arc.
    pending: Option<&'a [u8]>,
}

impl<'a> Iter<'a> {
    /// Creates a new iterator.
    fn new(slice: &'a [u8], position: Position) -> Self {
        Iter { slice, position, pending: None }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pending) = self.pending.take() {
            self.position = Position::Other;
            return Some(Component::new(pending, Position::Second))
        }
        if self.slice.is_empty() {
            return None
        }
        let end = match self.slice.iter().position(|x| x & 0x80 == 0) {
            Some(end) => end + 1,
            None => {
                panic!("illegal object identifier (last octet has bit 8 set)")
            }
        };
        let (res, tail) = self.slice.split_at(end);
        self.slice = tail;
        if self.position == Position::First {
            self.pending = Some(res);
        }
        Some(Component::new(res, self.position))
    }
}


//------------ InvalidArcError -----------------------------------------------

/// An object identifier string contained an invalid arc.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidArcError(&'static str);

impl fmt::Display for InvalidArcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid object identifier: {}", self.0)
    }
}

impl error::Error for InvalidArcError { }


//------------ Helpers -------------------------------------------------------

/// Checks the content octets of an object identifier.
fn check_content(content: &[u8]) -> Result<(), ContentError> {
    match content.last() {
        None => return Err("empty object identifier".into()),
        Some(last) if last & 0x80 != 0 => {
            return Err("truncated object identifier".into())
        }
        _ => { }
    }
    let mut start = true;
    for &octet in content {
        if start && octet == 0x80 {
            return Err("non-minimal object identifier component".into())
        }
        start = octet & 0x80 == 0;
    }
    Ok(())
}

/// Parses a single decimal arc into a magnitude.
fn parse_arc(s: &str) -> Result<Vec<u8>, InvalidArcError> {
    int::from_decimal(s).ok_or(InvalidArcError("arcs must be decimal integers"))
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn oid(s: &str) -> Oid {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display() {
        assert_eq!(oid("2.5.4.3").as_slice(), b"\x55\x04\x03");
        assert_eq!(
            oid("1.2.840.113549.1.1.11").as_slice(),
            b"\x2a\x86\x48\x86\xf7\x0d\x01\x01\x0b"
        );
        assert_eq!(oid("2.5.4.3").to_string(), "2.5.4.3");
        assert_eq!(oid("0.39").to_string(), "0.39");
        assert_eq!(
            oid("1.3.6.1.4.1.99999999999999999999").to_string(),
            "1.3.6.1.4.1.99999999999999999999"
        );
    }

    #[test]
    fn root_arcs() {
        let value = oid("2.2097071");
        assert_eq!(value.as_slice(), b"\xff\xff\x7f");
        assert_eq!(value.to_string(), "2.2097071");
        assert_eq!(oid("2.999.3").to_string(), "2.999.3");
        assert!("0.40".parse::<Oid>().is_err());
        assert!("1.1234".parse::<Oid>().is_err());
        assert!("3.1".parse::<Oid>().is_err());
        assert!("1".parse::<Oid>().is_err());
        assert!("1.2.x".parse::<Oid>().is_err());
        assert!("1.2..3".parse::<Oid>().is_err());
    }

    #[test]
    fn components() {
        let value = oid("1.3.6.1");
        let arcs: Vec<_> = value.iter().map(|x| x.to_u32().unwrap()).collect();
        assert_eq!(arcs, [1, 3, 6, 1]);
    }

    #[test]
    fn content_checks() {
        assert!(Oid::from_content(Bytes::new()).is_err());
        assert!(Oid::from_content(Bytes::from_static(b"\x2a\x86")).is_err());
        assert!(Oid::from_content(Bytes::from_static(b"\x2a\x80\x01")).is_err());
        assert!(Oid::from_content(Bytes::from_static(b"\x2a\x86\x48")).is_ok());
    }

    #[test]
    fn relative() {
        let value: RelativeOid = "8571.3.2".parse().unwrap();
        assert_eq!(value.as_slice(), b"\xc2\x7b\x03\x02");
        assert_eq!(value.to_string(), "8571.3.2");
    }

    #[test]
    fn const_oid_comparison() {
        const CN: ConstOid = Oid(&[85, 4, 3]);
        assert_eq!(oid("2.5.4.3"), CN);
        assert!(oid("2.5.4.3.1").starts_with(&CN));
    }
}
