//! The identifier octets of a BER encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::{cmp, fmt};
use smallvec::SmallVec;
use crate::decode::{DecodeError, Source};
use crate::encode::Target;
use crate::int;


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// The class determines how the number of a tag is to be interpreted. The
/// universal class holds the types defined by ASN.1 itself. The other three
/// classes are used for tagging values within specific ASN.1 modules.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// The universal class: types defined in X.680.
    Universal,

    /// The application class: types specific to an application.
    Application,

    /// The context-specific class: tags with meaning within a structure.
    Context,

    /// The private class.
    Private,
}

impl Class {
    /// Returns the class encoded in the two left-most bits of `octet`.
    pub const fn from_u8(octet: u8) -> Self {
        match octet & 0xC0 {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }

    /// Returns the class’s two bits in the left-most position.
    pub const fn into_u8(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xC0,
        }
    }
}


//------------ TagNumber -----------------------------------------------------

/// The number of a tag.
///
/// Tag numbers are non-negative integers of arbitrary size. The vast
/// majority of them are small, so they are kept as a `u32`. Anything
/// larger is kept as a big-endian magnitude. The representation is always
/// normalized: a number that fits into a `u32` is never `Large`.
#[derive(Clone, Eq, Hash, PartialEq)]
pub enum TagNumber {
    /// A number that fits into a `u32`.
    Small(u32),

    /// A larger number as its minimal big-endian magnitude.
    Large(SmallVec<[u8; 8]>),
}

impl TagNumber {
    /// Creates a tag number from a big-endian magnitude.
    pub fn from_magnitude(magnitude: &[u8]) -> Self {
        let magnitude = int::strip_zeros(magnitude);
        if magnitude.len() <= 4 {
            TagNumber::Small(magnitude.iter().fold(0, |res, &octet| {
                (res << 8) | u32::from(octet)
            }))
        }
        else {
            TagNumber::Large(magnitude.into())
        }
    }

    /// Returns the number as a `u32` if it fits.
    pub fn to_u32(&self) -> Option<u32> {
        match *self {
            TagNumber::Small(number) => Some(number),
            TagNumber::Large(_) => None,
        }
    }

    /// Returns the big-endian magnitude of the number.
    pub fn magnitude(&self) -> SmallVec<[u8; 8]> {
        match *self {
            TagNumber::Small(number) => {
                int::strip_zeros(&number.to_be_bytes()).into()
            }
            TagNumber::Large(ref magnitude) => magnitude.clone(),
        }
    }
}

impl From<u32> for TagNumber {
    fn from(number: u32) -> Self {
        TagNumber::Small(number)
    }
}

impl PartialOrd for TagNumber {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TagNumber {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match (self, other) {
            (TagNumber::Small(left), TagNumber::Small(right)) => {
                left.cmp(right)
            }
            (TagNumber::Small(_), TagNumber::Large(_)) => cmp::Ordering::Less,
            (TagNumber::Large(_), TagNumber::Small(_)) => {
                cmp::Ordering::Greater
            }
            (TagNumber::Large(left), TagNumber::Large(right)) => {
                left.len().cmp(&right.len()).then_with(|| left.cmp(right))
            }
        }
    }
}

impl fmt::Display for TagNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TagNumber::Small(number) => number.fmt(f),
            TagNumber::Large(ref magnitude) => {
                f.write_str(&int::to_decimal(magnitude))
            }
        }
    }
}

impl fmt::Debug for TagNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class, represented by [`TagNumber`].
///
/// In BER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed. See [`Ident`] for that.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    /// The class of the tag.
    class: Class,

    /// The number of the tag within its class.
    number: TagNumber,
}

impl Tag {
    /// Creates a tag from a class and a small number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number: TagNumber::Small(number) }
    }

    /// Creates a tag from a class and an arbitrary number.
    pub fn with_number(class: Class, number: TagNumber) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in class “universal” with the given number.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in class “application” with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in class “context dependent” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in class “private” with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub fn number(&self) -> &TagNumber {
        &self.number
    }

    /// Returns the number of a universal tag if it fits into a `u32`.
    ///
    /// Returns `None` for all other tags. This is the preferred way to
    /// dispatch on universal types.
    pub fn universal_number(&self) -> Option<u32> {
        if self.class == Class::Universal {
            self.number.to_u32()
        }
        else {
            None
        }
    }

    /// Returns whether this is a context specific tag with the given number.
    pub fn is_ctx(&self, number: u32) -> bool {
        self.class == Class::Context && self.number.to_u32() == Some(number)
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690.
///
impl Tag {
    /// The tag marking the end-of-contents, UNIVERSAL 0.
    pub const END_OF_CONTENTS: Self = Self::universal(0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the ObjectDescriptor type, UNIVERSAL 7.
    pub const OBJECT_DESCRIPTOR: Self = Self::universal(7);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::universal(10);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the RELATIVE-OID type, UNIVERSAL 13.
    pub const RELATIVE_OID: Self = Self::universal(13);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::universal(18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::universal(19);

    /// The tag for the TeletexString type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Self::universal(20);

    /// The tag for the VideotexString type, UNIVERSAL 21.
    pub const VIDEOTEX_STRING: Self = Self::universal(21);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::universal(23);

    /// The tag for the GeneralizedType type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::universal(24);

    /// The tag for the GraphicString type, UNIVERSAL 25.
    pub const GRAPHIC_STRING: Self = Self::universal(25);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::universal(26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Self::universal(27);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Self::universal(28);

    /// The tag for the CHARACTER STRING type, UNIVERSAL 29.
    pub const CHARACTER_STRING: Self = Self::universal(29);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Self::universal(30);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self.universal_number() {
            Some(0) => "END-OF-CONTENTS",
            Some(1) => "BOOLEAN",
            Some(2) => "INTEGER",
            Some(3) => "BIT STRING",
            Some(4) => "OCTET STRING",
            Some(5) => "NULL",
            Some(6) => "OBJECT IDENTIFIER",
            Some(7) => "ObjectDescriptor",
            Some(8) => "EXTERNAL",
            Some(9) => "REAL",
            Some(10) => "ENUMERATED",
            Some(11) => "EMBEDDED PDV",
            Some(12) => "UTF8String",
            Some(13) => "RELATIVE-OID",
            Some(16) => "SEQUENCE",
            Some(17) => "SET",
            Some(18) => "NumericString",
            Some(19) => "PrintableString",
            Some(20) => "TeletexString",
            Some(21) => "VideotexString",
            Some(22) => "IA5String",
            Some(23) => "UTCTime",
            Some(24) => "GeneralizedTime",
            Some(25) => "GraphicString",
            Some(26) => "VisibleString",
            Some(27) => "GeneralString",
            Some(28) => "UniversalString",
            Some(29) => "CHARACTER STRING",
            Some(30) => "BMPString",
            _ => {
                match self.class {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                return write!(f, "{}]", self.number)
            }
        };
        f.write_str(name)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of an encoded value.
///
/// The identifier combines the [`Tag`] of a value with a flag that states
/// whether the value uses the primitive or constructed encoding.
///
/// # BER Encoding
///
/// The two left-most bits of the first octet encode the class, the next bit
/// is set for constructed values. If the tag number is less than 31, it is
/// encoded in the remaining five bits. Otherwise those five bits are all set
/// and the number follows in base 128 in as many octets as necessary, with
/// the left-most bit of each octet set except for the last one.
///
/// The long form must be minimal: its first octet must not be 0x80 and it
/// must not be used for numbers that fit the short form. This applies to
/// both BER and DER.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Ident {
    /// The tag.
    tag: Tag,

    /// Whether the value is constructed.
    constructed: bool,
}

impl Ident {
    /// Creates a new identifier.
    pub fn new(tag: Tag, constructed: bool) -> Self {
        Ident { tag, constructed }
    }

    /// Creates the identifier of a primitive value.
    pub fn primitive(tag: Tag) -> Self {
        Self::new(tag, false)
    }

    /// Creates the identifier of a constructed value.
    pub fn constructed(tag: Tag) -> Self {
        Self::new(tag, true)
    }

    /// Returns the tag.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Converts the identifier into its tag.
    pub fn into_tag(self) -> Tag {
        self.tag
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns whether this is the end-of-contents marker.
    pub fn is_end_of_contents(&self) -> bool {
        !self.constructed && self.tag == Tag::END_OF_CONTENTS
    }

    /// Takes the identifier octets from the beginning of a source.
    pub fn take_from(source: &mut Source) -> Result<Self, DecodeError> {
        let first = source.take_u8()?;
        let class = Class::from_u8(first);
        let constructed = first & 0x20 != 0;
        if first & 0x1F != 0x1F {
            return Ok(Ident::new(
                Tag::new(class, u32::from(first & 0x1F)), constructed
            ))
        }

        let pos = source.pos();
        let mut groups = Vec::new();
        loop {
            let octet = source.take_u8()?;
            if groups.is_empty() && octet == 0x80 {
                return Err(DecodeError::content(
                    "non-minimal long form tag number", pos
                ))
            }
            groups.push(octet);
            if octet & 0x80 == 0 {
                break
            }
        }
        let number = TagNumber::from_magnitude(&int::from_base128(&groups));
        if matches!(number, TagNumber::Small(n) if n < 0x1F) {
            return Err(DecodeError::content(
                "long form for low tag number", pos
            ))
        }
        Ok(Ident::new(Tag::with_number(class, number), constructed))
    }

    /// Decodes the identifier octets starting at `cursor` in `data`.
    ///
    /// Returns the identifier and the cursor pointing just past it.
    pub fn decode_at(
        data: &[u8], cursor: usize
    ) -> Result<(Self, usize), DecodeError> {
        let mut source = Source::with_cursor(
            bytes::Bytes::copy_from_slice(data), cursor
        );
        let res = Self::take_from(&mut source)?;
        Ok((res, source.cursor()))
    }

    /// Returns the encoded identifier octets.
    pub fn to_encoded(&self) -> SmallVec<[u8; 8]> {
        let mut first = self.tag.class.into_u8();
        if self.constructed {
            first |= 0x20
        }
        let mut res = SmallVec::new();
        match self.tag.number {
            TagNumber::Small(number) if number < 0x1F => {
                res.push(first | number as u8);
            }
            ref number => {
                res.push(first | 0x1F);
                res.extend_from_slice(&int::to_base128(&number.magnitude()));
            }
        }
        res
    }

    /// Returns the length of the encoded identifier octets.
    pub fn encoded_len(&self) -> usize {
        self.to_encoded().len()
    }

    /// Writes the encoded identifier octets to a target.
    pub fn write_encoded<T: Target>(
        &self, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(&self.to_encoded())
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "Ident({}, {})",
            self.tag,
            if self.constructed { "constructed" } else { "primitive" }
        )
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn decode(data: &[u8]) -> Result<Ident, DecodeError> {
        let (ident, cursor) = Ident::decode_at(data, 0)?;
        assert_eq!(cursor, data.len());
        Ok(ident)
    }

    #[test]
    fn short_form() {
        let ident = decode(b"\x30").unwrap();
        assert_eq!(ident.tag(), &Tag::SEQUENCE);
        assert!(ident.is_constructed());
        let ident = decode(b"\x82").unwrap();
        assert_eq!(ident.tag(), &Tag::ctx(2));
        assert!(!ident.is_constructed());
        let ident = decode(b"\x5e").unwrap();
        assert_eq!(ident.tag(), &Tag::application(30));
    }

    #[test]
    fn long_form() {
        assert_eq!(decode(b"\x1f\x1f").unwrap().tag(), &Tag::universal(31));
        assert_eq!(decode(b"\x1f\x64").unwrap().tag(), &Tag::universal(100));
        assert_eq!(
            decode(b"\xbf\x81\x00").unwrap().tag(), &Tag::ctx(128)
        );
        assert!(decode(b"\x1f\x80\x1f").is_err());
        assert!(decode(b"\x1f\x1e").is_err());
        assert!(decode(b"\x1f\x81").is_err());
    }

    #[test]
    fn large_numbers() {
        let data = b"\xdf\x81\x80\x80\x80\x80\x00";
        let ident = decode(data).unwrap();
        assert_eq!(ident.tag().class(), Class::Private);
        assert!(matches!(ident.tag().number(), TagNumber::Large(_)));
        assert_eq!(ident.tag().number().to_string(), "34359738368");
        assert_eq!(ident.to_encoded().as_slice(), data.as_ref());
    }

    #[test]
    fn encode() {
        assert_eq!(
            Ident::primitive(Tag::universal(31)).to_encoded().as_slice(),
            b"\x1f\x1f"
        );
        assert_eq!(
            Ident::primitive(Tag::universal(100)).to_encoded().as_slice(),
            b"\x1f\x64"
        );
        assert_eq!(
            Ident::constructed(Tag::ctx(3)).to_encoded().as_slice(),
            b"\xa3"
        );
    }

    #[test]
    fn ordering() {
        assert!(Tag::universal(5) < Tag::application(1));
        assert!(Tag::ctx(31) < Tag::private(0));
        assert!(
            Tag::with_number(
                Class::Context, TagNumber::from_magnitude(b"\x01\0\0\0\0")
            ) > Tag::ctx(u32::MAX)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Tag::SEQUENCE.to_string(), "SEQUENCE");
        assert_eq!(Tag::ctx(3).to_string(), "[3]");
        assert_eq!(Tag::application(7).to_string(), "[APPLICATION 7]");
    }
}
