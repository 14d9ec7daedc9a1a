//! The element tree.
//!
//! An [`Element`] is a single encoded value together with everything it
//! contains. Universal types are decoded into typed variants, constructed
//! SEQUENCE and SET values become [`Sequence`] and [`Set`] holding their
//! children, and values of the other tag classes are kept as
//! [`TaggedElement`]s whose content can later be interpreted as explicitly
//! or implicitly tagged.
//!
//! Elements are decoded via [`Element::decode`] or its shortcuts
//! [`Element::from_der`] and [`Element::from_ber`]. They are encoded via
//! their implementation of the [`Values`] trait, e.g.,
//! `element.to_bytes(Mode::Der)` or [`Element::to_der`].
//!
//! Elements are immutable. The various `with_*` methods return modified
//! copies.

pub use self::constructed::{Sequence, Set};
pub use self::der::DerData;
pub use self::fields::Fields;
pub use self::tagged::TaggedElement;

use bytes::Bytes;
use crate::decode::{ContentError, DecodeError, Source};
use crate::encode::{
    PrimitiveContent, Target, Values, write_end_of_contents, write_header,
    write_indefinite_header,
};
use crate::error::{Error, UnexpectedTypeError};
use crate::ident::{Class, Ident, Tag};
use crate::int::Integer;
use crate::length::Length;
use crate::mode::Mode;
use crate::oid::{Oid, RelativeOid};
use crate::string::{AnyString, BitString, ObjectDescriptor, OctetString};
use crate::time::{GeneralizedTime, UtcTime};

mod constructed;
mod der;
mod fields;
mod tagged;


/// The maximum nesting depth of constructed values when decoding.
const MAX_DEPTH: usize = 64;


//------------ Element -------------------------------------------------------

/// A single BER-encoded value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Element {
    /// The end-of-contents marker.
    EndOfContents,

    /// A BOOLEAN.
    Boolean(bool),

    /// An INTEGER.
    Integer(Integer),

    /// An ENUMERATED.
    Enumerated(Integer),

    /// A BIT STRING.
    BitString(BitString),

    /// An OCTET STRING.
    OctetString(OctetString),

    /// NULL.
    Null,

    /// An OBJECT IDENTIFIER.
    Oid(Oid),

    /// A RELATIVE-OID.
    RelativeOid(RelativeOid),

    /// An ObjectDescriptor.
    ObjectDescriptor(ObjectDescriptor),

    /// One of the restricted character string types.
    String(AnyString),

    /// A UTCTime.
    UtcTime(UtcTime),

    /// A GeneralizedTime.
    GeneralizedTime(GeneralizedTime),

    /// A SEQUENCE or SEQUENCE OF.
    Sequence(Sequence),

    /// A SET or SET OF.
    Set(Set),

    /// A value of the application, context-specific, or private class.
    Tagged(TaggedElement),

    /// A constructed value of a universal type we don’t know.
    Unspecified(Unspecified),

    /// A complete, already encoded value.
    Der(DerData),
}


/// # Decoding
///
impl Element {
    /// Decodes a single DER-encoded element.
    ///
    /// The data must contain exactly one element.
    pub fn from_der(data: impl Into<Bytes>) -> Result<Self, DecodeError> {
        Self::decode(Mode::Der, data)
    }

    /// Decodes a single BER-encoded element.
    ///
    /// The data must contain exactly one element.
    pub fn from_ber(data: impl Into<Bytes>) -> Result<Self, DecodeError> {
        Self::decode(Mode::Ber, data)
    }

    /// Decodes a single element using the given mode.
    ///
    /// Returns an error if the data is malformed or if there is data left
    /// after the element.
    pub fn decode(
        mode: Mode, data: impl Into<Bytes>
    ) -> Result<Self, DecodeError> {
        let mut source = Source::new(data);
        let res = Self::take_from(&mut source, mode)?;
        if !source.is_exhausted() {
            return Err(source.content_err("trailing data"))
        }
        Ok(res)
    }

    /// Decodes an element starting at `cursor`.
    ///
    /// Returns the element and the cursor pointing right after it.
    pub fn decode_at(
        mode: Mode, data: impl Into<Bytes>, cursor: usize
    ) -> Result<(Self, usize), DecodeError> {
        let mut source = Source::with_cursor(data, cursor);
        let res = Self::take_from(&mut source, mode)?;
        Ok((res, source.cursor()))
    }

    /// Takes a single element from the beginning of a source.
    pub fn take_from(
        source: &mut Source, mode: Mode
    ) -> Result<Self, DecodeError> {
        take_element(source, mode, 0)
    }
}


/// # Construction
///
impl Element {
    /// Creates a SEQUENCE from its elements.
    pub fn sequence(items: impl IntoIterator<Item = Element>) -> Self {
        Element::Sequence(items.into_iter().collect())
    }

    /// Creates a SET from its elements.
    ///
    /// The elements are kept in the given order.
    pub fn set(items: impl IntoIterator<Item = Element>) -> Self {
        Element::Set(items.into_iter().collect())
    }

    /// Creates a SET OF from its elements in DER order.
    pub fn sorted_set_of(items: impl IntoIterator<Item = Element>) -> Self {
        Element::Set(items.into_iter().collect::<Set>().sorted_set_of())
    }

    /// Creates a UTF8String element.
    pub fn utf8(s: &str) -> Self {
        Element::String(AnyString::utf8(s))
    }

    /// Wraps the element in an explicit context-specific tag.
    pub fn explicit(self, number: u32) -> Self {
        Element::Tagged(TaggedElement::new_explicit(Tag::ctx(number), self))
    }

    /// Replaces the tag of the element with a context-specific tag.
    pub fn implicit(self, number: u32) -> Self {
        self.with_tag(Tag::ctx(number))
    }

    /// Replaces the tag of the element.
    ///
    /// This is implicit tagging: the content and the constructed flag stay
    /// the same.
    pub fn with_tag(self, tag: Tag) -> Self {
        Element::Tagged(TaggedElement::new_implicit(tag, self))
    }

    /// Returns a copy of the element using the given length form.
    ///
    /// Only constructed values can use the indefinite form. For all other
    /// elements, this returns the element unchanged.
    pub fn with_indefinite_length(self, indefinite: bool) -> Self {
        match self {
            Element::Sequence(inner) => {
                Element::Sequence(inner.with_indefinite_length(indefinite))
            }
            Element::Set(inner) => {
                Element::Set(inner.with_indefinite_length(indefinite))
            }
            Element::Tagged(inner) => {
                Element::Tagged(inner.with_indefinite_length(indefinite))
            }
            Element::Unspecified(inner) => {
                Element::Unspecified(Unspecified { indefinite, .. inner })
            }
            other => other,
        }
    }
}


/// # Properties
///
impl Element {
    /// Returns the tag of the element.
    pub fn tag(&self) -> Tag {
        match *self {
            Element::EndOfContents => Tag::END_OF_CONTENTS,
            Element::Boolean(_) => Tag::BOOLEAN,
            Element::Integer(_) => Tag::INTEGER,
            Element::Enumerated(_) => Tag::ENUMERATED,
            Element::BitString(_) => Tag::BIT_STRING,
            Element::OctetString(_) => Tag::OCTET_STRING,
            Element::Null => Tag::NULL,
            Element::Oid(_) => Tag::OID,
            Element::RelativeOid(_) => Tag::RELATIVE_OID,
            Element::ObjectDescriptor(_) => Tag::OBJECT_DESCRIPTOR,
            Element::String(ref inner) => inner.tag(),
            Element::UtcTime(_) => Tag::UTC_TIME,
            Element::GeneralizedTime(_) => Tag::GENERALIZED_TIME,
            Element::Sequence(_) => Tag::SEQUENCE,
            Element::Set(_) => Tag::SET,
            Element::Tagged(ref inner) => inner.tag().clone(),
            Element::Unspecified(ref inner) => inner.tag.clone(),
            Element::Der(ref inner) => inner.tag().clone(),
        }
    }

    /// Returns whether the element uses the constructed encoding.
    pub fn is_constructed(&self) -> bool {
        match *self {
            Element::Sequence(_) | Element::Set(_)
            | Element::Unspecified(_) => true,
            Element::Tagged(ref inner) => inner.is_constructed(),
            Element::Der(ref inner) => inner.is_constructed(),
            _ => false,
        }
    }

    /// Returns whether the element prefers the indefinite length form.
    pub fn is_indefinite(&self) -> bool {
        match *self {
            Element::Sequence(ref inner) => inner.is_indefinite(),
            Element::Set(ref inner) => inner.is_indefinite(),
            Element::Tagged(ref inner) => inner.is_indefinite(),
            Element::Unspecified(ref inner) => inner.indefinite,
            _ => false,
        }
    }

    /// Returns whether this is a context-specific value with `number`.
    pub fn is_ctx(&self, number: u32) -> bool {
        match *self {
            Element::Tagged(ref inner) => inner.tag().is_ctx(number),
            Element::Der(ref inner) => inner.tag().is_ctx(number),
            _ => false,
        }
    }
}


/// # Encoding
///
impl Element {
    /// Returns the DER encoding of the element.
    pub fn to_der(&self) -> Bytes {
        self.to_bytes(Mode::Der)
    }

    /// Returns the BER encoding of the element.
    ///
    /// This differs from the DER encoding only for elements preferring the
    /// indefinite length form.
    pub fn to_ber(&self) -> Bytes {
        self.to_bytes(Mode::Ber)
    }

    /// Returns the length of the content octets.
    pub(crate) fn content_len(&self, mode: Mode) -> usize {
        match *self {
            Element::EndOfContents | Element::Null => 0,
            Element::Boolean(ref inner) => inner.encoded_len(mode),
            Element::Integer(ref inner) => inner.encoded_len(mode),
            Element::Enumerated(ref inner) => inner.encoded_len(mode),
            Element::BitString(ref inner) => inner.encoded_len(mode),
            Element::OctetString(ref inner) => inner.encoded_len(mode),
            Element::Oid(ref inner) => inner.encoded_len(mode),
            Element::RelativeOid(ref inner) => inner.encoded_len(mode),
            Element::ObjectDescriptor(ref inner) => inner.encoded_len(mode),
            Element::String(ref inner) => inner.as_slice().len(),
            Element::UtcTime(ref inner) => inner.encoded_len(mode),
            Element::GeneralizedTime(ref inner) => inner.encoded_len(mode),
            Element::Sequence(ref inner) => inner.items().encoded_len(mode),
            Element::Set(ref inner) => inner.items().encoded_len(mode),
            Element::Tagged(ref inner) => inner.content_len(mode),
            Element::Unspecified(ref inner) => inner.content.len(),
            Element::Der(ref inner) => inner.content().len(),
        }
    }

    /// Writes the content octets to a target.
    pub(crate) fn write_content<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        match *self {
            Element::EndOfContents | Element::Null => Ok(()),
            Element::Boolean(ref inner) => inner.write_encoded(mode, target),
            Element::Integer(ref inner) => inner.write_encoded(mode, target),
            Element::Enumerated(ref inner) => {
                inner.write_encoded(mode, target)
            }
            Element::BitString(ref inner) => {
                inner.write_encoded(mode, target)
            }
            Element::OctetString(ref inner) => {
                inner.write_encoded(mode, target)
            }
            Element::Oid(ref inner) => inner.write_encoded(mode, target),
            Element::RelativeOid(ref inner) => {
                inner.write_encoded(mode, target)
            }
            Element::ObjectDescriptor(ref inner) => {
                inner.write_encoded(mode, target)
            }
            Element::String(ref inner) => target.write_all(inner.as_slice()),
            Element::UtcTime(ref inner) => inner.write_encoded(mode, target),
            Element::GeneralizedTime(ref inner) => {
                inner.write_encoded(mode, target)
            }
            Element::Sequence(ref inner) => {
                inner.items().write_encoded(mode, target)
            }
            Element::Set(ref inner) => {
                inner.items().write_encoded(mode, target)
            }
            Element::Tagged(ref inner) => inner.write_content(mode, target),
            Element::Unspecified(ref inner) => {
                target.write_all(inner.content.as_ref())
            }
            Element::Der(ref inner) => target.write_all(inner.content()),
        }
    }

    /// Returns whether to use the indefinite form in `mode`.
    fn use_indefinite(&self, mode: Mode) -> bool {
        mode.allows_indefinite() && self.is_constructed()
            && self.is_indefinite()
    }
}

impl Values for Element {
    fn encoded_len(&self, mode: Mode) -> usize {
        if let Element::Der(ref inner) = *self {
            return inner.as_slice().len()
        }
        let ident_len = Ident::new(
            self.tag(), self.is_constructed()
        ).encoded_len();
        let content_len = self.content_len(mode);
        if self.use_indefinite(mode) {
            ident_len + Length::Indefinite.encoded_len() + content_len + 2
        }
        else {
            ident_len + Length::Definite(content_len).encoded_len()
                + content_len
        }
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        if let Element::Der(ref inner) = *self {
            return target.write_all(inner.as_slice())
        }
        if self.use_indefinite(mode) {
            write_indefinite_header(target, &self.tag())?;
            self.write_content(mode, target)?;
            write_end_of_contents(target)
        }
        else {
            write_header(
                target, &self.tag(), self.is_constructed(),
                self.content_len(mode)
            )?;
            self.write_content(mode, target)
        }
    }
}


/// # Typed Access
///
/// These methods return the content of an element if it is of the expected
/// type or an error otherwise.
impl Element {
    fn unexpected(&self, expected: &str) -> UnexpectedTypeError {
        UnexpectedTypeError::new(expected, self.tag())
    }

    pub fn expect_boolean(&self) -> Result<bool, UnexpectedTypeError> {
        match *self {
            Element::Boolean(value) => Ok(value),
            _ => Err(self.unexpected("BOOLEAN"))
        }
    }

    pub fn expect_integer(&self) -> Result<&Integer, UnexpectedTypeError> {
        match *self {
            Element::Integer(ref value) => Ok(value),
            _ => Err(self.unexpected("INTEGER"))
        }
    }

    pub fn expect_enumerated(
        &self
    ) -> Result<&Integer, UnexpectedTypeError> {
        match *self {
            Element::Enumerated(ref value) => Ok(value),
            _ => Err(self.unexpected("ENUMERATED"))
        }
    }

    pub fn expect_bit_string(
        &self
    ) -> Result<&BitString, UnexpectedTypeError> {
        match *self {
            Element::BitString(ref value) => Ok(value),
            _ => Err(self.unexpected("BIT STRING"))
        }
    }

    pub fn expect_octet_string(
        &self
    ) -> Result<&OctetString, UnexpectedTypeError> {
        match *self {
            Element::OctetString(ref value) => Ok(value),
            _ => Err(self.unexpected("OCTET STRING"))
        }
    }

    pub fn expect_null(&self) -> Result<(), UnexpectedTypeError> {
        match *self {
            Element::Null => Ok(()),
            _ => Err(self.unexpected("NULL"))
        }
    }

    pub fn expect_oid(&self) -> Result<&Oid, UnexpectedTypeError> {
        match *self {
            Element::Oid(ref value) => Ok(value),
            _ => Err(self.unexpected("OBJECT IDENTIFIER"))
        }
    }

    /// Returns a value of any of the restricted character string types.
    pub fn expect_string(&self) -> Result<&AnyString, UnexpectedTypeError> {
        match *self {
            Element::String(ref value) => Ok(value),
            _ => Err(self.unexpected("character string"))
        }
    }

    pub fn expect_utc_time(&self) -> Result<UtcTime, UnexpectedTypeError> {
        match *self {
            Element::UtcTime(value) => Ok(value),
            _ => Err(self.unexpected("UTCTime"))
        }
    }

    pub fn expect_generalized_time(
        &self
    ) -> Result<GeneralizedTime, UnexpectedTypeError> {
        match *self {
            Element::GeneralizedTime(value) => Ok(value),
            _ => Err(self.unexpected("GeneralizedTime"))
        }
    }

    pub fn expect_sequence(&self) -> Result<&Sequence, UnexpectedTypeError> {
        match *self {
            Element::Sequence(ref value) => Ok(value),
            _ => Err(self.unexpected("SEQUENCE"))
        }
    }

    pub fn expect_set(&self) -> Result<&Set, UnexpectedTypeError> {
        match *self {
            Element::Set(ref value) => Ok(value),
            _ => Err(self.unexpected("SET"))
        }
    }

    /// Returns the element as a context-specific value with `number`.
    pub fn expect_tagged(
        &self, number: u32
    ) -> Result<&TaggedElement, UnexpectedTypeError> {
        match *self {
            Element::Tagged(ref value) if value.tag().is_ctx(number) => {
                Ok(value)
            }
            _ => Err(self.unexpected(&format!("[{}]", number)))
        }
    }

    /// Returns the content of an explicitly tagged context-specific value.
    pub fn expect_explicit(&self, number: u32) -> Result<Element, Error> {
        self.expect_tagged(number)?.explicit()
    }

    /// Returns the content of an implicitly tagged context-specific value.
    pub fn expect_implicit(
        &self, number: u32, tag: Tag
    ) -> Result<Element, Error> {
        self.expect_tagged(number)?.implicit(tag)
    }
}


//--- From

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Element::Boolean(value)
    }
}

impl From<Integer> for Element {
    fn from(value: Integer) -> Self {
        Element::Integer(value)
    }
}

impl From<BitString> for Element {
    fn from(value: BitString) -> Self {
        Element::BitString(value)
    }
}

impl From<OctetString> for Element {
    fn from(value: OctetString) -> Self {
        Element::OctetString(value)
    }
}

impl<T: AsRef<[u8]>> From<&Oid<T>> for Element {
    fn from(value: &Oid<T>) -> Self {
        Element::Oid(value.to_bytes_oid())
    }
}

impl From<AnyString> for Element {
    fn from(value: AnyString) -> Self {
        Element::String(value)
    }
}

impl From<Sequence> for Element {
    fn from(value: Sequence) -> Self {
        Element::Sequence(value)
    }
}

impl From<Set> for Element {
    fn from(value: Set) -> Self {
        Element::Set(value)
    }
}

impl From<TaggedElement> for Element {
    fn from(value: TaggedElement) -> Self {
        Element::Tagged(value)
    }
}

impl From<DerData> for Element {
    fn from(value: DerData) -> Self {
        Element::Der(value)
    }
}


//------------ Unspecified ---------------------------------------------------

/// A constructed value of a universal type without a typed variant.
///
/// The content octets are kept as they are.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Unspecified {
    tag: Tag,
    content: Bytes,
    indefinite: bool,
}

impl Unspecified {
    /// Returns the tag of the value.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Returns the raw content octets.
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}


//------------ Decoding ------------------------------------------------------

/// Takes a complete element from the source.
fn take_element(
    source: &mut Source, mode: Mode, depth: usize
) -> Result<Element, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(source.content_err("values nested too deeply"))
    }
    let ident = Ident::take_from(source)?;
    let length = Length::take_from(source, mode)?;
    let pos = source.pos();
    let constructed = ident.is_constructed();
    if length.is_indefinite() && !constructed {
        return Err(DecodeError::content(
            "indefinite length for primitive value", pos
        ))
    }

    if ident.tag().class() != Class::Universal {
        let content = take_raw_content(
            source, length, constructed, mode, depth
        )?;
        return Ok(Element::Tagged(TaggedElement::from_decoded(
            ident.into_tag(), constructed, content, length.is_indefinite(),
            mode
        )))
    }

    let number = ident.tag().universal_number();
    match number {
        Some(16) | Some(17) => {
            if !constructed {
                return Err(DecodeError::content(
                    "primitive encoding of a constructed type", pos
                ))
            }
            let items = take_children(source, length, mode, depth)?;
            let indefinite = length.is_indefinite();
            Ok(if number == Some(16) {
                Element::Sequence(Sequence::from_decoded(items, indefinite))
            }
            else {
                Element::Set(Set::from_decoded(items, indefinite))
            })
        }
        Some(number @ (3 | 4 | 7 | 12 | 18..=22 | 25..=30)) => {
            let content = if constructed {
                if !mode.allows_segmented() {
                    return Err(DecodeError::content(
                        "constructed encoding of a primitive type", pos
                    ))
                }
                let mut segments = Vec::new();
                take_segments(
                    source, length, ident.tag(), mode, depth, &mut segments
                )?;
                join_segments(number, segments).map_err(|err| {
                    DecodeError::content(err, pos)
                })?
            }
            else {
                take_primitive(source, length)?
            };
            string_from_content(number, content, mode).map_err(|err| {
                DecodeError::content(err, pos)
            })
        }
        Some(number @ (0 | 1 | 2 | 5 | 6 | 10 | 13 | 23 | 24)) => {
            if constructed {
                return Err(DecodeError::content(
                    "constructed encoding of a primitive type", pos
                ))
            }
            let content = take_primitive(source, length)?;
            primitive_from_content(number, content, mode).map_err(|err| {
                DecodeError::content(err, pos)
            })
        }
        _ => {
            if !constructed {
                return Err(DecodeError::unsupported(
                    format!("{}", ident.tag()), pos
                ))
            }
            let content = take_raw_content(
                source, length, constructed, mode, depth
            )?;
            Ok(Element::Unspecified(Unspecified {
                tag: ident.into_tag(),
                content,
                indefinite: length.is_indefinite(),
            }))
        }
    }
}

/// Takes the content octets of a primitive value.
fn take_primitive(
    source: &mut Source, length: Length
) -> Result<Bytes, DecodeError> {
    match length.definite() {
        Some(len) => source.take_bytes(len),
        None => Err(source.content_err("indefinite length for primitive value"))
    }
}

/// Takes the content of a constructed value, element by element.
///
/// Calls `op` with a source positioned at each contained element until
/// either a definite length content is used up or the end-of-contents
/// marker of an indefinite length value has been consumed.
fn take_nested<F>(
    source: &mut Source, length: Length, mut op: F
) -> Result<(), DecodeError>
where F: FnMut(&mut Source) -> Result<(), DecodeError> {
    match length {
        Length::Definite(len) => {
            let offset = source.offset_of(source.cursor());
            let mut inner = Source::nested(source.take_bytes(len)?, offset);
            while !inner.is_exhausted() {
                if at_end_of_contents(&inner) {
                    return Err(inner.content_err(
                        "end-of-contents in definite length value"
                    ))
                }
                op(&mut inner)?;
            }
            Ok(())
        }
        Length::Indefinite => {
            loop {
                if at_end_of_contents(source) {
                    return source.advance(2)
                }
                if source.is_exhausted() {
                    return Err(source.content_err("missing end-of-contents"))
                }
                op(source)?;
            }
        }
    }
}

fn at_end_of_contents(source: &Source) -> bool {
    source.peek_nth(0) == Some(0) && source.peek_nth(1) == Some(0)
}

/// Takes all the elements contained in a constructed value.
fn take_children(
    source: &mut Source, length: Length, mode: Mode, depth: usize
) -> Result<Vec<Element>, DecodeError> {
    let mut res = Vec::new();
    take_nested(source, length, |inner| {
        res.push(take_element(inner, mode, depth + 1)?);
        Ok(())
    })?;
    Ok(res)
}

/// Takes the raw content of a value.
///
/// The content of a constructed value is checked to consist of well-formed
/// elements. For an indefinite length value, the end-of-contents marker is
/// consumed but not included.
fn take_raw_content(
    source: &mut Source, length: Length, constructed: bool, mode: Mode,
    depth: usize,
) -> Result<Bytes, DecodeError> {
    if !constructed {
        return take_primitive(source, length)
    }
    let start = source.cursor();
    take_nested(source, length, |inner| {
        take_element(inner, mode, depth + 1).map(|_| ())
    })?;
    let content = source.bytes_since(start);
    if length.is_indefinite() {
        Ok(content.slice(..content.len() - 2))
    }
    else {
        Ok(content)
    }
}

/// Takes the segments of a constructed string value.
///
/// Segments must have the same tag as the outer value. They can themselves
/// be constructed.
fn take_segments(
    source: &mut Source, length: Length, tag: &Tag, mode: Mode,
    depth: usize, segments: &mut Vec<Bytes>,
) -> Result<(), DecodeError> {
    take_nested(source, length, |inner| {
        if depth + 1 > MAX_DEPTH {
            return Err(inner.content_err("values nested too deeply"))
        }
        let pos = inner.pos();
        let ident = Ident::take_from(inner)?;
        if ident.tag() != tag {
            return Err(DecodeError::content("invalid string segment", pos))
        }
        let length = Length::take_from(inner, mode)?;
        if ident.is_constructed() {
            take_segments(inner, length, tag, mode, depth + 1, segments)
        }
        else {
            segments.push(take_primitive(inner, length)?);
            Ok(())
        }
    })
}

/// Joins the segments of a string into the content of the primitive form.
fn join_segments(
    number: u32, segments: Vec<Bytes>
) -> Result<Bytes, ContentError> {
    let mut res = Vec::new();
    if number == 3 {
        // Each bit string segment starts with its number of unused bits
        // and only the last one may have any.
        let count = segments.len();
        let mut unused = 0;
        for (idx, segment) in segments.iter().enumerate() {
            let (&first, bits) = match segment.split_first() {
                Some(some) => some,
                None => return Err("empty bit string segment".into())
            };
            if first != 0 && idx + 1 != count {
                return Err("unused bits in inner bit string segment".into())
            }
            unused = first;
            res.extend_from_slice(bits);
        }
        res.insert(0, unused);
    }
    else {
        segments.iter().for_each(|segment| res.extend_from_slice(segment));
    }
    Ok(res.into())
}

/// Creates an element for one of the string types.
fn string_from_content(
    number: u32, content: Bytes, mode: Mode
) -> Result<Element, ContentError> {
    match number {
        3 => BitString::from_content(content, mode).map(Element::BitString),
        4 => Ok(Element::OctetString(OctetString::new(content))),
        7 => {
            ObjectDescriptor::from_content(content)
                .map(Element::ObjectDescriptor)
                .map_err(|_| "invalid ObjectDescriptor".into())
        }
        _ => {
            match AnyString::from_content(number, content) {
                Ok(Some(value)) => Ok(Element::String(value)),
                Ok(None) => Err("unknown string type".into()),
                Err(_) => Err("invalid characters in string".into()),
            }
        }
    }
}

/// Creates an element for one of the other primitive universal types.
fn primitive_from_content(
    number: u32, content: Bytes, mode: Mode
) -> Result<Element, ContentError> {
    match number {
        0 => {
            if content.is_empty() {
                Ok(Element::EndOfContents)
            }
            else {
                Err("non-empty end-of-contents".into())
            }
        }
        1 => {
            match content.as_ref() {
                &[0] => Ok(Element::Boolean(false)),
                &[0xFF] => Ok(Element::Boolean(true)),
                &[_] if !mode.is_der() => Ok(Element::Boolean(true)),
                &[_] => Err("invalid boolean in DER".into()),
                _ => Err("invalid boolean length".into()),
            }
        }
        2 => Integer::from_content(content).map(Element::Integer),
        5 => {
            if content.is_empty() {
                Ok(Element::Null)
            }
            else {
                Err("non-empty NULL".into())
            }
        }
        6 => Oid::from_content(content).map(Element::Oid),
        10 => Integer::from_content(content).map(Element::Enumerated),
        13 => RelativeOid::from_content(content).map(Element::RelativeOid),
        23 => UtcTime::from_content(&content).map(Element::UtcTime),
        24 => {
            GeneralizedTime::from_content(&content)
                .map(Element::GeneralizedTime)
        }
        _ => Err("unknown primitive type".into())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip_der(data: &'static [u8]) {
        let element = Element::from_der(data).unwrap();
        assert_eq!(element.to_der().as_ref(), data);
    }

    #[test]
    fn der_roundtrip() {
        roundtrip_der(b"\x01\x01\xff");
        roundtrip_der(b"\x02\x02\x00\x80");
        roundtrip_der(b"\x05\x00");
        roundtrip_der(b"\x06\x03\x55\x04\x03");
        roundtrip_der(b"\x0c\x02hi");
        roundtrip_der(b"\x17\x0d250101000000Z");
        roundtrip_der(
            b"\x30\x0a\x02\x01\x05\xa0\x05\x04\x03abc"
        );
        roundtrip_der(b"\x31\x08\x01\x01\x00\x05\x00\x0a\x01\x01");
        roundtrip_der(b"\x9f\x64\x00");
    }

    #[test]
    fn typed_variants() {
        let element = Element::from_der(
            &b"\x30\x09\x02\x01\x07\x13\x01a\x0a\x01\x02"[..]
        ).unwrap();
        let seq = element.expect_sequence().unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.at(0).unwrap().expect_integer().unwrap().to_i64(), Ok(7));
        assert_eq!(
            seq.at(1).unwrap().expect_string().unwrap().tag(),
            Tag::PRINTABLE_STRING
        );
        assert!(seq.at(2).unwrap().expect_enumerated().is_ok());
        assert!(seq.at(2).unwrap().expect_integer().is_err());
        assert!(seq.at(3).is_err());
    }

    #[test]
    fn der_rejects_non_canonical() {
        // Non-minimal length.
        assert!(Element::from_der(&b"\x04\x81\x01a"[..]).is_err());
        // Indefinite length.
        assert!(Element::from_der(&b"\x30\x80\x05\x00\x00\x00"[..]).is_err());
        // Boolean other than 0xFF.
        assert!(Element::from_der(&b"\x01\x01\x01"[..]).is_err());
        assert!(Element::from_ber(&b"\x01\x01\x01"[..]).is_ok());
        // Padding bits.
        assert!(Element::from_der(&b"\x03\x02\x04\xf1"[..]).is_err());
        // Constructed octet string.
        assert!(
            Element::from_der(&b"\x24\x05\x04\x03abc"[..]).is_err()
        );
        // Non-minimal integer.
        assert!(Element::from_der(&b"\x02\x02\x00\x01"[..]).is_err());
        // Trailing data.
        assert!(Element::from_der(&b"\x05\x00\x05"[..]).is_err());
        // Primitive SEQUENCE.
        assert!(Element::from_der(&b"\x10\x00"[..]).is_err());
    }

    #[test]
    fn ber_indefinite_and_segments() {
        let element = Element::from_ber(
            &b"\x30\x80\x24\x80\x04\x02ab\x04\x01c\x00\x00\x00\x00"[..]
        ).unwrap();
        assert!(element.is_indefinite());
        let seq = element.expect_sequence().unwrap();
        assert_eq!(
            seq.at(0).unwrap().expect_octet_string().unwrap().as_slice(),
            b"abc"
        );
        assert_eq!(element.to_der().as_ref(), b"\x30\x05\x04\x03abc");
        assert_eq!(
            element.to_ber().as_ref(), b"\x30\x80\x04\x03abc\x00\x00"
        );

        let element = Element::from_ber(
            &b"\x23\x08\x03\x02\x00\xff\x03\x02\x04\xf0"[..]
        ).unwrap();
        let bits = element.expect_bit_string().unwrap();
        assert_eq!(bits.bit_len(), 12);
        assert!(Element::from_ber(
            &b"\x23\x08\x03\x02\x04\xf0\x03\x02\x00\xff"[..]
        ).is_err());
        assert!(Element::from_ber(
            &b"\x24\x03\x0c\x01a"[..]
        ).is_err());
    }

    #[test]
    fn unknown_universal_types() {
        let err = Element::from_der(&b"\x09\x01\x00"[..]).unwrap_err();
        assert!(err.is_unsupported());
        let element = Element::from_der(&b"\x28\x02\x05\x00"[..]).unwrap();
        match element {
            Element::Unspecified(ref inner) => {
                assert_eq!(inner.content().as_ref(), b"\x05\x00")
            }
            _ => panic!("expected unspecified element"),
        }
        assert_eq!(element.to_der().as_ref(), b"\x28\x02\x05\x00");
    }

    #[test]
    fn error_positions() {
        let err = Element::from_der(
            &b"\x30\x06\x05\x00\x02\x02\x00\x01"[..]
        ).unwrap_err();
        assert_eq!(err.pos().offset(), 6);
        assert!(Element::from_der(&b"\x30\x03\x05\x00"[..]).is_err());
    }

    #[test]
    fn depth_limit() {
        let mut data = Vec::new();
        for _ in 0..100 {
            data.extend_from_slice(b"\x30\x80");
        }
        for _ in 0..100 {
            data.extend_from_slice(b"\x00\x00");
        }
        assert!(Element::from_ber(data).is_err());
    }

    #[test]
    fn decode_at() {
        let data = Bytes::from_static(b"\x05\x00\x01\x01\xff");
        let (element, cursor) = Element::decode_at(
            Mode::Der, data.clone(), 2
        ).unwrap();
        assert_eq!(element, Element::Boolean(true));
        assert_eq!(cursor, 5);
    }

    #[test]
    fn building() {
        let element = Element::sequence(vec![
            Element::from(Integer::from(5)),
            Element::Null.explicit(0),
            Element::from(OctetString::from(&b"ab"[..])).implicit(1),
        ]);
        assert_eq!(
            element.to_der().as_ref(),
            b"\x30\x0b\x02\x01\x05\xa0\x02\x05\x00\x81\x02ab"
        );
        let element = element.with_indefinite_length(true);
        assert_eq!(
            element.to_ber().as_ref(),
            b"\x30\x80\x02\x01\x05\xa0\x02\x05\x00\x81\x02ab\x00\x00"
        );
    }
}
