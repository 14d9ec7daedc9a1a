//! Tagged values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::encode::{Target, Values, infallible, write_header};
use crate::error::{Error, UnexpectedTypeError};
use crate::ident::{Ident, Tag};
use crate::mode::Mode;
use super::Element;


//------------ TaggedElement -------------------------------------------------

/// A value of the application, context-specific, or private class.
///
/// There are two ways to tag a value. With explicit tagging, the complete
/// encoding of the value becomes the content of a constructed value with
/// the new tag. With implicit tagging, the tag of the value is simply
/// replaced by the new tag.
///
/// When decoding, it isn’t possible to know which of the two was used, so
/// a decoded tagged value keeps its raw content. Call
/// [`explicit`][Self::explicit] or [`implicit`][Self::implicit] to
/// interpret it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggedElement {
    /// The outer tag.
    tag: Tag,

    /// The content.
    inner: Inner,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Inner {
    /// A decoded value.
    Raw {
        constructed: bool,
        content: Bytes,
        indefinite: bool,
        mode: Mode,
    },

    /// An explicitly tagged element.
    Explicit {
        element: Box<Element>,
        indefinite: bool,
    },

    /// An implicitly tagged element.
    Implicit(Box<Element>),
}

impl TaggedElement {
    /// Creates an explicitly tagged element.
    pub fn new_explicit(tag: Tag, element: Element) -> Self {
        TaggedElement {
            tag,
            inner: Inner::Explicit {
                element: Box::new(element),
                indefinite: false,
            }
        }
    }

    /// Creates an implicitly tagged element.
    pub fn new_implicit(tag: Tag, element: Element) -> Self {
        TaggedElement { tag, inner: Inner::Implicit(Box::new(element)) }
    }

    pub(super) fn from_decoded(
        tag: Tag, constructed: bool, content: Bytes, indefinite: bool,
        mode: Mode,
    ) -> Self {
        TaggedElement {
            tag,
            inner: Inner::Raw { constructed, content, indefinite, mode }
        }
    }

    /// Returns the outer tag.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Returns whether the value uses the constructed encoding.
    pub fn is_constructed(&self) -> bool {
        match self.inner {
            Inner::Raw { constructed, .. } => constructed,
            Inner::Explicit { .. } => true,
            Inner::Implicit(ref element) => element.is_constructed(),
        }
    }

    /// Returns whether the value prefers the indefinite length form.
    pub fn is_indefinite(&self) -> bool {
        match self.inner {
            Inner::Raw { indefinite, .. } => indefinite,
            Inner::Explicit { indefinite, .. } => indefinite,
            Inner::Implicit(ref element) => element.is_indefinite(),
        }
    }

    /// Returns a copy using the given length form for encoding.
    pub fn with_indefinite_length(self, indefinite: bool) -> Self {
        let inner = match self.inner {
            Inner::Raw { constructed, content, mode, .. } => {
                Inner::Raw { constructed, content, indefinite, mode }
            }
            Inner::Explicit { element, .. } => {
                Inner::Explicit { element, indefinite }
            }
            Inner::Implicit(element) => {
                Inner::Implicit(Box::new(
                    element.with_indefinite_length(indefinite)
                ))
            }
        };
        TaggedElement { tag: self.tag, inner }
    }

    /// Returns the content octets.
    ///
    /// For a decoded value these are the raw octets. Otherwise the content
    /// is encoded in DER.
    pub fn content(&self) -> Bytes {
        match self.inner {
            Inner::Raw { ref content, .. } => content.clone(),
            _ => {
                let mut res = Vec::with_capacity(self.content_len(Mode::Der));
                infallible(self.write_content(Mode::Der, &mut res));
                res.into()
            }
        }
    }

    /// Interprets the value as explicitly tagged.
    ///
    /// Returns the single element contained in the value. Fails if the
    /// value is primitive.
    pub fn explicit(&self) -> Result<Element, Error> {
        match self.inner {
            Inner::Raw { constructed, ref content, mode, .. } => {
                if !constructed {
                    return Err(UnexpectedTypeError::new(
                        "explicitly tagged value", "primitive value"
                    ).into())
                }
                Ok(Element::decode(mode, content.clone())?)
            }
            Inner::Explicit { ref element, .. } => Ok(element.as_ref().clone()),
            Inner::Implicit(ref element) => {
                if !element.is_constructed() {
                    return Err(UnexpectedTypeError::new(
                        "explicitly tagged value", "primitive value"
                    ).into())
                }
                Ok(Element::decode(Mode::Der, self.content())?)
            }
        }
    }

    /// Interprets the value as implicitly tagged with `expected` replaced.
    ///
    /// For a decoded value, the content is decoded as a value of type
    /// `expected`. Otherwise, the wrapped element must have the `expected`
    /// tag.
    pub fn implicit(&self, expected: Tag) -> Result<Element, Error> {
        match self.inner {
            Inner::Raw { constructed, ref content, mode, .. } => {
                let needs_constructed = matches!(
                    expected.universal_number(), Some(16) | Some(17)
                );
                if needs_constructed && !constructed {
                    return Err(UnexpectedTypeError::new(
                        expected, "primitive value"
                    ).into())
                }
                let mut data = Vec::new();
                infallible(write_header(
                    &mut data, &expected, constructed, content.len()
                ));
                data.extend_from_slice(content);
                Ok(Element::decode(mode, data)?)
            }
            Inner::Explicit { ref element, .. }
            | Inner::Implicit(ref element) => {
                let found = element.tag();
                if found != expected {
                    return Err(UnexpectedTypeError::new(expected, found).into())
                }
                Ok(element.as_ref().clone())
            }
        }
    }

    pub(super) fn content_len(&self, mode: Mode) -> usize {
        match self.inner {
            Inner::Raw { ref content, .. } => content.len(),
            Inner::Explicit { ref element, .. } => element.encoded_len(mode),
            Inner::Implicit(ref element) => element.content_len(mode),
        }
    }

    pub(super) fn write_content<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        match self.inner {
            Inner::Raw { ref content, .. } => target.write_all(content),
            Inner::Explicit { ref element, .. } => {
                element.write_encoded(mode, target)
            }
            Inner::Implicit(ref element) => {
                element.write_content(mode, target)
            }
        }
    }

    /// Returns the identifier octets of the value.
    pub fn ident(&self) -> Ident {
        Ident::new(self.tag.clone(), self.is_constructed())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::int::Integer;
    use super::*;

    #[test]
    fn explicit() {
        let element = Element::from_der(&b"\xa0\x03\x02\x01\x05"[..]).unwrap();
        let tagged = element.expect_tagged(0).unwrap();
        assert!(tagged.is_constructed());
        assert_eq!(
            tagged.explicit().unwrap(),
            Element::Integer(Integer::from(5))
        );
        assert!(element.expect_tagged(1).is_err());

        let element = Element::from_der(&b"\x80\x01\x05"[..]).unwrap();
        assert!(matches!(
            element.expect_explicit(0),
            Err(Error::UnexpectedType(_))
        ));
    }

    #[test]
    fn implicit() {
        let element = Element::from_der(&b"\x80\x01\x05"[..]).unwrap();
        assert_eq!(
            element.expect_implicit(0, Tag::INTEGER).unwrap(),
            Element::Integer(Integer::from(5))
        );
        assert!(matches!(
            element.expect_implicit(0, Tag::SEQUENCE),
            Err(Error::UnexpectedType(_))
        ));

        let element = Element::from_der(&b"\xa1\x03\x02\x01\x05"[..]).unwrap();
        let seq = element.expect_implicit(1, Tag::SEQUENCE).unwrap();
        assert_eq!(seq.expect_sequence().unwrap().len(), 1);
    }

    #[test]
    fn built_values() {
        let inner = Element::Integer(Integer::from(5));
        let tagged = TaggedElement::new_implicit(Tag::ctx(0), inner.clone());
        assert_eq!(tagged.implicit(Tag::INTEGER).unwrap(), inner);
        assert!(tagged.implicit(Tag::BOOLEAN).is_err());
        assert!(tagged.explicit().is_err());
        assert_eq!(
            Element::Tagged(tagged).to_der().as_ref(), b"\x80\x01\x05"
        );

        let tagged = TaggedElement::new_explicit(Tag::ctx(2), inner.clone());
        assert_eq!(tagged.explicit().unwrap(), inner);
        assert_eq!(tagged.content().as_ref(), b"\x02\x01\x05");
    }

    #[test]
    fn indefinite_explicit() {
        let element = Element::from_ber(
            &b"\xa0\x80\x02\x01\x05\x00\x00"[..]
        ).unwrap();
        let tagged = element.expect_tagged(0).unwrap();
        assert!(tagged.is_indefinite());
        assert_eq!(tagged.content().as_ref(), b"\x02\x01\x05");
        assert_eq!(element.to_der().as_ref(), b"\xa0\x03\x02\x01\x05");
        assert_eq!(
            element.to_ber().as_ref(), b"\xa0\x80\x02\x01\x05\x00\x00"
        );
    }
}
