//! Reading the fields of a SEQUENCE in order.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::error::{Error, NotFoundError};
use crate::ident::Tag;
use super::Element;


//------------ Fields --------------------------------------------------------

/// A cursor over the elements of a SEQUENCE.
///
/// The type helps with decoding a SEQUENCE type field by field, including
/// OPTIONAL and DEFAULT fields which are recognized by their tag. Once all
/// fields have been taken, [`finish`][Self::finish] makes sure there
/// aren’t any elements left.
#[derive(Clone, Debug)]
pub struct Fields<'a> {
    items: &'a [Element],
    pos: usize,
}

impl<'a> Fields<'a> {
    /// Creates a new cursor over a slice of elements.
    pub fn new(items: &'a [Element]) -> Self {
        Fields { items, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Element> {
        self.items.get(self.pos)
    }

    /// Takes the next element.
    ///
    /// Returns an error if there are no more elements.
    pub fn take(&mut self) -> Result<&'a Element, Error> {
        match self.peek() {
            Some(item) => {
                self.pos += 1;
                Ok(item)
            }
            None => {
                Err(NotFoundError::new(
                    format_args!("field {}", self.pos)
                ).into())
            }
        }
    }

    /// Takes the next element if it has the given tag.
    pub fn take_opt_tag(&mut self, tag: &Tag) -> Option<&'a Element> {
        match self.peek() {
            Some(item) if item.tag() == *tag => {
                self.pos += 1;
                Some(item)
            }
            _ => None
        }
    }

    /// Takes the next element if it is an explicitly tagged value.
    ///
    /// The tag must be context-specific with the given number. Returns the
    /// element wrapped by the tag.
    pub fn take_opt_explicit(
        &mut self, number: u32
    ) -> Result<Option<Element>, Error> {
        match self.peek() {
            Some(item) if item.is_ctx(number) => {
                self.pos += 1;
                item.expect_explicit(number).map(Some)
            }
            _ => Ok(None)
        }
    }

    /// Takes the next element if it is an implicitly tagged value.
    ///
    /// The tag must be context-specific with the given number. The content
    /// is interpreted as a value with the tag `tag`.
    pub fn take_opt_implicit(
        &mut self, number: u32, tag: Tag
    ) -> Result<Option<Element>, Error> {
        match self.peek() {
            Some(item) if item.is_ctx(number) => {
                self.pos += 1;
                item.expect_implicit(number, tag).map(Some)
            }
            _ => Ok(None)
        }
    }

    /// Returns whether all elements have been taken.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.items.len()
    }

    /// Takes all remaining elements.
    pub fn take_rest(&mut self) -> &'a [Element] {
        let res = &self.items[self.pos.min(self.items.len())..];
        self.pos = self.items.len();
        res
    }

    /// Checks that all elements have been taken.
    pub fn finish(self) -> Result<(), Error> {
        match self.peek() {
            Some(item) => {
                Err(Error::invalid(format_args!(
                    "unexpected trailing {}", item.tag()
                )))
            }
            None => Ok(())
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::int::Integer;
    use super::*;

    #[test]
    fn fields() {
        let element = Element::from_der(
            &b"\x30\x0b\xa0\x03\x02\x01\x02\x02\x01\x05\x81\x01\x07"[..]
        ).unwrap();
        let seq = element.expect_sequence().unwrap();
        let mut fields = seq.fields();
        assert_eq!(
            fields.take_opt_explicit(0).unwrap(),
            Some(Element::Integer(Integer::from(2)))
        );
        assert!(fields.take_opt_tag(&Tag::BOOLEAN).is_none());
        assert!(fields.take_opt_tag(&Tag::INTEGER).is_some());
        assert_eq!(fields.take_opt_explicit(0).unwrap(), None);
        assert_eq!(
            fields.take_opt_implicit(1, Tag::INTEGER).unwrap(),
            Some(Element::Integer(Integer::from(7)))
        );
        assert!(fields.is_empty());
        assert!(fields.clone().take().is_err());
        fields.finish().unwrap();

        let mut fields = seq.fields();
        fields.take().unwrap();
        assert!(fields.finish().is_err());
    }
}
