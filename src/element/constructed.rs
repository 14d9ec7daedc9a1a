//! SEQUENCE and SET values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::slice;
use crate::encode::Values;
use crate::error::NotFoundError;
use crate::mode::Mode;
use super::Element;
use super::fields::Fields;
use super::tagged::TaggedElement;


//------------ constructed_type ----------------------------------------------

macro_rules! constructed_type {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Clone, Debug, Default, Eq, PartialEq)]
        pub struct $name {
            /// The contained elements.
            items: Vec<Element>,

            /// Whether to prefer the indefinite length form.
            indefinite: bool,
        }

        impl $name {
            /// Creates a new value from a vec of elements.
            pub fn new(items: Vec<Element>) -> Self {
                $name { items, indefinite: false }
            }

            pub(super) fn from_decoded(
                items: Vec<Element>, indefinite: bool
            ) -> Self {
                $name { items, indefinite }
            }

            /// Returns a slice of the contained elements.
            pub fn items(&self) -> &[Element] {
                &self.items
            }

            /// Converts the value into a vec of its elements.
            pub fn into_items(self) -> Vec<Element> {
                self.items
            }

            /// Returns an iterator over the contained elements.
            pub fn iter(&self) -> slice::Iter<Element> {
                self.items.iter()
            }

            /// Returns the number of contained elements.
            pub fn len(&self) -> usize {
                self.items.len()
            }

            /// Returns whether there are no elements.
            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            /// Returns the element at index `idx` if present.
            pub fn get(&self, idx: usize) -> Option<&Element> {
                self.items.get(idx)
            }

            /// Returns the element at index `idx`.
            ///
            /// Returns an error if there are not enough elements.
            pub fn at(&self, idx: usize) -> Result<&Element, NotFoundError> {
                self.items.get(idx).ok_or_else(|| {
                    NotFoundError::new(format_args!("element {}", idx))
                })
            }

            /// Returns whether there is an element at index `idx`.
            pub fn has(&self, idx: usize) -> bool {
                idx < self.items.len()
            }

            /// Returns the first context-specific element with `number`.
            pub fn get_tagged(&self, number: u32) -> Option<&TaggedElement> {
                self.items.iter().find_map(|item| match *item {
                    Element::Tagged(ref inner)
                        if inner.tag().is_ctx(number) => Some(inner),
                    _ => None
                })
            }

            /// Returns a copy with `item` added at the end.
            pub fn with_appended(mut self, item: Element) -> Self {
                self.items.push(item);
                self
            }

            /// Returns a copy with `item` inserted at index `idx`.
            ///
            /// If `idx` is past the end, the item is appended.
            pub fn with_inserted(mut self, idx: usize, item: Element) -> Self {
                let idx = idx.min(self.items.len());
                self.items.insert(idx, item);
                self
            }

            /// Returns a copy with the element at `idx` replaced by `item`.
            pub fn with_replaced(
                mut self, idx: usize, item: Element
            ) -> Result<Self, NotFoundError> {
                match self.items.get_mut(idx) {
                    Some(slot) => *slot = item,
                    None => {
                        return Err(NotFoundError::new(
                            format_args!("element {}", idx)
                        ))
                    }
                }
                Ok(self)
            }

            /// Returns a copy using the given length form for encoding.
            pub fn with_indefinite_length(mut self, indefinite: bool) -> Self {
                self.indefinite = indefinite;
                self
            }

            /// Returns whether the value prefers the indefinite length form.
            pub fn is_indefinite(&self) -> bool {
                self.indefinite
            }
        }

        impl FromIterator<Element> for $name {
            fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
                Self::new(iter.into_iter().collect())
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a Element;
            type IntoIter = slice::Iter<'a, Element>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.iter()
            }
        }
    }
}


//------------ Sequence ------------------------------------------------------

constructed_type!(
    /// The content of a SEQUENCE or SEQUENCE OF value.
    ///
    /// The elements are kept in order.
    Sequence
);

impl Sequence {
    /// Returns a cursor for taking the elements field by field.
    pub fn fields(&self) -> Fields {
        Fields::new(&self.items)
    }
}


//------------ Set -----------------------------------------------------------

constructed_type!(
    /// The content of a SET or SET OF value.
    ///
    /// The elements are kept in the order they were given or decoded in.
    /// DER requires a canonical order which differs between SET and SET OF.
    /// Use [`sorted_set`][Set::sorted_set] or
    /// [`sorted_set_of`][Set::sorted_set_of] to get it.
    Set
);

impl Set {
    /// Returns a copy sorted in the canonical order of a SET.
    ///
    /// Elements are ordered by their tags, first by class with universal
    /// first and private last, then by number.
    pub fn sorted_set(mut self) -> Self {
        self.items.sort_by_key(Element::tag);
        self
    }

    /// Returns a copy sorted in the canonical order of a SET OF.
    ///
    /// Elements are ordered by their DER encoding compared as octet
    /// strings.
    pub fn sorted_set_of(mut self) -> Self {
        self.items.sort_by_cached_key(|item| item.to_vec(Mode::Der));
        self
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::ident::Tag;
    use crate::int::Integer;
    use super::*;

    fn int(value: i64) -> Element {
        Element::Integer(Integer::from(value))
    }

    #[test]
    fn sorted_set() {
        let set = Set::new(vec![
            Element::Null.implicit(1),
            Element::Boolean(true),
            Element::Null.with_tag(Tag::application(0)),
            int(1),
        ]).sorted_set();
        let tags: Vec<_> = set.iter().map(Element::tag).collect();
        assert_eq!(
            tags,
            vec![Tag::BOOLEAN, Tag::INTEGER, Tag::application(0), Tag::ctx(1)]
        );
    }

    #[test]
    fn sorted_set_of() {
        let set = Set::new(vec![int(256), int(2), int(-1)]).sorted_set_of();
        assert_eq!(
            Element::Set(set).to_der().as_ref(),
            b"\x31\x0a\x02\x01\x02\x02\x01\xff\x02\x02\x01\x00"
        );
    }

    #[test]
    fn with_methods() {
        let seq = Sequence::new(vec![int(1)])
            .with_appended(int(3))
            .with_inserted(1, int(2))
            .with_inserted(10, int(4));
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.at(1).unwrap(), &int(2));
        let seq = seq.with_replaced(3, Element::Null).unwrap();
        assert_eq!(seq.at(3).unwrap(), &Element::Null);
        assert!(seq.clone().with_replaced(4, Element::Null).is_err());
        assert!(seq.has(3));
        assert!(!seq.has(4));
    }

    #[test]
    fn get_tagged() {
        let seq = Sequence::new(vec![
            int(1), Element::Null.explicit(2), Element::Null.explicit(3),
        ]);
        assert!(seq.get_tagged(3).is_some());
        assert!(seq.get_tagged(1).is_none());
    }
}
