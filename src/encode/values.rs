//! Everything related to the `Values` trait.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use bytes::Bytes;
use crate::ident::{Ident, Tag};
use crate::length::Length;
use crate::mode::Mode;
use super::target::{Target, infallible};


//------------ Values --------------------------------------------------------

/// A type that is a value encoder.
///
/// Value encoders know how to encode themselves into a sequence of BER
/// encoded values. That is, the type becomes the content or part of the
/// content of a constructed value.
pub trait Values {
    /// Returns the length of the encoded values for the given mode.
    fn encoded_len(&self, mode: Mode) -> usize;

    /// Encodes the values in the given mode and writes them to `target`.
    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error>;


    //--- Provided methods

    /// Converts the encoder into one with an explicit tag.
    ///
    /// For an explicit tag, the value is wrapped in a constructed value with
    /// the given tag.
    fn explicit(self, tag: Tag) -> Constructed<Self>
    where Self: Sized {
        Constructed::new(tag, self)
    }

    /// Encodes the values in the given mode into a new vec.
    fn to_vec(&self, mode: Mode) -> Vec<u8> {
        let mut target = Vec::with_capacity(self.encoded_len(mode));
        infallible(self.write_encoded(mode, &mut target));
        target
    }

    /// Encodes the values in the given mode into a bytes value.
    fn to_bytes(&self, mode: Mode) -> Bytes {
        self.to_vec(mode).into()
    }
}


//--- Blanket impls

impl<V: Values> Values for &'_ V {
    fn encoded_len(&self, mode: Mode) -> usize {
        (*self).encoded_len(mode)
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        (*self).write_encoded(mode, target)
    }
}


//--- Impl for Option

/// Encoding of an optional value.
///
/// This implementation encodes `None` as nothing, i.e., as an OPTIONAL
/// in ASN.1 parlance.
impl<V: Values> Values for Option<V> {
    fn encoded_len(&self, mode: Mode) -> usize {
        match self {
            Some(v) => v.encoded_len(mode),
            None => 0,
        }
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        match self {
            Some(v) => v.write_encoded(mode, target),
            None => Ok(())
        }
    }
}


//--- Impl for slice and Vec

impl<V: Values> Values for [V] {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.iter().map(|v| v.encoded_len(mode)).sum()
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        self.iter().try_for_each(|v| v.write_encoded(mode, target))
    }
}

impl<V: Values> Values for Vec<V> {
    fn encoded_len(&self, mode: Mode) -> usize {
        self.as_slice().encoded_len(mode)
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        self.as_slice().write_encoded(mode, target)
    }
}


//------------ Constructed ---------------------------------------------------

/// A value encoder for a single constructed value.
///
/// The encoder uses the definite length form unless it was explicitly
/// asked to use the indefinite form and the mode allows it.
pub struct Constructed<V> {
    /// The tag of the value.
    tag: Tag,

    /// A value encoder for the content of the value.
    inner: V,

    /// Whether to prefer the indefinite length form.
    indefinite: bool,
}

impl<V> Constructed<V> {
    /// Creates a new constructed value encoder from a tag and content.
    ///
    /// The returned value will encode as a single constructed value with
    /// the given tag and whatever `inner` encodes to as its content.
    pub fn new(tag: Tag, inner: V) -> Self {
        Constructed { tag, inner, indefinite: false }
    }

    /// Creates a new constructed value encoder preferring indefinite length.
    ///
    /// In DER mode, the value will still be encoded with definite length.
    pub fn indefinite(tag: Tag, inner: V) -> Self {
        Constructed { tag, inner, indefinite: true }
    }
}

impl<V: Values> Values for Constructed<V> {
    fn encoded_len(&self, mode: Mode) -> usize {
        if self.indefinite && mode.allows_indefinite() {
            total_indefinite_len(&self.tag, self.inner.encoded_len(mode))
        }
        else {
            total_len(&self.tag, self.inner.encoded_len(mode))
        }
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        if self.indefinite && mode.allows_indefinite() {
            write_indefinite_header(target, &self.tag)?;
            self.inner.write_encoded(mode, target)?;
            write_end_of_contents(target)
        }
        else {
            write_header(
                target, &self.tag, true, self.inner.encoded_len(mode)
            )?;
            self.inner.write_encoded(mode, target)
        }
    }
}


//============ Standard Functions ============================================

/// Returns a value encoder for a SEQUENCE containing `inner`.
pub fn sequence<V: Values>(inner: V) -> Constructed<V> {
    Constructed::new(Tag::SEQUENCE, inner)
}

/// Returns a value encoder for a SET containing `inner`.
pub fn set<V: Values>(inner: V) -> Constructed<V> {
    Constructed::new(Tag::SET, inner)
}

/// Returns the length of a value based on the tag and content length.
///
/// This is necessary because the length octets have a different length
/// depending on the content length.
pub fn total_len(tag: &Tag, content_len: usize) -> usize {
    Ident::primitive(tag.clone()).encoded_len()
        + Length::Definite(content_len).encoded_len()
        + content_len
}

/// Returns the length of a indefinite-form constructed.
///
/// This includes the end-of-contents octets.
fn total_indefinite_len(tag: &Tag, content_len: usize) -> usize {
    Ident::primitive(tag.clone()).encoded_len()
        + Length::Indefinite.encoded_len()
        + content_len
        + 2 // End-of-contents is two bytes.
}

/// Writes the header for a value.
///
/// The header in the sense of this function is the identifier octets and the
/// length octets.
pub fn write_header<T: Target>(
    target: &mut T,
    tag: &Tag,
    constructed: bool,
    content_len: usize,
) -> Result<(), T::Error> {
    Ident::new(tag.clone(), constructed).write_encoded(target)?;
    Length::Definite(content_len).write_encoded(target)
}

/// Writes the header for an indefinite-length constructed.
pub fn write_indefinite_header<T: Target>(
    target: &mut T,
    tag: &Tag,
) -> Result<(), T::Error> {
    Ident::constructed(tag.clone()).write_encoded(target)?;
    Length::Indefinite.write_encoded(target)
}

/// Writes the end-of-contents octets.
pub fn write_end_of_contents<T: Target>(
    target: &mut T,
) -> Result<(), T::Error> {
    target.write_all(b"\0\0")
}


//============ Tests =========================================================
