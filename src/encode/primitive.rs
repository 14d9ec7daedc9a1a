//! PrimitiveContent and related types.
//!
//! This is an internal module. The relevant items are re-exported by the
//! parent.

use crate::ident::Tag;
use crate::mode::Mode;
use super::target::{Target, infallible};
use super::values::{Values, total_len, write_header};


//------------ PrimitiveContent ----------------------------------------------

/// A type that is encoded as a primitive value.
///
/// This trait should be implemented for types that use primitive encoding.
/// It defines, how the content octets of a single primitive value containing
/// a value of the type are to be created. As a consequence, these types
/// gain the [`encode`][Self::encode] and [`encode_as`][Self::encode_as]
/// methods from their implementation of this trait.
pub trait PrimitiveContent {
    /// The natural tag of an encoded value of this type.
    const TAG: Tag;

    /// Returns the length of the encoded content of this type.
    fn encoded_len(&self, mode: Mode) -> usize;

    /// Writes the encoded content to a target.
    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error>;


    //--- Provided methods

    /// Returns a value encoder for this content using the natural tag.
    ///
    /// This is identical to `self.encode_as(Self::TAG)`
    fn encode(&self) -> Primitive<&Self> {
        self.encode_as(Self::TAG)
    }

    /// Returns a value encoder for this content using the given tag.
    ///
    /// The returned value is a content encoder that produces a single
    /// primitive BER encoded value. The tag for this value is explicitely
    /// given via the `tag` argument.
    fn encode_as(&self, tag: Tag) -> Primitive<&Self> {
        Primitive { tag, prim: self }
    }

    /// Writes the encoded content into a new vec.
    fn encode_to_vec(&self, mode: Mode) -> Vec<u8> {
        let mut res = Vec::new();
        infallible(self.write_encoded(mode, &mut res));
        res
    }
}

impl<P: PrimitiveContent + ?Sized> PrimitiveContent for &'_ P {
    const TAG: Tag = P::TAG;

    fn encoded_len(&self, mode: Mode) -> usize {
        (*self).encoded_len(mode)
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        (*self).write_encoded(mode, target)
    }
}


//--- impl for built-in types

impl PrimitiveContent for () {
    const TAG: Tag = Tag::NULL;

    fn encoded_len(&self, _mode: Mode) -> usize {
        0
    }

    fn write_encoded<T: Target>(
        &self, _mode: Mode, _target: &mut T
    ) -> Result<(), T::Error> {
        Ok(())
    }
}

impl PrimitiveContent for bool {
    const TAG: Tag = Tag::BOOLEAN;

    fn encoded_len(&self, _mode: Mode) -> usize {
        1
    }

    fn write_encoded<T: Target>(
        &self, _mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        if *self {
            target.write_all(&[0xff])
        }
        else {
            target.write_all(&[0])
        }
    }
}

impl PrimitiveContent for [u8] {
    const TAG: Tag = Tag::OCTET_STRING;

    fn encoded_len(&self, _mode: Mode) -> usize {
        self.len()
    }

    fn write_encoded<T: Target>(
        &self, _mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self)
    }
}


//------------ Primitive -----------------------------------------------------

/// A value encoder for primitively encoded types.
///
/// This type is returned by [`PrimitiveContent::encode`] and
/// [`PrimitiveContent::encode_as`].
pub struct Primitive<P> {
    /// The tag of the value
    tag: Tag,

    /// The primitive content.
    prim: P,
}

impl<P: PrimitiveContent> Values for Primitive<P> {
    fn encoded_len(&self, mode: Mode) -> usize {
        total_len(&self.tag, self.prim.encoded_len(mode))
    }

    fn write_encoded<T: Target>(
        &self, mode: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        write_header(target, &self.tag, false, self.prim.encoded_len(mode))?;
        self.prim.write_encoded(mode, target)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_builtins() {
        assert_eq!(().encode().to_vec(Mode::Der), b"\x05\x00");
        assert_eq!(false.encode().to_vec(Mode::Der), b"\x01\x01\x00");
        assert_eq!(
            b"ab"[..].encode_as(Tag::ctx(4)).to_vec(Mode::Der),
            b"\x84\x02ab"
        );
    }
}
