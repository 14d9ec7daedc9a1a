//! BER-encoded Restricted Character String types.
//!
//! This is an internal module. It’s public items are re-exported by the
//! parent.

pub use self::ascii::{
    Ia5CharSet, Ia5String, NumericCharSet, NumericString,
    PrintableCharSet, PrintableString, VisibleCharSet, VisibleString,
};
pub use self::latin1::{
    CharacterCharSet, CharacterString, GeneralCharSet, GeneralString,
    GraphicCharSet, GraphicString, ObjectDescriptorCharSet, ObjectDescriptor,
    TeletexCharSet, TeletexString, VideotexCharSet, VideotexString,
};
pub use self::unicode::{
    BmpCharSet, BmpString, UniversalCharSet, UniversalString,
    Utf8CharSet, Utf8String,
};

use std::{error, fmt, hash, str};
use std::borrow::Cow;
use std::marker::PhantomData;
use bytes::Bytes;
use crate::encode::{PrimitiveContent, Target};
use crate::ident::Tag;
use crate::mode::Mode;

mod ascii;
mod latin1;
mod unicode;


//------------ CharSet -------------------------------------------------------

/// The character set of a restricted character string type.
///
/// The trait only includes associated functions and can thus be implemented
/// for marker types. It main purpose is to take an iterator over `u8`s and
/// produce `char`s or errors. This happens in [`next_char`][Self::next_char].
///
/// The trait is primarily used to define the character set of the
/// [`RestrictedString`] type.
pub trait CharSet {
    /// The natural tag of the related restricted character string type.
    const TAG: Tag;

    /// Returns the next character from a octet sequence.
    fn next_char<I: Iterator<Item=u8>>(
        iter: &mut I
    ) -> Result<Option<char>, CharSetError>;

    /// Converts a `str` into a octet sequence.
    ///
    /// The method takes a `str` and converts it into one of three things.
    /// If the string can be encoded in this character set and its own octet
    /// sequence is identical to the encoded sequence, it returns its octet
    /// sequence as a `Ok(Cow::Borrowed(_))`. If the octet sequence differs,
    /// it creates that and returns it as a `Ok(Cow::Owned(_))`. Finally, if
    /// the string cannot be encoded in this character set, it returns an
    /// error.
    fn from_str(s: &str) -> Result<Cow<[u8]>, CharSetError>;

    /// Checks whether a sequence of octets is a valid string.
    ///
    /// The method returns an error if the sequence of the octets represented
    /// by `iter` is not in fact a valid string for this character set.
    fn check<I: Iterator<Item=u8>>(iter: &mut I) -> Result<(), CharSetError> {
        while Self::next_char(iter)?.is_some() { }
        Ok(())
    }
}


//------------ RestrictedString ----------------------------------------------

/// A generic restricted character string.
///
/// Restricted character strings essentially are a sequence of characters
/// from a specific character set mapped into a sequence of octets. In BER,
/// these are in fact encoded just like an octet string with a different tag.
/// Consequently, this type is a wrapper around the content octets that
/// makes sure that they are correctly encoded for the given character set.
///
/// You can create a value from its content octets via
/// [`from_content`][Self::from_content] or from a `str` via
/// [`from_str`][Self::from_str]. Conversely, the string can be converted
/// into a Rust string via its `Display` implementation or iterated over
/// via [`chars`][Self::chars].
///
/// The character set is defined via the type argument `L`. The module
/// provides type aliases for all the restricted string types of X.680.
pub struct RestrictedString<L: CharSet> {
    /// The content octets.
    octets: Bytes,

    /// A marker for the character set.
    marker: PhantomData<L>,
}

impl<L: CharSet> RestrictedString<L> {
    /// Creates a restricted string from its content octets.
    ///
    /// Returns an error if the octets are not valid for the character set.
    pub fn from_content(octets: Bytes) -> Result<Self, CharSetError> {
        L::check(&mut octets.iter().copied())?;
        Ok(RestrictedString { octets, marker: PhantomData })
    }

    /// Creates a restricted string from a `str`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, CharSetError> {
        let octets = match L::from_str(s)? {
            Cow::Borrowed(slice) => Bytes::copy_from_slice(slice),
            Cow::Owned(vec) => vec.into(),
        };
        Ok(RestrictedString { octets, marker: PhantomData })
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Converts the string into its content octets.
    pub fn into_bytes(self) -> Bytes {
        self.octets
    }

    /// Returns an iterator over the characters of the string.
    pub fn chars(&self) -> RestrictedStringChars<L> {
        RestrictedStringChars {
            octets: self.octets.iter().copied(),
            marker: PhantomData,
        }
    }
}


//--- Clone, PartialEq, Eq, Hash

impl<L: CharSet> Clone for RestrictedString<L> {
    fn clone(&self) -> Self {
        RestrictedString { octets: self.octets.clone(), marker: PhantomData }
    }
}

impl<L: CharSet> PartialEq for RestrictedString<L> {
    fn eq(&self, other: &Self) -> bool {
        self.octets == other.octets
    }
}

impl<L: CharSet> Eq for RestrictedString<L> { }

impl<L: CharSet> hash::Hash for RestrictedString<L> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.octets.hash(state)
    }
}


//--- FromStr

impl<L: CharSet> str::FromStr for RestrictedString<L> {
    type Err = CharSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}


//--- PrimitiveContent

impl<L: CharSet> PrimitiveContent for RestrictedString<L> {
    const TAG: Tag = L::TAG;

    fn encoded_len(&self, _: Mode) -> usize {
        self.octets.len()
    }

    fn write_encoded<T: Target>(
        &self, _: Mode, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self.octets.as_ref())
    }
}


//--- Display and Debug

impl<L: CharSet> fmt::Display for RestrictedString<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.chars().try_for_each(|ch| fmt::Write::write_char(f, ch))
    }
}

impl<L: CharSet> fmt::Debug for RestrictedString<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(\"{}\")", L::TAG, self)
    }
}


//------------ RestrictedStringChars -----------------------------------------

/// An iterator over the characters in a restricted string.
pub struct RestrictedStringChars<'a, L: CharSet> {
    /// The remaining octets.
    octets: std::iter::Copied<std::slice::Iter<'a, u8>>,

    /// A marker for the character set.
    marker: PhantomData<L>,
}

impl<L: CharSet> Iterator for RestrictedStringChars<'_, L> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        // The content has been checked upon creation.
        L::next_char(&mut self.octets).unwrap_or(
            Some(char::REPLACEMENT_CHARACTER)
        )
    }
}


//------------ CharSetError --------------------------------------------------

/// A string contained characters not allowed by its character set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CharSetError(());

impl fmt::Display for CharSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid characters")
    }
}

impl error::Error for CharSetError { }
