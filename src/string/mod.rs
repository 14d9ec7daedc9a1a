//! BER encoding for various strings types.
//!
//! This module provides type that match the various string encodings provided
//! by ASN.1 and BER.
//!
//! There are two types of strings for binary data. [`OctetString`]s contain
//! a unrestricted sequence of octets while [`BitString`]s contain a sequence
//! of bits that does not need to be of a length divisible by eight.
//!
//! In addition, there are a number of so-called restricted character strings
//! that each contain a sequence of characters according to a pre-defined
//! character set:
//!
//! * [`Utf8String`] contains any Unicode characters encoded in UTF-8,
//! * [`NumericString`] contains only decimals digits and spaces,
//! * [`PrintableString`] contains a subset of ASCII characters including
//!   letters, digits, and a few symbols,
//! * [`Ia5String`] contains ASCII characters only (IA5 is an alternative
//!   name for ASCII),
//! * [`VisibleString`] contains the printing ASCII characters,
//! * [`BmpString`] and [`UniversalString`] contain Unicode characters
//!   encoded as UCS-2 and UCS-4, respectively,
//! * [`TeletexString`], [`VideotexString`], [`GraphicString`],
//!   [`GeneralString`], and [`CharacterString`] use character sets selected
//!   via escape sequences. We don’t interpret those and treat the octets as
//!   ISO 8859-1.
//!
//! All of these are implemented atop a generic [`RestrictedString`] by
//! providing an implementation for the [`CharSet`] trait. The enum
//! [`AnyString`] can hold a value of any of them.

//--- Re-exports

pub use self::any::AnyString;
pub use self::bit::BitString;
pub use self::octet::OctetString;
pub use self::restricted::*;

//--- Private modules

mod any;
mod bit;
mod octet;
mod restricted;
