//! Parsing BER-encoded data.
//!
//! This module provides the means to read BER- or DER-encoded octets. The
//! [`Source`] type is a cursor over a buffer of octets that hands out the
//! content of values without copying. Problems with the encoded data are
//! reported through [`DecodeError`] which carries a human readable message
//! and the position in the data where the problem was found.
//!
//! Most of the time, you won’t use this module directly but rather
//! [`Element::decode`][crate::element::Element::decode] which turns data
//! into a tree of values.

pub use self::error::{ContentError, DecodeError, Pos};
pub use self::source::Source;

mod error;
mod source;
