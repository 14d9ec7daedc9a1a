//! Handling of data in Basic Encoding Rules and the X.509 data model.
//!
//! The crate is built in layers. At the bottom, the modules [`decode`] and
//! [`encode`] together with primitive types such as [`Integer`], [`Oid`],
//! or the string types in [`string`] implement BER and DER. On top of
//! these, the [`element`] module provides a generic tree of decoded values.
//!
//! The [`x501`] module uses element trees to model names and attributes,
//! comparing attribute values with the matching rules from
//! [`stringprep`]. The [`x509`] module adds certificates, their
//! extensions, and attribute certificates. Finally, [`path`] builds and
//! validates certification paths.
//!
//! Cryptography is not part of this crate. Signing and verification are
//! delegated to an implementation of the [`x509::Crypto`] trait. If the
//! `ed25519` feature is enabled, which it is by default, the crate provides
//! [`x509::Ed25519Crypto`] as a software implementation.

pub use self::element::Element;
pub use self::error::Error;
pub use self::ident::{Class, Ident, Tag, TagNumber};
pub use self::int::{Integer, IntegerRangeError, Unsigned};
pub use self::length::Length;
pub use self::mode::Mode;
pub use self::oid::{ConstOid, InvalidArcError, Oid, RelativeOid};
pub use self::string::{AnyString, BitString, OctetString};
pub use self::time::{GeneralizedTime, UtcTime};

pub mod decode;
pub mod element;
pub mod encode;
pub mod error;
pub mod oid;
pub mod path;
pub mod string;
pub mod stringprep;
pub mod x501;
pub mod x509;

mod ident;
mod int;
mod length;
mod mode;
mod time;
