//! Errors of the typed layers.
//!
//! The codec reports problems with encoded data via
//! [`DecodeError`][crate::decode::DecodeError]. Everything built atop the
//! element tree uses the [`Error`] type defined here which wraps the codec
//! errors and adds the ways in which a well-formed element tree can still
//! fail to be a certain structure.

use std::fmt;
use crate::decode::{ContentError, DecodeError};
use crate::int::IntegerRangeError;
use crate::oid::{InvalidArcError, Oid};
use crate::string::CharSetError;
use crate::x509::CryptoError;


//------------ Error ---------------------------------------------------------

/// An error happened while processing typed data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The encoded data was broken.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An element of an unexpected type was encountered.
    #[error(transparent)]
    UnexpectedType(#[from] UnexpectedTypeError),

    /// A required item was missing.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// An integer didn’t fit into the requested type.
    #[error(transparent)]
    IntegerRange(#[from] IntegerRangeError),

    /// An object identifier string was invalid.
    #[error(transparent)]
    InvalidArc(#[from] InvalidArcError),

    /// A string contained characters not allowed for its type.
    #[error(transparent)]
    CharSet(#[from] CharSetError),

    /// A value was present but not acceptable.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// An extension appeared more than once.
    #[error("duplicate extension {0}")]
    DuplicateExtension(Oid),

    /// The cryptography collaborator failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl Error {
    /// Creates an invalid value error from anything displayable.
    pub fn invalid(msg: impl fmt::Display) -> Self {
        Error::InvalidValue(msg.to_string())
    }
}

impl From<ContentError> for Error {
    fn from(err: ContentError) -> Self {
        Error::InvalidValue(err.to_string())
    }
}


//------------ UnexpectedTypeError -------------------------------------------

/// An element had a different type than expected.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct UnexpectedTypeError {
    expected: String,
    found: String,
}

impl UnexpectedTypeError {
    /// Creates a new error from descriptions of both types.
    pub fn new(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        UnexpectedTypeError {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Returns the description of the expected type.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Returns the description of the type actually found.
    pub fn found(&self) -> &str {
        &self.found
    }
}


//------------ NotFoundError -------------------------------------------------

/// A requested item was not present.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{0} not found")]
pub struct NotFoundError(String);

impl NotFoundError {
    /// Creates a new error describing what was missing.
    pub fn new(what: impl fmt::Display) -> Self {
        NotFoundError(what.to_string())
    }
}
