//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};


//------------ ContentError --------------------------------------------------

/// An error happened while interpreting BER-encoded data.
///
/// The error carries a human readable message only. Its position in the
/// data is added when the error is turned into a [`DecodeError`].
pub struct ContentError {
    /// The error message.
    message: ErrorMessage,
}

impl ContentError {
    /// Creates a content error from a static str.
    pub fn from_static(msg: &'static str) -> Self {
        ContentError {
            message: ErrorMessage::Static(msg)
        }
    }

    /// Creates a content error from a boxed trait object.
    pub fn from_boxed(
        msg: Box<dyn fmt::Display + Send + Sync + 'static>
    ) -> Self {
        ContentError {
            message: ErrorMessage::Boxed(msg)
        }
    }
}

impl From<&'static str> for ContentError {
    fn from(msg: &'static str) -> Self {
        Self::from_static(msg)
    }
}

impl From<String> for ContentError {
    fn from(msg: String) -> Self {
        Self::from_boxed(Box::new(msg))
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.message {
            ErrorMessage::Static(msg) => f.write_str(msg),
            ErrorMessage::Boxed(ref msg) => msg.fmt(f),
        }
    }
}

impl fmt::Debug for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ContentError")
            .field(&format_args!("{}", self))
            .finish()
    }
}


//------------ ErrorMessage --------------------------------------------------

/// The actual error message as a hidden enum.
enum ErrorMessage {
    /// The error message is a static str.
    Static(&'static str),

    /// The error message is a boxed trait object.
    Boxed(Box<dyn fmt::Display + Send + Sync + 'static>),
}


//------------ Pos -----------------------------------------------------------

/// The position of an error in the decoded data.
///
/// This is the number of octets from the start of the outermost value
/// that were consumed before the error was noticed.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the position as an octet offset.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// This covers malformed, truncated and non-canonical data as well as data
/// that is correctly encoded but uses a type this crate doesn’t support.
/// The latter case can be detected via [`is_unsupported`][Self::is_unsupported].
///
/// Decoding never produces partial results: if any part of a value is
/// broken, the whole decode operation fails with this error.
pub struct DecodeError {
    /// The error message.
    error: ContentError,

    /// The position where the error happened.
    pos: Pos,

    /// Whether the data uses an unsupported type.
    unsupported: bool,
}

impl DecodeError {
    /// Creates a decode error for malformed content at a given position.
    pub fn content(error: impl Into<ContentError>, pos: impl Into<Pos>) -> Self {
        DecodeError {
            error: error.into(),
            pos: pos.into(),
            unsupported: false,
        }
    }

    /// Creates a decode error for an unsupported type at a given position.
    pub fn unsupported(
        error: impl Into<ContentError>, pos: impl Into<Pos>
    ) -> Self {
        DecodeError {
            error: error.into(),
            pos: pos.into(),
            unsupported: true,
        }
    }

    /// Returns whether the error is caused by an unsupported type.
    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    /// Returns the position of the error.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Returns a new error with the position shifted by `offset` octets.
    ///
    /// This is used when an inner value is decoded from a sub-slice.
    pub fn shifted(self, offset: usize) -> Self {
        DecodeError {
            pos: Pos(self.pos.0.saturating_add(offset)),
            .. self
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.unsupported {
            write!(f, "unsupported type: {} at position {}", self.error, self.pos)
        }
        else {
            write!(f, "{} at position {}", self.error, self.pos)
        }
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DecodeError")
            .field("error", &self.error)
            .field("pos", &self.pos)
            .field("unsupported", &self.unsupported)
            .finish()
    }
}

impl error::Error for DecodeError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            DecodeError::content("unexpected end of data", 12).to_string(),
            "unexpected end of data at position 12"
        );
        assert_eq!(
            DecodeError::content(format!("bad {}", "tag"), 3).to_string(),
            "bad tag at position 3"
        );
        let err = DecodeError::unsupported("REAL", 0);
        assert!(err.is_unsupported());
        assert_eq!(err.shifted(4).pos().offset(), 4);
    }
}
