//! Sources for decoding.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use bytes::Bytes;
use super::error::{ContentError, DecodeError, Pos};


//------------ Source --------------------------------------------------------

/// A cursor over a sequence of octets to be decoded.
///
/// The source keeps the complete data as a [`Bytes`] value so that content
/// octets can be handed out without copying. It tracks the current position
/// which is used both for reading and for reporting the location of errors.
#[derive(Clone, Debug)]
pub struct Source {
    /// The complete data.
    data: Bytes,

    /// The current read position.
    pos: usize,

    /// The position relative to the outermost data of index 0.
    ///
    /// This is added to positions in errors.
    offset: usize,
}

impl Source {
    /// Creates a new source for the given data.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Source { data: data.into(), pos: 0, offset: 0 }
    }

    /// Creates a new source starting at the given cursor.
    ///
    /// Positions reported by the source are still relative to the start
    /// of `data`.
    pub fn with_cursor(data: impl Into<Bytes>, cursor: usize) -> Self {
        let data = data.into();
        let pos = cursor.min(data.len());
        Source { data, pos, offset: 0 }
    }

    /// Creates a source for a nested part of some outer data.
    ///
    /// `offset` is the position of `data` within that outer data.
    pub(crate) fn nested(data: Bytes, offset: usize) -> Self {
        Source { data, pos: 0, offset }
    }

    /// Returns the current position of the source.
    pub fn pos(&self) -> Pos {
        Pos::from(self.pos + self.offset)
    }

    /// Returns the current cursor, i.e., the index into the data.
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// Returns the number of octets left.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns whether the source has been read completely.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns a slice of the data that hasn’t been read yet.
    pub fn slice(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// Returns the octet `n` places after the current position.
    ///
    /// Returns `None` if there aren’t enough octets.
    pub fn peek_nth(&self, n: usize) -> Option<u8> {
        self.slice().get(n).copied()
    }

    /// Takes a single octet from the source.
    ///
    /// If there aren’t any more octets available from the source, returns
    /// a content error.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        match self.peek_nth(0) {
            Some(value) => {
                self.pos += 1;
                Ok(value)
            }
            None => Err(self.content_err("unexpected end of data"))
        }
    }

    /// Takes `len` octets from the source as a bytes value.
    pub fn take_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if self.remaining() < len {
            return Err(self.content_err("unexpected end of data"))
        }
        let res = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(res)
    }

    /// Advances the source by `len` octets.
    pub fn advance(&mut self, len: usize) -> Result<(), DecodeError> {
        if self.remaining() < len {
            return Err(self.content_err("unexpected end of data"))
        }
        self.pos += len;
        Ok(())
    }

    /// Returns the data between the given cursor and the current position.
    pub(crate) fn bytes_since(&self, start: usize) -> Bytes {
        self.data.slice(start..self.pos)
    }

    /// Returns the absolute offset of a cursor value.
    pub(crate) fn offset_of(&self, cursor: usize) -> usize {
        self.offset + cursor
    }

    /// Returns a content error at the current position of the source.
    pub fn content_err(
        &self, err: impl Into<ContentError>
    ) -> DecodeError {
        DecodeError::content(err.into(), self.pos())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn take_and_advance() {
        let mut source = Source::new(Bytes::from_static(b"\x01\x02\x03\x04"));
        assert_eq!(source.take_u8().unwrap(), 1);
        assert_eq!(source.peek_nth(1), Some(3));
        assert_eq!(source.take_bytes(2).unwrap().as_ref(), b"\x02\x03");
        assert_eq!(source.remaining(), 1);
        assert!(source.take_bytes(2).is_err());
        source.advance(1).unwrap();
        assert!(source.is_exhausted());
        let err = source.take_u8().unwrap_err();
        assert_eq!(err.pos().offset(), 4);
    }

    #[test]
    fn nested_positions() {
        let mut source = Source::nested(Bytes::from_static(b"\x05"), 10);
        source.take_u8().unwrap();
        assert_eq!(source.take_u8().unwrap_err().pos().offset(), 11);
    }

    #[test]
    fn cursor() {
        let source = Source::with_cursor(Bytes::from_static(b"\x01\x02"), 1);
        assert_eq!(source.cursor(), 1);
        assert_eq!(source.slice(), b"\x02");
    }
}
