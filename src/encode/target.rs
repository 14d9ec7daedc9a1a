//! Targets for encoding.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::error;
use std::convert::Infallible;


//------------ Target --------------------------------------------------------

/// Something encoded octets can be written to.
///
/// Encoders write into a target rather than an `io::Write` so that a
/// target that can’t fail, such as a vec, can say so via its error type.
pub trait Target {
    type Error: error::Error;

    /// Appends `data` to the target.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl Target for Vec<u8> {
    type Error = Infallible;

    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(data);
        Ok(())
    }
}


//------------ infallible ----------------------------------------------------

/// Unwraps the result of writing to a target that can’t fail.
pub fn infallible<T>(res: Result<T, Infallible>) -> T {
    match res {
        Ok(value) => value,
        Err(err) => match err { },
    }
}
