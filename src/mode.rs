//! The encoding mode.
//!
//! This is a private module. Its public items are re-exported by the parent.


//------------ Mode ----------------------------------------------------------

/// The BER mode.
///
/// ASN.1 values can be encoded following one of a number of rule sets. The
/// most flexible are the Basic Encoding Rules which allow alternative
/// encodings for some types. The Distinguished Encoding Rules are a
/// restricted subset of BER that assigns exactly one encoding to every
/// value.
///
/// This type lists the rule sets supported by the crate. It is used both
/// when decoding, where it determines which encodings are accepted, and when
/// encoding, where it determines whether a value may use indefinite length
/// encoding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings for
    /// some types as well as indefinite length values.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding. Additional rules apply to some types.
    Der,
}

impl Mode {
    /// Returns whether the mode is DER.
    pub fn is_der(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Returns whether the mode allows indefinite length constructed values.
    pub fn allows_indefinite(self) -> bool {
        matches!(self, Mode::Ber)
    }

    /// Returns whether primitive types may use the constructed encoding.
    ///
    /// This applies to bit strings, octet strings, and the character
    /// string types.
    pub fn allows_segmented(self) -> bool {
        matches!(self, Mode::Ber)
    }
}


//--- Default

impl Default for Mode {
    fn default() -> Self {
        Mode::Der
    }
}
