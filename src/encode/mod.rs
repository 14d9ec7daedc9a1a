//! Encoding data in BER.
//!
//! This modules provides means to encode data in BER and DER.
//!
//! Encoding is done via the trait [`Values`]. A type implementing it knows
//! how to write itself as a sequence of one or more encoded values into a
//! [`Target`]. The encoding mode is passed in at runtime: in DER mode all
//! values use the definite length form.
//!
//! The trait [`PrimitiveContent`] helps with producing encoders for types
//! that use the primitive encoding. Through this trait the types can declare
//! how their content is encoded and receive an automatic encoder type based
//! on that.
//!
//! Most of the time, you will encode values through
//! [`Element::encode`][crate::element::Element::encode] which implements
//! [`Values`] for the complete value tree.

pub use self::primitive::{PrimitiveContent, Primitive};
pub use self::target::{Target, infallible};
pub use self::values::{
    Values, Constructed,
    sequence, set, total_len, write_end_of_contents, write_header,
    write_indefinite_header,
};

mod primitive;
mod target;
mod values;
