//! The X.501 information model.
//!
//! This module provides the types for distinguished names and attributes
//! used by certificates and attribute certificates. Attribute values are
//! compared using the matching rule of their type. The rules and value
//! syntaxes of the commonly used attribute types are kept in a registry
//! accessible via [`AttributeType`]. Values of other types are kept in
//! their encoded form and compared octet by octet.

pub use self::attribute::{
    Attribute, Attributes, AttributeTypeAndValue, AttributeValue,
};
pub use self::name::{Name, RelativeDistinguishedName};
pub use self::registry::{AttributeType, Syntax};

pub mod oid;

mod attribute;
mod name;
mod registry;
