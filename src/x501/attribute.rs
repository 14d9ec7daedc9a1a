//! Attributes and their values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::element::{Element, Set};
use crate::error::{Error, NotFoundError, UnexpectedTypeError};
use crate::oid::Oid;
use crate::string::{AnyString, Ia5String, PrintableString};
use crate::x509::RoleSyntax;
use super::registry::{AttributeType, Syntax};


//------------ AttributeValue ------------------------------------------------

/// The value of an attribute.
///
/// Values of types found in the registry are decoded into their typed
/// variant. All other values are kept as the element they were given as.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeValue {
    /// A character string.
    String(AnyString),

    /// The role of an attribute certificate holder.
    Role(RoleSyntax),

    /// A value of an unknown type.
    Opaque(Element),
}

impl AttributeValue {
    /// Decodes a value of the attribute type `oid`.
    pub fn from_element<T: AsRef<[u8]>>(
        oid: &Oid<T>, element: &Element
    ) -> Result<Self, Error> {
        match AttributeType::syntax_for(oid) {
            Syntax::DirectoryString => {
                let value = element.expect_string()?;
                match *value {
                    AnyString::Teletex(_) | AnyString::Printable(_)
                    | AnyString::Universal(_) | AnyString::Utf8(_)
                    | AnyString::Bmp(_) => {
                        Ok(AttributeValue::String(value.clone()))
                    }
                    _ => {
                        Err(UnexpectedTypeError::new(
                            "DirectoryString", value.tag()
                        ).into())
                    }
                }
            }
            Syntax::Printable => {
                match *element.expect_string()? {
                    ref value @ AnyString::Printable(_) => {
                        Ok(AttributeValue::String(value.clone()))
                    }
                    ref value => {
                        Err(UnexpectedTypeError::new(
                            "PrintableString", value.tag()
                        ).into())
                    }
                }
            }
            Syntax::Ia5 => {
                match *element.expect_string()? {
                    ref value @ AnyString::Ia5(_) => {
                        Ok(AttributeValue::String(value.clone()))
                    }
                    ref value => {
                        Err(UnexpectedTypeError::new(
                            "IA5String", value.tag()
                        ).into())
                    }
                }
            }
            Syntax::Role => {
                RoleSyntax::from_element(element).map(AttributeValue::Role)
            }
            Syntax::Opaque => Ok(AttributeValue::Opaque(element.clone())),
        }
    }

    /// Creates a value of the attribute type `oid` from a Rust string.
    ///
    /// Directory strings become a PrintableString if possible or a
    /// UTF8String otherwise. Values of unknown types are encoded as a
    /// UTF8String. Role values can’t be created from a string.
    pub fn from_str_value<T: AsRef<[u8]>>(
        oid: &Oid<T>, value: &str
    ) -> Result<Self, Error> {
        match AttributeType::syntax_for(oid) {
            Syntax::DirectoryString => {
                Ok(AttributeValue::String(AnyString::printable_or_utf8(value)))
            }
            Syntax::Printable => {
                Ok(AttributeValue::String(AnyString::Printable(
                    PrintableString::from_str(value)?
                )))
            }
            Syntax::Ia5 => {
                Ok(AttributeValue::String(AnyString::Ia5(
                    Ia5String::from_str(value)?
                )))
            }
            Syntax::Role => {
                Err(Error::invalid("role values must be given in encoded form"))
            }
            Syntax::Opaque => Ok(AttributeValue::Opaque(Element::utf8(value))),
        }
    }

    /// Returns the element for the value.
    pub fn to_element(&self) -> Element {
        match *self {
            AttributeValue::String(ref value) => value.clone().into(),
            AttributeValue::Role(ref value) => value.to_element(),
            AttributeValue::Opaque(ref value) => value.clone(),
        }
    }

    /// Returns the string if the value is a character string.
    pub fn as_string(&self) -> Option<&AnyString> {
        match *self {
            AttributeValue::String(ref value) => Some(value),
            AttributeValue::Opaque(Element::String(ref value)) => Some(value),
            _ => None
        }
    }

    /// Returns whether `self` matches `other` as values of type `oid`.
    pub fn matches<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>, other: &AttributeValue
    ) -> bool {
        AttributeType::rule_for(oid).compare(
            &self.to_element(), &other.to_element()
        )
    }
}

impl From<AnyString> for AttributeValue {
    fn from(value: AnyString) -> Self {
        AttributeValue::String(value)
    }
}

impl From<RoleSyntax> for AttributeValue {
    fn from(value: RoleSyntax) -> Self {
        AttributeValue::Role(value)
    }
}


//------------ AttributeTypeAndValue -----------------------------------------

/// A single value of an attribute together with its type.
///
/// ```text
/// AttributeTypeAndValue ::= SEQUENCE {
///     type     AttributeType,
///     value    AttributeValue }
/// ```
#[derive(Clone, Debug)]
pub struct AttributeTypeAndValue {
    typ: Oid,
    value: AttributeValue,
}

impl AttributeTypeAndValue {
    /// Creates a new value from its parts.
    pub fn new(typ: Oid, value: AttributeValue) -> Self {
        AttributeTypeAndValue { typ, value }
    }

    /// Creates a new value from a Rust string.
    pub fn from_str_value<T: AsRef<[u8]>>(
        typ: &Oid<T>, value: &str
    ) -> Result<Self, Error> {
        Ok(AttributeTypeAndValue {
            typ: typ.to_bytes_oid(),
            value: AttributeValue::from_str_value(typ, value)?,
        })
    }

    pub fn typ(&self) -> &Oid {
        &self.typ
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let typ = fields.take()?.expect_oid()?.clone();
        let value = AttributeValue::from_element(&typ, fields.take()?)?;
        fields.finish()?;
        Ok(AttributeTypeAndValue { typ, value })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            Element::from(&self.typ), self.value.to_element()
        ])
    }

    /// Returns whether the type is the same and the values match.
    pub fn matches(&self, other: &Self) -> bool {
        self.typ == other.typ && self.value.matches(&self.typ, &other.value)
    }
}

impl PartialEq for AttributeTypeAndValue {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for AttributeTypeAndValue { }


//--- Display

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match AttributeType::by_oid(&self.typ) {
            Some(known) => f.write_str(known.name())?,
            None => write!(f, "{}", self.typ)?,
        }
        f.write_str("=")?;
        match self.value.as_string() {
            Some(value) => write_escaped(f, &value.to_unicode()),
            None => {
                f.write_str("#")?;
                for ch in self.value.to_element().to_der().iter() {
                    write!(f, "{:02x}", ch)?;
                }
                Ok(())
            }
        }
    }
}

/// Writes a string value escaped for use in a string representation.
fn write_escaped(f: &mut fmt::Formatter, value: &str) -> fmt::Result {
    let last = value.chars().count().saturating_sub(1);
    for (idx, ch) in value.chars().enumerate() {
        match ch {
            '"' | '+' | ',' | ';' | '<' | '>' | '\\' | '=' => {
                write!(f, "\\{}", ch)?
            }
            '#' if idx == 0 => f.write_str("\\#")?,
            ' ' if idx == 0 || idx == last => f.write_str("\\ ")?,
            '\0' => f.write_str("\\00")?,
            _ => write!(f, "{}", ch)?,
        }
    }
    Ok(())
}


//------------ Attribute -----------------------------------------------------

/// An attribute with all its values.
///
/// ```text
/// Attribute ::= SEQUENCE {
///     type     AttributeType,
///     values   SET OF AttributeValue }
/// ```
///
/// The values are encoded in the canonical order of a SET OF.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribute {
    typ: Oid,
    values: Vec<AttributeValue>,
}

impl Attribute {
    /// Creates a new attribute.
    ///
    /// Returns an error if there are no values.
    pub fn new(
        typ: Oid, values: Vec<AttributeValue>
    ) -> Result<Self, Error> {
        if values.is_empty() {
            return Err(Error::invalid("attribute without values"))
        }
        Ok(Attribute { typ, values })
    }

    pub fn typ(&self) -> &Oid {
        &self.typ
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// Returns the first value.
    pub fn first_value(&self) -> &AttributeValue {
        // Attributes always have at least one value.
        &self.values[0]
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let typ = fields.take()?.expect_oid()?.clone();
        let values = fields.take()?.expect_set()?.iter().map(|item| {
            AttributeValue::from_element(&typ, item)
        }).collect::<Result<Vec<_>, _>>()?;
        fields.finish()?;
        Self::new(typ, values)
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            Element::from(&self.typ),
            Element::sorted_set_of(
                self.values.iter().map(AttributeValue::to_element)
            ),
        ])
    }

    /// Interprets the values as values of the attribute type `oid`.
    ///
    /// Returns an error if the attribute is of a different type or if a
    /// value kept in opaque form can’t be decoded for the type.
    pub fn cast_values<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Result<Attribute, Error> {
        if self.typ != *oid {
            return Err(UnexpectedTypeError::new(oid, &self.typ).into())
        }
        let values = self.values.iter().map(|value| match *value {
            AttributeValue::Opaque(ref element) => {
                AttributeValue::from_element(oid, element)
            }
            ref other => Ok(other.clone())
        }).collect::<Result<Vec<_>, _>>()?;
        Ok(Attribute { typ: self.typ.clone(), values })
    }
}


//------------ Attributes ----------------------------------------------------

/// A collection of attributes.
///
/// Certificates use a SEQUENCE OF attributes in the subject directory
/// attributes extension while attribute certificates use SEQUENCE OF and
/// other places SET OF. The collection can encode itself as either.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Attributes {
    items: Vec<Attribute>,
}

impl Attributes {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the first attribute of the given type.
    pub fn first_of<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Result<&Attribute, NotFoundError> {
        self.items.iter().find(|item| item.typ == *oid).ok_or_else(|| {
            NotFoundError::new(format_args!("attribute {}", oid))
        })
    }

    /// Returns an iterator over all attributes of the given type.
    pub fn all_of<'a, T: AsRef<[u8]>>(
        &'a self, oid: &'a Oid<T>
    ) -> impl Iterator<Item = &'a Attribute> + 'a {
        self.items.iter().filter(move |item| item.typ == *oid)
    }

    /// Returns whether there is an attribute of the given type.
    pub fn has<T: AsRef<[u8]>>(&self, oid: &Oid<T>) -> bool {
        self.items.iter().any(|item| item.typ == *oid)
    }

    /// Returns a copy with `attr` added.
    pub fn with_additional(mut self, attr: Attribute) -> Self {
        self.items.push(attr);
        self
    }

    /// Returns a copy with `attr` replacing all attributes of its type.
    pub fn with_unique(mut self, attr: Attribute) -> Self {
        self.items.retain(|item| item.typ != attr.typ);
        self.items.push(attr);
        self
    }

    /// Decodes a SEQUENCE OF or SET OF attributes.
    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let items = match *element {
            Element::Sequence(ref seq) => seq.items(),
            Element::Set(ref set) => set.items(),
            _ => {
                return Err(UnexpectedTypeError::new(
                    "SEQUENCE or SET", element.tag()
                ).into())
            }
        };
        Ok(Attributes {
            items: items.iter().map(Attribute::from_element).collect::<
                Result<_, _>
            >()?
        })
    }

    /// Returns the collection as a SEQUENCE OF element.
    pub fn to_sequence_element(&self) -> Element {
        Element::sequence(self.items.iter().map(Attribute::to_element))
    }

    /// Returns the collection as a SET OF element in DER order.
    pub fn to_set_element(&self) -> Element {
        Element::Set(
            self.items.iter().map(Attribute::to_element).collect::<Set>()
                .sorted_set_of()
        )
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Attributes { items: iter.into_iter().collect() }
    }
}


//============ Tests =========================================================
