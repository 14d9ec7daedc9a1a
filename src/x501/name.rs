//! Distinguished names.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, str};
use crate::element::Element;
use crate::error::Error;
use crate::oid::Oid;
use super::attribute::{AttributeTypeAndValue, AttributeValue};
use super::registry::AttributeType;


//------------ RelativeDistinguishedName -------------------------------------

/// A relative distinguished name.
///
/// ```text
/// RelativeDistinguishedName ::=
///     SET SIZE (1..MAX) OF AttributeTypeAndValue
/// ```
///
/// The order of the values is insignificant. Two RDNs are equal if each
/// value of one matches a value of the other.
#[derive(Clone, Debug)]
pub struct RelativeDistinguishedName {
    items: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    /// Creates a new RDN from its values.
    ///
    /// Returns an error if there are no values.
    pub fn new(items: Vec<AttributeTypeAndValue>) -> Result<Self, Error> {
        if items.is_empty() {
            return Err(Error::invalid("empty relative distinguished name"))
        }
        Ok(RelativeDistinguishedName { items })
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeTypeAndValue> + '_ {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        Self::new(
            element.expect_set()?.iter().map(
                AttributeTypeAndValue::from_element
            ).collect::<Result<_, _>>()?
        )
    }

    /// Returns the RDN as a SET OF in DER order.
    pub fn to_element(&self) -> Element {
        Element::sorted_set_of(
            self.items.iter().map(AttributeTypeAndValue::to_element)
        )
    }
}

impl PartialEq for RelativeDistinguishedName {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().all(|left| {
                other.items.iter().any(|right| left.matches(right))
            })
            && other.items.iter().all(|right| {
                self.items.iter().any(|left| left.matches(right))
            })
    }
}

impl Eq for RelativeDistinguishedName { }

impl fmt::Display for RelativeDistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for item in &self.items {
            if first {
                first = false;
            }
            else {
                f.write_str("+")?;
            }
            item.fmt(f)?;
        }
        Ok(())
    }
}


//------------ Name ----------------------------------------------------------

/// A distinguished name.
///
/// ```text
/// Name ::= CHOICE { -- only one possibility for now --
///     rdnSequence  RDNSequence }
///
/// RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
/// ```
///
/// Names are compared using the matching rules of their attribute types.
/// The order of the RDNs is significant.
///
/// The string representation follows RFC 4514. It lists the RDNs in
/// reverse order, i.e., the most specific RDN comes first. Names can be
/// parsed from such strings via `FromStr`.
#[derive(Clone, Debug, Default)]
pub struct Name {
    rdns: Vec<RelativeDistinguishedName>,
}

impl Name {
    /// Creates a name from its RDNs in encoding order.
    pub fn new(rdns: Vec<RelativeDistinguishedName>) -> Self {
        Name { rdns }
    }

    /// Creates a name with one single-valued RDN per value.
    ///
    /// The values are given in encoding order.
    pub fn from_values(
        values: impl IntoIterator<Item = AttributeTypeAndValue>
    ) -> Self {
        Name {
            rdns: values.into_iter().map(|item| {
                RelativeDistinguishedName { items: vec![item] }
            }).collect()
        }
    }

    /// Parses a name from its string representation.
    pub fn from_string(s: &str) -> Result<Self, Error> {
        Parser::new(s).parse_name()
    }

    /// Returns the RDNs in encoding order.
    pub fn rdns(&self) -> &[RelativeDistinguishedName] {
        &self.rdns
    }

    /// Returns whether the name has no RDNs.
    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// Returns an iterator over all values of all RDNs.
    pub fn values(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.rdns.iter().flat_map(|rdn| rdn.items.iter())
    }

    /// Returns the first value of the given attribute type.
    pub fn first_value_of<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Option<&AttributeValue> {
        self.values().find(|item| item.typ() == oid).map(|item| item.value())
    }

    /// Returns the number of values of the given attribute type.
    pub fn count_of<T: AsRef<[u8]>>(&self, oid: &Oid<T>) -> usize {
        self.values().filter(|item| item.typ() == oid).count()
    }

    /// Returns all values of the given attribute type.
    pub fn all_of<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Vec<&AttributeValue> {
        self.values().filter(|item| item.typ() == oid).map(|item| {
            item.value()
        }).collect()
    }

    /// Returns whether `self` is the same as or subordinate to `base`.
    ///
    /// This is the case if the RDNs of `base` form the start of the RDNs
    /// of `self`.
    pub fn is_within(&self, base: &Name) -> bool {
        base.rdns.len() <= self.rdns.len()
            && base.rdns.iter().zip(&self.rdns).all(|(l, r)| l == r)
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        Ok(Name {
            rdns: element.expect_sequence()?.iter().map(
                RelativeDistinguishedName::from_element
            ).collect::<Result<_, _>>()?
        })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            self.rdns.iter().map(RelativeDistinguishedName::to_element)
        )
    }
}


//--- PartialEq and Eq

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.rdns == other.rdns
    }
}

impl Eq for Name { }


//--- FromStr and Display

impl str::FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for rdn in self.rdns.iter().rev() {
            if first {
                first = false;
            }
            else {
                f.write_str(",")?;
            }
            rdn.fmt(f)?;
        }
        Ok(())
    }
}


//------------ Parser --------------------------------------------------------

/// A parser for the string representation of names.
struct Parser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Parser { data: s.as_bytes(), pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let res = self.peek();
        if res.is_some() {
            self.pos += 1;
        }
        res
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1
        }
    }

    fn err(&self, msg: &str) -> Error {
        Error::invalid(format_args!("{} at position {}", msg, self.pos))
    }

    fn parse_name(mut self) -> Result<Name, Error> {
        let mut rdns = Vec::new();
        self.skip_spaces();
        if self.peek().is_none() {
            return Ok(Name::default())
        }
        let mut items = Vec::new();
        loop {
            items.push(self.parse_type_and_value()?);
            match self.next() {
                Some(b'+') => { }
                Some(b',') | Some(b';') => {
                    rdns.push(RelativeDistinguishedName {
                        items: std::mem::take(&mut items)
                    });
                }
                None => {
                    rdns.push(RelativeDistinguishedName { items });
                    break
                }
                Some(_) => return Err(self.err("expected separator")),
            }
        }
        // The string representation starts with the last RDN.
        rdns.reverse();
        Ok(Name { rdns })
    }

    fn parse_type_and_value(
        &mut self
    ) -> Result<AttributeTypeAndValue, Error> {
        let typ = self.parse_type()?;
        self.skip_spaces();
        let value = match self.peek() {
            Some(b'#') => {
                self.pos += 1;
                let element = Element::from_ber(self.parse_hex()?)?;
                AttributeValue::from_element(&typ, &element)?
            }
            Some(b'"') => {
                self.pos += 1;
                let value = self.parse_quoted()?;
                AttributeValue::from_str_value(&typ, &value)?
            }
            _ => {
                let value = self.parse_string()?;
                AttributeValue::from_str_value(&typ, &value)?
            }
        };
        self.skip_spaces();
        Ok(AttributeTypeAndValue::new(typ, value))
    }

    fn parse_type(&mut self) -> Result<Oid, Error> {
        self.skip_spaces();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == b'=' {
                break
            }
            self.pos += 1;
        }
        if self.next() != Some(b'=') {
            return Err(self.err("expected '='"))
        }
        let name = str::from_utf8(&self.data[start..self.pos - 1])
            .map_err(|_| self.err("invalid attribute type"))?
            .trim();
        let dotted = name.strip_prefix("oid.")
            .or_else(|| name.strip_prefix("OID."))
            .unwrap_or(name);
        if dotted.starts_with(|ch: char| ch.is_ascii_digit()) {
            return Ok(dotted.parse()?)
        }
        match AttributeType::by_name(name) {
            Some(known) => Ok(known.oid.to_bytes_oid()),
            None => {
                Err(Error::invalid(format_args!(
                    "unknown attribute type '{}'", name
                )))
            }
        }
    }

    fn parse_hex(&mut self) -> Result<Vec<u8>, Error> {
        let mut res = Vec::new();
        while let Some(ch) = self.peek() {
            if matches!(ch, b',' | b';' | b'+' | b' ') {
                break
            }
            res.push(self.parse_hex_pair()?);
        }
        if res.is_empty() {
            return Err(self.err("empty hex value"))
        }
        Ok(res)
    }

    fn parse_hex_pair(&mut self) -> Result<u8, Error> {
        let high = self.next().and_then(hex_digit);
        let low = self.next().and_then(hex_digit);
        match (high, low) {
            (Some(high), Some(low)) => Ok(high << 4 | low),
            _ => Err(self.err("invalid hex pair"))
        }
    }

    /// Parses an escape sequence after the backslash.
    fn parse_escape(&mut self) -> Result<u8, Error> {
        match self.peek() {
            Some(ch) if hex_digit(ch).is_some() => self.parse_hex_pair(),
            Some(ch) if is_special(ch) => {
                self.pos += 1;
                Ok(ch)
            }
            _ => Err(self.err("invalid escape sequence"))
        }
    }

    fn parse_quoted(&mut self) -> Result<String, Error> {
        let mut res = Vec::new();
        loop {
            match self.next() {
                Some(b'"') => break,
                Some(b'\\') => res.push(self.parse_escape()?),
                Some(ch) => res.push(ch),
                None => return Err(self.err("unterminated quoted value")),
            }
        }
        String::from_utf8(res).map_err(|_| self.err("invalid UTF-8"))
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        let mut res = Vec::new();

        // Length of the value without unescaped trailing spaces.
        let mut significant = 0;
        while let Some(ch) = self.peek() {
            match ch {
                b',' | b';' | b'+' => break,
                b'\\' => {
                    self.pos += 1;
                    res.push(self.parse_escape()?);
                    significant = res.len();
                }
                b'"' => return Err(self.err("unescaped quote")),
                _ => {
                    self.pos += 1;
                    res.push(ch);
                    if ch != b' ' {
                        significant = res.len();
                    }
                }
            }
        }
        res.truncate(significant);
        String::from_utf8(res).map_err(|_| self.err("invalid UTF-8"))
    }
}

fn hex_digit(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None
    }
}

fn is_special(ch: u8) -> bool {
    matches!(
        ch,
        b',' | b'+' | b'"' | b'\\' | b'<' | b'>' | b';' | b'#' | b'='
        | b' '
    )
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::string::AnyString;
    use super::super::oid;
    use super::*;

    fn name(s: &str) -> Name {
        s.parse().unwrap()
    }

    #[test]
    fn matching_equality() {
        let dn = name("cn=test,givenName=derp");
        assert_eq!(dn, name("cn=test,givenName=derp"));
        assert_eq!(dn, name("CN=  TEST ,  givenname=Derp"));
        assert_ne!(dn, name("cn=test"));
        assert_ne!(dn, name("givenName=derp,cn=test"));
        assert_eq!(name("cn=a+sn=b,o=x"), name("sn=b+cn=a,o=x"));
        assert_ne!(name("cn=a+sn=b,o=x"), name("cn=a,o=x"));
    }

    #[test]
    fn parse() {
        let dn = name("cn=test,givenName=derp");
        assert_eq!(dn.rdns().len(), 2);
        assert_eq!(
            dn.first_value_of(&oid::AT_GIVEN_NAME).unwrap().as_string(),
            Some(&AnyString::printable_or_utf8("derp"))
        );
        // Encoding order is the reverse of the string order.
        assert_eq!(
            dn.rdns()[0].iter().next().unwrap().typ(),
            &oid::AT_GIVEN_NAME
        );

        let dn = name(r#"cn=a\,b\2Bc,o="x, y",ou=\ lead\ ,dc=example,dc=com"#);
        assert_eq!(dn.to_string(), r"cn=a\,b\+c,o=x\, y,ou=\ lead\ ,dc=example,dc=com");
        assert_eq!(dn.count_of(&oid::AT_DOMAIN_COMPONENT), 2);
        assert_eq!(dn.all_of(&oid::AT_DOMAIN_COMPONENT).len(), 2);

        let dn = name("2.5.4.3=x;OID.2.5.4.4=y");
        assert_eq!(dn.count_of(&oid::AT_COMMON_NAME), 1);
        assert_eq!(dn.count_of(&oid::AT_SURNAME), 1);

        let dn = name("cn=#0c0474657374");
        assert_eq!(dn, name("cn=test"));

        assert!(Name::from_string("").unwrap().is_empty());
        assert!(Name::from_string("frob=x").is_err());
        assert!(Name::from_string("cn").is_err());
        assert!(Name::from_string("cn=a\\zz").is_err());
        assert!(Name::from_string("cn=\"a").is_err());
        assert!(Name::from_string("cn=#0c").is_err());
    }

    #[test]
    fn encoding() {
        let dn = name("cn=test+sn=x,c=DE");
        let decoded = Name::from_element(
            &Element::from_der(dn.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, dn);
        // Values within an RDN are encoded in DER order.
        assert_eq!(decoded.to_string(), "sn=x+cn=test,c=DE");
        assert_eq!(
            name("c=DE").to_element().to_der().as_ref(),
            b"\x30\x0d\x31\x0b\x30\x09\x06\x03\x55\x04\x06\x13\x02DE"
        );
    }

    #[test]
    fn within() {
        let base = name("o=example,c=DE");
        assert!(name("cn=x,o=Example,c=de").is_within(&base));
        assert!(base.is_within(&base));
        assert!(!name("cn=x,o=other,c=DE").is_within(&base));
        assert!(!name("c=DE").is_within(&base));
    }
}
