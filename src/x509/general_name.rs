//! General names.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use bytes::Bytes;
use crate::element::Element;
use crate::error::{Error, UnexpectedTypeError};
use crate::ident::Tag;
use crate::oid::Oid;
use crate::string::{AnyString, Ia5String, OctetString};
use crate::x501::Name;


//------------ GeneralName ---------------------------------------------------

/// A name of one of several forms.
///
/// ```text
/// GeneralName ::= CHOICE {
///      otherName                 [0]  AnotherName,
///      rfc822Name                [1]  IA5String,
///      dNSName                   [2]  IA5String,
///      x400Address               [3]  ORAddress,
///      directoryName             [4]  Name,
///      ediPartyName              [5]  EDIPartyName,
///      uniformResourceIdentifier [6]  IA5String,
///      iPAddress                 [7]  OCTET STRING,
///      registeredID              [8]  OBJECT IDENTIFIER }
///
/// AnotherName ::= SEQUENCE {
///      type-id    OBJECT IDENTIFIER,
///      value      [0] EXPLICIT ANY DEFINED BY type-id }
/// ```
///
/// The module uses implicit tagging, so all alternatives but the
/// directory name, which is a CHOICE itself, are implicitly tagged.
/// X.400 addresses and EDI party names are kept as the complete tagged
/// element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GeneralName {
    OtherName { type_id: Oid, value: Element },
    Rfc822Name(Ia5String),
    DnsName(Ia5String),
    X400Address(Element),
    DirectoryName(Name),
    EdiPartyName(Element),
    Uri(Ia5String),
    IpAddress(IpAddress),
    RegisteredId(Oid),
}

impl GeneralName {
    /// Creates an rfc822Name, i.e., an email address.
    pub fn email(s: &str) -> Result<Self, Error> {
        Ok(GeneralName::Rfc822Name(Ia5String::from_str(s)?))
    }

    /// Creates a dNSName.
    pub fn dns(s: &str) -> Result<Self, Error> {
        Ok(GeneralName::DnsName(Ia5String::from_str(s)?))
    }

    /// Creates a uniformResourceIdentifier.
    pub fn uri(s: &str) -> Result<Self, Error> {
        Ok(GeneralName::Uri(Ia5String::from_str(s)?))
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let tagged = match *element {
            Element::Tagged(ref tagged) => tagged,
            _ => {
                return Err(UnexpectedTypeError::new(
                    "GeneralName", element.tag()
                ).into())
            }
        };
        let number = match tagged.tag().class() {
            crate::ident::Class::Context => tagged.tag().number().to_u32(),
            _ => None,
        };
        match number {
            Some(0) => {
                let inner = tagged.implicit(Tag::SEQUENCE)?;
                let mut fields = inner.expect_sequence()?.fields();
                let type_id = fields.take()?.expect_oid()?.clone();
                let value = fields.take()?.expect_explicit(0)?;
                fields.finish()?;
                Ok(GeneralName::OtherName { type_id, value })
            }
            Some(1) => Ok(GeneralName::Rfc822Name(ia5(tagged.implicit(
                Tag::IA5_STRING
            )?)?)),
            Some(2) => Ok(GeneralName::DnsName(ia5(tagged.implicit(
                Tag::IA5_STRING
            )?)?)),
            Some(3) => Ok(GeneralName::X400Address(element.clone())),
            Some(4) => {
                Ok(GeneralName::DirectoryName(
                    Name::from_element(&tagged.explicit()?)?
                ))
            }
            Some(5) => Ok(GeneralName::EdiPartyName(element.clone())),
            Some(6) => Ok(GeneralName::Uri(ia5(tagged.implicit(
                Tag::IA5_STRING
            )?)?)),
            Some(7) => {
                let inner = tagged.implicit(Tag::OCTET_STRING)?;
                Ok(GeneralName::IpAddress(IpAddress::from_octets(
                    inner.expect_octet_string()?.to_bytes()
                )?))
            }
            Some(8) => {
                let inner = tagged.implicit(Tag::OID)?;
                Ok(GeneralName::RegisteredId(inner.expect_oid()?.clone()))
            }
            _ => {
                Err(UnexpectedTypeError::new(
                    "GeneralName", tagged.tag()
                ).into())
            }
        }
    }

    pub fn to_element(&self) -> Element {
        match *self {
            GeneralName::OtherName { ref type_id, ref value } => {
                Element::sequence([
                    Element::from(type_id), value.clone().explicit(0)
                ]).implicit(0)
            }
            GeneralName::Rfc822Name(ref name) => {
                Element::String(AnyString::Ia5(name.clone())).implicit(1)
            }
            GeneralName::DnsName(ref name) => {
                Element::String(AnyString::Ia5(name.clone())).implicit(2)
            }
            GeneralName::X400Address(ref element) => element.clone(),
            GeneralName::DirectoryName(ref name) => {
                name.to_element().explicit(4)
            }
            GeneralName::EdiPartyName(ref element) => element.clone(),
            GeneralName::Uri(ref name) => {
                Element::String(AnyString::Ia5(name.clone())).implicit(6)
            }
            GeneralName::IpAddress(ref addr) => {
                Element::OctetString(
                    OctetString::new(addr.octets.clone())
                ).implicit(7)
            }
            GeneralName::RegisteredId(ref oid) => {
                Element::from(oid).implicit(8)
            }
        }
    }
}

fn ia5(element: Element) -> Result<Ia5String, Error> {
    match element {
        Element::String(AnyString::Ia5(value)) => Ok(value),
        other => {
            Err(UnexpectedTypeError::new("IA5String", other.tag()).into())
        }
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GeneralName::OtherName { ref type_id, .. } => {
                write!(f, "othername:{}", type_id)
            }
            GeneralName::Rfc822Name(ref name) => write!(f, "email:{}", name),
            GeneralName::DnsName(ref name) => write!(f, "DNS:{}", name),
            GeneralName::X400Address(_) => f.write_str("X400Name"),
            GeneralName::DirectoryName(ref name) => {
                write!(f, "DirName:{}", name)
            }
            GeneralName::EdiPartyName(_) => f.write_str("EdiPartyName"),
            GeneralName::Uri(ref name) => write!(f, "URI:{}", name),
            GeneralName::IpAddress(ref addr) => write!(f, "IP:{}", addr),
            GeneralName::RegisteredId(ref oid) => {
                write!(f, "RID:{}", oid)
            }
        }
    }
}


//------------ GeneralNames --------------------------------------------------

/// A non-empty sequence of general names.
///
/// ```text
/// GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneralNames(Vec<GeneralName>);

impl GeneralNames {
    /// Creates a value from a non-empty vec of names.
    pub fn new(names: Vec<GeneralName>) -> Result<Self, Error> {
        if names.is_empty() {
            return Err(Error::invalid("empty GeneralNames"))
        }
        Ok(GeneralNames(names))
    }

    /// Creates a value containing a single name.
    pub fn single(name: GeneralName) -> Self {
        GeneralNames(vec![name])
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneralName> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first directory name if there is one.
    pub fn directory_name(&self) -> Option<&Name> {
        self.0.iter().find_map(|name| match *name {
            GeneralName::DirectoryName(ref name) => Some(name),
            _ => None
        })
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        Self::new(
            element.expect_sequence()?.iter().map(
                GeneralName::from_element
            ).collect::<Result<_, _>>()?
        )
    }

    /// Decodes names from the content of an implicitly tagged value.
    pub fn from_implicit(element: &Element, number: u32) -> Result<Self, Error> {
        Self::from_element(&element.expect_implicit(number, Tag::SEQUENCE)?)
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(self.0.iter().map(GeneralName::to_element))
    }
}


//------------ IpAddress -----------------------------------------------------

/// The content of an iPAddress general name.
///
/// In alternative names, this is an IPv4 or IPv6 address of four or
/// sixteen octets. In name constraints, it is an address followed by a
/// network mask of the same length.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IpAddress {
    octets: Bytes,
}

impl IpAddress {
    /// Creates a value from its octets.
    pub fn from_octets(octets: Bytes) -> Result<Self, Error> {
        match octets.len() {
            4 | 8 | 16 | 32 => Ok(IpAddress { octets }),
            len => {
                Err(Error::invalid(format_args!(
                    "invalid IP address length {}", len
                )))
            }
        }
    }

    /// Creates a value for a single address.
    pub fn from_addr(addr: IpAddr) -> Self {
        let octets = match addr {
            IpAddr::V4(addr) => Bytes::copy_from_slice(&addr.octets()),
            IpAddr::V6(addr) => Bytes::copy_from_slice(&addr.octets()),
        };
        IpAddress { octets }
    }

    /// Creates a value for an address range given by a network mask.
    pub fn from_subnet(addr: IpAddr, prefix_len: u8) -> Self {
        let mut octets = Self::from_addr(addr).octets.to_vec();
        let len = octets.len();
        for idx in 0..len {
            let bits = usize::from(prefix_len).saturating_sub(idx * 8).min(8);
            let mask = if bits == 0 { 0 } else { 0xffu8 << (8 - bits) };
            octets.push(mask);
        }
        IpAddress { octets: octets.into() }
    }

    pub fn as_slice(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns whether the value is an address range.
    pub fn is_subnet(&self) -> bool {
        matches!(self.octets.len(), 8 | 32)
    }

    /// Returns the single address if this is one.
    pub fn to_addr(&self) -> Option<IpAddr> {
        let octets = self.octets.as_ref();
        if let Ok(v4) = <[u8; 4]>::try_from(octets) {
            Some(Ipv4Addr::from(v4).into())
        }
        else if let Ok(v6) = <[u8; 16]>::try_from(octets) {
            Some(Ipv6Addr::from(v6).into())
        }
        else {
            None
        }
    }

    /// Returns whether the address range `self` contains `addr`.
    ///
    /// Addresses of different families never match. If `self` is a single
    /// address, it only contains itself.
    pub fn contains(&self, addr: &IpAddress) -> bool {
        if !self.is_subnet() {
            return self.octets == addr.octets
        }
        let (net, mask) = self.octets.split_at(self.octets.len() / 2);
        let other = addr.octets.as_ref();
        if other.len() != net.len() {
            return false
        }
        net.iter().zip(mask).zip(other).all(|((net, mask), other)| {
            net & mask == other & mask
        })
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(addr) = self.to_addr() {
            return addr.fmt(f)
        }
        let (net, mask) = self.octets.split_at(self.octets.len() / 2);
        let prefix: u32 = mask.iter().map(|octet| octet.count_ones()).sum();
        match (<[u8; 4]>::try_from(net), <[u8; 16]>::try_from(net)) {
            (Ok(v4), _) => write!(f, "{}/{}", Ipv4Addr::from(v4), prefix),
            (_, Ok(v6)) => write!(f, "{}/{}", Ipv6Addr::from(v6), prefix),
            _ => Err(fmt::Error),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip(name: GeneralName) {
        let der = name.to_element().to_der();
        let decoded = GeneralName::from_element(
            &Element::from_der(der).unwrap()
        ).unwrap();
        assert_eq!(decoded, name);
    }

    #[test]
    fn alternatives() {
        roundtrip(GeneralName::email("a@example.com").unwrap());
        roundtrip(GeneralName::dns("example.com").unwrap());
        roundtrip(GeneralName::uri("https://example.com/").unwrap());
        roundtrip(GeneralName::DirectoryName(
            "cn=test,o=example".parse().unwrap()
        ));
        roundtrip(GeneralName::IpAddress(
            IpAddress::from_addr("192.0.2.1".parse().unwrap())
        ));
        roundtrip(GeneralName::RegisteredId("1.2.3".parse().unwrap()));
        roundtrip(GeneralName::OtherName {
            type_id: "1.3.6.1.4.1.311.20.2.3".parse().unwrap(),
            value: Element::utf8("user@example.com"),
        });
    }

    #[test]
    fn encoding() {
        assert_eq!(
            GeneralName::dns("a.b").unwrap().to_element().to_der().as_ref(),
            b"\x82\x03a.b"
        );
        let dir = GeneralName::DirectoryName("c=DE".parse().unwrap());
        assert_eq!(
            dir.to_element().to_der().as_ref(),
            b"\xa4\x0f\x30\x0d\x31\x0b\x30\x09\x06\x03\x55\x04\x06\x13\x02DE"
        );
        assert!(GeneralName::dns("bücher.de").is_err());
        assert!(GeneralName::from_element(&Element::Null).is_err());
    }

    #[test]
    fn ip_addresses() {
        let net = IpAddress::from_subnet("10.1.0.0".parse().unwrap(), 16);
        assert_eq!(net.as_slice(), b"\x0a\x01\x00\x00\xff\xff\x00\x00");
        assert_eq!(net.to_string(), "10.1.0.0/16");
        assert!(net.contains(&IpAddress::from_addr("10.1.2.3".parse().unwrap())));
        assert!(!net.contains(&IpAddress::from_addr("10.2.2.3".parse().unwrap())));
        assert!(!net.contains(&IpAddress::from_addr("::1".parse().unwrap())));
        assert!(IpAddress::from_octets(Bytes::from_static(b"\x01\x02")).is_err());
    }
}
