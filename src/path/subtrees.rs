//! Checking names against name constraints.
//!
//! This is a private module.

use crate::x501::{AttributeValue, Name};
use crate::x509::{Certificate, GeneralName, GeneralSubtree, NameConstraints};
use crate::x501::oid::AT_EMAIL_ADDRESS;


//------------ Subtrees ------------------------------------------------------

/// The permitted and excluded subtrees collected along a path.
///
/// Instead of calculating the intersection of permitted subtrees, each
/// set of permitted subtrees is kept separately. A name has to be within
/// every set that contains subtrees of the name’s type. A name is excluded
/// if it is within any excluded subtree.
///
/// Only directory names, email addresses, DNS names, URIs, and IP
/// addresses are checked. Names of other types always pass.
#[derive(Clone, Debug, Default)]
pub struct Subtrees {
    permitted: Vec<Vec<GeneralSubtree>>,
    excluded: Vec<GeneralSubtree>,
}

impl Subtrees {
    /// Adds the constraints of a certificate.
    pub fn update(&mut self, constraints: &NameConstraints) {
        if let Some(ref permitted) = constraints.permitted {
            self.permitted.push(permitted.clone())
        }
        if let Some(ref excluded) = constraints.excluded {
            self.excluded.extend(excluded.iter().cloned())
        }
    }

    /// Checks the names of a certificate.
    ///
    /// These are the subject name if it isn’t empty, any email address
    /// attributes of the subject, and all subject alternative names.
    /// Returns a description of the first offending name.
    pub fn check_certificate(&self, cert: &Certificate) -> Result<(), String> {
        if !cert.subject().is_empty() {
            self.check(&GeneralName::DirectoryName(cert.subject().clone()))?;
        }
        for email in email_attributes(cert.subject()) {
            self.check(&email)?;
        }
        if let Some(names) = cert.extensions().subject_alt_name() {
            for name in names.iter() {
                self.check(name)?;
            }
        }
        Ok(())
    }

    fn check(&self, name: &GeneralName) -> Result<(), String> {
        for permitted in &self.permitted {
            let mut relevant = permitted.iter().filter(|subtree| {
                same_type(&subtree.base, name)
            }).peekable();
            if relevant.peek().is_some()
                && !relevant.any(|subtree| within(name, &subtree.base))
            {
                return Err(format!("{} not within permitted subtrees", name))
            }
        }
        if self.excluded.iter().any(|subtree| within(name, &subtree.base)) {
            return Err(format!("{} within excluded subtrees", name))
        }
        Ok(())
    }
}

/// Returns the email address attributes of a name as general names.
fn email_attributes(name: &Name) -> Vec<GeneralName> {
    name.all_of(&AT_EMAIL_ADDRESS).into_iter().filter_map(|value| {
        match *value {
            AttributeValue::String(ref value) => {
                GeneralName::email(&value.to_unicode()).ok()
            }
            _ => None
        }
    }).collect()
}

fn same_type(left: &GeneralName, right: &GeneralName) -> bool {
    std::mem::discriminant(left) == std::mem::discriminant(right)
}

/// Returns whether `name` is within the subtree given by `base`.
fn within(name: &GeneralName, base: &GeneralName) -> bool {
    match (name, base) {
        (
            GeneralName::DirectoryName(name),
            GeneralName::DirectoryName(base)
        ) => {
            name.is_within(base)
        }
        (GeneralName::Rfc822Name(name), GeneralName::Rfc822Name(base)) => {
            email_within(&name.to_string(), &base.to_string())
        }
        (GeneralName::DnsName(name), GeneralName::DnsName(base)) => {
            dns_within(&name.to_string(), &base.to_string())
        }
        (GeneralName::Uri(name), GeneralName::Uri(base)) => {
            match uri_host(&name.to_string()) {
                Some(host) => host_within(host, &base.to_string()),
                None => false
            }
        }
        (GeneralName::IpAddress(name), GeneralName::IpAddress(base)) => {
            base.contains(name)
        }
        _ => false
    }
}

/// Checks an email address against a mailbox, host, or domain constraint.
fn email_within(name: &str, base: &str) -> bool {
    if base.contains('@') {
        return name.eq_ignore_ascii_case(base)
    }
    match name.rsplit_once('@') {
        Some((_, host)) => host_within(host, base),
        None => false
    }
}

/// Checks a host against a constraint.
///
/// A constraint starting with a dot matches any host within the domain.
/// Otherwise, it matches only the host itself.
fn host_within(host: &str, base: &str) -> bool {
    if base.starts_with('.') {
        ends_with_ignore_case(host, base)
    }
    else {
        host.eq_ignore_ascii_case(base)
    }
}

/// Checks a DNS name against a constraint.
///
/// The constraint matches the name itself and all names below it. An
/// empty constraint matches everything.
fn dns_within(name: &str, base: &str) -> bool {
    let base = base.trim_start_matches('.');
    if base.is_empty() || name.eq_ignore_ascii_case(base) {
        return true
    }
    name.len() > base.len()
        && ends_with_ignore_case(name, base)
        && name.as_bytes()[name.len() - base.len() - 1] == b'.'
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.as_bytes()[s.len() - suffix.len()..].eq_ignore_ascii_case(
            suffix.as_bytes()
        )
}

/// Returns the host part of a URI.
fn uri_host(uri: &str) -> Option<&str> {
    let (_, rest) = uri.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority
    };
    let host = match host.rsplit_once(':') {
        Some((host, port)) if port.bytes().all(|ch| ch.is_ascii_digit()) => {
            host
        }
        _ => host
    };
    (!host.is_empty()).then_some(host)
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::net::IpAddr;
    use crate::x509::IpAddress;
    use super::*;

    fn subtree(name: GeneralName) -> GeneralSubtree {
        GeneralSubtree::new(name)
    }

    #[test]
    fn matching() {
        assert!(dns_within("www.example.com", "example.com"));
        assert!(dns_within("example.com", "EXAMPLE.com"));
        assert!(!dns_within("badexample.com", "example.com"));
        assert!(dns_within("anything", ""));
        assert!(email_within("joe@example.com", "example.com"));
        assert!(!email_within("joe@mail.example.com", "example.com"));
        assert!(email_within("joe@mail.example.com", ".example.com"));
        assert!(email_within("Joe@Example.com", "joe@example.com"));
        assert_eq!(uri_host("https://user@host.example:8080/x"), Some("host.example"));
        assert_eq!(uri_host("urn:isbn:123"), None);
    }

    #[test]
    fn permitted_and_excluded() {
        let mut subtrees = Subtrees::default();
        subtrees.update(&NameConstraints {
            permitted: Some(vec![
                subtree(GeneralName::dns("example.com").unwrap()),
                subtree(GeneralName::DirectoryName(
                    "o=Example,c=DE".parse().unwrap()
                )),
                subtree(GeneralName::IpAddress(IpAddress::from_subnet(
                    "192.0.2.0".parse::<IpAddr>().unwrap(), 24
                ))),
            ]),
            excluded: Some(vec![
                subtree(GeneralName::dns("bad.example.com").unwrap()),
            ]),
        });
        assert!(subtrees.check(&GeneralName::dns("www.example.com").unwrap()).is_ok());
        assert!(subtrees.check(&GeneralName::dns("example.org").unwrap()).is_err());
        assert!(subtrees.check(&GeneralName::dns("x.bad.example.com").unwrap()).is_err());
        assert!(subtrees.check(&GeneralName::DirectoryName(
            "cn=Joe,o=Example,c=DE".parse().unwrap()
        )).is_ok());
        assert!(subtrees.check(&GeneralName::DirectoryName(
            "cn=Joe,o=Other,c=DE".parse().unwrap()
        )).is_err());
        assert!(subtrees.check(&GeneralName::IpAddress(IpAddress::from_addr(
            "192.0.2.7".parse().unwrap()
        ))).is_ok());
        assert!(subtrees.check(&GeneralName::IpAddress(IpAddress::from_addr(
            "198.51.100.1".parse().unwrap()
        ))).is_err());

        // No URI constraints, so all URIs pass.
        assert!(subtrees.check(&GeneralName::uri("http://x.org/").unwrap()).is_ok());
    }
}
