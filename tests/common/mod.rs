//! Creating certificates with fixed Ed25519 keys.
#![allow(dead_code)]

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use bcx509::Integer;
use bcx509::x509::{
    AlgorithmIdentifier, AuthorityKeyIdentifier, BasicConstraints,
    Certificate, Ed25519Crypto, Extension, KeyIdentifier, KeyUsage,
    PrivateKeyInfo, PublicKeyInfo, TbsCertificate, Time, Validity,
};

pub fn at(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()
}

pub fn validity(from: i32, to: i32) -> Validity {
    Validity::new(Time::new(at(from)), Time::new(at(to)))
}

pub fn keys(seed: u8) -> (PrivateKeyInfo, PublicKeyInfo) {
    Ed25519Crypto::key_pair_from_seed(&[seed; 32])
}

fn key_id(seed: u8) -> KeyIdentifier {
    KeyIdentifier::new(Bytes::copy_from_slice(&[seed; 20]))
}

/// Describes a certificate to be issued.
pub struct Spec<'a> {
    pub subject: &'a str,
    pub seed: u8,
    pub issuer: &'a str,
    pub issuer_seed: u8,
    pub validity: Validity,
    pub extensions: Vec<Extension>,
}

impl<'a> Spec<'a> {
    pub fn new(subject: &'a str, seed: u8, issuer: &'a str, issuer_seed: u8) -> Self {
        Spec {
            subject, seed, issuer, issuer_seed,
            validity: validity(2020, 2050),
            extensions: Vec::new(),
        }
    }

    pub fn ca(mut self) -> Self {
        self.extensions.push(Extension::new(true, BasicConstraints::ca(None)));
        self.extensions.push(Extension::new(
            true, KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN
        ));
        self
    }

    pub fn with_validity(mut self, validity: Validity) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn issue(self) -> Certificate {
        let (_, public) = keys(self.seed);
        let (private, _) = keys(self.issuer_seed);
        let mut tbs = TbsCertificate::new(
            Integer::from(u32::from(self.seed)),
            self.issuer.parse().unwrap(),
            self.validity,
            self.subject.parse().unwrap(),
            public,
        );
        tbs.add_extension(Extension::new(false, key_id(self.seed))).unwrap();
        tbs.add_extension(Extension::new(
            false,
            AuthorityKeyIdentifier::from_key_identifier(key_id(self.issuer_seed))
        )).unwrap();
        for ext in self.extensions {
            tbs.add_extension(ext).unwrap();
        }
        let cert = tbs.sign(
            &Ed25519Crypto::new(), &AlgorithmIdentifier::ed25519(), &private
        ).unwrap();

        // Go through DER so tests see what a relying party would see.
        Certificate::from_der(cert.to_der()).unwrap()
    }
}
