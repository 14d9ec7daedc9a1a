//! The X.509 certificate model.
//!
//! This module provides public key certificates via [`Certificate`] and
//! [`TbsCertificate`], their extensions via [`Extensions`], and attribute
//! certificates via [`AttributeCertificate`].
//!
//! Certificates can be decoded from DER and built and signed
//! programmatically. All cryptographic operations are delegated to an
//! implementation of the [`Crypto`] trait. With the `ed25519` feature,
//! [`Ed25519Crypto`] provides one for Ed25519 keys.

pub use self::algorithm::{
    AlgorithmIdentifier, PrivateKeyInfo, PublicKeyInfo, Signature,
};
pub use self::attr_cert::{
    AttCertIssuer, AttCertValidityPeriod, AttributeCertificate,
    AttributeCertificateInfo, Holder, IssuerSerial, RoleSyntax, V2Form,
};
pub use self::cert::{Certificate, TbsCertificate};
pub use self::crypto::{Crypto, CryptoError};
#[cfg(feature = "ed25519")]
pub use self::crypto::Ed25519Crypto;
pub use self::ext::*;
pub use self::general_name::{GeneralName, GeneralNames, IpAddress};
pub use self::time::{Time, Validity};

pub mod oid;

mod algorithm;
mod attr_cert;
mod cert;
mod crypto;
mod ext;
mod general_name;
mod time;
