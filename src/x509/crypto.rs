//! The interface to cryptography.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::oid::Oid;
use super::algorithm::{
    AlgorithmIdentifier, PrivateKeyInfo, PublicKeyInfo, Signature
};


//------------ Crypto --------------------------------------------------------

/// A provider of cryptographic operations.
///
/// The crate itself doesn’t implement any cryptography. Instead, signing
/// certificates and verifying their signatures is delegated to an
/// implementation of this trait. The provider is shared between all users
/// and thus needs to be thread-safe.
pub trait Crypto: Send + Sync {
    /// Signs `data` with `key` using `algorithm`.
    fn sign(
        &self,
        data: &[u8],
        key: &PrivateKeyInfo,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<Signature, CryptoError>;

    /// Verifies that `signature` was made over `data` with `key`.
    ///
    /// Returns `Ok(false)` if the signature is well-formed but wrong and
    /// an error if the verification could not be performed at all.
    fn verify(
        &self,
        data: &[u8],
        signature: &Signature,
        key: &PublicKeyInfo,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<bool, CryptoError>;

    /// Encrypts `data` for the holder of `key`.
    fn encrypt(
        &self,
        _data: &[u8],
        _key: &PublicKeyInfo,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<Bytes, CryptoError> {
        Err(CryptoError::UnsupportedAlgorithm(algorithm.algorithm().clone()))
    }

    /// Decrypts `data` with `key`.
    fn decrypt(
        &self,
        _data: &[u8],
        _key: &PrivateKeyInfo,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<Bytes, CryptoError> {
        Err(CryptoError::UnsupportedAlgorithm(algorithm.algorithm().clone()))
    }
}


//------------ CryptoError ---------------------------------------------------

/// A cryptographic operation failed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CryptoError {
    /// The algorithm is not supported by the provider.
    #[error("unsupported algorithm {0}")]
    UnsupportedAlgorithm(Oid),

    /// A key was malformed or didn’t fit the algorithm.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A signature was malformed.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}


//------------ Ed25519Crypto -------------------------------------------------

/// A software provider supporting Ed25519 signatures.
///
/// Private keys are expected in the form of RFC 8410, i.e., the
/// `privateKey` field contains the DER encoding of an OCTET STRING with
/// the 32 octet seed. Public keys are the 32 octets of the encoded point.
///
/// Encryption is not supported.
#[cfg(feature = "ed25519")]
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Crypto;

#[cfg(feature = "ed25519")]
impl Ed25519Crypto {
    pub fn new() -> Self {
        Ed25519Crypto
    }

    /// Creates the key pair for a 32 octet seed.
    pub fn key_pair_from_seed(
        seed: &[u8; 32]
    ) -> (PrivateKeyInfo, PublicKeyInfo) {
        use crate::element::Element;
        use crate::string::{BitString, OctetString};

        let signing_key = ed25519_dalek::SigningKey::from_bytes(seed);
        let private_key = Element::from(
            OctetString::from(seed.to_vec())
        ).to_der();
        let public_key = BitString::from_octets(Bytes::copy_from_slice(
            signing_key.verifying_key().as_bytes()
        ));
        (
            PrivateKeyInfo::new(AlgorithmIdentifier::ed25519(), private_key),
            PublicKeyInfo::new(AlgorithmIdentifier::ed25519(), public_key),
        )
    }

    fn check_algorithm(
        algorithm: &AlgorithmIdentifier
    ) -> Result<(), CryptoError> {
        if *algorithm.algorithm() == super::oid::ED25519 {
            Ok(())
        }
        else {
            Err(CryptoError::UnsupportedAlgorithm(
                algorithm.algorithm().clone()
            ))
        }
    }

    fn signing_key(
        key: &PrivateKeyInfo
    ) -> Result<ed25519_dalek::SigningKey, CryptoError> {
        use crate::element::Element;

        let invalid = |msg: &str| CryptoError::InvalidKey(msg.into());
        let inner = Element::from_der(
            Bytes::copy_from_slice(key.private_key())
        ).map_err(|_| invalid("malformed Ed25519 private key"))?;
        let seed = inner.expect_octet_string().map_err(|_| {
            invalid("malformed Ed25519 private key")
        })?;
        let seed: [u8; 32] = seed.as_slice().try_into().map_err(|_| {
            invalid("Ed25519 private key must be 32 octets")
        })?;
        Ok(ed25519_dalek::SigningKey::from_bytes(&seed))
    }

    fn verifying_key(
        key: &PublicKeyInfo
    ) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        if key.public_key().unused() != 0 {
            return Err(CryptoError::InvalidKey(
                "Ed25519 public key with unused bits".into()
            ))
        }
        let bytes: [u8; 32] = key.public_key().octet_slice().try_into()
            .map_err(|_| {
                CryptoError::InvalidKey(
                    "Ed25519 public key must be 32 octets".into()
                )
            })?;
        ed25519_dalek::VerifyingKey::from_bytes(&bytes).map_err(|err| {
            CryptoError::InvalidKey(err.to_string())
        })
    }
}

#[cfg(feature = "ed25519")]
impl Crypto for Ed25519Crypto {
    fn sign(
        &self,
        data: &[u8],
        key: &PrivateKeyInfo,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<Signature, CryptoError> {
        use ed25519_dalek::Signer;

        Self::check_algorithm(algorithm)?;
        Self::check_algorithm(key.algorithm())?;
        let signature = Self::signing_key(key)?.sign(data);
        Ok(Signature::new(Bytes::copy_from_slice(&signature.to_bytes())))
    }

    fn verify(
        &self,
        data: &[u8],
        signature: &Signature,
        key: &PublicKeyInfo,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<bool, CryptoError> {
        use ed25519_dalek::Verifier;

        Self::check_algorithm(algorithm)?;
        Self::check_algorithm(key.algorithm())?;
        let key = Self::verifying_key(key)?;
        let signature = ed25519_dalek::Signature::from_slice(
            signature.as_slice()
        ).map_err(|err| CryptoError::InvalidSignature(err.to_string()))?;
        Ok(key.verify(data, &signature).is_ok())
    }
}


//============ Tests =========================================================

#[cfg(all(test, feature = "ed25519"))]
mod test {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let crypto = Ed25519Crypto::new();
        let (private, public) = Ed25519Crypto::key_pair_from_seed(&[7; 32]);
        let algorithm = AlgorithmIdentifier::ed25519();
        let signature = crypto.sign(b"data", &private, &algorithm).unwrap();
        assert_eq!(signature.as_slice().len(), 64);
        assert!(crypto.verify(b"data", &signature, &public, &algorithm).unwrap());
        assert!(!crypto.verify(b"date", &signature, &public, &algorithm).unwrap());

        let (_, other) = Ed25519Crypto::key_pair_from_seed(&[8; 32]);
        assert!(!crypto.verify(b"data", &signature, &other, &algorithm).unwrap());
    }

    #[test]
    fn unsupported() {
        let crypto = Ed25519Crypto::new();
        let (private, public) = Ed25519Crypto::key_pair_from_seed(&[7; 32]);
        let rsa = AlgorithmIdentifier::new(
            &crate::x509::oid::SHA256_WITH_RSA_ENCRYPTION
        );
        assert!(matches!(
            crypto.sign(b"data", &private, &rsa),
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            crypto.encrypt(b"data", &public, &AlgorithmIdentifier::ed25519()),
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
        let broken = Signature::new(Bytes::from_static(b"short"));
        assert!(
            crypto.verify(
                b"data", &broken, &public, &AlgorithmIdentifier::ed25519()
            ).is_err()
        );
    }
}
