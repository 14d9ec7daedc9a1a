//! Algorithm identifiers and keys.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::element::Element;
use crate::error::Error;
use crate::int::Integer;
use crate::oid::Oid;
use crate::string::{BitString, OctetString};


//------------ AlgorithmIdentifier -------------------------------------------

/// An algorithm with its optional parameters.
///
/// ```text
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///      algorithm               OBJECT IDENTIFIER,
///      parameters              ANY DEFINED BY algorithm OPTIONAL  }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlgorithmIdentifier {
    algorithm: Oid,
    parameters: Option<Element>,
}

impl AlgorithmIdentifier {
    /// Creates an identifier without parameters.
    pub fn new<T: AsRef<[u8]>>(algorithm: &Oid<T>) -> Self {
        AlgorithmIdentifier {
            algorithm: algorithm.to_bytes_oid(),
            parameters: None,
        }
    }

    /// Creates an identifier with parameters.
    pub fn with_parameters<T: AsRef<[u8]>>(
        algorithm: &Oid<T>, parameters: Element
    ) -> Self {
        AlgorithmIdentifier {
            algorithm: algorithm.to_bytes_oid(),
            parameters: Some(parameters),
        }
    }

    /// Returns the identifier for Ed25519.
    pub fn ed25519() -> Self {
        Self::new(&super::oid::ED25519)
    }

    pub fn algorithm(&self) -> &Oid {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&Element> {
        self.parameters.as_ref()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let algorithm = fields.take()?.expect_oid()?.clone();
        let parameters = fields.take_rest().first().cloned();
        Ok(AlgorithmIdentifier { algorithm, parameters })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence(
            Some(Element::from(&self.algorithm)).into_iter()
                .chain(self.parameters.clone())
        )
    }
}


//------------ PublicKeyInfo -------------------------------------------------

/// A public key with its algorithm.
///
/// ```text
/// SubjectPublicKeyInfo  ::=  SEQUENCE  {
///      algorithm            AlgorithmIdentifier,
///      subjectPublicKey     BIT STRING  }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    public_key: BitString,
}

impl PublicKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, public_key: BitString) -> Self {
        PublicKeyInfo { algorithm, public_key }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn public_key(&self) -> &BitString {
        &self.public_key
    }

    /// Returns the octets of the key.
    pub fn key_bytes(&self) -> Bytes {
        self.public_key.octet_bytes()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let algorithm = AlgorithmIdentifier::from_element(fields.take()?)?;
        let public_key = fields.take()?.expect_bit_string()?.clone();
        fields.finish()?;
        Ok(PublicKeyInfo { algorithm, public_key })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            self.algorithm.to_element(),
            self.public_key.clone().into(),
        ])
    }
}


//------------ PrivateKeyInfo ------------------------------------------------

/// A private key with its algorithm.
///
/// ```text
/// PrivateKeyInfo ::= SEQUENCE {
///     version                   INTEGER,
///     privateKeyAlgorithm       AlgorithmIdentifier,
///     privateKey                OCTET STRING,
///     attributes            [0] IMPLICIT Attributes OPTIONAL }
/// ```
///
/// Attributes are ignored. The content of `privateKey` depends on the
/// algorithm.
#[derive(Clone, Eq, PartialEq)]
pub struct PrivateKeyInfo {
    algorithm: AlgorithmIdentifier,
    private_key: OctetString,
}

impl PrivateKeyInfo {
    pub fn new(algorithm: AlgorithmIdentifier, private_key: Bytes) -> Self {
        PrivateKeyInfo { algorithm, private_key: private_key.into() }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    /// Returns the content of the `privateKey` field.
    pub fn private_key(&self) -> &[u8] {
        self.private_key.as_slice()
    }

    pub fn from_element(element: &Element) -> Result<Self, Error> {
        let mut fields = element.expect_sequence()?.fields();
        let version = fields.take()?.expect_integer()?.to_u32()?;
        if version > 1 {
            return Err(Error::invalid(format_args!(
                "unsupported private key version {}", version
            )))
        }
        let algorithm = AlgorithmIdentifier::from_element(fields.take()?)?;
        let private_key = fields.take()?.expect_octet_string()?.clone();
        Ok(PrivateKeyInfo { algorithm, private_key })
    }

    pub fn to_element(&self) -> Element {
        Element::sequence([
            Element::Integer(Integer::from(0)),
            self.algorithm.to_element(),
            self.private_key.clone().into(),
        ])
    }
}

impl std::fmt::Debug for PrivateKeyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PrivateKeyInfo")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}


//------------ Signature -----------------------------------------------------

/// A signature value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signature(Bytes);

impl Signature {
    pub fn new(value: Bytes) -> Self {
        Signature(value)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn to_bit_string(&self) -> BitString {
        BitString::from_octets(self.0.clone())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn algorithm_identifier() {
        let ed = AlgorithmIdentifier::ed25519();
        assert_eq!(ed.to_element().to_der().as_ref(), b"\x30\x05\x06\x03\x2b\x65\x70");
        let with_null = AlgorithmIdentifier::with_parameters(
            &crate::x509::oid::SHA256_WITH_RSA_ENCRYPTION, Element::Null
        );
        let decoded = AlgorithmIdentifier::from_element(
            &Element::from_der(with_null.to_element().to_der()).unwrap()
        ).unwrap();
        assert_eq!(decoded, with_null);
        assert_eq!(decoded.parameters(), Some(&Element::Null));
    }

    #[test]
    fn private_key_debug_hides_key() {
        let key = PrivateKeyInfo::new(
            AlgorithmIdentifier::ed25519(), Bytes::from_static(b"secret")
        );
        assert!(!format!("{:?}", key).contains("secret"));
        let decoded = PrivateKeyInfo::from_element(&key.to_element()).unwrap();
        assert_eq!(decoded.private_key(), b"secret");
    }
}
