//! Object identifiers used by certificates.

use crate::oid::{ConstOid, Oid};


//------------ Certificate Extensions ----------------------------------------

/// `id-ce-subjectKeyIdentifier`, 2.5.29.14
pub const CE_SUBJECT_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 14]);

/// `id-ce-keyUsage`, 2.5.29.15
pub const CE_KEY_USAGE: ConstOid = Oid(&[85, 29, 15]);

/// `id-ce-subjectAltName`, 2.5.29.17
pub const CE_SUBJECT_ALT_NAME: ConstOid = Oid(&[85, 29, 17]);

/// `id-ce-issuerAltName`, 2.5.29.18
pub const CE_ISSUER_ALT_NAME: ConstOid = Oid(&[85, 29, 18]);

/// `id-ce-basicConstraints`, 2.5.29.19
pub const CE_BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);

/// `id-ce-nameConstraints`, 2.5.29.30
pub const CE_NAME_CONSTRAINTS: ConstOid = Oid(&[85, 29, 30]);

/// `id-ce-cRLDistributionPoints`, 2.5.29.31
pub const CE_CRL_DISTRIBUTION_POINTS: ConstOid = Oid(&[85, 29, 31]);

/// `id-ce-certificatePolicies`, 2.5.29.32
pub const CE_CERTIFICATE_POLICIES: ConstOid = Oid(&[85, 29, 32]);

/// `id-ce-policyMappings`, 2.5.29.33
pub const CE_POLICY_MAPPINGS: ConstOid = Oid(&[85, 29, 33]);

/// `id-ce-authorityKeyIdentifier`, 2.5.29.35
pub const CE_AUTHORITY_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 35]);

/// `id-ce-policyConstraints`, 2.5.29.36
pub const CE_POLICY_CONSTRAINTS: ConstOid = Oid(&[85, 29, 36]);

/// `id-ce-extKeyUsage`, 2.5.29.37
pub const CE_EXT_KEY_USAGE: ConstOid = Oid(&[85, 29, 37]);

/// `id-ce-inhibitAnyPolicy`, 2.5.29.54
pub const CE_INHIBIT_ANY_POLICY: ConstOid = Oid(&[85, 29, 54]);

/// `id-ce-targetInformation`, 2.5.29.55
pub const CE_TARGET_INFORMATION: ConstOid = Oid(&[85, 29, 55]);

/// `id-ce-noRevAvail`, 2.5.29.56
pub const CE_NO_REV_AVAIL: ConstOid = Oid(&[85, 29, 56]);


//------------ PKIX ----------------------------------------------------------

/// `id-pe-authorityInfoAccess`, 1.3.6.1.5.5.7.1.1
pub const PE_AUTHORITY_INFO_ACCESS: ConstOid
    = Oid(&[43, 6, 1, 5, 5, 7, 1, 1]);

/// `id-pe-subjectInfoAccess`, 1.3.6.1.5.5.7.1.11
pub const PE_SUBJECT_INFO_ACCESS: ConstOid
    = Oid(&[43, 6, 1, 5, 5, 7, 1, 11]);

/// `id-qt-cps`, 1.3.6.1.5.5.7.2.1
pub const QT_CPS: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 2, 1]);

/// `id-qt-unotice`, 1.3.6.1.5.5.7.2.2
pub const QT_UNOTICE: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 2, 2]);

/// `id-kp-serverAuth`, 1.3.6.1.5.5.7.3.1
pub const KP_SERVER_AUTH: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 1]);

/// `id-kp-clientAuth`, 1.3.6.1.5.5.7.3.2
pub const KP_CLIENT_AUTH: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 2]);

/// `id-kp-codeSigning`, 1.3.6.1.5.5.7.3.3
pub const KP_CODE_SIGNING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 3]);

/// `id-kp-emailProtection`, 1.3.6.1.5.5.7.3.4
pub const KP_EMAIL_PROTECTION: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 4]);

/// `id-kp-timeStamping`, 1.3.6.1.5.5.7.3.8
pub const KP_TIME_STAMPING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 8]);

/// `id-kp-OCSPSigning`, 1.3.6.1.5.5.7.3.9
pub const KP_OCSP_SIGNING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 9]);

/// `id-ad-ocsp`, 1.3.6.1.5.5.7.48.1
pub const AD_OCSP: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 48, 1]);

/// `id-ad-caIssuers`, 1.3.6.1.5.5.7.48.2
pub const AD_CA_ISSUERS: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 48, 2]);

/// `anyPolicy`, 2.5.29.32.0
pub const ANY_POLICY: ConstOid = Oid(&[85, 29, 32, 0]);

/// `anyExtendedKeyUsage`, 2.5.29.37.0
pub const ANY_EXTENDED_KEY_USAGE: ConstOid = Oid(&[85, 29, 37, 0]);


//------------ Algorithms ----------------------------------------------------

/// `id-Ed25519`, 1.3.101.112
pub const ED25519: ConstOid = Oid(&[43, 101, 112]);

/// `rsaEncryption`, 1.2.840.113549.1.1.1
pub const RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 1]);

/// `sha256WithRSAEncryption`, 1.2.840.113549.1.1.11
pub const SHA256_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 11]);

/// `sha384WithRSAEncryption`, 1.2.840.113549.1.1.12
pub const SHA384_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 12]);

/// `sha512WithRSAEncryption`, 1.2.840.113549.1.1.13
pub const SHA512_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 13]);

/// `id-ecPublicKey`, 1.2.840.10045.2.1
pub const EC_PUBLIC_KEY: ConstOid = Oid(&[42, 134, 72, 206, 61, 2, 1]);

/// `ecdsa-with-SHA256`, 1.2.840.10045.4.3.2
pub const ECDSA_WITH_SHA256: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 2]);

/// `ecdsa-with-SHA384`, 1.2.840.10045.4.3.3
pub const ECDSA_WITH_SHA384: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 3]);


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn constants() {
        for (oid, s) in [
            (CE_BASIC_CONSTRAINTS, "2.5.29.19"),
            (CE_NO_REV_AVAIL, "2.5.29.56"),
            (PE_SUBJECT_INFO_ACCESS, "1.3.6.1.5.5.7.1.11"),
            (KP_OCSP_SIGNING, "1.3.6.1.5.5.7.3.9"),
            (AD_CA_ISSUERS, "1.3.6.1.5.5.7.48.2"),
            (ANY_POLICY, "2.5.29.32.0"),
            (ED25519, "1.3.101.112"),
            (SHA256_WITH_RSA_ENCRYPTION, "1.2.840.113549.1.1.11"),
            (ECDSA_WITH_SHA384, "1.2.840.10045.4.3.3"),
        ] {
            assert_eq!(oid, s.parse::<Oid>().unwrap());
            assert_eq!(oid.to_string(), s);
        }
    }
}
