//! Object identifiers of attribute types.

use crate::oid::{ConstOid, Oid};

/// `id-at-commonName`, 2.5.4.3
pub const AT_COMMON_NAME: ConstOid = Oid(&[85, 4, 3]);

/// `id-at-surname`, 2.5.4.4
pub const AT_SURNAME: ConstOid = Oid(&[85, 4, 4]);

/// `id-at-serialNumber`, 2.5.4.5
pub const AT_SERIAL_NUMBER: ConstOid = Oid(&[85, 4, 5]);

/// `id-at-countryName`, 2.5.4.6
pub const AT_COUNTRY_NAME: ConstOid = Oid(&[85, 4, 6]);

/// `id-at-localityName`, 2.5.4.7
pub const AT_LOCALITY_NAME: ConstOid = Oid(&[85, 4, 7]);

/// `id-at-stateOrProvinceName`, 2.5.4.8
pub const AT_STATE_OR_PROVINCE_NAME: ConstOid = Oid(&[85, 4, 8]);

/// `id-at-streetAddress`, 2.5.4.9
pub const AT_STREET_ADDRESS: ConstOid = Oid(&[85, 4, 9]);

/// `id-at-organizationName`, 2.5.4.10
pub const AT_ORGANIZATION_NAME: ConstOid = Oid(&[85, 4, 10]);

/// `id-at-organizationalUnitName`, 2.5.4.11
pub const AT_ORGANIZATIONAL_UNIT_NAME: ConstOid = Oid(&[85, 4, 11]);

/// `id-at-title`, 2.5.4.12
pub const AT_TITLE: ConstOid = Oid(&[85, 4, 12]);

/// `id-at-description`, 2.5.4.13
pub const AT_DESCRIPTION: ConstOid = Oid(&[85, 4, 13]);

/// `id-at-name`, 2.5.4.41
pub const AT_NAME: ConstOid = Oid(&[85, 4, 41]);

/// `id-at-givenName`, 2.5.4.42
pub const AT_GIVEN_NAME: ConstOid = Oid(&[85, 4, 42]);

/// `id-at-initials`, 2.5.4.43
pub const AT_INITIALS: ConstOid = Oid(&[85, 4, 43]);

/// `id-at-generationQualifier`, 2.5.4.44
pub const AT_GENERATION_QUALIFIER: ConstOid = Oid(&[85, 4, 44]);

/// `id-at-dnQualifier`, 2.5.4.46
pub const AT_DN_QUALIFIER: ConstOid = Oid(&[85, 4, 46]);

/// `id-at-pseudonym`, 2.5.4.65
pub const AT_PSEUDONYM: ConstOid = Oid(&[85, 4, 65]);

/// `id-at-role`, 2.5.4.72
pub const AT_ROLE: ConstOid = Oid(&[85, 4, 72]);

/// `domainComponent`, 0.9.2342.19200300.100.1.25
pub const AT_DOMAIN_COMPONENT: ConstOid = Oid(
    &[9, 146, 38, 137, 147, 242, 44, 100, 1, 25]
);

/// `uid`, 0.9.2342.19200300.100.1.1
pub const AT_USER_ID: ConstOid = Oid(
    &[9, 146, 38, 137, 147, 242, 44, 100, 1, 1]
);

/// `emailAddress`, 1.2.840.113549.1.9.1
pub const AT_EMAIL_ADDRESS: ConstOid = Oid(
    &[42, 134, 72, 134, 247, 13, 1, 9, 1]
);


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn constants() {
        for (oid, s) in [
            (AT_COMMON_NAME, "2.5.4.3"),
            (AT_ROLE, "2.5.4.72"),
            (AT_DOMAIN_COMPONENT, "0.9.2342.19200300.100.1.25"),
            (AT_USER_ID, "0.9.2342.19200300.100.1.1"),
            (AT_EMAIL_ADDRESS, "1.2.840.113549.1.9.1"),
        ] {
            assert_eq!(oid, s.parse::<Oid>().unwrap());
            assert_eq!(oid.to_string(), s);
        }
    }
}
