#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use bcx509::{ConstOid, Oid};

pub const SHA256: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 1]);

fuzz_target!(|data: &[u8]| {
    let oid = match Oid::from_content(Bytes::copy_from_slice(data)) {
        Ok(oid) => oid,
        Err(_) => return
    };

    // The dotted form parses back into the same identifier.
    let text = oid.to_string();
    let parsed: Oid = text.parse().unwrap();
    assert_eq!(parsed, oid);

    if oid == SHA256 {
        assert_eq!(text, "2.16.840.1.101.3.4.2.1");
    }
});
