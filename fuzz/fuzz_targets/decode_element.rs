#![no_main]

use libfuzzer_sys::fuzz_target;
use bcx509::{Element, Mode};

fuzz_target!(|data: &[u8]| {
    let ber = Element::decode(Mode::Ber, data.to_vec());
    let der = Element::decode(Mode::Der, data.to_vec());

    // Everything that is DER is BER, too.
    if der.is_ok() {
        assert!(ber.is_ok());
    }

    // DER input re-encodes to the very same octets.
    if let Ok(der) = der {
        assert_eq!(der.to_der().as_ref(), data);
    }

    // BER input re-encodes to DER that decodes again.
    if let Ok(ber) = ber {
        let encoded = ber.to_der();
        assert!(Element::from_der(encoded).is_ok());
    }
});
