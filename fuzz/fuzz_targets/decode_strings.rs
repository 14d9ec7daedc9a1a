#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use bcx509::Mode;
use bcx509::string::{AnyString, BitString};
use bcx509::stringprep::{prepare, Folding};

fuzz_target!(|data: &[u8]| {
    let content = Bytes::copy_from_slice(data);

    for mode in [Mode::Ber, Mode::Der] {
        if let Ok(bits) = BitString::from_content(content.clone(), mode) {
            assert!(bits.unused() < 8);
            assert!(bits.octet_len() > 0 || bits.unused() == 0);
        }
    }

    for number in [12, 18, 19, 20, 21, 22, 25, 26, 27, 28, 30] {
        if let Ok(Some(string)) = AnyString::from_content(
            number, content.clone()
        ) {
            let text = string.to_unicode();
            for folding in [Folding::None, Folding::Case] {
                let once = prepare(&text, folding);
                assert_eq!(prepare(&once, folding), once);
            }
        }
    }
});
