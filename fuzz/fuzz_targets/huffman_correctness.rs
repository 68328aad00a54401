#![no_main]

use huffman_text::{compress, decompress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    match compress(text) {
        Ok(compressed) => {
            assert_eq!(
                decompress(&compressed.payload, &compressed.codebook).unwrap(),
                text.trim_end()
            );
        }
        Err(_) => assert!(text.trim_end().is_empty()),
    }
});
