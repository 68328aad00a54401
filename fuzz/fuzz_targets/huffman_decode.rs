#![no_main]

use huffman_text::{decompress, ReverseCodeTable};
use libfuzzer_sys::fuzz_target;

// arbitrary payloads must fail cleanly, never panic
fuzz_target!(|data: &[u8]| {
    let codebook = ReverseCodeTable::deserialize("0,e\n100,t\n101,a\n110,o\n111, \n").unwrap();
    let _ = decompress(data, &codebook);
});
