#![no_main]

use huffman_text::ReverseCodeTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(table) = ReverseCodeTable::deserialize(text) {
        assert!(table.is_prefix_free());
        assert_eq!(ReverseCodeTable::deserialize(&table.serialize()).unwrap(), table);
    }
});
