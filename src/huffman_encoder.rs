use bitvec::prelude::*;

use crate::huffman::{CodeTable, HuffmanError, Result};

/// Number of bits in the padding header that starts every stream.
pub const HEADER_BITS: usize = 8;

/// Zero bits appended after `body_bits` bits of codes.
///
/// Always in `1..=8`: a body that already ends on a byte boundary still gets a
/// full byte of padding, so the header never carries 0.
pub fn padding_for(body_bits: usize) -> usize {
    8 - body_bits % 8
}

/// Packs `text` into a padded stream using `table`.
///
/// Layout, MSB-first: an 8-bit padding count, the code of every symbol in
/// source order, then that many zero bits.
pub fn encode(text: &str, table: &CodeTable) -> Result<Vec<u8>> {
    let mut body: BitVec<u8, Msb0> = BitVec::new();
    for symbol in text.chars() {
        let code = table
            .get(symbol)
            .ok_or(HuffmanError::UnencodableSymbol(symbol))?;
        body.extend_from_bitslice(code.bits());
    }

    let padding = padding_for(body.len());
    log::debug!("encoded {} body bits, padding {}", body.len(), padding);

    let mut stream: BitVec<u8, Msb0> =
        BitVec::with_capacity(HEADER_BITS + body.len() + padding);
    stream.extend_from_bitslice((padding as u8).view_bits::<Msb0>());
    stream.extend_from_bitslice(body.as_bitslice());
    stream.resize(stream.len() + padding, false);
    debug_assert_eq!(stream.len() % 8, 0);

    Ok(stream.into_vec())
}
