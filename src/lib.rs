//! Huffman compression for text.
//!
//! ```
//! use huffman_text::{compress, decompress, ReverseCodeTable};
//!
//! let compressed = compress("abracadabra").unwrap();
//! assert_eq!(compressed.payload, vec![0x01, 0x6E, 0x8A, 0xDC]);
//!
//! // the codebook travels separately from the payload
//! let codebook = ReverseCodeTable::deserialize(&compressed.codebook.serialize()).unwrap();
//! assert_eq!(decompress(&compressed.payload, &codebook).unwrap(), "abracadabra");
//! ```

pub mod codebook;
pub mod files;
pub mod frequency;
pub mod huffman;
pub mod huffman_decoder;
pub mod huffman_encoder;
pub mod huffman_tree;

pub use frequency::FrequencyTable;
pub use huffman::{
    Code, CodeTable, CorruptStream, HuffmanError, Result, ReverseCodeTable, Symbol,
};
pub use huffman_tree::{HuffNode, HuffmanTree};

/// A packed stream together with the codebook needed to read it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    pub payload: Vec<u8>,
    pub codebook: ReverseCodeTable,
}

/// Compresses `text` after removing its trailing whitespace.
///
/// Trailing whitespace is never part of the encoded stream, so it does not
/// survive a round trip.
pub fn compress(text: &str) -> Result<Compressed> {
    compress_counted(text).map(|(compressed, _)| compressed)
}

/// [`compress`], also handing back the frequency table it built.
pub(crate) fn compress_counted(text: &str) -> Result<(Compressed, FrequencyTable)> {
    let text = text.trim_end();
    let frequencies = FrequencyTable::from_text(text)?;
    let tree = HuffmanTree::from_frequencies(&frequencies);
    let (forward, codebook) = tree.code_tables();
    let payload = huffman_encoder::encode(text, &forward)?;

    Ok((Compressed { payload, codebook }, frequencies))
}

pub fn decompress(payload: &[u8], codebook: &ReverseCodeTable) -> Result<String> {
    huffman_decoder::decode(payload, codebook)
}
