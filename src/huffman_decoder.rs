use bitvec::prelude::*;

use crate::{
    huffman::{Code, CorruptStream, ReverseCodeTable, Result},
    huffman_encoder::HEADER_BITS,
};

/// Unpacks a stream produced by [`crate::huffman_encoder::encode`].
///
/// Codes are matched greedily from an empty candidate; since the table is
/// prefix-free the first match is the only one. Every malformed stream is
/// reported as [`CorruptStream`] and no partial text is returned.
pub fn decode(data: &[u8], table: &ReverseCodeTable) -> Result<String> {
    let bits = data.view_bits::<Msb0>();
    if bits.len() < HEADER_BITS {
        return Err(CorruptStream::MissingHeader(bits.len()).into());
    }

    let (header, rest) = bits.split_at(HEADER_BITS);
    let padding = header.load_be::<u8>();
    if !(1..=8).contains(&padding) {
        return Err(CorruptStream::PaddingOutOfRange(padding).into());
    }

    let padding = padding as usize;
    if padding > rest.len() {
        return Err(CorruptStream::PaddingExceedsBody {
            padding,
            available: rest.len(),
        }
        .into());
    }
    let body = &rest[..rest.len() - padding];
    log::debug!("decoding {} body bits, padding {}", body.len(), padding);

    let mut decoded = String::new();
    let mut candidate = Code::new();
    for bit in body.iter().by_vals() {
        candidate.push(bit);
        if let Some(symbol) = table.get(&candidate) {
            decoded.push(symbol);
            candidate.clear();
        } else if candidate.len() >= table.max_code_len() {
            return Err(CorruptStream::UnknownCode(candidate).into());
        }
    }

    if !candidate.is_empty() {
        return Err(CorruptStream::TrailingBits(candidate.len()).into());
    }

    log::debug!("decoded {} symbols", decoded.chars().count());
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{huffman::HuffmanError, huffman_encoder::encode, huffman_tree::HuffmanTree};

    fn tables(text: &str) -> (crate::huffman::CodeTable, ReverseCodeTable) {
        HuffmanTree::from_text(text).unwrap().code_tables()
    }

    fn corrupt(result: Result<String>) -> CorruptStream {
        match result {
            Err(HuffmanError::CorruptStream(kind)) => kind,
            other => panic!("expected a corrupt stream, got {:?}", other),
        }
    }

    #[test]
    fn test_abracadabra() {
        let (_, reverse) = tables("abracadabra");
        let decoded = decode(&[0x01, 0x6E, 0x8A, 0xDC], &reverse).unwrap();
        assert_eq!(decoded, "abracadabra");
    }

    #[test]
    fn test_single_symbol() {
        let (forward, reverse) = tables("aaaa");
        let packed = encode("aaaa", &forward).unwrap();
        assert_eq!(decode(&packed, &reverse).unwrap(), "aaaa");
    }

    #[test]
    fn test_byte_aligned_body() {
        let text = "abababab";
        let (forward, reverse) = tables(text);
        let packed = encode(text, &forward).unwrap();
        assert_eq!(decode(&packed, &reverse).unwrap(), text);
    }

    #[test]
    fn test_empty_stream() {
        let (_, reverse) = tables("ab");
        assert_eq!(corrupt(decode(&[], &reverse)), CorruptStream::MissingHeader(0));
    }

    #[test]
    fn test_padding_header_out_of_range() {
        let (_, reverse) = tables("ab");
        assert_eq!(
            corrupt(decode(&[0x00, 0x00], &reverse)),
            CorruptStream::PaddingOutOfRange(0)
        );
        assert_eq!(
            corrupt(decode(&[0x09, 0x00], &reverse)),
            CorruptStream::PaddingOutOfRange(9)
        );
        assert_eq!(
            corrupt(decode(&[0xFF, 0x00], &reverse)),
            CorruptStream::PaddingOutOfRange(255)
        );
    }

    #[test]
    fn test_padding_larger_than_body() {
        let (_, reverse) = tables("ab");
        assert_eq!(
            corrupt(decode(&[0x08], &reverse)),
            CorruptStream::PaddingExceedsBody {
                padding: 8,
                available: 0
            }
        );
    }

    #[test]
    fn test_header_only_payload_is_empty_text() {
        let (_, reverse) = tables("ab");
        assert_eq!(decode(&[0x08, 0x00], &reverse).unwrap(), "");
    }

    #[test]
    fn test_trailing_unmatched_bits() {
        // codes: a=0, c=100, d=101, b=110, r=111; body "11" has no match
        let (_, reverse) = tables("abracadabra");
        assert_eq!(
            corrupt(decode(&[0x06, 0b1100_0000], &reverse)),
            CorruptStream::TrailingBits(2)
        );
    }

    #[test]
    fn test_unknown_code() {
        let mut reverse = ReverseCodeTable::default();
        reverse.push("00".parse().unwrap(), 'x');
        reverse.push("01".parse().unwrap(), 'y');
        // body "0010" with padding 4: "00" -> x, then "10" matches nothing
        assert_eq!(
            corrupt(decode(&[0x04, 0b0010_0000], &reverse)),
            CorruptStream::UnknownCode("10".parse().unwrap())
        );
    }

    #[test]
    fn test_wrong_codebook_is_rejected() {
        // body starts 0110...: "01" -> y, then "10" matches nothing
        let mut incomplete = ReverseCodeTable::default();
        incomplete.push("00".parse().unwrap(), 'x');
        incomplete.push("01".parse().unwrap(), 'y');
        assert_eq!(
            corrupt(decode(&[0x01, 0x6E, 0x8A, 0xDC], &incomplete)),
            CorruptStream::UnknownCode("10".parse().unwrap())
        );
    }
}
