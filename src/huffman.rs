use std::{
    collections::HashMap,
    fmt::{self, Write},
    io,
    str::FromStr,
};

use bitvec::prelude::*;
use itertools::Itertools;
use thiserror::Error;

pub type Symbol = char;

pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("nothing to compress: input is empty")]
    EmptyInput,
    #[error("symbol {0:?} has no code in the table")]
    UnencodableSymbol(Symbol),
    #[error("malformed codebook at line {line}: {reason}")]
    CodebookFormat { line: usize, reason: String },
    #[error("corrupt stream: {0}")]
    CorruptStream(#[from] CorruptStream),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The concrete defect found while decoding a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorruptStream {
    #[error("stream has {0} bits, shorter than the 8-bit padding header")]
    MissingHeader(usize),
    #[error("padding header {0} is outside 1..=8")]
    PaddingOutOfRange(u8),
    #[error("padding of {padding} bits exceeds the {available} bits after the header")]
    PaddingExceedsBody { padding: usize, available: usize },
    #[error("no code matches the bit sequence {0}")]
    UnknownCode(Code),
    #[error("{0} trailing bits match no code")]
    TrailingBits(usize),
}

impl HuffmanError {
    pub(crate) fn codebook(line: usize, reason: impl Into<String>) -> Self {
        Self::CodebookFormat {
            line,
            reason: reason.into(),
        }
    }
}

/// Bit string in emission order. Codes stored in a table are never empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Code(BitVec<u8, Msb0>);

impl Code {
    pub fn new() -> Self {
        Self(BitVec::new())
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }

    /// Returns a copy of `self` extended by one bit.
    pub fn with(&self, bit: bool) -> Self {
        let mut code = self.clone();
        code.push(bit);
        code
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(self.0.as_bitslice())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0.iter().by_vals() {
            f.write_char(if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCodeError {
    #[error("code is empty")]
    Empty,
    #[error("code contains {0:?}, expected only '0' and '1'")]
    InvalidDigit(char),
}

impl FromStr for Code {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseCodeError::Empty);
        }

        let mut code = Code::new();
        for ch in s.chars() {
            match ch {
                '0' => code.push(false),
                '1' => code.push(true),
                other => return Err(ParseCodeError::InvalidDigit(other)),
            }
        }
        Ok(code)
    }
}

/// Forward mapping used by the encoder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: HashMap<Symbol, Code>,
}

impl CodeTable {
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> {
        self.codes.iter().map(|(symbol, code)| (*symbol, code))
    }

    pub(crate) fn insert(&mut self, symbol: Symbol, code: Code) {
        self.codes.insert(symbol, code);
    }
}

/// Code to symbol mapping used by the decoder and persisted as the codebook.
///
/// Entries keep the order they were added in, which for generated tables is
/// the left-before-right traversal order of the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReverseCodeTable {
    entries: Vec<(Code, Symbol)>,
    lookup: HashMap<Code, Symbol>,
    max_code_len: usize,
}

impl ReverseCodeTable {
    pub fn get(&self, code: &Code) -> Option<Symbol> {
        self.lookup.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the longest code, 0 for an empty table.
    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Code, Symbol)> {
        self.entries.iter().map(|(code, symbol)| (code, *symbol))
    }

    /// Rebuilds the forward table.
    pub fn to_code_table(&self) -> CodeTable {
        let mut table = CodeTable::default();
        for (code, symbol) in self.iter() {
            table.insert(symbol, code.clone());
        }
        table
    }

    pub fn is_prefix_free(&self) -> bool {
        self.entries
            .iter()
            .tuple_combinations()
            .all(|((a, _), (b, _))| !a.is_prefix_of(b) && !b.is_prefix_of(a))
    }

    /// Appends an entry. Callers are responsible for uniqueness.
    pub(crate) fn push(&mut self, code: Code, symbol: Symbol) {
        self.max_code_len = self.max_code_len.max(code.len());
        self.lookup.insert(code.clone(), symbol);
        self.entries.push((code, symbol));
    }

    pub(crate) fn contains_code(&self, code: &Code) -> bool {
        self.lookup.contains_key(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    #[test]
    fn test_code_display_keeps_leading_zeros() {
        assert_eq!(code("0").to_string(), "0");
        assert_eq!(code("0010").to_string(), "0010");
        assert_eq!(code("1").len(), 1);
    }

    #[test]
    fn test_code_parse_rejects_garbage() {
        assert_eq!("".parse::<Code>(), Err(ParseCodeError::Empty));
        assert_eq!("01x".parse::<Code>(), Err(ParseCodeError::InvalidDigit('x')));
        assert_eq!(" 0".parse::<Code>(), Err(ParseCodeError::InvalidDigit(' ')));
    }

    #[test]
    fn test_prefix() {
        assert!(code("1").is_prefix_of(&code("10")));
        assert!(code("10").is_prefix_of(&code("10")));
        assert!(!code("0").is_prefix_of(&code("10")));
        assert!(!code("101").is_prefix_of(&code("10")));
    }

    #[test]
    fn test_reverse_table_prefix_free() {
        let mut table = ReverseCodeTable::default();
        table.push(code("0"), 'a');
        table.push(code("10"), 'b');
        table.push(code("11"), 'c');
        assert!(table.is_prefix_free());
        assert_eq!(table.max_code_len(), 2);

        table.push(code("101"), 'd');
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn test_to_code_table_inverts() {
        let mut reverse = ReverseCodeTable::default();
        reverse.push(code("0"), 'x');
        reverse.push(code("1"), 'y');

        let forward = reverse.to_code_table();
        assert_eq!(forward.len(), 2);
        assert_eq!(forward.get('x'), Some(&code("0")));
        assert_eq!(forward.get('y'), Some(&code("1")));
        assert_eq!(forward.get('z'), None);
    }
}
