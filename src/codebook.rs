//! Text rendering of a [`ReverseCodeTable`].
//!
//! One entry per line, `<code>,<symbol>`, in table order. The line is split
//! at the first comma, so the code is read back exactly as written and the
//! symbol may itself be a comma or a space. Characters that would break the
//! line structure are escaped: `\\`, `\n`, `\r`, `\t` and `\u{HEX}` for any
//! other control character. Each symbol has exactly one accepted spelling.

use std::collections::HashSet;

use itertools::Itertools;

use crate::huffman::{Code, HuffmanError, ReverseCodeTable, Result, Symbol};

pub const DELIMITER: char = ',';

impl ReverseCodeTable {
    pub fn serialize(&self) -> String {
        let mut out = self
            .iter()
            .map(|(code, symbol)| format!("{code}{DELIMITER}{}", escape(symbol)))
            .join("\n");
        out.push('\n');
        log::debug!("serialized codebook with {} entries", self.len());
        out
    }

    /// Parses a codebook, validating every entry independently.
    ///
    /// Rejects duplicate codes or symbols and codes that are a prefix of
    /// another, since such a table could not have come from a tree.
    pub fn deserialize(text: &str) -> Result<Self> {
        let mut table = ReverseCodeTable::default();
        let mut symbols = HashSet::new();

        let body = text.strip_suffix('\n').unwrap_or(text);
        if body.is_empty() {
            return Err(HuffmanError::codebook(1, "codebook has no entries"));
        }

        for (i, line) in body.split('\n').enumerate() {
            let line_no = i + 1;
            let line = line.strip_suffix('\r').unwrap_or(line);

            let (code, symbol) = line.split_once(DELIMITER).ok_or_else(|| {
                HuffmanError::codebook(line_no, format!("missing '{DELIMITER}' delimiter"))
            })?;
            let code: Code = code
                .parse()
                .map_err(|e| HuffmanError::codebook(line_no, format!("bad code: {e}")))?;
            let symbol =
                unescape(symbol).map_err(|reason| HuffmanError::codebook(line_no, reason))?;

            if table.contains_code(&code) {
                return Err(HuffmanError::codebook(line_no, format!("duplicate code {code}")));
            }
            if !symbols.insert(symbol) {
                return Err(HuffmanError::codebook(
                    line_no,
                    format!("duplicate symbol {symbol:?}"),
                ));
            }
            if let Some((other, _)) = table
                .iter()
                .find(|(other, _)| other.is_prefix_of(&code) || code.is_prefix_of(other))
            {
                return Err(HuffmanError::codebook(
                    line_no,
                    format!("code {code} conflicts with prefix {other}"),
                ));
            }

            table.push(code, symbol);
        }

        log::debug!("loaded codebook with {} entries", table.len());
        Ok(table)
    }
}

fn escape(symbol: Symbol) -> String {
    match symbol {
        '\\' => "\\\\".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        c if c.is_control() => format!("\\u{{{:x}}}", c as u32),
        c => c.to_string(),
    }
}

/// Decodes a symbol field, accepting only the spelling [`escape`] produces.
fn unescape(field: &str) -> std::result::Result<Symbol, String> {
    let symbol = parse_symbol(field)?;
    let canonical = escape(symbol);
    if canonical != field {
        return Err(format!("symbol {field:?} must be written as {canonical:?}"));
    }
    Ok(symbol)
}

fn parse_symbol(field: &str) -> std::result::Result<Symbol, String> {
    let mut chars = field.chars();
    let symbol = match (chars.next(), chars.next()) {
        (None, _) => return Err("missing symbol".to_string()),
        (Some('\\'), Some(escaped)) => match escaped {
            '\\' => '\\',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => return unescape_unicode(&field[2..]),
            other => return Err(format!("unknown escape \\{other}")),
        },
        (Some('\\'), None) => return Err("dangling escape".to_string()),
        (Some(c), None) => return Ok(c),
        (Some(_), Some(_)) => return Err(format!("symbol {field:?} is more than one character")),
    };

    match chars.next() {
        None => Ok(symbol),
        Some(_) => Err(format!("symbol {field:?} is more than one character")),
    }
}

/// Parses the `{HEX}` part of a `\u{HEX}` escape.
fn unescape_unicode(rest: &str) -> std::result::Result<Symbol, String> {
    let hex = rest
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| format!("malformed unicode escape \\u{rest}"))?;
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid unicode escape \\u{rest}"))
}
