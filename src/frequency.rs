//! Frequency analysis for symbol streams.
//!
//! Counts how often each character occurs and remembers the order in which
//! characters first appeared, which the tree builder uses to break ties.

use std::collections::{hash_map::Entry, HashMap};

use crate::huffman::{HuffmanError, Result, Symbol};

/// Occurrence counts for every distinct symbol of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// `(symbol, count)` in order of first appearance.
    counts: Vec<(Symbol, usize)>,
    /// Position of each symbol inside `counts`.
    index: HashMap<Symbol, usize>,
    total: usize,
}

impl FrequencyTable {
    /// Count symbol frequencies in `text`.
    ///
    /// Fails with [`HuffmanError::EmptyInput`] when there is nothing to count,
    /// since no tree can be built from an empty table.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut counts: Vec<(Symbol, usize)> = Vec::new();
        let mut index: HashMap<Symbol, usize> = HashMap::new();
        let mut total = 0;

        for symbol in text.chars() {
            match index.entry(symbol) {
                Entry::Occupied(slot) => counts[*slot.get()].1 += 1,
                Entry::Vacant(slot) => {
                    slot.insert(counts.len());
                    counts.push((symbol, 1));
                }
            }
            total += 1;
        }

        if total == 0 {
            return Err(HuffmanError::EmptyInput);
        }

        log::debug!(
            "counted {} symbols, {} distinct",
            total,
            counts.len()
        );

        Ok(Self {
            counts,
            index,
            total,
        })
    }

    /// Get the count for a symbol, 0 if it never occurred.
    pub fn get(&self, symbol: Symbol) -> usize {
        self.index
            .get(&symbol)
            .map_or(0, |&i| self.counts[i].1)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Always false: an empty table cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of symbols in the input.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Iterate `(symbol, count)` in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, usize)> + '_ {
        self.counts.iter().copied()
    }

    /// Shannon entropy of the distribution in bits per symbol.
    pub fn entropy(&self) -> f64 {
        let total = self.total as f64;
        self.counts
            .iter()
            .map(|&(_, count)| {
                let prob = count as f64 / total;
                -prob * prob.log2()
            })
            .sum()
    }
}
