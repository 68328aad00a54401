use std::{cmp::Reverse, collections::BinaryHeap};

use crate::{
    frequency::FrequencyTable,
    huffman::{Code, CodeTable, ReverseCodeTable, Symbol},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: usize,
    },
    Internal {
        weight: usize,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// `left` is the node extracted first from the queue.
    fn merge(left: Self, right: Self) -> Self {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Queue entry. Lower weight pops first; equal weights pop in creation order,
/// where leaves are numbered by first appearance and merged nodes follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    weight: Reverse<usize>,
    order: Reverse<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Self {
        let mut arena: Vec<Option<HuffNode>> = Vec::with_capacity(2 * frequencies.len());
        let mut heap = BinaryHeap::with_capacity(frequencies.len());

        for (symbol, weight) in frequencies.iter() {
            heap.push(HeapEntry {
                weight: Reverse(weight),
                order: Reverse(arena.len()),
            });
            arena.push(Some(HuffNode::Leaf { symbol, weight }));
        }

        let take = |entry: HeapEntry, arena: &mut Vec<Option<HuffNode>>| {
            let Reverse(order) = entry.order;
            arena[order].take().expect("queue entries refer to live nodes")
        };

        // the table is never empty, so the queue holds at least one node
        let root = loop {
            let Some(first) = heap.pop() else {
                unreachable!("frequency tables are never empty");
            };
            let left = take(first, &mut arena);
            let Some(second) = heap.pop() else {
                break left;
            };
            let right = take(second, &mut arena);

            let merged = HuffNode::merge(left, right);
            heap.push(HeapEntry {
                weight: Reverse(merged.weight()),
                order: Reverse(arena.len()),
            });
            arena.push(Some(merged));
        };

        log::debug!(
            "built tree over {} symbols, weight {}, depth {}",
            frequencies.len(),
            root.weight(),
            Self::depth_of(&root)
        );

        HuffmanTree { root }
    }

    pub fn from_text(text: &str) -> crate::huffman::Result<Self> {
        let frequencies = FrequencyTable::from_text(text)?;
        Ok(Self::from_frequencies(&frequencies))
    }

    pub fn weight(&self) -> usize {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes().filter(|node| matches!(node, HuffNode::Leaf { .. })).count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes().filter(|node| matches!(node, HuffNode::Internal { .. })).count()
    }

    /// Longest root-to-leaf path, 0 for a lone leaf.
    pub fn depth(&self) -> usize {
        Self::depth_of(&self.root)
    }

    fn depth_of(root: &HuffNode) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(root, 0)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right.as_ref(), depth + 1));
                    stack.push((left.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }

    /// Pre-order iterator over every node.
    fn nodes(&self) -> impl Iterator<Item = &HuffNode> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let HuffNode::Internal { left, right, .. } = node {
                stack.push(right.as_ref());
                stack.push(left.as_ref());
            }
            Some(node)
        })
    }

    /// Derive the forward and reverse code tables.
    ///
    /// Left edges emit 0 and right edges emit 1. Leaves are visited left
    /// before right, which fixes the order of the reverse table. A tree that
    /// is a single leaf gets the code `0` rather than an empty code.
    pub fn code_tables(&self) -> (CodeTable, ReverseCodeTable) {
        let mut forward = CodeTable::default();
        let mut reverse = ReverseCodeTable::default();

        let mut register = |symbol: Symbol, code: Code| {
            log::trace!("code {} -> {:?}", code, symbol);
            forward.insert(symbol, code.clone());
            reverse.push(code, symbol);
        };

        if let HuffNode::Leaf { symbol, .. } = &self.root {
            register(*symbol, Code::new().with(false));
            return (forward, reverse);
        }

        let mut stack = vec![(&self.root, Code::new())];
        while let Some((node, code)) = stack.pop() {
            match node {
                HuffNode::Leaf { symbol, .. } => register(*symbol, code),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right.as_ref(), code.with(true)));
                    stack.push((left.as_ref(), code.with(false)));
                }
            }
        }

        (forward, reverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> HuffmanTree {
        HuffmanTree::from_text(text).unwrap()
    }

    fn code_strings(text: &str) -> Vec<(char, String)> {
        let (_, reverse) = tree(text).code_tables();
        reverse
            .iter()
            .map(|(code, symbol)| (symbol, code.to_string()))
            .collect()
    }

    #[test]
    fn test_abracadabra_codes() {
        assert_eq!(
            code_strings("abracadabra"),
            vec![
                ('a', "0".to_string()),
                ('c', "100".to_string()),
                ('d', "101".to_string()),
                ('b', "110".to_string()),
                ('r', "111".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let tree = tree("aaaa");
        assert_eq!(tree.root, HuffNode::Leaf { symbol: 'a', weight: 4 });
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(code_strings("aaaa"), vec![('a', "0".to_string())]);
    }

    #[test]
    fn test_node_counts() {
        let tree = tree("the quick brown fox jumps over the lazy dog");
        let distinct = 27;
        assert_eq!(tree.leaf_count(), distinct);
        assert_eq!(tree.internal_count(), distinct - 1);
    }

    #[test]
    fn test_weight_conservation() {
        let text = "mississippi river banks";
        let tree = tree(text);
        let leaf_sum: usize = tree
            .nodes()
            .filter_map(|node| match node {
                HuffNode::Leaf { weight, .. } => Some(*weight),
                HuffNode::Internal { .. } => None,
            })
            .sum();
        assert_eq!(tree.weight(), leaf_sum);
        assert_eq!(tree.weight(), text.chars().count());

        for node in tree.nodes() {
            if let HuffNode::Internal { weight, left, right } = node {
                assert_eq!(*weight, left.weight() + right.weight());
            }
        }
    }

    #[test]
    fn test_ties_follow_first_appearance() {
        // every symbol has the same weight, so the shape depends only on order
        assert_eq!(
            code_strings("abcd"),
            vec![
                ('a', "00".to_string()),
                ('b', "01".to_string()),
                ('c', "10".to_string()),
                ('d', "11".to_string()),
            ]
        );
        assert_eq!(
            code_strings("dcba"),
            vec![
                ('d', "00".to_string()),
                ('c', "01".to_string()),
                ('b', "10".to_string()),
                ('a', "11".to_string()),
            ]
        );
    }

    #[test]
    fn test_rebuild_is_identical() {
        let text = "she sells sea shells by the sea shore";
        assert_eq!(tree(text), tree(text));
        assert_eq!(tree(text).code_tables(), tree(text).code_tables());
    }

    #[test]
    fn test_tables_are_prefix_free_and_inverse() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.";
        let (forward, reverse) = tree(text).code_tables();
        assert!(reverse.is_prefix_free());
        assert_eq!(forward.len(), reverse.len());
        for (code, symbol) in reverse.iter() {
            assert!(!code.is_empty());
            assert_eq!(forward.get(symbol), Some(code));
        }
        assert_eq!(reverse.to_code_table(), forward);
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let text = format!("{}{}{}", "e".repeat(40), "t".repeat(10), "qz");
        let (forward, _) = tree(&text).code_tables();
        let len = |c| forward.get(c).unwrap().len();
        assert!(len('e') <= len('t'));
        assert!(len('t') <= len('q'));
        assert!(len('t') <= len('z'));
    }
}
