//! Huffman table construction from global symbol statistics.
//!
//! Tables are built in two steps: a greedy Huffman tree gives every observed
//! key a code length, then codes are handed out canonically (shortest first,
//! keys in ascending order within one length). The second step makes the
//! table a pure function of the code lengths, so identical statistics always
//! produce byte-identical tables.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::fmt;

use crate::error::{EncodeError, Result};
use crate::rle::Symbol;
use crate::tables::TableKind;

/// Key of a code table entry.
///
/// DC tables are keyed by category, AC tables by run-length symbol. Keys order
/// DC before AC, then by their numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKey {
    Dc(u8),
    Ac(Symbol),
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKey::Dc(category) => write!(f, "{}", category),
            TableKey::Ac(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Occurrence counts of the keys of one table across a whole image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<TableKey, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn observe(&mut self, key: TableKey) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn count(&self, key: &TableKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TableKey, &u64)> {
        self.counts.iter()
    }
}

impl FromIterator<TableKey> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = TableKey>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for key in iter {
            table.observe(key);
        }
        table
    }
}

/// A variable-length code, most significant bit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    pub const MAX_LEN: u8 = 64;

    /// `bits` holds the code in its lowest `len` bits.
    pub fn new(bits: u64, len: u8) -> Self {
        debug_assert!(len > 0 && len <= Self::MAX_LEN);
        debug_assert!(len == Self::MAX_LEN || bits >> len == 0);
        Code { bits, len }
    }

    /// Parse a code from `'0'`/`'1'` characters.
    pub fn from_bit_str(s: &str) -> Option<Self> {
        if s.is_empty() || s.len() > Self::MAX_LEN as usize {
            return None;
        }

        let mut bits = 0u64;
        for c in s.chars() {
            bits = (bits << 1)
                | match c {
                    '0' => 0,
                    '1' => 1,
                    _ => return None,
                };
        }

        Some(Code {
            bits,
            len: s.len() as u8,
        })
    }

    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Append one bit, as a decoder does while walking the bit stream.
    #[inline]
    pub(crate) fn push(self, bit: bool) -> Self {
        Code {
            bits: (self.bits << 1) | u64::from(bit),
            len: self.len + 1,
        }
    }

    /// The empty code a decoder starts from.
    #[inline]
    pub(crate) fn empty() -> Self {
        Code { bits: 0, len: 0 }
    }

    /// Whether `self` is a prefix of `other`. A code is a prefix of itself.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            f.write_str(if (self.bits >> i) & 1 == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Immutable mapping from table keys to codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<TableKey, Code>,
}

impl CodeTable {
    /// Build a prefix-free table for every key observed in `frequencies`.
    ///
    /// An empty frequency table yields an empty code table; a single key gets
    /// the one-bit code `0`.
    pub fn build(table: TableKind, frequencies: &FrequencyTable) -> Result<Self> {
        let lengths = code_lengths(frequencies);

        if let Some(&(length, _)) = lengths.iter().find(|(l, _)| *l > Code::MAX_LEN as usize) {
            return Err(EncodeError::CodeTooLong { table, length });
        }

        Ok(Self::from_lengths(lengths))
    }

    /// Canonical code assignment from (length, key) pairs.
    fn from_lengths(mut lengths: Vec<(usize, TableKey)>) -> Self {
        lengths.sort_unstable();

        let mut codes = BTreeMap::new();
        let mut code = 0u64;
        let mut previous_len = lengths.first().map(|(l, _)| *l).unwrap_or(0);

        for (len, key) in lengths {
            if len > previous_len {
                code <<= len - previous_len;
                previous_len = len;
            }
            codes.insert(key, Code::new(code, len as u8));
            code = code.wrapping_add(1);
        }

        CodeTable { codes }
    }

    #[inline]
    pub fn get(&self, key: &TableKey) -> Option<Code> {
        self.codes.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&TableKey, &Code)> {
        self.codes.iter()
    }

    /// Shortest and longest code length, `None` for an empty table.
    pub fn length_range(&self) -> Option<(u8, u8)> {
        let min = self.codes.values().map(Code::len).min()?;
        let max = self.codes.values().map(Code::len).max()?;
        Some((min, max))
    }

    /// No code is a prefix of another one.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<Code> = self.codes.values().copied().collect();
        // sorting by the left-aligned bit string puts a prefix right before
        // the codes it prefixes
        codes.sort_unstable_by_key(|c| (c.bits << (Code::MAX_LEN - c.len) as u32, c.len));
        codes.windows(2).all(|w| !w[0].is_prefix_of(&w[1]))
    }

    /// Reverse lookup used while decoding.
    pub fn lookup(&self) -> CodeLookup {
        CodeLookup {
            keys: self.codes.iter().map(|(k, c)| (*c, *k)).collect(),
            max_len: self.codes.values().map(Code::len).max().unwrap_or(0),
        }
    }
}

impl FromIterator<(TableKey, Code)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (TableKey, Code)>>(iter: I) -> Self {
        CodeTable {
            codes: iter.into_iter().collect(),
        }
    }
}

/// Code to key mapping for decoding.
#[derive(Debug, Clone)]
pub struct CodeLookup {
    keys: HashMap<Code, TableKey>,
    max_len: u8,
}

impl CodeLookup {
    #[inline]
    pub fn get(&self, code: &Code) -> Option<TableKey> {
        self.keys.get(code).copied()
    }

    #[inline]
    pub fn max_len(&self) -> u8 {
        self.max_len
    }
}

/// Node of the Huffman tree, stored in an arena.
struct Node {
    children: Option<(usize, usize)>,
    key: Option<TableKey>,
}

/// Compute the code length of every key with the greedy Huffman merge.
///
/// Leaves enter the heap in key order and merged nodes are appended after
/// them; among equal weights the node created first is taken first, which
/// makes the tree deterministic.
fn code_lengths(frequencies: &FrequencyTable) -> Vec<(usize, TableKey)> {
    let mut nodes = Vec::with_capacity(frequencies.len() * 2);
    let mut heap = BinaryHeap::with_capacity(frequencies.len());

    for (key, &count) in frequencies.iter() {
        heap.push(Reverse((count, nodes.len())));
        nodes.push(Node {
            children: None,
            key: Some(*key),
        });
    }

    while heap.len() > 1 {
        let (Some(Reverse((left_weight, left))), Some(Reverse((right_weight, right)))) =
            (heap.pop(), heap.pop())
        else {
            break;
        };

        heap.push(Reverse((left_weight + right_weight, nodes.len())));
        nodes.push(Node {
            children: Some((left, right)),
            key: None,
        });
    }

    let Some(Reverse((_, root))) = heap.pop() else {
        return Vec::new();
    };

    let mut lengths = Vec::with_capacity(frequencies.len());
    let mut stack = vec![(root, 0usize)];
    while let Some((index, depth)) = stack.pop() {
        let node = &nodes[index];
        match (node.children, node.key) {
            (Some((left, right)), _) => {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
            // a lone leaf is the root and still needs one bit
            (None, Some(key)) => lengths.push((depth.max(1), key)),
            (None, None) => {}
        }
    }

    lengths
}
