//! Sparse bit-set over `u32` members.
//!
//! Members are grouped into 64-bit words keyed by `member / 64`. Only
//! non-empty words are stored, so sets of node ids scattered over a large id
//! space stay small. Iteration is always in ascending member order.

use std::collections::BTreeMap;

const WORD_BITS: u32 = u64::BITS;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SparseBitSet {
    words: BTreeMap<u32, u64>,
}

impl SparseBitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `member`, returning `true` if it was not already present.
    pub fn insert(&mut self, member: u32) -> bool {
        let word = self.words.entry(member / WORD_BITS).or_insert(0);
        let mask = 1u64 << (member % WORD_BITS);
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    /// Remove `member`, returning `true` if it was present.
    pub fn remove(&mut self, member: u32) -> bool {
        let key = member / WORD_BITS;
        let Some(word) = self.words.get_mut(&key) else {
            return false;
        };
        let mask = 1u64 << (member % WORD_BITS);
        let present = *word & mask != 0;
        *word &= !mask;
        if *word == 0 {
            self.words.remove(&key);
        }
        present
    }

    pub fn contains(&self, member: u32) -> bool {
        self.words
            .get(&(member / WORD_BITS))
            .is_some_and(|word| word & (1u64 << (member % WORD_BITS)) != 0)
    }

    pub fn len(&self) -> usize {
        self.words.values().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// In-place union, returning `true` if `self` changed.
    pub fn union_with(&mut self, other: &SparseBitSet) -> bool {
        let mut changed = false;
        for (&key, &bits) in &other.words {
            let word = self.words.entry(key).or_insert(0);
            let merged = *word | bits;
            changed |= merged != *word;
            *word = merged;
        }
        changed
    }

    /// Iterate over members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().flat_map(|(&key, &bits)| {
            let base = key * WORD_BITS;
            BitIter { bits }.map(move |offset| base + offset)
        })
    }
}

impl FromIterator<u32> for SparseBitSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = SparseBitSet::new();
        for member in iter {
            set.insert(member);
        }
        set
    }
}

/// Ascending set-bit offsets within one word.
struct BitIter {
    bits: u64,
}

impl Iterator for BitIter {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.bits == 0 {
            return None;
        }
        let offset = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(offset)
    }
}
