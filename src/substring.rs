//! Rolling enumeration of substring hashes.
//!
//! [`SubstringHashRange`] yields the shortlex hash of every contiguous
//! substring exactly once. Substrings are grouped by their end position,
//! rightmost end first; within a group the substring grows leftward one
//! operator at a time, so each step is a single multiply-add:
//!
//! `hash' = hash + (op + 1) * radix^stride`
//!
//! The result is bit-identical to [`ShortlexHasher::hash`] applied to the same
//! slice, which is what lets rule keys be probed directly.

use crate::hasher::ShortlexHasher;
use crate::sequence::OperName;
use std::iter::FusedIterator;

/// Hash and location of one substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstringHash {
    pub hash: u64,
    /// Offset of the first operator.
    pub start: usize,
    /// One past the last operator.
    pub end: usize,
}

impl SubstringHash {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

#[derive(Debug, Clone)]
pub struct SubstringHashRange<'a> {
    ops: &'a [OperName],
    hasher: &'a ShortlexHasher,
    end: usize,
    start: usize,
    hash: u64,
    multiplier: u64,
    in_group: bool,
}

impl<'a> SubstringHashRange<'a> {
    pub fn new(ops: &'a [OperName], hasher: &'a ShortlexHasher) -> Self {
        Self {
            ops,
            hasher,
            end: ops.len(),
            start: 0,
            hash: 0,
            multiplier: 1,
            in_group: false,
        }
    }

    /// Total number of substrings, `n(n+1)/2`.
    pub fn total(&self) -> usize {
        let n = self.ops.len();
        n * (n + 1) / 2
    }

    #[inline]
    fn current(&self) -> SubstringHash {
        SubstringHash {
            hash: self.hash,
            start: self.start,
            end: self.end,
        }
    }
}

impl Iterator for SubstringHashRange<'_> {
    type Item = SubstringHash;

    fn next(&mut self) -> Option<Self::Item> {
        if self.in_group && self.start > 0 {
            self.start -= 1;
            self.hash += ShortlexHasher::digit(self.ops[self.start]) * self.multiplier;
            if self.start > 0 {
                self.multiplier *= self.hasher.radix();
            }
            return Some(self.current());
        }

        // Current group exhausted: begin the next one, one position further left.
        if self.in_group {
            self.end -= 1;
        }
        if self.end == 0 {
            self.in_group = false;
            return None;
        }
        self.in_group = true;
        self.start = self.end - 1;
        self.hash = self.hasher.offset() + ShortlexHasher::digit(self.ops[self.start]);
        self.multiplier = self.hasher.radix();
        Some(self.current())
    }
}

impl FusedIterator for SubstringHashRange<'_> {}
