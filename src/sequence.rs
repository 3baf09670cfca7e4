use crate::hasher::ShortlexHasher;
use crate::sign::SequenceSignType;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// Identifier of a single generator within an algebra.
pub type OperName = i32;

/// Operator string storage: inline up to 16 operators, heap beyond.
pub type SequenceStorage = SmallVec<[OperName; 16]>;

/// An operator string bundled with its shortlex hash and a sign.
///
/// Equality, ordering and hashing look only at `(hash, sign)`. Hashes are
/// injective for every string the hasher accepts, so two sequences with the
/// same hash are treated as the same string without comparing operators;
/// the reduction strategies rely on this.
///
/// A hash of `0` marks the algebraic zero, which always has no operators and
/// a positive sign.
#[derive(Clone)]
pub struct HashedSequence {
    hash: u64,
    sign: SequenceSignType,
    ops: SequenceStorage,
}

impl HashedSequence {
    /// Hash `ops` and attach `sign`.
    pub fn new(ops: SequenceStorage, hasher: &ShortlexHasher, sign: SequenceSignType) -> Self {
        let hash = hasher.hash(&ops);
        Self { hash, sign, ops }
    }

    pub fn from_slice(ops: &[OperName], hasher: &ShortlexHasher, sign: SequenceSignType) -> Self {
        Self::new(SequenceStorage::from_slice(ops), hasher, sign)
    }

    /// Assemble from a hash the caller has already computed.
    pub fn from_parts(ops: SequenceStorage, hash: u64, sign: SequenceSignType) -> Self {
        if hash == 0 {
            debug_assert!(ops.is_empty(), "zero sequence cannot hold operators");
            return Self::zero();
        }
        Self { hash, sign, ops }
    }

    pub fn zero() -> Self {
        Self {
            hash: 0,
            sign: SequenceSignType::Positive,
            ops: SequenceStorage::new(),
        }
    }

    pub fn identity(hasher: &ShortlexHasher) -> Self {
        Self {
            hash: hasher.offset(),
            sign: SequenceSignType::Positive,
            ops: SequenceStorage::new(),
        }
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn sign(&self) -> SequenceSignType {
        self.sign
    }

    #[inline]
    pub fn raw(&self) -> &[OperName] {
        &self.ops
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.hash == 0
    }

    /// True for the identity (up to sign): no operators, not zero.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty() && self.hash != 0
    }

    #[inline]
    pub fn negated(&self) -> bool {
        self.sign == SequenceSignType::Negative
    }

    /// Replace the sign. The zero sequence keeps its positive sign.
    pub fn set_sign(&mut self, sign: SequenceSignType) {
        if !self.is_zero() {
            self.sign = sign;
        }
    }

    pub fn with_sign(mut self, sign: SequenceSignType) -> Self {
        self.set_sign(sign);
        self
    }

    pub fn into_storage(self) -> SequenceStorage {
        self.ops
    }

    /// True if this sequence is a prefix of `range`.
    pub fn matches(&self, range: &[OperName]) -> bool {
        range.starts_with(&self.ops)
    }

    /// Offset of the first occurrence of this sequence inside `range`.
    pub fn matches_anywhere(&self, range: &[OperName]) -> Option<usize> {
        if self.ops.is_empty() {
            return Some(0);
        }
        if self.ops.len() > range.len() {
            return None;
        }
        range
            .windows(self.ops.len())
            .position(|window| window == self.ops.as_slice())
    }

    /// Largest `k` such that the last `k` operators of `self` equal the first
    /// `k` operators of `rhs`, or 0.
    ///
    /// Only proper overlaps count (`k < min(len)`); a full overlap means one
    /// string contains the other.
    pub fn suffix_prefix_overlap(&self, rhs: &HashedSequence) -> usize {
        self.suffix_prefix_overlaps(rhs).next().unwrap_or(0)
    }

    /// Every proper suffix/prefix overlap length, largest first.
    pub fn suffix_prefix_overlaps<'a>(
        &'a self,
        rhs: &'a HashedSequence,
    ) -> impl Iterator<Item = usize> + 'a {
        let max_overlap = self.ops.len().min(rhs.ops.len()).saturating_sub(1);
        (1..=max_overlap)
            .rev()
            .filter(move |&k| self.ops[self.ops.len() - k..] == rhs.ops[..k])
    }
}

impl Deref for HashedSequence {
    type Target = [OperName];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.ops
    }
}

impl PartialEq for HashedSequence {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.sign == other.sign
    }
}

impl Eq for HashedSequence {}

impl PartialOrd for HashedSequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HashedSequence {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.hash, self.sign).cmp(&(other.hash, other.sign))
    }
}

impl Hash for HashedSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
        self.sign.hash(state);
    }
}

impl fmt::Debug for HashedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self, self.hash)
    }
}

impl fmt::Display for HashedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        f.write_str(self.sign.prefix())?;
        if self.ops.is_empty() {
            return f.write_str("1");
        }
        f.write_str("<")?;
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
#[path = "tests/sequence.rs"]
mod tests;
