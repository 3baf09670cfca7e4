use crate::error::{AlgebraError, AlgebraResult};
use crate::hasher::ShortlexHasher;
use crate::precontext::AlgebraicPrecontext;
use crate::sequence::{HashedSequence, OperName, SequenceStorage};
use crate::sign::SequenceSignType;
use smallvec::SmallVec;
use std::fmt;

/// A directed rewrite rule `LHS -> sign · RHS`.
///
/// The left side is stored with a positive sign and the rule's sign rides on
/// the right side. A zero right side always has a positive sign.
///
/// Rules may be built with `lhs.hash() == rhs.hash()` (trivial, or implying
/// zero); the rulebook only ever stores rules with a strictly larger left hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRule {
    lhs: HashedSequence,
    rhs: HashedSequence,
}

impl OperatorRule {
    /// Rule from `lhs.sign · LHS = rhs.sign · RHS`. Requires `lhs.hash() >= rhs.hash()`.
    pub fn new(lhs: HashedSequence, rhs: HashedSequence) -> Self {
        debug_assert!(
            lhs.hash() >= rhs.hash(),
            "rule must rewrite toward smaller hashes: {} -> {}",
            lhs,
            rhs
        );
        let sign = if rhs.is_zero() {
            SequenceSignType::Positive
        } else {
            SequenceSignType::difference(lhs.sign(), rhs.sign())
        };
        Self {
            lhs: lhs.with_sign(SequenceSignType::Positive),
            rhs: rhs.with_sign(sign),
        }
    }

    /// Rule equating `a` and `b`, rewriting whichever has the larger hash.
    pub fn oriented(a: HashedSequence, b: HashedSequence) -> Self {
        if a.hash() >= b.hash() {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    /// `lhs -> 0`.
    pub fn zero_rule(lhs: HashedSequence) -> Self {
        Self::new(lhs, HashedSequence::zero())
    }

    #[inline]
    pub fn lhs(&self) -> &HashedSequence {
        &self.lhs
    }

    #[inline]
    pub fn rhs(&self) -> &HashedSequence {
        &self.rhs
    }

    /// Factor relating the two sides.
    #[inline]
    pub fn sign(&self) -> SequenceSignType {
        self.rhs.sign()
    }

    #[inline]
    pub fn negated(&self) -> bool {
        self.rhs.sign() == SequenceSignType::Negative
    }

    #[inline]
    pub fn implies_zero(&self) -> bool {
        self.rhs.is_zero()
    }

    /// Change in string length when the rule is applied.
    #[inline]
    pub fn delta(&self) -> isize {
        self.rhs.len() as isize - self.lhs.len() as isize
    }

    /// True if the rule asserts nothing.
    #[inline]
    pub fn trivial(&self) -> bool {
        self.lhs.hash() == self.rhs.hash() && self.rhs.sign() == SequenceSignType::Positive
    }

    #[inline]
    pub fn matches_anywhere(&self, ops: &[OperName]) -> Option<usize> {
        self.lhs.matches_anywhere(ops)
    }

    /// Rewrite the occurrence of the left side starting at `hint`.
    ///
    /// `hint` must be an offset at which [`lhs`](Self::lhs) matches `input`.
    pub fn apply_match_with_hint(
        &self,
        input: &HashedSequence,
        hint: usize,
        hasher: &ShortlexHasher,
    ) -> HashedSequence {
        if self.implies_zero() || input.is_zero() {
            return HashedSequence::zero();
        }
        let ops = self.splice(input.raw(), hint);
        HashedSequence::new(ops, hasher, input.sign() * self.sign())
    }

    /// `ops` with `lhs` at `at` replaced by the raw right side.
    pub(crate) fn splice(&self, ops: &[OperName], at: usize) -> SequenceStorage {
        debug_assert!(
            at + self.lhs.len() <= ops.len() && self.lhs.matches(&ops[at..]),
            "rule {} does not match at offset {}",
            self,
            at
        );
        let mut out = SequenceStorage::with_capacity(
            (ops.len() as isize + self.delta()).max(0) as usize,
        );
        out.extend_from_slice(&ops[..at]);
        out.extend_from_slice(self.rhs.raw());
        out.extend_from_slice(&ops[at + self.lhs.len()..]);
        out
    }

    /// The rule obtained by conjugating both sides.
    pub fn conjugate(&self, precontext: &AlgebraicPrecontext) -> OperatorRule {
        OperatorRule::oriented(
            precontext.conjugate(&self.lhs),
            precontext.conjugate(&self.rhs),
        )
    }

    /// Superpose on the largest suffix/prefix overlap of the two left sides.
    ///
    /// For `self: P·O -> R1` and `other: O·S -> R2`, the string `P·O·S`
    /// rewrites to both `R1·S` and `P·R2`; the returned rule equates them.
    /// Fails if either side is longer than the hasher can represent.
    pub fn combine(
        &self,
        other: &OperatorRule,
        precontext: &AlgebraicPrecontext,
    ) -> AlgebraResult<Option<OperatorRule>> {
        match self.lhs.suffix_prefix_overlap(&other.lhs) {
            0 => Ok(None),
            overlap => self
                .resolve_overlap(other, overlap, precontext.hasher())
                .map(Some),
        }
    }

    /// Every critical pair between `self` and `other`.
    ///
    /// Includes one rule per proper suffix/prefix overlap of the left sides,
    /// and one per occurrence of `other`'s left side strictly inside
    /// `self`'s. Fails on the first overlap whose sides cannot be hashed.
    pub fn critical_pairs(
        &self,
        other: &OperatorRule,
        precontext: &AlgebraicPrecontext,
    ) -> AlgebraResult<SmallVec<[OperatorRule; 2]>> {
        let hasher = precontext.hasher();
        let mut pairs = self
            .lhs
            .suffix_prefix_overlaps(&other.lhs)
            .map(|overlap| self.resolve_overlap(other, overlap, hasher))
            .collect::<AlgebraResult<SmallVec<[OperatorRule; 2]>>>()?;

        // Inclusions never grow past `self.lhs`, which is already hashable.
        let inner = other.lhs.len();
        if inner > 0 && inner <= self.lhs.len() && self.lhs.hash() != other.lhs.hash() {
            for at in 0..=(self.lhs.len() - inner) {
                if other.lhs.matches(&self.lhs[at..]) {
                    let via_other = other.apply_match_with_hint(&self.lhs, at, hasher);
                    pairs.push(OperatorRule::oriented(self.rhs.clone(), via_other));
                }
            }
        }
        Ok(pairs)
    }

    fn resolve_overlap(
        &self,
        other: &OperatorRule,
        overlap: usize,
        hasher: &ShortlexHasher,
    ) -> AlgebraResult<OperatorRule> {
        let via_self = if self.implies_zero() {
            HashedSequence::zero()
        } else {
            let mut ops = SequenceStorage::from_slice(self.rhs.raw());
            ops.extend_from_slice(&other.lhs[overlap..]);
            hashable(ops, hasher, self.sign())?
        };
        let via_other = if other.implies_zero() {
            HashedSequence::zero()
        } else {
            let mut ops = SequenceStorage::from_slice(&self.lhs[..self.lhs.len() - overlap]);
            ops.extend_from_slice(other.rhs.raw());
            hashable(ops, hasher, other.sign())?
        };
        Ok(OperatorRule::oriented(via_self, via_other))
    }

    /// True if rewriting `other`'s left side with this rule reproduces `other`.
    pub fn implies(&self, other: &OperatorRule) -> bool {
        let Some(at) = self.lhs.matches_anywhere(&other.lhs) else {
            return false;
        };
        if self.implies_zero() || other.implies_zero() {
            return self.implies_zero() && other.implies_zero();
        }
        self.sign() == other.sign() && self.splice(&other.lhs, at).as_slice() == other.rhs.raw()
    }
}

fn hashable(
    ops: SequenceStorage,
    hasher: &ShortlexHasher,
    sign: SequenceSignType,
) -> AlgebraResult<HashedSequence> {
    let max = hasher.longest_hashable_string();
    if ops.len() > max {
        return Err(AlgebraError::SequenceTooLong {
            length: ops.len(),
            max,
        });
    }
    Ok(HashedSequence::new(ops, hasher, sign))
}

impl fmt::Display for OperatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs)
    }
}

#[cfg(test)]
#[path = "tests/rule.rs"]
mod tests;
