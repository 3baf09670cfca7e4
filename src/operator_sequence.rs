use crate::context::Context;
use crate::sequence::{HashedSequence, OperName, SequenceStorage};
use crate::sign::SequenceSignType;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, Mul, MulAssign, Neg};

/// How a sequence relates to its own conjugate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HermitianType {
    /// `X* = X`.
    Hermitian,
    /// `X* = -X`.
    AntiHermitian,
    NotHermitian,
    Zero,
}

/// A [`HashedSequence`] in canonical form for a [`Context`].
///
/// Construction runs the context's simplification hook and then hashes the
/// result, so two sequences that are equal in the algebra compare equal.
/// The sequence borrows its context and cannot outlive it.
#[derive(Clone)]
pub struct OperatorSequence<'c> {
    seq: HashedSequence,
    context: &'c dyn Context,
}

impl<'c> OperatorSequence<'c> {
    pub fn new(ops: SequenceStorage, context: &'c dyn Context) -> Self {
        Self::with_sign(ops, SequenceSignType::Positive, context)
    }

    pub fn with_sign(
        mut ops: SequenceStorage,
        mut sign: SequenceSignType,
        context: &'c dyn Context,
    ) -> Self {
        if context.additional_simplification(&mut ops, &mut sign) {
            return Self::zero(context);
        }
        let hash = context.hash(&ops);
        Self {
            seq: HashedSequence::from_parts(ops, hash, sign),
            context,
        }
    }

    pub fn from_slice(ops: &[OperName], context: &'c dyn Context) -> Self {
        Self::new(SequenceStorage::from_slice(ops), context)
    }

    pub fn zero(context: &'c dyn Context) -> Self {
        Self {
            seq: HashedSequence::zero(),
            context,
        }
    }

    /// The identity, simplified like any other string.
    pub fn identity(context: &'c dyn Context) -> Self {
        Self::new(SequenceStorage::new(), context)
    }

    #[inline]
    pub fn context(&self) -> &'c dyn Context {
        self.context
    }

    #[inline]
    pub fn hashed(&self) -> &HashedSequence {
        &self.seq
    }

    /// Canonical conjugate.
    pub fn conjugate(&self) -> OperatorSequence<'c> {
        if self.seq.is_zero() {
            return Self::zero(self.context);
        }
        let (ops, sign) = self.context.conjugate(&self.seq);
        Self::with_sign(ops, sign, self.context)
    }

    /// Right-multiply by raw operators and re-canonicalize.
    pub fn append(&mut self, ops: &[OperName]) {
        if self.seq.is_zero() {
            return;
        }
        let sign = self.seq.sign();
        let mut joined = SequenceStorage::with_capacity(self.seq.len() + ops.len());
        joined.extend_from_slice(self.seq.raw());
        joined.extend_from_slice(ops);
        *self = Self::with_sign(joined, sign, self.context);
    }

    pub fn hermitian_type(&self) -> HermitianType {
        if self.seq.is_zero() {
            return HermitianType::Zero;
        }
        let conj = self.conjugate();
        if conj.hash() != self.hash() {
            return HermitianType::NotHermitian;
        }
        match SequenceSignType::difference(self.sign(), conj.sign()) {
            SequenceSignType::Positive => HermitianType::Hermitian,
            SequenceSignType::Negative => HermitianType::AntiHermitian,
            _ => HermitianType::NotHermitian,
        }
    }

    /// The same string with a positive sign.
    pub fn with_positive_sign(&self) -> OperatorSequence<'c> {
        Self {
            seq: self.seq.clone().with_sign(SequenceSignType::Positive),
            context: self.context,
        }
    }

    pub fn formatted_string(&self) -> String {
        self.context.format_sequence(&self.seq)
    }
}

fn same_context(lhs: &dyn Context, rhs: &dyn Context) -> bool {
    std::ptr::eq(
        lhs as *const dyn Context as *const (),
        rhs as *const dyn Context as *const (),
    )
}

impl Deref for OperatorSequence<'_> {
    type Target = HashedSequence;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.seq
    }
}

impl<'c> Mul<&OperatorSequence<'c>> for &OperatorSequence<'c> {
    type Output = OperatorSequence<'c>;

    fn mul(self, rhs: &OperatorSequence<'c>) -> Self::Output {
        debug_assert!(
            same_context(self.context, rhs.context),
            "cannot multiply sequences from different contexts"
        );
        if self.seq.is_zero() || rhs.seq.is_zero() {
            return OperatorSequence::zero(self.context);
        }
        let mut ops = SequenceStorage::with_capacity(self.seq.len() + rhs.seq.len());
        ops.extend_from_slice(self.seq.raw());
        ops.extend_from_slice(rhs.seq.raw());
        OperatorSequence::with_sign(ops, self.seq.sign() * rhs.seq.sign(), self.context)
    }
}

impl<'c> MulAssign<&OperatorSequence<'c>> for OperatorSequence<'c> {
    fn mul_assign(&mut self, rhs: &OperatorSequence<'c>) {
        *self = &*self * rhs;
    }
}

impl<'c> Neg for OperatorSequence<'c> {
    type Output = OperatorSequence<'c>;

    fn neg(mut self) -> Self::Output {
        let sign = -self.seq.sign();
        self.seq.set_sign(sign);
        self
    }
}

impl<'c> Neg for &OperatorSequence<'c> {
    type Output = OperatorSequence<'c>;

    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

impl PartialEq for OperatorSequence<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for OperatorSequence<'_> {}

impl PartialOrd for OperatorSequence<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OperatorSequence<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seq.cmp(&other.seq)
    }
}

impl fmt::Display for OperatorSequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted_string())
    }
}

impl fmt::Debug for OperatorSequence<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatorSequence({:?})", self.seq)
    }
}
