use crate::error::{AlgebraError, AlgebraResult};
use crate::hasher::ShortlexHasher;
use crate::rule::OperatorRule;
use crate::sequence::{HashedSequence, OperName, SequenceStorage};
use crate::sign::SequenceSignType;

/// How conjugate operators are laid out in the operator alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConjugateMode {
    /// Every generator is its own conjugate.
    #[default]
    SelfAdjoint,
    /// `X1 .. Xn, X1* .. Xn*`.
    Bunched,
    /// `X1, X1*, X2, X2*, ...`.
    Interleaved,
}

/// Alphabet-level facts an algebra needs before any rule exists: how many
/// operators there are, how they conjugate, and how strings hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgebraicPrecontext {
    raw_operators: usize,
    num_operators: usize,
    mode: ConjugateMode,
    hasher: ShortlexHasher,
}

impl AlgebraicPrecontext {
    pub fn new(raw_operators: usize, mode: ConjugateMode) -> AlgebraResult<Self> {
        if raw_operators == 0 {
            return Err(AlgebraError::NoOperators);
        }
        let num_operators = match mode {
            ConjugateMode::SelfAdjoint => raw_operators,
            ConjugateMode::Bunched | ConjugateMode::Interleaved => raw_operators
                .checked_mul(2)
                .ok_or(AlgebraError::TooManyOperators {
                    count: raw_operators,
                    max: OperName::MAX as usize / 2,
                })?,
        };
        if num_operators > OperName::MAX as usize {
            return Err(AlgebraError::TooManyOperators {
                count: num_operators,
                max: OperName::MAX as usize,
            });
        }
        Ok(Self {
            raw_operators,
            num_operators,
            mode,
            hasher: ShortlexHasher::new(num_operators),
        })
    }

    /// Precontext whose generators are all Hermitian.
    pub fn self_adjoint(raw_operators: usize) -> AlgebraResult<Self> {
        Self::new(raw_operators, ConjugateMode::SelfAdjoint)
    }

    /// Number of generators, not counting distinct conjugates.
    #[inline]
    pub fn raw_operators(&self) -> usize {
        self.raw_operators
    }

    /// Size of the full alphabet, conjugates included.
    #[inline]
    pub fn num_operators(&self) -> usize {
        self.num_operators
    }

    #[inline]
    pub fn mode(&self) -> ConjugateMode {
        self.mode
    }

    #[inline]
    pub fn is_self_adjoint(&self) -> bool {
        self.mode == ConjugateMode::SelfAdjoint
    }

    #[inline]
    pub fn hasher(&self) -> &ShortlexHasher {
        &self.hasher
    }

    #[inline]
    pub fn hash(&self, ops: &[OperName]) -> u64 {
        self.hasher.hash(ops)
    }

    pub fn conjugate_operator(&self, op: OperName) -> OperName {
        match self.mode {
            ConjugateMode::SelfAdjoint => op,
            ConjugateMode::Bunched => {
                let raw = self.raw_operators as OperName;
                if op < raw {
                    op + raw
                } else {
                    op - raw
                }
            }
            ConjugateMode::Interleaved => op ^ 1,
        }
    }

    /// Reverse the string and conjugate each operator.
    pub fn conjugate_in_place(&self, ops: &mut SequenceStorage) {
        ops.reverse();
        if !self.is_self_adjoint() {
            for op in ops.iter_mut() {
                *op = self.conjugate_operator(*op);
            }
        }
    }

    /// Conjugate of a hashed sequence. The result is not reduced by any rule.
    pub fn conjugate(&self, seq: &HashedSequence) -> HashedSequence {
        if seq.is_zero() {
            return HashedSequence::zero();
        }
        let mut ops = SequenceStorage::from_slice(seq.raw());
        self.conjugate_in_place(&mut ops);
        HashedSequence::new(ops, &self.hasher, seq.sign().conjugate())
    }

    /// Check that every operator is in the alphabet and the string is hashable.
    pub fn validate(&self, ops: &[OperName]) -> AlgebraResult<()> {
        if let Some(&op) = ops
            .iter()
            .find(|&&op| op < 0 || op as usize >= self.num_operators)
        {
            return Err(AlgebraError::OperatorOutOfRange {
                op,
                num_operators: self.num_operators,
            });
        }
        let max = self.hasher.longest_hashable_string();
        if ops.len() > max {
            return Err(AlgebraError::SequenceTooLong {
                length: ops.len(),
                max,
            });
        }
        Ok(())
    }

    pub fn sequence(&self, ops: &[OperName], sign: SequenceSignType) -> AlgebraResult<HashedSequence> {
        self.validate(ops)?;
        Ok(HashedSequence::from_slice(ops, &self.hasher, sign))
    }

    /// Rule stating `lhs = sign · rhs`, oriented so the larger hash is rewritten.
    pub fn rule(
        &self,
        lhs: &[OperName],
        rhs: &[OperName],
        sign: SequenceSignType,
    ) -> AlgebraResult<OperatorRule> {
        let lhs = self.sequence(lhs, SequenceSignType::Positive)?;
        let rhs = self.sequence(rhs, sign)?;
        Ok(OperatorRule::oriented(lhs, rhs))
    }

    /// Rule stating that `lhs` is zero.
    pub fn zero_rule(&self, lhs: &[OperName]) -> AlgebraResult<OperatorRule> {
        let lhs = self.sequence(lhs, SequenceSignType::Positive)?;
        Ok(OperatorRule::zero_rule(lhs))
    }
}
