//! The capability surface operator sequences are canonicalized through.
//!
//! A [`Context`] decides how raw operator strings hash, simplify, conjugate
//! and print. [`AlgebraicContext`] is the rulebook-backed implementation:
//! simplification is reduction to normal form under its
//! [`OperatorRulebook`].

use crate::error::{AlgebraError, AlgebraResult};
use crate::logger::RuleLogger;
use crate::names::OperatorNames;
use crate::operator_sequence::{HermitianType, OperatorSequence};
use crate::precontext::{AlgebraicPrecontext, ConjugateMode};
use crate::rule::OperatorRule;
use crate::rulebook::OperatorRulebook;
use crate::sequence::{HashedSequence, OperName, SequenceStorage};
use crate::sign::SequenceSignType;

pub trait Context {
    /// Number of distinct operators.
    fn size(&self) -> usize;

    /// Hash of an already simplified string.
    fn hash(&self, ops: &[OperName]) -> u64;

    /// Rewrite `ops` and `sign` toward canonical form. Returns true if the
    /// string is zero, in which case `ops` and `sign` are unspecified.
    fn additional_simplification(
        &self,
        _ops: &mut SequenceStorage,
        _sign: &mut SequenceSignType,
    ) -> bool {
        false
    }

    /// Raw conjugate of `seq`, before simplification.
    ///
    /// The default treats every operator as self-adjoint.
    fn conjugate(&self, seq: &HashedSequence) -> (SequenceStorage, SequenceSignType) {
        let mut ops = SequenceStorage::from_slice(seq.raw());
        ops.reverse();
        (ops, seq.sign().conjugate())
    }

    /// Whether the real and imaginary parts of `seq`'s expectation value
    /// vanish: `(real_is_zero, imaginary_is_zero)`.
    fn is_sequence_null(&self, seq: &OperatorSequence<'_>) -> (bool, bool) {
        match seq.hermitian_type() {
            HermitianType::Zero => (true, true),
            HermitianType::Hermitian => (false, true),
            HermitianType::AntiHermitian => (true, false),
            HermitianType::NotHermitian => (false, false),
        }
    }

    fn format_sequence(&self, seq: &HashedSequence) -> String {
        seq.to_string()
    }
}

/// Named generators whose products are normalized by an [`OperatorRulebook`].
#[derive(Debug)]
pub struct AlgebraicContext {
    names: OperatorNames,
    rulebook: OperatorRulebook,
}

impl AlgebraicContext {
    /// `names` must name every operator of `precontext`, conjugates included.
    pub fn new(
        precontext: AlgebraicPrecontext,
        names: OperatorNames,
        hermitian: bool,
    ) -> AlgebraResult<Self> {
        if names.len() != precontext.num_operators() {
            return Err(AlgebraError::NameCountMismatch {
                expected: precontext.num_operators(),
                found: names.len(),
            });
        }
        Ok(Self {
            names,
            rulebook: OperatorRulebook::new(precontext, hermitian),
        })
    }

    /// Algebra of self-adjoint generators with the given names.
    pub fn self_adjoint(names: &[&str], hermitian: bool) -> AlgebraResult<Self> {
        let precontext = AlgebraicPrecontext::self_adjoint(names.len())?;
        Self::new(precontext, OperatorNames::new(names)?, hermitian)
    }

    /// Algebra with a starred conjugate for every raw name (unless `mode` is
    /// self-adjoint).
    pub fn with_conjugates(
        raw_names: &[&str],
        mode: ConjugateMode,
        hermitian: bool,
    ) -> AlgebraResult<Self> {
        let precontext = AlgebraicPrecontext::new(raw_names.len(), mode)?;
        let names = OperatorNames::with_conjugates(raw_names, mode)?;
        Self::new(precontext, names, hermitian)
    }

    #[inline]
    pub fn precontext(&self) -> &AlgebraicPrecontext {
        self.rulebook.precontext()
    }

    #[inline]
    pub fn names(&self) -> &OperatorNames {
        &self.names
    }

    #[inline]
    pub fn rulebook(&self) -> &OperatorRulebook {
        &self.rulebook
    }

    #[inline]
    pub fn rulebook_mut(&mut self) -> &mut OperatorRulebook {
        &mut self.rulebook
    }

    /// Parse and validate a named operator string, without reducing it.
    pub fn parse(&self, text: &str) -> AlgebraResult<SequenceStorage> {
        let ops = self.names.parse(text)?;
        self.precontext().validate(&ops)?;
        Ok(ops)
    }

    /// Canonical sequence for a named operator string.
    pub fn sequence(&self, text: &str) -> AlgebraResult<OperatorSequence<'_>> {
        let ops = self.parse(text)?;
        Ok(OperatorSequence::new(ops, self))
    }

    /// Canonical sequence for raw operators, after validation.
    pub fn operator_sequence(
        &self,
        ops: &[OperName],
        sign: SequenceSignType,
    ) -> AlgebraResult<OperatorSequence<'_>> {
        self.precontext().validate(ops)?;
        Ok(OperatorSequence::with_sign(
            SequenceStorage::from_slice(ops),
            sign,
            self,
        ))
    }

    /// Rule stating `lhs = sign · rhs`, written with operator names.
    pub fn rule(
        &self,
        lhs: &str,
        rhs: &str,
        sign: SequenceSignType,
    ) -> AlgebraResult<OperatorRule> {
        let lhs = self.parse(lhs)?;
        let rhs = self.parse(rhs)?;
        self.precontext().rule(&lhs, &rhs, sign)
    }

    /// Rule stating that a named string is zero.
    pub fn zero_rule(&self, lhs: &str) -> AlgebraResult<OperatorRule> {
        let lhs = self.parse(lhs)?;
        self.precontext().zero_rule(&lhs)
    }

    /// Complete the rulebook; see [`OperatorRulebook::complete`].
    pub fn complete(&mut self, max_iterations: usize, logger: Option<&mut dyn RuleLogger>) -> bool {
        self.rulebook.complete(max_iterations, logger)
    }
}

impl Context for AlgebraicContext {
    fn size(&self) -> usize {
        self.precontext().num_operators()
    }

    fn hash(&self, ops: &[OperName]) -> u64 {
        self.precontext().hash(ops)
    }

    fn additional_simplification(
        &self,
        ops: &mut SequenceStorage,
        sign: &mut SequenceSignType,
    ) -> bool {
        self.rulebook.reduce_in_place(ops, sign)
    }

    fn conjugate(&self, seq: &HashedSequence) -> (SequenceStorage, SequenceSignType) {
        let mut ops = SequenceStorage::from_slice(seq.raw());
        self.precontext().conjugate_in_place(&mut ops);
        (ops, seq.sign().conjugate())
    }

    fn format_sequence(&self, seq: &HashedSequence) -> String {
        self.names.format(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ab_context;

    /// Context with no rules and default hooks.
    struct FreeContext(usize);

    impl Context for FreeContext {
        fn size(&self) -> usize {
            self.0
        }

        fn hash(&self, ops: &[OperName]) -> u64 {
            crate::hasher::ShortlexHasher::new(self.0).hash(ops)
        }
    }

    #[test]
    fn name_count_must_match_alphabet() {
        let pc = AlgebraicPrecontext::new(2, ConjugateMode::Bunched).unwrap();
        let names = OperatorNames::new(["A", "B"]).unwrap();
        assert_eq!(
            AlgebraicContext::new(pc, names, true).unwrap_err(),
            AlgebraError::NameCountMismatch {
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn sequences_are_reduced_on_construction() {
        let context = ab_context(&[("BA", "AB", true)]);
        let seq = context.sequence("BBA").unwrap();
        assert_eq!(seq.raw(), &[0, 1, 1]);
        assert_eq!(seq.sign(), SequenceSignType::Positive);
        assert_eq!(seq.formatted_string(), "ABB");
        assert_eq!(context.sequence("BA").unwrap().formatted_string(), "-AB");
    }

    #[test]
    fn parse_validates_names() {
        let context = ab_context(&[]);
        assert_eq!(
            context.parse("AC").unwrap_err(),
            AlgebraError::UnknownOperatorName("C".to_string())
        );
        assert!(context.operator_sequence(&[0, 2], SequenceSignType::Positive).is_err());
    }

    #[test]
    fn conjugation_maps_starred_names() {
        let context =
            AlgebraicContext::with_conjugates(&["X"], ConjugateMode::Bunched, true).unwrap();
        let seq = context.sequence("X X*").unwrap();
        let conj = seq.conjugate();
        assert_eq!(conj.raw(), seq.raw(), "X X* is its own conjugate");
        assert_eq!(seq.hermitian_type(), HermitianType::Hermitian);

        let x = context.sequence("X").unwrap();
        assert_eq!(x.conjugate().formatted_string(), "X*");
        assert_eq!(x.hermitian_type(), HermitianType::NotHermitian);
    }

    #[test]
    fn default_hooks_treat_operators_as_self_adjoint() {
        let context = FreeContext(2);
        let seq = OperatorSequence::from_slice(&[0, 1], &context);
        let conj = seq.conjugate();
        assert_eq!(conj.raw(), &[1, 0]);
        assert_eq!(context.is_sequence_null(&seq), (false, false));
        let aa = OperatorSequence::from_slice(&[0, 0], &context);
        assert_eq!(context.is_sequence_null(&aa), (false, true));
        assert_eq!(seq.formatted_string(), "<0 1>");
    }

    #[test]
    fn completion_delegates_to_rulebook() {
        let mut context = ab_context(&[("AB", "A", false), ("BA", "1", false)]);
        assert!(context.complete(16, None));
        assert!(context.sequence("ABBA").unwrap().is_identity());
    }
}
