use crate::context::AlgebraicContext;
use crate::precontext::AlgebraicPrecontext;
use crate::rule::OperatorRule;
use crate::sequence::OperName;
use crate::sign::SequenceSignType;

pub(crate) fn self_adjoint(operators: usize) -> AlgebraicPrecontext {
    AlgebraicPrecontext::self_adjoint(operators).unwrap()
}

pub(crate) fn rule(
    precontext: &AlgebraicPrecontext,
    lhs: &[OperName],
    rhs: &[OperName],
    negated: bool,
) -> OperatorRule {
    precontext
        .rule(lhs, rhs, SequenceSignType::from_negated(negated))
        .unwrap()
}

/// Hermitian two-generator algebra `{A, B}` with the given textual rules.
pub(crate) fn ab_context(rules: &[(&str, &str, bool)]) -> AlgebraicContext {
    let mut context = AlgebraicContext::self_adjoint(&["A", "B"], true).unwrap();
    for &(lhs, rhs, negated) in rules {
        let rule = context
            .rule(lhs, rhs, SequenceSignType::from_negated(negated))
            .unwrap();
        context.rulebook_mut().add_rule(rule, None);
    }
    context
}
