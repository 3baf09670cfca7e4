use super::*;
use crate::error::AlgebraError;
use crate::precontext::{AlgebraicPrecontext, ConjugateMode};
use crate::sign::SequenceSignType::*;
use crate::test_utils::{rule, self_adjoint};

// Alphabet: A = 0, B = 1, C = 2.
const A: OperName = 0;
const B: OperName = 1;
const C: OperName = 2;

// ========== CONSTRUCTION ==========

#[test]
fn new_moves_sign_to_rhs() {
    let pc = self_adjoint(3);
    let lhs = pc.sequence(&[B, A], Negative).unwrap();
    let rhs = pc.sequence(&[A], Positive).unwrap();
    let r = OperatorRule::new(lhs, rhs);
    assert_eq!(r.lhs().sign(), Positive);
    assert_eq!(r.sign(), Negative);
    assert!(r.negated());
}

#[test]
fn zero_rhs_is_never_negated() {
    let pc = self_adjoint(3);
    let lhs = pc.sequence(&[A, A], Negative).unwrap();
    let r = OperatorRule::new(lhs, HashedSequence::zero());
    assert!(r.implies_zero());
    assert_eq!(r.sign(), Positive);
    assert!(!r.negated());
}

#[test]
fn trivial_rules() {
    let pc = self_adjoint(3);
    let ab = pc.sequence(&[A, B], Positive).unwrap();
    assert!(OperatorRule::new(ab.clone(), ab.clone()).trivial());
    let neg = OperatorRule::new(ab.clone(), ab.clone().with_sign(Negative));
    assert!(!neg.trivial(), "X = -X asserts X is zero");
    assert!(OperatorRule::new(HashedSequence::zero(), HashedSequence::zero()).trivial());
    assert!(!rule(&pc, &[A, B], &[A], false).trivial());
}

#[test]
fn delta_is_length_change() {
    let pc = self_adjoint(3);
    assert_eq!(rule(&pc, &[A, B, C], &[A], false).delta(), -2);
    assert_eq!(rule(&pc, &[B, A], &[A, B], true).delta(), 0);
}

// ========== APPLICATION ==========

#[test]
fn apply_replaces_substring_and_sign() {
    let pc = self_adjoint(3);
    let r = rule(&pc, &[B, A], &[A, B], true);
    let input = pc.sequence(&[C, B, A, C], Positive).unwrap();
    let at = r.matches_anywhere(&input).unwrap();
    assert_eq!(at, 1);
    let out = r.apply_match_with_hint(&input, at, pc.hasher());
    assert_eq!(out.raw(), &[C, A, B, C]);
    assert_eq!(out.sign(), Negative);
    assert_eq!(out.hash(), pc.hash(&[C, A, B, C]));
}

#[test]
fn apply_zero_rule_gives_zero() {
    let pc = self_adjoint(3);
    let r = pc.zero_rule(&[A, A]).unwrap();
    let input = pc.sequence(&[B, A, A], Imaginary).unwrap();
    let at = r.matches_anywhere(&input).unwrap();
    assert!(r.apply_match_with_hint(&input, at, pc.hasher()).is_zero());
}

#[test]
fn apply_composes_signs() {
    let pc = self_adjoint(3);
    let r = rule(&pc, &[B, A], &[A, B], true);
    let input = pc.sequence(&[B, A], Negative).unwrap();
    let out = r.apply_match_with_hint(&input, 0, pc.hasher());
    assert_eq!(out.sign(), Positive, "(-1) * (-1)");
}

// ========== CONJUGATION ==========

#[test]
fn conjugate_reverses_both_sides() {
    let pc = self_adjoint(3);
    // ABC -> A  conjugates to  CBA -> A
    let r = rule(&pc, &[A, B, C], &[A], false);
    let conj = r.conjugate(&pc);
    assert_eq!(conj.lhs().raw(), &[C, B, A]);
    assert_eq!(conj.rhs().raw(), &[A]);
    assert_eq!(conj.sign(), Positive);
}

#[test]
fn conjugate_reorients_when_needed() {
    let pc = self_adjoint(3);
    // CA -> AC conjugates to AC -> CA, which must flip to CA -> AC.
    let r = rule(&pc, &[C, A], &[A, C], false);
    let conj = r.conjugate(&pc);
    assert_eq!(conj.lhs().raw(), &[C, A]);
    assert_eq!(conj.rhs().raw(), &[A, C]);
}

#[test]
fn conjugate_flips_imaginary_sign() {
    let pc = self_adjoint(3);
    let r = pc.rule(&[B, A], &[A, B], Imaginary).unwrap();
    let conj = r.conjugate(&pc);
    // BA = iAB  =>  AB = -iBA  =>  BA = iAB again.
    assert_eq!(conj.lhs().raw(), &[B, A]);
    assert_eq!(conj.sign(), Imaginary);
}

#[test]
fn conjugate_maps_operators_when_not_self_adjoint() {
    let pc = AlgebraicPrecontext::new(2, ConjugateMode::Bunched).unwrap();
    // a a -> a   conjugates to   a* a* -> a*
    let r = pc.rule(&[0, 0], &[0], Positive).unwrap();
    let conj = r.conjugate(&pc);
    assert_eq!(conj.lhs().raw(), &[2, 2]);
    assert_eq!(conj.rhs().raw(), &[2]);
}

// ========== COMBINATION ==========

#[test]
fn combine_overlapping_rules() {
    let pc = self_adjoint(3);
    // AB -> A and BA -> 1 overlap on B: ABA -> AA and ABA -> A.
    let ab = rule(&pc, &[A, B], &[A], false);
    let ba = rule(&pc, &[B, A], &[], false);
    let combined = ab.combine(&ba, &pc).unwrap().expect("rules overlap");
    assert_eq!(combined.lhs().raw(), &[A, A]);
    assert_eq!(combined.rhs().raw(), &[A]);
    assert_eq!(combined.sign(), Positive);
}

#[test]
fn combine_without_overlap() {
    let pc = self_adjoint(3);
    let ab = rule(&pc, &[A, B], &[A], false);
    let ca = rule(&pc, &[C, A], &[A], false);
    assert_eq!(ab.combine(&ca, &pc), Ok(None));
}

#[test]
fn combine_sign_is_relative() {
    let pc = self_adjoint(3);
    // BA -> -AB with AB -> C: BAB rewrites to -ABB and to BC.
    let ba = rule(&pc, &[B, A], &[A, B], true);
    let ab = rule(&pc, &[A, B], &[C], false);
    let combined = ba.combine(&ab, &pc).unwrap().expect("overlap on A");
    // ABB (hash larger) = -BC
    assert_eq!(combined.lhs().raw(), &[A, B, B]);
    assert_eq!(combined.rhs().raw(), &[B, C]);
    assert!(combined.negated());
}

#[test]
fn combine_with_zero_rule() {
    let pc = self_adjoint(3);
    // AB -> 0 and BC -> A: ABC is zero, and also equals AA.
    let ab = pc.zero_rule(&[A, B]).unwrap();
    let bc = rule(&pc, &[B, C], &[A], false);
    let combined = ab.combine(&bc, &pc).unwrap().unwrap();
    assert_eq!(combined.lhs().raw(), &[A, A]);
    assert!(combined.implies_zero());
}

#[test]
fn critical_pairs_include_every_overlap() {
    let pc = self_adjoint(3);
    let abab = rule(&pc, &[A, B, A, B], &[C], false);
    let babc = rule(&pc, &[B, A, B, C], &[A], false);
    let pairs = abab.critical_pairs(&babc, &pc).unwrap();
    assert_eq!(pairs.len(), 2, "overlaps of length 3 and 1");
    assert_eq!(Some(pairs[0].clone()), abab.combine(&babc, &pc).unwrap());
}

#[test]
fn critical_pairs_include_containment() {
    let pc = self_adjoint(3);
    // ABC -> C contains B -> A: ABC = C and ABC = AAC.
    let abc = rule(&pc, &[A, B, C], &[C], false);
    let b = rule(&pc, &[B], &[A], false);
    let pairs = abc.critical_pairs(&b, &pc).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].lhs().raw(), &[A, A, C]);
    assert_eq!(pairs[0].rhs().raw(), &[C]);
}

#[test]
fn self_overlap() {
    let pc = self_adjoint(3);
    // AA -> B: AAA = BA = AB.
    let aa = rule(&pc, &[A, A], &[B], false);
    let combined = aa.combine(&aa, &pc).unwrap().unwrap();
    assert_eq!(combined.lhs().raw(), &[B, A]);
    assert_eq!(combined.rhs().raw(), &[A, B]);
}

#[test]
fn overlaps_past_the_hashable_length_are_refused() {
    let pc = self_adjoint(3);
    let max = pc.hasher().longest_hashable_string();
    // B^max -> A^max overlaps itself on B^(max-1): A^max·B has max + 1 letters.
    let long = rule(&pc, &vec![B; max], &vec![A; max], false);
    let too_long = AlgebraError::SequenceTooLong {
        length: max + 1,
        max,
    };
    assert_eq!(long.combine(&long, &pc), Err(too_long.clone()));
    assert_eq!(long.critical_pairs(&long, &pc).unwrap_err(), too_long);
}

// ========== IMPLICATION ==========

#[test]
fn implies_detects_subsumption() {
    let pc = self_adjoint(3);
    let ba = rule(&pc, &[B, A], &[A, B], true);
    let cba = rule(&pc, &[C, B, A], &[C, A, B], true);
    let cba_wrong_sign = rule(&pc, &[C, B, A], &[C, A, B], false);
    assert!(ba.implies(&cba));
    assert!(!ba.implies(&cba_wrong_sign));
    assert!(!cba.implies(&ba));
}

#[test]
fn zero_rules_imply_zero_rules() {
    let pc = self_adjoint(3);
    let aa = pc.zero_rule(&[A, A]).unwrap();
    let baa = pc.zero_rule(&[B, A, A]).unwrap();
    let baa_nonzero = rule(&pc, &[B, A, A], &[B], false);
    assert!(aa.implies(&baa));
    assert!(!aa.implies(&baa_nonzero));
}

// ========== DISPLAY ==========

#[test]
fn display() {
    let pc = self_adjoint(3);
    assert_eq!(rule(&pc, &[B, A], &[A, B], true).to_string(), "<1 0> -> -<0 1>");
    assert_eq!(pc.zero_rule(&[A]).unwrap().to_string(), "<0> -> 0");
}
