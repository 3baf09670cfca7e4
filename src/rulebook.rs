//! Monomial rewrite rules and their completion.
//!
//! An [`OperatorRulebook`] stores at most one rule per left-hand hash and
//! keeps every stored rule oriented toward the smaller shortlex hash. Adding
//! a rule resolves conflicts with the existing rules on a worklist, then
//! re-reduces the whole rule set. [`OperatorRulebook::complete`] runs a
//! bounded Knuth-Bendix loop over critical pairs until the rule set is
//! confluent or the iteration budget is spent.

use crate::error::AlgebraResult;
use crate::logger::{RuleLogger, SilentRuleLogger};
use crate::metrics::{MetricsReport, RewriteMetrics};
use crate::precontext::AlgebraicPrecontext;
use crate::rule::OperatorRule;
use crate::sequence::{HashedSequence, OperName, SequenceStorage};
use crate::sign::SequenceSignType;
use crate::substring::SubstringHashRange;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

#[cfg(feature = "tracing")]
use crate::trace::{debug, debug_span, trace};

/// How [`OperatorRulebook::reduce`] finds rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionStrategy {
    /// Choose per sequence from its length and the rulebook size.
    #[default]
    Automatic,
    /// Scan the rules in key order for a match anywhere in the string.
    Iterate,
    /// Probe the rule map with every substring hash.
    Search,
}

#[derive(Debug)]
pub struct OperatorRulebook {
    precontext: AlgebraicPrecontext,
    rules: BTreeMap<u64, OperatorRule>,
    hermitian: bool,
    /// `ceil(log2(rules.len()))`.
    mag: usize,
    strategy: ReductionStrategy,
    metrics: RewriteMetrics,
}

impl OperatorRulebook {
    /// Empty rulebook. `hermitian` declares the generators self-adjoint, so
    /// completion also closes the rules under conjugation.
    pub fn new(precontext: AlgebraicPrecontext, hermitian: bool) -> Self {
        Self {
            precontext,
            rules: BTreeMap::new(),
            hermitian,
            mag: 0,
            strategy: ReductionStrategy::default(),
            metrics: RewriteMetrics::new(),
        }
    }

    pub fn with_rules<I>(precontext: AlgebraicPrecontext, rules: I, hermitian: bool) -> Self
    where
        I: IntoIterator<Item = OperatorRule>,
    {
        let mut rulebook = Self::new(precontext, hermitian);
        rulebook.add_rules(rules, None);
        rulebook
    }

    // ========== ACCESSORS ==========

    #[inline]
    pub fn precontext(&self) -> &AlgebraicPrecontext {
        &self.precontext
    }

    #[inline]
    pub fn is_hermitian(&self) -> bool {
        self.hermitian
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Stored rules in ascending order of left-hand hash.
    pub fn rules(&self) -> impl Iterator<Item = &OperatorRule> + '_ {
        self.rules.values()
    }

    /// The rule whose left side hashes to `lhs_hash`.
    pub fn rule(&self, lhs_hash: u64) -> Option<&OperatorRule> {
        self.rules.get(&lhs_hash)
    }

    /// Rough cost of one rule-map probe: `ceil(log2(len))`.
    #[inline]
    pub fn complexity_estimate(&self) -> usize {
        self.mag
    }

    #[inline]
    pub fn strategy(&self) -> ReductionStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: ReductionStrategy) {
        self.strategy = strategy;
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    // ========== RULE GENERATORS ==========

    /// `ji -> ij` for every pair of operators `i < j`.
    pub fn commutator_rules(precontext: &AlgebraicPrecontext) -> Vec<OperatorRule> {
        let hasher = precontext.hasher();
        let n = precontext.num_operators() as OperName;
        let mut rules = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                rules.push(OperatorRule::new(
                    HashedSequence::from_slice(&[j, i], hasher, SequenceSignType::Positive),
                    HashedSequence::from_slice(&[i, j], hasher, SequenceSignType::Positive),
                ));
            }
        }
        rules
    }

    /// `x x* = x* x` for every generator with a distinct conjugate.
    pub fn normal_rules(precontext: &AlgebraicPrecontext) -> Vec<OperatorRule> {
        let hasher = precontext.hasher();
        (0..precontext.num_operators() as OperName)
            .filter_map(|op| {
                let conj = precontext.conjugate_operator(op);
                (conj > op).then(|| {
                    OperatorRule::oriented(
                        HashedSequence::from_slice(&[op, conj], hasher, SequenceSignType::Positive),
                        HashedSequence::from_slice(&[conj, op], hasher, SequenceSignType::Positive),
                    )
                })
            })
            .collect()
    }

    // ========== INSERTION ==========

    /// Reduce `rule` against the current rules, insert it, and re-reduce the
    /// rule set. Returns the number of changes made.
    pub fn add_rule(&mut self, rule: OperatorRule, logger: Option<&mut dyn RuleLogger>) -> usize {
        let mut silent = SilentRuleLogger;
        let logger: &mut dyn RuleLogger = match logger {
            Some(logger) => logger,
            None => &mut silent,
        };
        let reduced = self.reduce_rule(&rule);
        let mut changes = self.do_add_rule(reduced, logger);
        if changes > 0 {
            changes += self.do_reduce_ruleset(logger);
        }
        changes
    }

    pub fn add_rules<I>(&mut self, rules: I, logger: Option<&mut dyn RuleLogger>) -> usize
    where
        I: IntoIterator<Item = OperatorRule>,
    {
        let mut silent = SilentRuleLogger;
        let logger: &mut dyn RuleLogger = match logger {
            Some(logger) => logger,
            None => &mut silent,
        };
        let mut changes = 0;
        for rule in rules {
            let reduced = self.reduce_rule(&rule);
            changes += self.do_add_rule(reduced, logger);
        }
        if changes > 0 {
            changes += self.do_reduce_ruleset(logger);
        }
        changes
    }

    /// Insert with conflict resolution.
    ///
    /// Conflicts at an occupied key produce further rules, which are queued
    /// and resolved in turn.
    fn do_add_rule(&mut self, rule: OperatorRule, logger: &mut dyn RuleLogger) -> usize {
        let mut changes = 0;
        let mut pending = VecDeque::from([rule]);

        while let Some(rule) = pending.pop_front() {
            if rule.trivial() {
                continue;
            }
            // X = s·X with s != 1 forces X = 0.
            let rule = if rule.lhs().hash() == rule.rhs().hash() {
                OperatorRule::zero_rule(rule.lhs().clone())
            } else {
                rule
            };
            let key = rule.lhs().hash();

            let Some(existing) = self.rules.get(&key) else {
                self.insert(rule, logger);
                changes += 1;
                continue;
            };
            let existing_rhs = existing.rhs().clone();

            if existing_rhs.hash() == rule.rhs().hash() {
                if existing_rhs.sign() == rule.sign() {
                    continue;
                }
                // L = s1·R = s2·R: both sides vanish.
                let rhs = rule.rhs().clone().with_sign(SequenceSignType::Positive);
                self.remove(key, logger);
                self.insert(OperatorRule::zero_rule(rule.lhs().clone()), logger);
                pending.push_back(OperatorRule::zero_rule(rhs));
                changes += 1;
                continue;
            }

            // L = s1·A and L = s2·B: keep the smaller side at L, and A = s1*·s2·B.
            if existing_rhs.hash() > rule.rhs().hash() {
                let new_rhs = rule.rhs().clone();
                self.remove(key, logger);
                self.insert(rule, logger);
                pending.push_back(OperatorRule::new(existing_rhs, new_rhs));
            } else {
                pending.push_back(OperatorRule::new(rule.rhs().clone(), existing_rhs));
            }
            changes += 1;
        }

        self.update_mag();
        changes
    }

    fn insert(&mut self, rule: OperatorRule, logger: &mut dyn RuleLogger) {
        debug_assert!(
            rule.lhs().hash() > rule.rhs().hash(),
            "stored rule must decrease the hash: {}",
            rule
        );
        #[cfg(feature = "tracing")]
        trace!(rule = %rule, "insert_rule");
        logger.rule_introduced(&rule);
        self.metrics.record_rule_introduced();
        self.rules.insert(rule.lhs().hash(), rule);
    }

    fn remove(&mut self, key: u64, logger: &mut dyn RuleLogger) -> Option<OperatorRule> {
        let rule = self.rules.remove(&key)?;
        logger.rule_removed(&rule);
        self.metrics.record_rule_removed();
        Some(rule)
    }

    fn update_mag(&mut self) {
        self.mag = self.rules.len().next_power_of_two().trailing_zeros() as usize;
    }

    // ========== REDUCTION ==========

    /// True if some rule sends the identity to zero.
    fn collapses(&self) -> bool {
        self.rules.contains_key(&self.precontext.hasher().offset())
    }

    fn effective_strategy(&self, len: usize) -> ReductionStrategy {
        match self.strategy {
            ReductionStrategy::Automatic => {
                if ((len + 1) / 2) * (self.mag + 1) < self.rules.len() {
                    ReductionStrategy::Search
                } else {
                    ReductionStrategy::Iterate
                }
            }
            strategy => strategy,
        }
    }

    /// Normal form of `seq` under the current rules.
    pub fn reduce(&self, seq: &HashedSequence) -> HashedSequence {
        if seq.is_zero() {
            return HashedSequence::zero();
        }
        match self.effective_strategy(seq.len()) {
            ReductionStrategy::Search => self.reduce_via_search(seq),
            _ => self.reduce_via_iteration(seq),
        }
    }

    /// Apply the first rule (in key order) that matches anywhere, and restart.
    pub fn reduce_via_iteration(&self, seq: &HashedSequence) -> HashedSequence {
        self.metrics.record_reduction();
        if seq.is_zero() || self.collapses() {
            return HashedSequence::zero();
        }

        let mut ops = SequenceStorage::from_slice(seq.raw());
        let mut sign = seq.sign();
        let mut changed = false;
        loop {
            let hit = self
                .rules
                .values()
                .find_map(|rule| rule.matches_anywhere(&ops).map(|at| (rule, at)));
            let Some((rule, at)) = hit else {
                break;
            };
            self.metrics.record_rule_application();
            if rule.implies_zero() {
                return HashedSequence::zero();
            }
            ops = rule.splice(&ops, at);
            sign = sign * rule.sign();
            changed = true;
        }

        if changed {
            HashedSequence::new(ops, self.precontext.hasher(), sign)
        } else {
            seq.clone()
        }
    }

    /// Probe the rule map with each substring hash, shortest-rightmost first,
    /// apply the first hit, and restart.
    pub fn reduce_via_search(&self, seq: &HashedSequence) -> HashedSequence {
        self.metrics.record_reduction();
        if seq.is_zero() || self.collapses() {
            return HashedSequence::zero();
        }

        let hasher = self.precontext.hasher();
        let mut ops = SequenceStorage::from_slice(seq.raw());
        let mut sign = seq.sign();
        let mut changed = false;
        loop {
            let hit = SubstringHashRange::new(&ops, hasher)
                .find_map(|sub| self.rules.get(&sub.hash).map(|rule| (rule, sub.start)));
            let Some((rule, at)) = hit else {
                break;
            };
            self.metrics.record_rule_application();
            if rule.implies_zero() {
                return HashedSequence::zero();
            }
            ops = rule.splice(&ops, at);
            sign = sign * rule.sign();
            changed = true;
        }

        if changed {
            HashedSequence::new(ops, hasher, sign)
        } else {
            seq.clone()
        }
    }

    /// Reduce a raw string and sign in place. Returns true if the result is zero.
    pub fn reduce_in_place(&self, ops: &mut SequenceStorage, sign: &mut SequenceSignType) -> bool {
        let seq = HashedSequence::from_slice(ops, self.precontext.hasher(), *sign);
        let reduced = self.reduce(&seq);
        if reduced.is_zero() {
            ops.clear();
            *sign = SequenceSignType::Positive;
            return true;
        }
        *sign = reduced.sign();
        *ops = reduced.into_storage();
        false
    }

    /// True if any rule applies to `ops`.
    pub fn can_reduce(&self, ops: &[OperName]) -> bool {
        self.collapses()
            || self
                .rules
                .values()
                .any(|rule| rule.matches_anywhere(ops).is_some())
    }

    /// Reduce both sides of `rule` and re-orient.
    ///
    /// Sides that meet with a non-trivial relative sign collapse to `LHS -> 0`.
    pub fn reduce_rule(&self, rule: &OperatorRule) -> OperatorRule {
        let lhs = self.reduce(rule.lhs());
        let rhs = self.reduce(rule.rhs());
        if lhs.hash() == rhs.hash()
            && !lhs.is_zero()
            && SequenceSignType::difference(lhs.sign(), rhs.sign()) != SequenceSignType::Positive
        {
            return OperatorRule::zero_rule(lhs.with_sign(SequenceSignType::Positive));
        }
        OperatorRule::oriented(lhs, rhs)
    }

    /// Reduce every rule against the others until nothing changes.
    /// Returns the number of rules rewritten or dropped.
    pub fn reduce_ruleset(&mut self, logger: Option<&mut dyn RuleLogger>) -> usize {
        let mut silent = SilentRuleLogger;
        let logger: &mut dyn RuleLogger = match logger {
            Some(logger) => logger,
            None => &mut silent,
        };
        self.do_reduce_ruleset(logger)
    }

    fn do_reduce_ruleset(&mut self, logger: &mut dyn RuleLogger) -> usize {
        let mut changes = 0;
        loop {
            let mut pass_changes = 0;
            let keys: Vec<u64> = self.rules.keys().copied().collect();
            for key in keys {
                let Some(rule) = self.rules.remove(&key) else {
                    continue;
                };
                let reduced = self.reduce_rule(&rule);
                if reduced.trivial() {
                    logger.rule_reduced_to_nothing(&rule);
                    self.metrics.record_rule_removed();
                    pass_changes += 1;
                    continue;
                }
                if reduced == rule {
                    self.rules.insert(key, rule);
                    continue;
                }
                logger.rule_reduced(&rule, &reduced);
                self.metrics.record_rule_removed();
                self.do_add_rule(reduced, logger);
                pass_changes += 1;
            }
            if pass_changes == 0 {
                break;
            }
            changes += pass_changes;
        }
        self.update_mag();
        changes
    }

    // ========== COMPLETION ==========

    /// Knuth-Bendix completion with at most `max_iterations` new critical
    /// rules. Returns true if the resulting rule set is confluent (and, for
    /// a Hermitian rulebook, closed under conjugation).
    ///
    /// Running out of iterations is not an error: the rulebook keeps every
    /// rule derived so far and the final confluence check decides the result.
    /// A critical pair too long to hash also ends completion with `false`,
    /// without adding that pair.
    pub fn complete(&mut self, max_iterations: usize, logger: Option<&mut dyn RuleLogger>) -> bool {
        let mut silent = SilentRuleLogger;
        let logger: &mut dyn RuleLogger = match logger {
            Some(logger) => logger,
            None => &mut silent,
        };

        #[cfg(feature = "tracing")]
        let _span = debug_span!("complete", rules = self.rules.len(), max_iterations).entered();

        self.do_reduce_ruleset(logger);
        if self.hermitian {
            self.close_under_conjugation(max_iterations, logger);
        }

        for iteration in 0..max_iterations {
            self.metrics.record_completion_iteration();
            self.do_reduce_ruleset(logger);

            match self.find_critical_rule() {
                Ok(Some((first, second, rule))) => {
                    #[cfg(feature = "tracing")]
                    debug!(iteration, first = %first, second = %second, rule = %rule, "critical_pair");
                    logger.combination_derived(&first, &second, &rule);
                    self.do_add_rule(rule, logger);
                    self.do_reduce_ruleset(logger);
                    continue;
                }
                Ok(None) => {}
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    debug!(iteration, error = %_err, "critical_pair_unhashable");
                    logger.failure(self, iteration);
                    return false;
                }
            }

            if self.hermitian {
                if let Some((parent, rule)) = self.find_missing_conjugate() {
                    logger.conjugate_derived(&parent, &rule);
                    self.do_add_rule(rule, logger);
                    self.do_reduce_ruleset(logger);
                    continue;
                }
            }

            #[cfg(feature = "tracing")]
            debug!(iteration, rules = self.rules.len(), "rulebook_complete");
            logger.success(self, iteration);
            return true;
        }

        self.do_reduce_ruleset(logger);
        let complete = self.is_complete(self.hermitian);
        #[cfg(feature = "tracing")]
        debug!(complete, rules = self.rules.len(), "completion_budget_exhausted");
        if complete {
            logger.success(self, max_iterations);
        } else {
            logger.failure(self, max_iterations);
        }
        complete
    }

    /// Add reduced conjugates of stored rules until none is missing or
    /// `budget` rules have been added. Returns true if closed.
    fn close_under_conjugation(&mut self, budget: usize, logger: &mut dyn RuleLogger) -> bool {
        let mut added = 0;
        while let Some((parent, rule)) = self.find_missing_conjugate() {
            if added >= budget {
                return false;
            }
            logger.conjugate_derived(&parent, &rule);
            self.do_add_rule(rule, logger);
            self.do_reduce_ruleset(logger);
            added += 1;
        }
        true
    }

    /// True if every critical pair reduces to a trivial rule, and, when
    /// `test_conjugate` is set, every rule's conjugate is already implied.
    /// False if some critical pair cannot be hashed.
    pub fn is_complete(&self, test_conjugate: bool) -> bool {
        if test_conjugate && self.find_missing_conjugate().is_some() {
            return false;
        }
        matches!(self.find_critical_rule(), Ok(None))
    }

    /// First critical pair, over all ordered pairs of rules, that does not
    /// reduce to a trivial rule: `(first, second, reduced)`. Fails if a pair
    /// is longer than the hasher can represent.
    fn find_critical_rule(
        &self,
    ) -> AlgebraResult<Option<(OperatorRule, OperatorRule, OperatorRule)>> {
        for first in self.rules.values() {
            for second in self.rules.values() {
                for pair in first.critical_pairs(second, &self.precontext)? {
                    self.metrics.record_critical_pair();
                    let reduced = self.reduce_rule(&pair);
                    if !reduced.trivial() {
                        return Ok(Some((first.clone(), second.clone(), reduced)));
                    }
                }
            }
        }
        Ok(None)
    }

    /// First rule whose reduced conjugate is not trivial: `(parent, reduced)`.
    fn find_missing_conjugate(&self) -> Option<(OperatorRule, OperatorRule)> {
        self.rules.values().find_map(|rule| {
            let reduced = self.reduce_rule(&rule.conjugate(&self.precontext));
            (!reduced.trivial()).then(|| (rule.clone(), reduced))
        })
    }
}

impl fmt::Display for OperatorRulebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.rules.len() == 1 { "rule" } else { "rules" };
        writeln!(f, "Rulebook with {} {}:", self.rules.len(), noun)?;
        for rule in self.rules.values() {
            writeln!(f, "  {}", rule)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/rulebook.rs"]
mod tests;
