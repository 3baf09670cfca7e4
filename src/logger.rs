//! Observation hooks for rulebook mutation and completion.
//!
//! The rulebook calls a [`RuleLogger`] whenever a rule is introduced,
//! derived, removed or reduced, and once when completion succeeds or gives
//! up. Every method defaults to doing nothing.

use crate::rule::OperatorRule;
use crate::rulebook::OperatorRulebook;

#[cfg(feature = "tracing")]
use crate::trace::{debug, info, warn};

pub trait RuleLogger {
    /// A rule was inserted into the rulebook.
    fn rule_introduced(&mut self, _rule: &OperatorRule) {}

    /// `rule` was derived by conjugating `parent`.
    fn conjugate_derived(&mut self, _parent: &OperatorRule, _rule: &OperatorRule) {}

    /// `rule` was derived from a critical pair of `first` and `second`.
    fn combination_derived(
        &mut self,
        _first: &OperatorRule,
        _second: &OperatorRule,
        _rule: &OperatorRule,
    ) {
    }

    /// A rule was taken out of the rulebook (replaced or superseded).
    fn rule_removed(&mut self, _rule: &OperatorRule) {}

    /// `old` was rewritten to `new` by the remaining rules.
    fn rule_reduced(&mut self, _old: &OperatorRule, _new: &OperatorRule) {}

    /// `old` became trivial under the remaining rules and was dropped.
    fn rule_reduced_to_nothing(&mut self, _old: &OperatorRule) {}

    fn success(&mut self, _rulebook: &OperatorRulebook, _iterations: usize) {}

    fn failure(&mut self, _rulebook: &OperatorRulebook, _iterations: usize) {}
}

/// Logger that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentRuleLogger;

impl RuleLogger for SilentRuleLogger {}

/// One recorded [`RuleLogger`] callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleLogEvent {
    Introduced(OperatorRule),
    ConjugateDerived {
        parent: OperatorRule,
        rule: OperatorRule,
    },
    CombinationDerived {
        first: OperatorRule,
        second: OperatorRule,
        rule: OperatorRule,
    },
    Removed(OperatorRule),
    Reduced {
        old: OperatorRule,
        new: OperatorRule,
    },
    ReducedToNothing(OperatorRule),
    Success {
        rules: usize,
        iterations: usize,
    },
    Failure {
        rules: usize,
        iterations: usize,
    },
}

/// Logger that keeps every event in order.
#[derive(Debug, Default, Clone)]
pub struct RuleLog {
    events: Vec<RuleLogEvent>,
}

impl RuleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RuleLogEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events that derived a rule from a critical pair.
    pub fn combinations(&self) -> impl Iterator<Item = &OperatorRule> {
        self.events.iter().filter_map(|event| match event {
            RuleLogEvent::CombinationDerived { rule, .. } => Some(rule),
            _ => None,
        })
    }

    /// The final `Success`/`Failure` event, if completion has finished.
    pub fn outcome(&self) -> Option<&RuleLogEvent> {
        self.events.iter().rev().find(|event| {
            matches!(
                event,
                RuleLogEvent::Success { .. } | RuleLogEvent::Failure { .. }
            )
        })
    }
}

impl RuleLogger for RuleLog {
    fn rule_introduced(&mut self, rule: &OperatorRule) {
        self.events.push(RuleLogEvent::Introduced(rule.clone()));
    }

    fn conjugate_derived(&mut self, parent: &OperatorRule, rule: &OperatorRule) {
        self.events.push(RuleLogEvent::ConjugateDerived {
            parent: parent.clone(),
            rule: rule.clone(),
        });
    }

    fn combination_derived(
        &mut self,
        first: &OperatorRule,
        second: &OperatorRule,
        rule: &OperatorRule,
    ) {
        self.events.push(RuleLogEvent::CombinationDerived {
            first: first.clone(),
            second: second.clone(),
            rule: rule.clone(),
        });
    }

    fn rule_removed(&mut self, rule: &OperatorRule) {
        self.events.push(RuleLogEvent::Removed(rule.clone()));
    }

    fn rule_reduced(&mut self, old: &OperatorRule, new: &OperatorRule) {
        self.events.push(RuleLogEvent::Reduced {
            old: old.clone(),
            new: new.clone(),
        });
    }

    fn rule_reduced_to_nothing(&mut self, old: &OperatorRule) {
        self.events.push(RuleLogEvent::ReducedToNothing(old.clone()));
    }

    fn success(&mut self, rulebook: &OperatorRulebook, iterations: usize) {
        self.events.push(RuleLogEvent::Success {
            rules: rulebook.len(),
            iterations,
        });
    }

    fn failure(&mut self, rulebook: &OperatorRulebook, iterations: usize) {
        self.events.push(RuleLogEvent::Failure {
            rules: rulebook.len(),
            iterations,
        });
    }
}

/// Forwards every event to `tracing`. Silent unless the `tracing` feature is on.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRuleLogger;

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
impl RuleLogger for TracingRuleLogger {
    fn rule_introduced(&mut self, rule: &OperatorRule) {
        #[cfg(feature = "tracing")]
        debug!(rule = %rule, "rule_introduced");
    }

    fn conjugate_derived(&mut self, parent: &OperatorRule, rule: &OperatorRule) {
        #[cfg(feature = "tracing")]
        debug!(parent = %parent, rule = %rule, "conjugate_derived");
    }

    fn combination_derived(
        &mut self,
        first: &OperatorRule,
        second: &OperatorRule,
        rule: &OperatorRule,
    ) {
        #[cfg(feature = "tracing")]
        debug!(first = %first, second = %second, rule = %rule, "combination_derived");
    }

    fn rule_removed(&mut self, rule: &OperatorRule) {
        #[cfg(feature = "tracing")]
        debug!(rule = %rule, "rule_removed");
    }

    fn rule_reduced(&mut self, old: &OperatorRule, new: &OperatorRule) {
        #[cfg(feature = "tracing")]
        debug!(old = %old, new = %new, "rule_reduced");
    }

    fn rule_reduced_to_nothing(&mut self, old: &OperatorRule) {
        #[cfg(feature = "tracing")]
        debug!(old = %old, "rule_reduced_to_nothing");
    }

    fn success(&mut self, rulebook: &OperatorRulebook, iterations: usize) {
        #[cfg(feature = "tracing")]
        info!(rules = rulebook.len(), iterations, "completion_succeeded");
    }

    fn failure(&mut self, rulebook: &OperatorRulebook, iterations: usize) {
        #[cfg(feature = "tracing")]
        warn!(rules = rulebook.len(), iterations, "completion_exhausted");
    }
}
