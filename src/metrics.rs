//! Rewriting counters for profiling.
//!
//! With the `tracing` feature, [`RewriteMetrics`] keeps relaxed atomic
//! counters so that `&self` reduction paths can record work. Without it,
//! every method is an empty inline function and [`RewriteMetrics::report`]
//! returns zeros.
//!
//! ```rust,ignore
//! let report = rulebook.metrics();
//! println!("{}", report);
//! ```

#[cfg(feature = "tracing")]
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "tracing")]
#[derive(Debug, Default)]
pub struct RewriteMetrics {
    /// Sequences passed to a reduction strategy.
    pub reductions: AtomicU64,
    /// Individual rule applications during reduction.
    pub rule_applications: AtomicU64,
    /// Rules inserted into the rulebook.
    pub rules_introduced: AtomicU64,
    /// Rules removed or replaced.
    pub rules_removed: AtomicU64,
    /// Critical pairs generated and reduced.
    pub critical_pairs: AtomicU64,
    /// Iterations of the completion loop.
    pub completion_iterations: AtomicU64,
}

#[cfg(feature = "tracing")]
impl RewriteMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_reduction(&self) {
        self.reductions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rule_application(&self) {
        self.rule_applications.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rule_introduced(&self) {
        self.rules_introduced.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rule_removed(&self) {
        self.rules_removed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_critical_pair(&self) {
        self.critical_pairs.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_completion_iteration(&self) {
        self.completion_iterations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            reductions: self.reductions.load(Ordering::Relaxed),
            rule_applications: self.rule_applications.load(Ordering::Relaxed),
            rules_introduced: self.rules_introduced.load(Ordering::Relaxed),
            rules_removed: self.rules_removed.load(Ordering::Relaxed),
            critical_pairs: self.critical_pairs.load(Ordering::Relaxed),
            completion_iterations: self.completion_iterations.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.reductions.store(0, Ordering::Relaxed);
        self.rule_applications.store(0, Ordering::Relaxed);
        self.rules_introduced.store(0, Ordering::Relaxed);
        self.rules_removed.store(0, Ordering::Relaxed);
        self.critical_pairs.store(0, Ordering::Relaxed);
        self.completion_iterations.store(0, Ordering::Relaxed);
    }
}

#[cfg(not(feature = "tracing"))]
#[derive(Debug, Default)]
pub struct RewriteMetrics;

#[cfg(not(feature = "tracing"))]
impl RewriteMetrics {
    #[inline]
    pub fn new() -> Self {
        RewriteMetrics
    }
    #[inline]
    pub fn record_reduction(&self) {}
    #[inline]
    pub fn record_rule_application(&self) {}
    #[inline]
    pub fn record_rule_introduced(&self) {}
    #[inline]
    pub fn record_rule_removed(&self) {}
    #[inline]
    pub fn record_critical_pair(&self) {}
    #[inline]
    pub fn record_completion_iteration(&self) {}
    #[inline]
    pub fn report(&self) -> MetricsReport {
        MetricsReport::default()
    }
    #[inline]
    pub fn reset(&self) {}
}

/// Snapshot of [`RewriteMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsReport {
    pub reductions: u64,
    pub rule_applications: u64,
    pub rules_introduced: u64,
    pub rules_removed: u64,
    pub critical_pairs: u64,
    pub completion_iterations: u64,
}

impl MetricsReport {
    /// Mean number of rule applications per reduced sequence.
    pub fn applications_per_reduction(&self) -> f64 {
        if self.reductions == 0 {
            0.0
        } else {
            self.rule_applications as f64 / self.reductions as f64
        }
    }

    /// Rules currently attributable to this run: introduced minus removed.
    pub fn net_rules(&self) -> i64 {
        self.rules_introduced as i64 - self.rules_removed as i64
    }
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Rewrite Metrics ===")?;
        writeln!(
            f,
            "Reductions:         {} ({} rule applications, {:.2} per reduction)",
            self.reductions,
            self.rule_applications,
            self.applications_per_reduction()
        )?;
        writeln!(
            f,
            "Rules:              {} introduced, {} removed",
            self.rules_introduced, self.rules_removed
        )?;
        writeln!(f, "Critical pairs:     {}", self.critical_pairs)?;
        writeln!(f, "Completion iters:   {}", self.completion_iterations)?;
        Ok(())
    }
}
