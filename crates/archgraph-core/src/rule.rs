//! The rule trait shared by condition rules, cycle rules and declarative
//! rules.

use crate::graph::ClassGraph;
use crate::types::{RuleOutcome, Severity};

/// An architecture rule evaluated against a built [`ClassGraph`].
///
/// Rules only read the graph, so an evaluator may run many of them at once.
///
/// # Example
///
/// ```
/// use archgraph_core::{ArchRule, ClassGraph, RuleOutcome};
///
/// struct NoStubs;
///
/// impl ArchRule for NoStubs {
///     fn name(&self) -> &str { "no-stubs" }
///     fn description(&self) -> &str { "no class should be a stub" }
///
///     fn evaluate(&self, graph: &ClassGraph) -> RuleOutcome {
///         RuleOutcome::new(self.name(), self.description(), Vec::new(), graph.stub_count())
///     }
/// }
/// ```
pub trait ArchRule: Send + Sync {
    /// Kebab-case rule identifier (e.g. "report-not-importer").
    fn name(&self) -> &str;

    /// Human-readable rule text used in reports.
    fn description(&self) -> &str;

    /// Severity of violations this rule emits.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Evaluates the rule. Never fails: an empty result is a pass.
    fn evaluate(&self, graph: &ClassGraph) -> RuleOutcome;
}

/// Type alias for boxed rule trait objects.
pub type ArchRuleBox = Box<dyn ArchRule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl ArchRule for TestRule {
        fn name(&self) -> &str {
            "test-rule"
        }

        fn description(&self) -> &str {
            "A test rule"
        }

        fn evaluate(&self, graph: &ClassGraph) -> RuleOutcome {
            RuleOutcome::new(self.name(), self.description(), Vec::new(), graph.len())
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule: ArchRuleBox = Box::new(TestRule);
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.default_severity(), Severity::Error);
        let outcome = rule.evaluate(&ClassGraph::default());
        assert!(outcome.passed());
        assert!(outcome.is_empty_scope());
    }
}
