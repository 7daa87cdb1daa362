//! Evaluates a set of rules against one graph.

use crate::config::Config;
use crate::graph::ClassGraph;
use crate::rule::{ArchRule, ArchRuleBox};
use crate::types::{Report, RuleOutcome};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Builder for configuring an [`Evaluator`].
#[derive(Default)]
pub struct EvaluatorBuilder {
    rules: Vec<ArchRuleBox>,
    config: Option<Config>,
}

impl EvaluatorBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: ArchRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: ArchRuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = ArchRuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration (enabled rules, severity overrides).
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the evaluator.
    #[must_use]
    pub fn build(self) -> Evaluator {
        Evaluator {
            rules: self.rules,
            config: self.config.unwrap_or_default(),
        }
    }
}

/// Runs rules against a graph, concurrently.
///
/// Use [`Evaluator::builder()`] to construct an instance.
pub struct Evaluator {
    rules: Vec<ArchRuleBox>,
    config: Config,
}

impl Evaluator {
    /// Creates a new builder for configuring an evaluator.
    #[must_use]
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluates every enabled rule.
    ///
    /// Outcomes follow rule registration order regardless of scheduling.
    #[must_use]
    pub fn evaluate(&self, graph: &ClassGraph) -> Report {
        info!(
            "Evaluating {} rules against {} classes",
            self.rules.len(),
            graph.full_count()
        );

        let outcomes: Vec<RuleOutcome> = self
            .rules
            .par_iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .map(|rule| self.apply_severity_override(rule.evaluate(graph)))
            .collect();

        for outcome in outcomes.iter().filter(|o| o.is_empty_scope()) {
            warn!("Rule '{}' matched no elements: {}", outcome.rule, outcome.description);
        }

        let report = Report {
            outcomes,
            classes_imported: graph.full_count(),
        };
        info!(
            "Evaluation complete: {} violations",
            report.violations().count()
        );
        report
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(&self, mut outcome: RuleOutcome) -> RuleOutcome {
        if let Some(severity) = self.config.rule_severity(&outcome.rule) {
            for v in &mut outcome.violations {
                v.severity = severity;
            }
        }
        outcome
    }
}
