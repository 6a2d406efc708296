//! Validation/repair orchestrator.
//!
//! Evaluates the rules, applies the registered strategies on a working copy
//! when a critical rule fails, and re-evaluates until the document is valid,
//! a pass changes nothing, or the iteration budget runs out.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::classify::{AcceptAll, NodeClassifier};
use crate::error::ValidatorError;
use crate::options::RepairOptions;
use crate::parse::{self, types::Workflow};
use crate::repair::{self, Repair};
use crate::report::{Report, ReportMetadata, RuleResult, Severity};
use crate::validate;

/// Stateless apart from the injected classifier; one instance can serve
/// any number of concurrent calls.
#[derive(Clone)]
pub struct Validator {
    classifier: Arc<dyn NodeClassifier>,
}

impl Default for Validator {
    fn default() -> Self {
        Validator {
            classifier: Arc::new(AcceptAll),
        }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(classifier: impl NodeClassifier + 'static) -> Self {
        Validator {
            classifier: Arc::new(classifier),
        }
    }

    /// Read-only pass over every rule.
    pub fn evaluate(&self, workflow: &Workflow) -> Vec<RuleResult> {
        validate::evaluate(workflow, self.classifier.as_ref())
    }

    /// Validate `workflow` and, unless `validate_only` is set, repair a copy
    /// of it. The caller's document is never modified.
    pub fn validate_and_repair(
        &self,
        workflow: &Workflow,
        options: &RepairOptions,
    ) -> Result<Report, ValidatorError> {
        parse::check_structure(workflow)?;

        let mut working = workflow.clone();
        let mut results = self.evaluate(&working);
        let mut rules_evaluated = results.len();
        let mut iterations = 0;
        let mut fixes = Vec::new();
        let mut notes = Vec::new();

        while !options.validate_only && validate::has_critical_failure(&results) {
            if iterations >= options.max_iterations {
                warn!(iterations, "repair budget exhausted with critical issues left");
                notes.push(format!(
                    "Repair budget exhausted after {} iteration(s)",
                    iterations
                ));
                break;
            }
            iterations += 1;

            let pass = repair_pass(&working, &results);
            debug!(iteration = iterations, fixes = pass.fixes.len(), "repair pass");
            if pass.is_noop() {
                warn!(iteration = iterations, "repair pass changed nothing");
                notes.push(format!(
                    "Repair stalled at iteration {} with critical issues left",
                    iterations
                ));
                break;
            }

            working = pass.workflow;
            fixes.extend(pass.fixes);
            results = self.evaluate(&working);
            rules_evaluated += results.len();
        }

        Ok(build_report(
            working,
            &results,
            fixes,
            notes,
            ReportMetadata {
                iterations,
                rules_evaluated,
                validated_at: options
                    .timestamp
                    .then(|| chrono::Utc::now().to_rfc3339()),
            },
        ))
    }
}

/// Apply the strategy of every failed rule, in rule order: critical rules
/// first, then the auto-fixable advisories.
fn repair_pass(workflow: &Workflow, results: &[RuleResult]) -> Repair {
    let mut working = workflow.clone();
    let mut fixes = Vec::new();

    for result in results.iter().filter(|r| !r.passed) {
        let Some(strategy) = repair::strategy_for(result.classification) else {
            continue;
        };
        let repaired = strategy(&working, result);
        trace!(
            rule = result.rule,
            classification = %result.classification,
            fixes = repaired.fixes.len(),
            "applied strategy"
        );
        if repaired.is_noop() {
            continue;
        }
        working = repaired.workflow;
        fixes.extend(repaired.fixes);
    }

    Repair {
        workflow: working,
        fixes,
    }
}

fn build_report(
    document: Workflow,
    results: &[RuleResult],
    fixes: Vec<String>,
    notes: Vec<String>,
    metadata: ReportMetadata,
) -> Report {
    let issues = results
        .iter()
        .filter(|r| r.is_critical_failure())
        .flat_map(|r| r.issues.iter().cloned())
        .collect();

    let mut warnings: Vec<String> = results
        .iter()
        .filter(|r| !r.passed && r.severity == Severity::Advisory)
        .flat_map(|r| r.issues.iter().map(ToString::to_string))
        .collect();
    warnings.extend(notes);

    Report {
        is_valid: !validate::has_critical_failure(results),
        issues,
        fixes,
        warnings,
        document,
        metadata,
    }
}

/// Validate and repair with the default validator.
pub fn validate_and_repair(
    workflow: &Workflow,
    options: &RepairOptions,
) -> Result<Report, ValidatorError> {
    Validator::default().validate_and_repair(workflow, options)
}

/// Parse a JSON document, then validate and repair it.
pub fn validate_json(json: &str, options: &RepairOptions) -> Result<Report, ValidatorError> {
    let workflow = parse::parse(json)?;
    validate_and_repair(&workflow, options)
}
