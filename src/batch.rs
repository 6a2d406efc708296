//! Thin batch driver over independent documents.
//!
//! Each document gets its own call and working copy, so the calls run in
//! parallel without locking. Loading, writing back and backups stay with
//! the caller; [`Report::needs_write_back`] tells it which documents changed.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::error::ValidatorError;
use crate::options::RepairOptions;
use crate::orchestrator::Validator;
use crate::parse::types::Workflow;
use crate::report::Report;

/// Results are returned in input order.
pub fn validate_batch(
    validator: &Validator,
    workflows: &[Workflow],
    options: &RepairOptions,
) -> Vec<Result<Report, ValidatorError>> {
    #[cfg(feature = "parallel")]
    let results: Vec<_> = workflows
        .par_iter()
        .map(|w| validator.validate_and_repair(w, options))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = workflows
        .iter()
        .map(|w| validator.validate_and_repair(w, options))
        .collect();

    let summary = BatchSummary::from_results(&results);
    info!(
        total = summary.total,
        valid = summary.valid,
        repaired = summary.repaired,
        malformed = summary.malformed,
        "batch validation finished"
    );
    results
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub repaired: usize,
    pub malformed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[Result<Report, ValidatorError>]) -> Self {
        let mut summary = BatchSummary {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            match result {
                Ok(report) => {
                    if report.is_valid {
                        summary.valid += 1;
                    }
                    if report.needs_write_back() {
                        summary.repaired += 1;
                    }
                }
                Err(_) => summary.malformed += 1,
            }
        }
        summary
    }
}
