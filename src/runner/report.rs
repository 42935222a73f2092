//! # Run report.
//!
//! [`RunReport`] holds the per-job outcomes of one concurrent run, keyed
//! and ordered by job id (completion order is deliberately not observable).
//! Successful values stay retrievable from the report even when other jobs
//! failed; [`RunReport::into_result`] is the strict view that trades the
//! report for either all values or a [`CompositeError`].

use std::collections::BTreeMap;

use crate::error::{CompositeError, JobError, JobFailure};

/// Result of one job: its value or its captured error.
pub type Outcome<T> = Result<T, JobError>;

/// Outcomes of one concurrent run, ordered by job id.
#[derive(Debug)]
pub struct RunReport<T> {
    outcomes: BTreeMap<String, Outcome<T>>,
}

impl<T> RunReport<T> {
    pub(crate) fn from_outcomes(outcomes: BTreeMap<String, Outcome<T>>) -> Self {
        Self { outcomes }
    }

    /// The outcome recorded for `id`, if that job was part of the run.
    pub fn get(&self, id: &str) -> Option<&Outcome<T>> {
        self.outcomes.get(id)
    }

    /// Number of jobs in the run.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the run contained no jobs.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// `true` when every job succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.values().all(|o| o.is_ok())
    }

    /// Iterates `(id, value)` for the jobs that succeeded, in id order.
    pub fn successes(&self) -> impl Iterator<Item = (&str, &T)> {
        self.outcomes
            .iter()
            .filter_map(|(id, o)| o.as_ref().ok().map(|v| (id.as_str(), v)))
    }

    /// Iterates `(id, error)` for the jobs that failed, in id order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &JobError)> {
        self.outcomes
            .iter()
            .filter_map(|(id, o)| o.as_ref().err().map(|e| (id.as_str(), e)))
    }

    /// All outcomes, keyed by id.
    pub fn outcomes(&self) -> &BTreeMap<String, Outcome<T>> {
        &self.outcomes
    }

    /// Strict view: all values, or a [`CompositeError`] referencing exactly
    /// the failing ids with their original errors.
    ///
    /// Inspect the report first (e.g. [`successes`](RunReport::successes))
    /// if partial results matter; the conversion consumes them.
    pub fn into_result(self) -> Result<BTreeMap<String, T>, CompositeError> {
        let mut values = BTreeMap::new();
        let mut failures = Vec::new();
        for (id, outcome) in self.outcomes {
            match outcome {
                Ok(value) => {
                    values.insert(id, value);
                }
                Err(error) => failures.push(JobFailure { id, error }),
            }
        }
        if failures.is_empty() {
            Ok(values)
        } else {
            Err(CompositeError { failures })
        }
    }
}
