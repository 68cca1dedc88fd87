use crate::schema::Violations;
use crate::types::Category;
use serde::Serialize;
use tracing::{error, info, warn};

/// Outcome of validating one category's record files.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub category: Category,
    pub total: usize,
    /// Ids of records that failed validation, in processing order.
    pub failed: Vec<String>,
}

impl BatchReport {
    pub fn new(category: Category, total: usize) -> Self {
        Self {
            category,
            total,
            failed: Vec::new(),
        }
    }

    pub fn valid(&self) -> usize {
        self.total - self.failed.len()
    }

    pub fn all_valid(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Receives validation results as they are produced.
pub trait ValidationReporter {
    fn batch_started(&mut self, _category: Category, _total: usize) {}

    /// Called once per record that fails validation.
    fn record_invalid(&mut self, category: Category, record_id: &str, violations: &Violations);

    /// Called once per batch, after every record has been checked.
    fn batch_finished(&mut self, report: &BatchReport);
}

/// Reports through `tracing`: one error event per invalid record and one
/// summary event per batch.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ValidationReporter for TracingReporter {
    fn batch_started(&mut self, category: Category, total: usize) {
        info!("Validating {} {}", total, category);
    }

    fn record_invalid(&mut self, category: Category, record_id: &str, violations: &Violations) {
        error!(
            category = %category,
            record = record_id,
            "Validation error in {}: {}",
            record_id,
            violations
        );
    }

    fn batch_finished(&mut self, report: &BatchReport) {
        if report.all_valid() {
            info!(
                "{} of {} {} valid",
                report.valid(),
                report.total,
                report.category
            );
        } else {
            warn!(
                failed = ?report.failed,
                "{} of {} {} valid",
                report.valid(),
                report.total,
                report.category
            );
        }
    }
}
