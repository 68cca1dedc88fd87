use crate::config::Config;
use crate::error::Result;
use crate::loader::{read_record, record_files, record_id};
use crate::report::{BatchReport, ValidationReporter};
use crate::schema::Schema;
use crate::types::Category;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Result of validating both categories.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub brands: BatchReport,
    pub companies: BatchReport,
}

impl ValidationOutcome {
    pub fn success(&self) -> bool {
        self.brands.all_valid() && self.companies.all_valid()
    }

    pub fn reports(&self) -> [&BatchReport; 2] {
        [&self.brands, &self.companies]
    }
}

/// Validates every file in `files` against `schema`.
///
/// Invalid records are reported and collected, never fatal. A file that
/// cannot be read or parsed aborts the batch.
pub fn validate_batch(
    files: &[PathBuf],
    schema: &Schema,
    category: Category,
    reporter: &mut dyn ValidationReporter,
) -> Result<BatchReport> {
    reporter.batch_started(category, files.len());
    let mut report = BatchReport::new(category, files.len());

    for path in files {
        let id = record_id(path);
        let record = read_record(path)?;
        match schema.validate(&record) {
            Ok(()) => debug!(category = %category, record = %id, "valid"),
            Err(violations) => {
                reporter.record_invalid(category, &id, &violations);
                report.failed.push(id);
            }
        }
    }

    metrics::counter!("brand_etl_records_invalid_total", "category" => category.label())
        .increment(report.failed.len() as u64);
    reporter.batch_finished(&report);
    Ok(report)
}

/// Validates one category's directory against its schema.
pub fn validate_category(
    config: &Config,
    category: Category,
    reporter: &mut dyn ValidationReporter,
) -> Result<BatchReport> {
    let schema = Schema::load(config.schema_path(category))?;
    let files = record_files(config.data_dir(category))?;
    validate_batch(&files, &schema, category, reporter)
}

/// Validates brands and then companies. Both categories are always checked,
/// even when the first one has failures.
pub fn validate_categories(
    config: &Config,
    reporter: &mut dyn ValidationReporter,
) -> Result<ValidationOutcome> {
    let brands = validate_category(config, Category::Brands, reporter)?;
    let companies = validate_category(config, Category::Companies, reporter)?;
    Ok(ValidationOutcome { brands, companies })
}
