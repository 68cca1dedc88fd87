mod common;

use anyhow::Result;
use brand_etl::loader::record_files;
use brand_etl::{
    validate_batch, validate_categories, BatchReport, Category, Schema, ValidationReporter,
    Violations,
};
use common::Fixture;
use std::process::Command;

/// Captures what the validator reports.
#[derive(Default)]
struct CollectingReporter {
    invalid: Vec<(Category, String, String)>,
    summaries: Vec<BatchReport>,
}

impl ValidationReporter for CollectingReporter {
    fn record_invalid(&mut self, category: Category, record_id: &str, violations: &Violations) {
        self.invalid
            .push((category, record_id.to_string(), violations.to_string()));
    }

    fn batch_finished(&mut self, report: &BatchReport) {
        self.summaries.push(report.clone());
    }
}

#[test]
fn batch_reports_each_invalid_record_once() -> Result<()> {
    let fixture = Fixture::standard();
    // two brands missing the required `company` field
    fixture.brand("dune_dates", "name: Dune Dates\n");
    fixture.brand("echo_tea", "name: Echo Tea\ntags: [tea]\n");

    let schema = Schema::load(fixture.config.schema_path(Category::Brands))?;
    let files = record_files(fixture.config.data_dir(Category::Brands))?;
    let mut reporter = CollectingReporter::default();

    let report = validate_batch(&files, &schema, Category::Brands, &mut reporter)?;

    assert!(!report.all_valid());
    assert_eq!(report.total, 5);
    assert_eq!(report.valid(), 3);
    assert_eq!(report.failed, vec!["dune_dates", "echo_tea"]);

    assert_eq!(reporter.invalid.len(), 2);
    assert!(reporter.invalid[0].2.contains("company"));
    assert_eq!(reporter.summaries.len(), 1);
    Ok(())
}

#[test]
fn all_valid_batch_succeeds() -> Result<()> {
    let fixture = Fixture::standard();
    let schema = Schema::load(fixture.config.schema_path(Category::Companies))?;
    let files = record_files(fixture.config.data_dir(Category::Companies))?;
    let mut reporter = CollectingReporter::default();

    let report = validate_batch(&files, &schema, Category::Companies, &mut reporter)?;

    assert!(report.all_valid());
    assert!(reporter.invalid.is_empty());
    assert_eq!(reporter.summaries[0].valid(), 2);
    Ok(())
}

#[test]
fn both_categories_are_checked_after_a_failure() -> Result<()> {
    let fixture = Fixture::standard();
    fixture.brand("bad_brand", "company: nameless\n");
    fixture.company("bad_company", "name: Bad\nlisted: maybe\n");

    let mut reporter = CollectingReporter::default();
    let outcome = validate_categories(&fixture.config, &mut reporter)?;

    assert!(!outcome.success());
    assert_eq!(outcome.brands.failed, vec!["bad_brand"]);
    assert_eq!(outcome.companies.failed, vec!["bad_company"]);
    assert_eq!(reporter.summaries.len(), 2);
    assert_eq!(reporter.invalid[1].0, Category::Companies);
    Ok(())
}

#[test]
fn parse_error_aborts_validation() {
    let fixture = Fixture::standard();
    fixture.company("garbled", "name: \"unterminated\n");

    let mut reporter = CollectingReporter::default();
    let result = validate_categories(&fixture.config, &mut reporter);
    assert!(matches!(result, Err(brand_etl::EtlError::Parse { .. })));
}

#[test]
fn validator_binary_exit_status_reflects_validity() {
    let fixture = Fixture::standard();
    let status = Command::new(env!("CARGO_BIN_EXE_validate-records"))
        .arg(fixture.root())
        .env_remove("BRAND_ETL_CONFIG")
        .status()
        .expect("run validate-records");
    assert_eq!(status.code(), Some(0));

    fixture.brand("missing_company", "name: Orphan\n");
    let status = Command::new(env!("CARGO_BIN_EXE_validate-records"))
        .arg(fixture.root())
        .env_remove("BRAND_ETL_CONFIG")
        .status()
        .expect("run validate-records");
    assert_eq!(status.code(), Some(1));
}
