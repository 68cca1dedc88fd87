use crate::config::Config;
use crate::error::Result;
use crate::exporters;
use crate::schema::Schema;
use crate::types::Category;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Summary of a complete export run
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub brands: usize,
    pub companies: usize,
    pub brands_csv_rows: usize,
    pub companies_csv_rows: usize,
    pub parquet_rows: usize,
    pub outputs: Vec<PathBuf>,
}

pub struct Pipeline;

impl Pipeline {
    /// Runs every exporter in a fixed order. Each one finishes writing its
    /// file before the next starts; the first failure ends the run.
    #[instrument(skip(config))]
    pub fn run_exports(config: &Config) -> Result<PipelineResult> {
        info!("🚀 Starting export run");

        let brands_schema = Schema::load(config.schema_path(Category::Brands))?;
        let companies_schema = Schema::load(config.schema_path(Category::Companies))?;

        // Step 1: CSV per category, straight from the record files
        let mut csv_rows = Vec::with_capacity(Category::ALL.len());
        for (category, schema) in [
            (Category::Brands, &brands_schema),
            (Category::Companies, &companies_schema),
        ] {
            let rows = exporters::write_csv(
                config.data_dir(category),
                config.csv_path(category),
                schema,
            )?;
            csv_rows.push(rows);
        }

        // Step 2: JSON, which also produces the combined collection
        let combined = exporters::export_json(
            config.data_dir(Category::Brands),
            &brands_schema,
            config.data_dir(Category::Companies),
            &companies_schema,
            &config.output.json,
        )?;

        // Step 3: formats built from the combined collection
        exporters::export_toml(&combined, &config.output.toml)?;
        exporters::export_excel(&combined, &config.output.excel)?;
        let parquet_rows = exporters::export_parquet(&combined, &config.output.parquet)?;

        let count = |category: Category| combined.get(category.label()).map_or(0, |c| c.len());
        let result = PipelineResult {
            brands: count(Category::Brands),
            companies: count(Category::Companies),
            brands_csv_rows: csv_rows[0],
            companies_csv_rows: csv_rows[1],
            parquet_rows,
            outputs: vec![
                config.csv_path(Category::Brands).to_path_buf(),
                config.csv_path(Category::Companies).to_path_buf(),
                config.output.json.clone(),
                config.output.toml.clone(),
                config.output.excel.clone(),
                config.output.parquet.clone(),
            ],
        };
        info!(
            "✅ Exported {} brands and {} companies",
            result.brands, result.companies
        );
        Ok(result)
    }
}
