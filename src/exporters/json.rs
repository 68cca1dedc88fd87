use super::ensure_parent_dir;
use crate::aggregate::{aggregate_declared, combine};
use crate::error::Result;
use crate::schema::Schema;
use crate::types::{Category, CombinedCollection};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Aggregates both categories, writes them as pretty-printed JSON and hands
/// the collection back so later exporters don't reload the files.
///
/// Every record carries its schema's declared fields; ones absent from the
/// source file are written as `null`.
pub fn export_json(
    brands_dir: &Path,
    brands_schema: &Schema,
    companies_dir: &Path,
    companies_schema: &Schema,
    output_json: &Path,
) -> Result<CombinedCollection> {
    let combined = combine(
        aggregate_declared(brands_dir, Category::Brands, brands_schema)?,
        aggregate_declared(companies_dir, Category::Companies, companies_schema)?,
    );
    write_json(&combined, output_json)?;
    Ok(combined)
}

pub fn write_json(combined: &CombinedCollection, output_json: &Path) -> Result<()> {
    ensure_parent_dir(output_json)?;
    let mut writer = BufWriter::new(File::create(output_json)?);
    serde_json::to_writer_pretty(&mut writer, combined)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("[JSON] Combined data written to {}", output_json.display());
    Ok(())
}
