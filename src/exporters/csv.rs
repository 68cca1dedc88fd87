use super::ensure_parent_dir;
use crate::constants;
use crate::error::Result;
use crate::loader::{read_record, record_files, record_id};
use crate::normalize::render_cell;
use crate::schema::Schema;
use std::path::Path;
use tracing::{debug, info};

/// Column list for a category's CSV: `id`, then the schema's fields in
/// declared order minus the excluded ones.
pub fn csv_columns(schema: &Schema) -> Vec<String> {
    std::iter::once(constants::ID_FIELD)
        .chain(
            schema
                .field_names()
                .into_iter()
                .filter(|name| *name != constants::ID_FIELD)
                .filter(|name| !constants::CSV_EXCLUDED_FIELDS.contains(name)),
        )
        .map(str::to_string)
        .collect()
}

/// Loads the schema at `schema_path` and writes the CSV for `input_dir`.
pub fn export_csv(input_dir: &Path, output_csv: &Path, schema_path: &Path) -> Result<usize> {
    let schema = Schema::load(schema_path)?;
    write_csv(input_dir, output_csv, &schema)
}

/// Writes one row per record file in `input_dir`, sorted by file name.
/// Returns the number of data rows written.
pub fn write_csv(input_dir: &Path, output_csv: &Path, schema: &Schema) -> Result<usize> {
    ensure_parent_dir(output_csv)?;

    let columns = csv_columns(schema);
    let mut writer = ::csv::Writer::from_path(output_csv)?;
    writer.write_record(&columns)?;

    let mut rows = 0;
    for path in record_files(input_dir)? {
        let id = record_id(&path);
        let record = read_record(&path)?;
        let row: Vec<String> = columns
            .iter()
            .map(|column| {
                if column == constants::ID_FIELD {
                    id.clone()
                } else {
                    record.get(column).map(render_cell).unwrap_or_default()
                }
            })
            .collect();
        writer.write_record(&row)?;
        rows += 1;
        debug!("[CSV] Converted {} -> {}", path.display(), output_csv.display());
    }
    writer.flush()?;

    metrics::counter!("brand_etl_rows_exported_total", "format" => "csv").increment(rows as u64);
    info!("[CSV] Wrote {} rows to {}", rows, output_csv.display());
    Ok(rows)
}
