//! Writers for each output format.
//!
//! CSV reads record files directly and flattens values. Every other format
//! consumes the combined collection produced by the JSON exporter.

pub mod csv;
pub mod excel;
pub mod json;
pub mod parquet;
pub mod toml;

use crate::error::Result;
use crate::types::Record;
use indexmap::IndexSet;
use std::fs;
use std::path::Path;

pub use self::csv::{csv_columns, export_csv, write_csv};
pub use self::excel::export_excel;
pub use self::json::{export_json, write_json};
pub use self::parquet::export_parquet;
pub use self::toml::{export_toml, merge_categories};

/// Creates the directory that will hold `path`. Succeeds if it exists.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Field names across `records`, in order of first appearance.
pub(crate) fn union_columns<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for record in records {
        columns.extend(record.keys().map(String::as_str));
    }
    columns.into_iter().map(str::to_string).collect()
}
