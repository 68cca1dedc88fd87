use super::ensure_parent_dir;
use crate::error::Result;
use crate::types::{Category, CombinedCollection, Record, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Flattens the categories into one table keyed by record id.
///
/// Brands are merged first, then companies. When an id exists in both, the
/// company record replaces the brand record. Null fields are dropped since
/// TOML cannot express them.
pub fn merge_categories(combined: &CombinedCollection) -> ::toml::Table {
    let mut table = ::toml::Table::new();
    for category in Category::ALL {
        let Some(records) = combined.get(category.label()) else {
            continue;
        };
        for (id, record) in records {
            if table.insert(id.clone(), record_to_toml(record)).is_some() {
                warn!(record = %id, "[TOML] {} record replaces an earlier entry with the same id", category);
            }
        }
    }
    table
}

pub fn export_toml(combined: &CombinedCollection, output_toml: &Path) -> Result<()> {
    ensure_parent_dir(output_toml)?;
    let table = merge_categories(combined);
    fs::write(output_toml, ::toml::to_string(&table)?)?;
    info!("[TOML] Data written to {}", output_toml.display());
    Ok(())
}

fn record_to_toml(record: &Record) -> ::toml::Value {
    ::toml::Value::Table(
        record
            .iter()
            .filter_map(|(key, value)| to_toml(value).map(|v| (key.clone(), v)))
            .collect(),
    )
}

fn to_toml(value: &Value) -> Option<::toml::Value> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(::toml::Value::Boolean(*b)),
        Value::Integer(i) => Some(::toml::Value::Integer(*i)),
        Value::Float(f) => Some(::toml::Value::Float(*f)),
        Value::String(s) => Some(::toml::Value::String(s.clone())),
        Value::Sequence(items) => Some(::toml::Value::Array(
            items.iter().filter_map(to_toml).collect(),
        )),
        Value::Mapping(map) => Some(::toml::Value::Table(
            map.iter()
                .filter_map(|(key, value)| to_toml(value).map(|v| (key.clone(), v)))
                .collect(),
        )),
    }
}
