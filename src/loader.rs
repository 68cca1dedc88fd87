use crate::constants;
use crate::error::{EtlError, Result};
use crate::types::{Record, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads one YAML file into a [`Value`].
pub fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|source| EtlError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source| EtlError::Parse {
        path: path.to_path_buf(),
        source,
    };
    let mut doc: serde_yaml::Value = serde_yaml::from_str(&content).map_err(parse_error)?;
    // `<<: *anchor` merge keys are expanded into the mapping that holds them
    doc.apply_merge().map_err(parse_error)?;
    Ok(Value::from(doc))
}

/// Reads one record file. The top-level document must be a mapping; an
/// empty file is an empty record.
pub fn read_record(path: &Path) -> Result<Record> {
    match read_document(path)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Record::new()),
        _ => Err(EtlError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Lists the record files directly inside `dir`, sorted by file name.
///
/// The sort is byte-wise on the file name, so output order never depends on
/// the order the filesystem returns entries in.
pub fn record_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| EtlError::Read {
        path: dir.to_path_buf(),
        source,
    })? {
        let path = entry?.path();
        if path.is_file() && is_record_file(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// The record id: the file name without its extension.
pub fn record_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_record_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| constants::RECORD_EXTENSIONS.contains(&ext))
}
