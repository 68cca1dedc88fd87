use super::{ensure_parent_dir, union_columns};
use crate::constants;
use crate::error::Result;
use crate::types::{Category, CombinedCollection, Record, Value};
use ::parquet::basic::{Compression, LogicalType, Repetition, Type as PhysicalType, ZstdLevel};
use ::parquet::data_type::{BoolType, ByteArray, ByteArrayType, DoubleType, Int64Type};
use ::parquet::errors::ParquetError;
use ::parquet::file::properties::WriterProperties;
use ::parquet::file::writer::SerializedFileWriter;
use ::parquet::schema::types::{Type, TypePtr};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Physical shape chosen for one output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Boolean,
    Int64,
    Double,
    Utf8,
    /// Optional LIST of optional UTF8 elements.
    Utf8List,
}

#[derive(Debug)]
struct ColumnSpec {
    name: String,
    kind: ColumnKind,
    required: bool,
}

/// Values and levels for one leaf column.
struct Leaf<T> {
    values: Vec<T>,
    defs: Vec<i16>,
    reps: Vec<i16>,
    nullable: bool,
    repeated: bool,
}

impl<T> Leaf<T> {
    fn new(nullable: bool, repeated: bool) -> Self {
        Self {
            values: Vec::new(),
            defs: Vec::new(),
            reps: Vec::new(),
            nullable,
            repeated,
        }
    }

    fn def_levels(&self) -> Option<&[i16]> {
        self.nullable.then_some(self.defs.as_slice())
    }

    fn rep_levels(&self) -> Option<&[i16]> {
        self.repeated.then_some(self.reps.as_slice())
    }
}

enum LeafData {
    Boolean(Leaf<bool>),
    Int64(Leaf<i64>),
    Double(Leaf<f64>),
    Bytes(Leaf<ByteArray>),
}

/// Writes every record of both categories into one parquet file.
///
/// Each row starts with a `type` column holding its category label. The
/// remaining columns are the union of record fields, typed from the values
/// observed in them.
pub fn export_parquet(combined: &CombinedCollection, output_parquet: &Path) -> Result<usize> {
    ensure_parent_dir(output_parquet)?;

    let rows = flatten(combined);
    let columns = infer_columns(&rows);
    let schema = build_schema(&columns)?;
    let props = Arc::new(
        WriterProperties::builder()
            .set_compression(Compression::ZSTD(ZstdLevel::default()))
            .build(),
    );

    let file = File::create(output_parquet)?;
    let mut writer = SerializedFileWriter::new(file, schema, props)?;
    if !rows.is_empty() {
        let mut leaves = columns.iter().map(|column| leaf_data(column, &rows));
        let mut row_group = writer.next_row_group()?;
        while let Some(mut column_writer) = row_group.next_column()? {
            let leaf = leaves.next().ok_or_else(|| {
                ParquetError::General("more parquet columns than column specs".to_string())
            })?;
            match leaf {
                LeafData::Boolean(leaf) => {
                    column_writer.typed::<BoolType>().write_batch(
                        &leaf.values,
                        leaf.def_levels(),
                        leaf.rep_levels(),
                    )?;
                }
                LeafData::Int64(leaf) => {
                    column_writer.typed::<Int64Type>().write_batch(
                        &leaf.values,
                        leaf.def_levels(),
                        leaf.rep_levels(),
                    )?;
                }
                LeafData::Double(leaf) => {
                    column_writer.typed::<DoubleType>().write_batch(
                        &leaf.values,
                        leaf.def_levels(),
                        leaf.rep_levels(),
                    )?;
                }
                LeafData::Bytes(leaf) => {
                    column_writer.typed::<ByteArrayType>().write_batch(
                        &leaf.values,
                        leaf.def_levels(),
                        leaf.rep_levels(),
                    )?;
                }
            }
            column_writer.close()?;
        }
        row_group.close()?;
    }
    writer.close()?;

    metrics::counter!("brand_etl_rows_exported_total", "format" => "parquet")
        .increment(rows.len() as u64);
    info!("[Parquet] Wrote {} rows to {}", rows.len(), output_parquet.display());
    Ok(rows.len())
}

/// One row per record, brands first, each tagged with its category label.
fn flatten(combined: &CombinedCollection) -> Vec<Record> {
    let mut rows = Vec::new();
    for category in Category::ALL {
        let Some(records) = combined.get(category.label()) else {
            continue;
        };
        for record in records.values() {
            let mut row = Record::with_capacity(record.len() + 1);
            row.insert(
                constants::TYPE_FIELD.to_string(),
                Value::from(category.label()),
            );
            row.extend(
                record
                    .iter()
                    .filter(|(key, _)| *key != constants::TYPE_FIELD)
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
            rows.push(row);
        }
    }
    rows
}

fn infer_columns(rows: &[Record]) -> Vec<ColumnSpec> {
    let mut names = union_columns(rows);
    if names.is_empty() {
        names.push(constants::TYPE_FIELD.to_string());
    }
    names
        .into_iter()
        .map(|name| {
            let kind = infer_kind(rows.iter().filter_map(|row| row.get(&name)));
            let required = name == constants::TYPE_FIELD;
            ColumnSpec {
                name,
                kind,
                required,
            }
        })
        .collect()
}

fn infer_kind<'a>(values: impl Iterator<Item = &'a Value>) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for value in values {
        let observed = match value {
            Value::Null => continue,
            Value::Bool(_) => ColumnKind::Boolean,
            Value::Integer(_) => ColumnKind::Int64,
            Value::Float(_) => ColumnKind::Double,
            Value::String(_) | Value::Mapping(_) => ColumnKind::Utf8,
            Value::Sequence(_) => ColumnKind::Utf8List,
        };
        kind = Some(match (kind, observed) {
            (None, observed) => observed,
            (Some(current), observed) if current == observed => current,
            (Some(ColumnKind::Int64), ColumnKind::Double)
            | (Some(ColumnKind::Double), ColumnKind::Int64) => ColumnKind::Double,
            _ => ColumnKind::Utf8,
        });
    }
    kind.unwrap_or(ColumnKind::Utf8)
}

fn build_schema(columns: &[ColumnSpec]) -> Result<TypePtr> {
    let mut fields = Vec::with_capacity(columns.len());
    for column in columns {
        fields.push(Arc::new(column_type(column)?));
    }
    Ok(Arc::new(
        Type::group_type_builder("schema")
            .with_fields(fields)
            .build()?,
    ))
}

fn column_type(column: &ColumnSpec) -> Result<Type> {
    let repetition = if column.required {
        Repetition::REQUIRED
    } else {
        Repetition::OPTIONAL
    };
    let primitive = |physical| {
        Type::primitive_type_builder(&column.name, physical).with_repetition(repetition)
    };

    let ty = match column.kind {
        ColumnKind::Boolean => primitive(PhysicalType::BOOLEAN).build()?,
        ColumnKind::Int64 => primitive(PhysicalType::INT64).build()?,
        ColumnKind::Double => primitive(PhysicalType::DOUBLE).build()?,
        ColumnKind::Utf8 => primitive(PhysicalType::BYTE_ARRAY)
            .with_logical_type(Some(LogicalType::String))
            .build()?,
        ColumnKind::Utf8List => {
            let element = Type::primitive_type_builder("element", PhysicalType::BYTE_ARRAY)
                .with_repetition(Repetition::OPTIONAL)
                .with_logical_type(Some(LogicalType::String))
                .build()?;
            let list = Type::group_type_builder("list")
                .with_repetition(Repetition::REPEATED)
                .with_fields(vec![Arc::new(element)])
                .build()?;
            Type::group_type_builder(&column.name)
                .with_repetition(repetition)
                .with_logical_type(Some(LogicalType::List))
                .with_fields(vec![Arc::new(list)])
                .build()?
        }
    };
    Ok(ty)
}

fn text(value: &Value) -> ByteArray {
    ByteArray::from(value.to_text().into_bytes())
}

fn leaf_data(column: &ColumnSpec, rows: &[Record]) -> LeafData {
    let nullable = !column.required;
    let cells = rows.iter().map(|row| row.get(&column.name).filter(|v| !v.is_null()));

    match column.kind {
        ColumnKind::Boolean => {
            let mut leaf = Leaf::new(nullable, false);
            for cell in cells {
                match cell {
                    Some(Value::Bool(b)) => {
                        leaf.values.push(*b);
                        leaf.defs.push(1);
                    }
                    _ => leaf.defs.push(0),
                }
            }
            LeafData::Boolean(leaf)
        }
        ColumnKind::Int64 => {
            let mut leaf = Leaf::new(nullable, false);
            for cell in cells {
                match cell {
                    Some(Value::Integer(i)) => {
                        leaf.values.push(*i);
                        leaf.defs.push(1);
                    }
                    _ => leaf.defs.push(0),
                }
            }
            LeafData::Int64(leaf)
        }
        ColumnKind::Double => {
            let mut leaf = Leaf::new(nullable, false);
            for cell in cells {
                match cell {
                    Some(Value::Integer(i)) => {
                        leaf.values.push(*i as f64);
                        leaf.defs.push(1);
                    }
                    Some(Value::Float(f)) => {
                        leaf.values.push(*f);
                        leaf.defs.push(1);
                    }
                    _ => leaf.defs.push(0),
                }
            }
            LeafData::Double(leaf)
        }
        ColumnKind::Utf8 => {
            let mut leaf = Leaf::new(nullable, false);
            for cell in cells {
                match cell {
                    Some(value) => {
                        leaf.values.push(text(value));
                        leaf.defs.push(1);
                    }
                    None => leaf.defs.push(0),
                }
            }
            LeafData::Bytes(leaf)
        }
        ColumnKind::Utf8List => {
            // Definition levels: 0 = null list, 1 = empty list,
            // 2 = null element, 3 = present element.
            let mut leaf = Leaf::new(true, true);
            for cell in cells {
                match cell {
                    Some(Value::Sequence(items)) if !items.is_empty() => {
                        for (i, item) in items.iter().enumerate() {
                            leaf.reps.push(if i == 0 { 0 } else { 1 });
                            if item.is_null() {
                                leaf.defs.push(2);
                            } else {
                                leaf.values.push(text(item));
                                leaf.defs.push(3);
                            }
                        }
                    }
                    Some(Value::Sequence(_)) => {
                        leaf.reps.push(0);
                        leaf.defs.push(1);
                    }
                    _ => {
                        leaf.reps.push(0);
                        leaf.defs.push(0);
                    }
                }
            }
            LeafData::Bytes(leaf)
        }
    }
}
