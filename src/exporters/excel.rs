use super::{ensure_parent_dir, union_columns};
use crate::error::Result;
use crate::types::{Category, CategoryCollection, CombinedCollection, Value};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

/// Writes one worksheet per category.
///
/// Columns are the union of fields across the category's records in order
/// of first appearance. The aggregator puts `id` first in every record, so
/// it is always the first column.
pub fn export_excel(combined: &CombinedCollection, output_excel: &Path) -> Result<()> {
    ensure_parent_dir(output_excel)?;

    let header = Format::new().set_bold();
    let empty = CategoryCollection::new();
    let mut workbook = Workbook::new();

    for category in Category::ALL {
        let records = combined.get(category.label()).unwrap_or(&empty);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(category.sheet_name())?;
        write_sheet(worksheet, records, &header)?;
    }

    workbook.save(output_excel)?;
    info!("[Excel] Data written to {}", output_excel.display());
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, records: &CategoryCollection, header: &Format) -> Result<()> {
    let columns = union_columns(records.values());

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as ColNum, name, header)?;
    }

    for (row, record) in records.values().enumerate() {
        let row = (row + 1) as RowNum;
        for (col, name) in columns.iter().enumerate() {
            if let Some(value) = record.get(name) {
                write_cell(worksheet, row, col as ColNum, value)?;
            }
        }
    }
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: RowNum, col: ColNum, value: &Value) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Value::Integer(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        Value::Float(f) => {
            worksheet.write_number(row, col, *f)?;
        }
        Value::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        Value::Sequence(_) | Value::Mapping(_) => {
            worksheet.write_string(row, col, value.to_text())?;
        }
    }
    Ok(())
}
