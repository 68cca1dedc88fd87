/// Category labels, used as keys in the combined collection and as the
/// parquet `type` column value.
pub const BRANDS: &str = "brands";
pub const COMPANIES: &str = "companies";

// Worksheet names in the Excel workbook
pub const BRANDS_SHEET: &str = "Brands";
pub const COMPANIES_SHEET: &str = "Companies";

/// Field injected into every record, holding the filename-derived id.
pub const ID_FIELD: &str = "id";

/// Field added to every parquet row, holding the category label.
pub const TYPE_FIELD: &str = "type";

/// Schema fields that never become CSV columns.
pub const CSV_EXCLUDED_FIELDS: &[&str] = &["stakeholders"];

/// File extensions recognised as record files.
pub const RECORD_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Separator used when a sequence is flattened into a single cell.
pub const LIST_SEPARATOR: &str = ", ";

pub const CONFIG_FILE: &str = "brand_etl.toml";
pub const CONFIG_ENV: &str = "BRAND_ETL_CONFIG";
pub const DEFAULT_LOG_DIRECTIVE: &str = "brand_etl=info";
