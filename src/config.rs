use crate::constants;
use crate::error::{EtlError, Result};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration. Every field has a default, so an empty file (or no
/// file at all) describes the standard repository layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub schemas: SchemaConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub brands_dir: PathBuf,
    pub companies_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub brands: PathBuf,
    pub companies: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub brands_csv: PathBuf,
    pub companies_csv: PathBuf,
    pub json: PathBuf,
    pub toml: PathBuf,
    pub excel: PathBuf,
    pub parquet: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub directive: String,
    /// Directory for daily-rolling JSON log files. Console only when unset.
    pub log_dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            brands_dir: PathBuf::from("data/brands"),
            companies_dir: PathBuf::from("data/companies"),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            brands: PathBuf::from("schemas/brand_schema.yaml"),
            companies: PathBuf::from("schemas/company_schema.yaml"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            brands_csv: PathBuf::from("output/csv/brands.csv"),
            companies_csv: PathBuf::from("output/csv/companies.csv"),
            json: PathBuf::from("output/json/data.json"),
            toml: PathBuf::from("output/toml/data.toml"),
            excel: PathBuf::from("output/excel/data.xlsx"),
            parquet: PathBuf::from("output/parquet/data.parquet"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directive: constants::DEFAULT_LOG_DIRECTIVE.to_string(),
            log_dir: None,
            file_prefix: "brand_etl.log".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Finds the configuration for a run rooted at `root`.
    ///
    /// An explicit path wins, then the `BRAND_ETL_CONFIG` environment
    /// variable (relative to `root`), then `brand_etl.toml` inside `root`,
    /// then the defaults. Relative paths in the result are resolved against
    /// `root`.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        Self::discover_with(root, explicit, std::env::var_os(constants::CONFIG_ENV))
    }

    fn discover_with(
        root: &Path,
        explicit: Option<&Path>,
        from_env: Option<std::ffi::OsString>,
    ) -> Result<Self> {
        let from_env = from_env.map(|path| root.join(path));
        let candidate = explicit
            .map(Path::to_path_buf)
            .or(from_env)
            .or_else(|| Some(root.join(constants::CONFIG_FILE)).filter(|p| p.is_file()));

        let config = match candidate {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        Ok(config.rooted_at(root))
    }

    /// Resolves every relative path against `root`.
    pub fn rooted_at(mut self, root: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };
        join(&mut self.data.brands_dir);
        join(&mut self.data.companies_dir);
        join(&mut self.schemas.brands);
        join(&mut self.schemas.companies);
        join(&mut self.output.brands_csv);
        join(&mut self.output.companies_csv);
        join(&mut self.output.json);
        join(&mut self.output.toml);
        join(&mut self.output.excel);
        join(&mut self.output.parquet);
        if let Some(dir) = self.logging.log_dir.as_mut() {
            join(dir);
        }
        self
    }

    pub fn data_dir(&self, category: Category) -> &Path {
        match category {
            Category::Brands => &self.data.brands_dir,
            Category::Companies => &self.data.companies_dir,
        }
    }

    pub fn schema_path(&self, category: Category) -> &Path {
        match category {
            Category::Brands => &self.schemas.brands,
            Category::Companies => &self.schemas.companies,
        }
    }

    pub fn csv_path(&self, category: Category) -> &Path {
        match category {
            Category::Brands => &self.output.brands_csv,
            Category::Companies => &self.output.companies_csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data.brands_dir, PathBuf::from("data/brands"));
        assert_eq!(config.logging.directive, "brand_etl=info");
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config: Config = toml::from_str(
            r#"
[output]
json = "dist/all.json"

[logging]
log_dir = "logs"
"#,
        )
        .unwrap();
        assert_eq!(config.output.json, PathBuf::from("dist/all.json"));
        assert_eq!(config.output.toml, PathBuf::from("output/toml/data.toml"));
        assert_eq!(config.logging.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn explicit_config_is_rooted() {
        let root = tempdir().unwrap();
        let path = root.path().join("custom.toml");
        fs::write(&path, "[data]\nbrands_dir = \"in/brands\"\n").unwrap();

        let config = Config::discover(root.path(), Some(&path)).unwrap();
        assert_eq!(config.data_dir(Category::Brands), root.path().join("in/brands"));
        assert_eq!(
            config.csv_path(Category::Companies),
            root.path().join("output/csv/companies.csv")
        );
    }

    #[test]
    fn env_config_path_is_relative_to_root() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("conf")).unwrap();
        fs::write(
            root.path().join("conf/etl.toml"),
            "[output]\njson = \"dist/all.json\"\n",
        )
        .unwrap();

        let config =
            Config::discover_with(root.path(), None, Some("conf/etl.toml".into())).unwrap();
        assert_eq!(config.output.json, root.path().join("dist/all.json"));
    }

    #[test]
    fn explicit_config_beats_the_environment() {
        let root = tempdir().unwrap();
        let path = root.path().join("custom.toml");
        fs::write(&path, "[data]\nbrands_dir = \"in/brands\"\n").unwrap();

        let config =
            Config::discover_with(root.path(), Some(&path), Some("missing.toml".into())).unwrap();
        assert_eq!(config.data_dir(Category::Brands), root.path().join("in/brands"));
    }

    #[test]
    fn absolute_paths_are_kept() {
        let root = tempdir().unwrap();
        let mut config = Config::default();
        config.output.parquet = PathBuf::from("/tmp/out.parquet");
        let config = config.rooted_at(root.path());
        assert_eq!(config.output.parquet, PathBuf::from("/tmp/out.parquet"));
    }

    #[test]
    fn unreadable_config_is_a_config_error() {
        let root = tempdir().unwrap();
        let err = Config::load(&root.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, EtlError::Config(_)));
    }
}
