#![allow(dead_code)]

use brand_etl::exporters::export_json;
use brand_etl::{Category, CombinedCollection, Config, Schema};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const BRAND_SCHEMA: &str = r#"
type: object
required: [name, company]
properties:
  name: { type: string }
  company: { type: string }
  tags: { type: array, items: { type: string } }
  website: { type: string }
  stakeholders: { type: array }
  founded: { type: integer }
"#;

pub const COMPANY_SCHEMA: &str = r#"
type: object
required: [name]
properties:
  name: { type: string }
  brands: { type: array, items: { type: string } }
  listed: { type: boolean }
"#;

/// A throwaway repository layout with schemas and record directories.
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir_all(root.join("schemas")).unwrap();
        fs::create_dir_all(root.join("data/brands")).unwrap();
        fs::create_dir_all(root.join("data/companies")).unwrap();
        fs::write(root.join("schemas/brand_schema.yaml"), BRAND_SCHEMA).unwrap();
        fs::write(root.join("schemas/company_schema.yaml"), COMPANY_SCHEMA).unwrap();
        let config = Config::default().rooted_at(root);
        Self { dir, config }
    }

    /// Three brands and two companies, all valid.
    pub fn standard() -> Self {
        let fixture = Self::empty();
        fixture.brand(
            "acme_cola",
            "name: Acme Cola\ncompany: acme\ntags: [a, b, c]\nwebsite: https://acme.example\nfounded: 1990\n",
        );
        fixture.brand(
            "bolt_water",
            "name: Bolt Water\ncompany: bolt\ntags: []\nstakeholders:\n  - name: Bolt\n    role: owner\n",
        );
        fixture.brand("crisp_chips", "name: Crisp Chips\ncompany: crisp\n");
        fixture.company("acme", "name: Acme Inc\nbrands: [acme_cola]\nlisted: true\n");
        fixture.company("bolt", "name: Bolt Ltd\nlisted: false\n");
        fixture
    }

    /// Runs the JSON export with the fixture's schemas and layout.
    pub fn export_json(&self) -> brand_etl::Result<CombinedCollection> {
        let config = &self.config;
        export_json(
            config.data_dir(Category::Brands),
            &Schema::load(config.schema_path(Category::Brands))?,
            config.data_dir(Category::Companies),
            &Schema::load(config.schema_path(Category::Companies))?,
            &config.output.json,
        )
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn brand(&self, id: &str, yaml: &str) {
        fs::write(self.config.data.brands_dir.join(format!("{id}.yaml")), yaml).unwrap();
    }

    pub fn company(&self, id: &str, yaml: &str) {
        fs::write(self.config.data.companies_dir.join(format!("{id}.yaml")), yaml).unwrap();
    }
}
