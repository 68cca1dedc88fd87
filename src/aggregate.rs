use crate::constants;
use crate::error::Result;
use crate::loader::{read_record, record_files, record_id};
use crate::schema::Schema;
use crate::types::{Category, CategoryCollection, CombinedCollection, Record, Value};
use std::path::Path;
use tracing::{debug, info};

/// Loads every record file in `dir` into a collection keyed by record id.
///
/// Each record gets an `id` field holding its id, placed first. An `id`
/// written in the file itself is replaced.
pub fn load_category(dir: &Path, category: Category) -> Result<CategoryCollection> {
    let mut collection = CategoryCollection::new();
    for path in record_files(dir)? {
        let id = record_id(&path);
        let record = read_record(&path)?;
        debug!(category = %category, record = %id, "Loaded {}", path.display());
        collection.insert(id.clone(), with_id(id, record));
    }

    metrics::counter!("brand_etl_records_loaded_total", "category" => category.label())
        .increment(collection.len() as u64);
    info!("Loaded {} {} from {}", collection.len(), category, dir.display());
    Ok(collection)
}

/// Loads a category and wraps it under its label.
pub fn aggregate_category(dir: &Path, category: Category) -> Result<CombinedCollection> {
    Ok(wrap(category, load_category(dir, category)?))
}

/// Like [`aggregate_category`], but every record also carries each field
/// `schema` declares. Fields missing from the source file are null.
pub fn aggregate_declared(
    dir: &Path,
    category: Category,
    schema: &Schema,
) -> Result<CombinedCollection> {
    let mut collection = load_category(dir, category)?;
    let declared = schema.field_names();
    for record in collection.values_mut() {
        for field in &declared {
            if !record.contains_key(*field) {
                record.insert(field.to_string(), Value::Null);
            }
        }
    }
    Ok(wrap(category, collection))
}

fn wrap(category: Category, collection: CategoryCollection) -> CombinedCollection {
    let mut wrapped = CombinedCollection::new();
    wrapped.insert(category.label().to_string(), collection);
    wrapped
}

/// Merges per-category collections; `second`'s keys are added after `first`'s.
pub fn combine(first: CombinedCollection, second: CombinedCollection) -> CombinedCollection {
    let mut combined = first;
    combined.extend(second);
    combined
}

fn with_id(id: String, record: Record) -> Record {
    let mut enriched = Record::with_capacity(record.len() + 1);
    enriched.insert(constants::ID_FIELD.to_string(), Value::String(id));
    enriched.extend(
        record
            .into_iter()
            .filter(|(key, _)| key != constants::ID_FIELD),
    );
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn records_are_keyed_and_tagged_by_filename() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b_brand.yaml"), "name: B\nid: stale\n").unwrap();
        fs::write(dir.path().join("a_brand.yaml"), "name: A\n").unwrap();

        let wrapped = aggregate_category(dir.path(), Category::Brands).unwrap();
        assert_eq!(wrapped.len(), 1);
        let brands = &wrapped["brands"];

        let ids: Vec<&str> = brands.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["a_brand", "b_brand"]);

        let b = &brands["b_brand"];
        assert_eq!(b.get_index(0).unwrap().0, "id");
        assert_eq!(b["id"], Value::from("b_brand"));
        assert_eq!(b["name"], Value::from("B"));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn declared_fields_missing_from_the_file_are_null() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lean.yaml"), "name: Lean\n").unwrap();
        let schema_dir = tempdir().unwrap();
        let schema_path = schema_dir.path().join("brand_schema.yaml");
        fs::write(
            &schema_path,
            "properties:\n  name: { type: string }\n  website: { type: string }\n",
        )
        .unwrap();
        let schema = Schema::load(&schema_path).unwrap();

        let wrapped = aggregate_declared(dir.path(), Category::Brands, &schema).unwrap();
        let lean = &wrapped["brands"]["lean"];
        let keys: Vec<&str> = lean.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "website"]);
        assert!(lean["website"].is_null());
        assert_eq!(lean["name"], Value::from("Lean"));
    }

    #[test]
    fn combine_keeps_category_order() {
        let brands_dir = tempdir().unwrap();
        let companies_dir = tempdir().unwrap();
        fs::write(brands_dir.path().join("x.yaml"), "name: X\n").unwrap();
        fs::write(companies_dir.path().join("y.yaml"), "name: Y\n").unwrap();

        let combined = combine(
            aggregate_category(brands_dir.path(), Category::Brands).unwrap(),
            aggregate_category(companies_dir.path(), Category::Companies).unwrap(),
        );
        let labels: Vec<&str> = combined.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["brands", "companies"]);
        assert!(combined["companies"].contains_key("y"));
    }
}
