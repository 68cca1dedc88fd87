use crate::constants;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A single record: field name to value, in source order.
pub type Record = IndexMap<String, Value>;

/// Record id to record, for one category.
pub type CategoryCollection = IndexMap<String, Record>;

/// Category label to its collection. Brands are inserted before companies.
pub type CombinedCollection = IndexMap<String, CategoryCollection>;

/// A loosely typed record value.
///
/// Every record file is converted into this shape once at load time, so the
/// normalizer and the exporters can match on it exhaustively instead of
/// carrying YAML-specific types around.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(IndexMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Plain-text rendering used for flat cells and list elements.
    ///
    /// Null renders empty, sequences are joined with `", "`, and mappings
    /// render as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Sequence(items) => items
                .iter()
                .map(Value::to_text)
                .collect::<Vec<_>>()
                .join(constants::LIST_SEPARATOR),
            Value::Mapping(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;

        match value {
            Yaml::Null => Value::Null,
            Yaml::Bool(b) => Value::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Yaml::String(s) => Value::String(s),
            Yaml::Sequence(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            Yaml::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key_to_string(k), Value::from(v)))
                    .collect(),
            ),
            Yaml::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

// YAML allows non-string keys; records are keyed by strings only.
fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => items.serialize(serializer),
            Value::Mapping(map) => map.serialize(serializer),
        }
    }
}

/// The two record classes handled by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Brands,
    Companies,
}

impl Category {
    /// Processing order: brands first, then companies.
    pub const ALL: [Category; 2] = [Category::Brands, Category::Companies];

    pub fn label(self) -> &'static str {
        match self {
            Category::Brands => constants::BRANDS,
            Category::Companies => constants::COMPANIES,
        }
    }

    pub fn sheet_name(self) -> &'static str {
        match self {
            Category::Brands => constants::BRANDS_SHEET,
            Category::Companies => constants::COMPANIES_SHEET,
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_values_convert_exhaustively() {
        let yaml: serde_yaml::Value = serde_yaml::from_str(
            r#"
name: Acme
founded: 1999
rating: 4.5
active: true
parent: ~
tags: [a, b]
hq:
  city: Riyadh
1: numeric key
"#,
        )
        .unwrap();

        let Value::Mapping(map) = Value::from(yaml) else {
            panic!("expected mapping");
        };

        assert_eq!(map["name"], Value::from("Acme"));
        assert_eq!(map["founded"], Value::Integer(1999));
        assert_eq!(map["rating"], Value::Float(4.5));
        assert_eq!(map["active"], Value::Bool(true));
        assert!(map["parent"].is_null());
        assert_eq!(
            map["tags"],
            Value::Sequence(vec![Value::from("a"), Value::from("b")])
        );
        assert!(matches!(map["hq"], Value::Mapping(_)));
        assert_eq!(map["1"], Value::from("numeric key"));

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys[0], "name");
        assert_eq!(keys[6], "hq");
    }

    #[test]
    fn text_rendering_flattens_nested_values() {
        let value = Value::Sequence(vec![
            Value::from("a"),
            Value::Integer(2),
            Value::Bool(false),
        ]);
        assert_eq!(value.to_text(), "a, 2, false");

        let mut inner = IndexMap::new();
        inner.insert("city".to_string(), Value::from("Jeddah"));
        assert_eq!(Value::Mapping(inner).to_text(), r#"{"city":"Jeddah"}"#);
        assert_eq!(Value::Null.to_text(), "");
    }

    #[test]
    fn null_serializes_as_json_null() {
        let mut record = Record::new();
        record.insert("parent".to_string(), Value::Null);
        record.insert("name".to_string(), Value::from("Acme"));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"parent":null,"name":"Acme"}"#);
    }
}
