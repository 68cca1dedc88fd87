//! Record schemas.
//!
//! Schemas are JSON Schema documents authored in YAML. The declared order of
//! `properties` is kept because it drives the CSV column order.

use crate::error::{EtlError, Result};
use crate::loader;
use crate::types::{Record, Value};
use jsonschema::JSONSchema;
use std::fmt;
use std::path::Path;

/// A single constraint violation found in a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// JSON Pointer to the offending field (empty for the record root).
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed, e.g. `/required`.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {} [{}]", self.message, self.schema_path)
        } else {
            write!(
                f,
                "{}: {} [{}]",
                self.instance_path, self.message, self.schema_path
            )
        }
    }
}

/// All violations found in one record. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A loaded and compiled record schema.
pub struct Schema {
    name: String,
    document: Record,
    compiled: JSONSchema,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .finish()
    }
}

impl Schema {
    pub fn load(path: &Path) -> Result<Self> {
        let name = path.display().to_string();
        match loader::read_document(path)? {
            Value::Mapping(document) => Self::from_document(name, document),
            _ => Err(EtlError::Schema {
                name,
                reason: "top-level document must be a mapping".to_string(),
            }),
        }
    }

    pub fn from_document(name: impl Into<String>, document: Record) -> Result<Self> {
        let name = name.into();
        let json = serde_json::to_value(&document)?;
        let compiled = JSONSchema::options()
            .compile(&json)
            .map_err(|e| EtlError::Schema {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            name,
            document,
            compiled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names under `properties`, in declared order.
    pub fn field_names(&self) -> Vec<&str> {
        match self.document.get("properties") {
            Some(Value::Mapping(props)) => props.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Names listed under `required`.
    pub fn required_fields(&self) -> Vec<&str> {
        match self.document.get("required") {
            Some(Value::Sequence(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Checks a record against the schema, returning every violation found.
    pub fn validate(&self, record: &Record) -> std::result::Result<(), Violations> {
        let instance = match serde_json::to_value(record) {
            Ok(instance) => instance,
            Err(e) => {
                return Err(Violations(vec![Violation {
                    instance_path: String::new(),
                    schema_path: String::new(),
                    message: format!("record is not representable as JSON: {e}"),
                }]))
            }
        };

        // Bound to a local so the error iterator is dropped before `instance`.
        let result = match self.compiled.validate(&instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(Violations(
                errors
                    .map(|error| Violation {
                        instance_path: error.instance_path.to_string(),
                        schema_path: error.schema_path.to_string(),
                        message: error.to_string(),
                    })
                    .collect(),
            )),
        };
        result
    }

    pub fn is_valid(&self, record: &Record) -> bool {
        self.validate(record).is_ok()
    }
}
