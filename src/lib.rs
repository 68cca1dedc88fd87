pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod exporters;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod types;
pub mod validation;

pub use config::Config;
pub use error::{EtlError, Result};
pub use pipeline::{Pipeline, PipelineResult};
pub use report::{BatchReport, TracingReporter, ValidationReporter};
pub use schema::{Schema, Violation, Violations};
pub use types::{Category, CategoryCollection, CombinedCollection, Record, Value};
pub use validation::{validate_batch, validate_categories, ValidationOutcome};
