use crate::types::Value;

/// Flattens a value for flat tabular output.
///
/// Sequences become a single string of their elements joined with `", "`.
/// Everything else is returned unchanged. Lossy; only the CSV path uses it.
pub fn clean_value(value: &Value) -> Value {
    match value {
        Value::Sequence(_) => Value::String(value.to_text()),
        other => other.clone(),
    }
}

/// Renders a value as the text of one CSV cell.
pub fn render_cell(value: &Value) -> String {
    clean_value(value).to_text()
}
