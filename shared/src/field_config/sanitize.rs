//! Turning stored or admin-typed JSON into typed field definitions
//!
//! Stored snapshots are read leniently: entries that are not objects or have
//! a blank key are dropped, scalars are coerced. Admin-typed custom field
//! JSON goes through [`parse_custom_fields`], which rejects instead.

use crate::models::{
    CustomField, CustomFieldRecord, FieldDescriptor, FieldSource, FieldSpecError, FieldType,
};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Loose truthiness used for flags written by older front ends
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a scalar; `None` for null, arrays and objects
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_field(entry: &Map<String, Value>, name: &str) -> Option<String> {
    entry.get(name).and_then(scalar_text)
}

fn options_field(entry: &Map<String, Value>) -> Vec<String> {
    match entry.get("options") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn entry_key(entry: &Map<String, Value>) -> Option<String> {
    let key = text_field(entry, "key")?;
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

fn entry_label(entry: &Map<String, Value>, key: &str) -> String {
    text_field(entry, "label")
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| key.to_string())
}

/// Sanitize one stored descriptor
pub fn sanitize_entry(value: &Value) -> Option<FieldDescriptor> {
    let entry = value.as_object()?;
    let key = entry_key(entry)?;

    let field_type = text_field(entry, "type")
        .and_then(|t| FieldType::parse(&t))
        .unwrap_or_default();
    let visible = match entry.get("visible") {
        None => true,
        Some(v) => truthy(v),
    };
    let source = match entry.get("source").and_then(Value::as_str) {
        Some("custom") => FieldSource::Custom,
        _ => FieldSource::Fixed,
    };

    Some(FieldDescriptor {
        label: entry_label(entry, &key),
        field_type,
        required: entry.get("required").is_some_and(truthy),
        visible,
        placeholder: text_field(entry, "placeholder").unwrap_or_default(),
        options: options_field(entry),
        source,
        key,
    })
}

/// Sanitize a stored field configuration; anything but an array yields `[]`
pub fn sanitize_field_config(raw: &Value) -> Vec<FieldDescriptor> {
    match raw {
        Value::Array(items) => items.iter().filter_map(sanitize_entry).collect(),
        _ => Vec::new(),
    }
}

fn custom_record(entry: &Map<String, Value>, key: String) -> CustomFieldRecord {
    CustomFieldRecord {
        label: entry_label(entry, &key),
        field_type: text_field(entry, "type")
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| "text".to_string()),
        required: entry.get("required").is_some_and(truthy),
        options: options_field(entry),
        key,
    }
}

/// Strictly validate a JSON array of custom field definitions
pub fn custom_fields_from_value(raw: &Value) -> Result<Vec<CustomField>, FieldSpecError> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        _ => return Err(FieldSpecError::NotAnArray),
    };

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let entry = item
            .as_object()
            .ok_or(FieldSpecError::NotAnObject { index })?;
        let key = entry_key(entry).ok_or(FieldSpecError::EmptyKey { index })?;
        if !seen.insert(key.clone()) {
            return Err(FieldSpecError::DuplicateKey { key });
        }
        fields.push(CustomField::try_from(custom_record(entry, key))?);
    }
    Ok(fields)
}

/// Parse admin-typed custom field JSON; blank text means "no custom fields"
pub fn parse_custom_fields(text: &str) -> Result<Vec<CustomField>, FieldSpecError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(text).map_err(|_| FieldSpecError::Malformed)?;
    custom_fields_from_value(&value)
}

/// Read stored custom fields, dropping entries that fail validation
pub fn read_custom_fields(raw: &Value) -> Vec<CustomField> {
    let Value::Array(items) = raw else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let entry = item.as_object()?;
            let key = entry_key(entry)?;
            match CustomField::try_from(custom_record(entry, key)) {
                Ok(field) if seen.insert(field.key.clone()) => Some(field),
                Ok(field) => {
                    tracing::warn!(key = %field.key, "Dropping duplicate stored custom field");
                    None
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "Dropping invalid stored custom field");
                    None
                }
            }
        })
        .collect()
}

/// serde adapter: lenient `field_config` column
pub fn lenient_field_config<'de, D>(deserializer: D) -> Result<Vec<FieldDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(sanitize_field_config(&Value::deserialize(deserializer)?))
}

/// serde adapter: lenient `custom_fields` column
pub fn lenient_custom_fields<'de, D>(deserializer: D) -> Result<Vec<CustomField>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(read_custom_fields(&Value::deserialize(deserializer)?))
}
