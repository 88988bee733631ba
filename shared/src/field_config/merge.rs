//! Field configuration merge
//!
//! Combines a stored snapshot (ordering, labels, flags) with the authoritative
//! definitions of the fixed catalog and the campaign's custom fields:
//!
//! 1. stored entries whose key is still defined, in stored order, keeping the
//!    defining side's `type`/`options`/`source` and the snapshot's
//!    `label`/`required`/`visible`/`placeholder`
//! 2. fixed entries the snapshot did not mention, in catalog order
//! 3. custom entries the snapshot did not mention, in campaign order
//!
//! Protected keys come out required and visible. The merge never fails.

use super::catalog::{base_catalog, pin_protected};
use crate::models::{CustomField, FieldDescriptor, FieldSource};
use std::collections::{HashMap, HashSet};

/// Normalize and de-duplicate (first wins) a descriptor list
fn prepare(
    fields: impl IntoIterator<Item = FieldDescriptor>,
    source: Option<FieldSource>,
) -> Vec<FieldDescriptor> {
    let mut seen = HashSet::new();
    fields
        .into_iter()
        .filter_map(FieldDescriptor::normalized)
        .filter(|f| seen.insert(f.key.clone()))
        .map(|mut f| {
            if let Some(source) = source {
                f.source = source;
            }
            f
        })
        .collect()
}

/// Merge a stored snapshot with the fixed catalog and custom fields
pub fn merge(
    stored: &[FieldDescriptor],
    fixed: &[FieldDescriptor],
    custom: &[CustomField],
) -> Vec<FieldDescriptor> {
    let fixed = prepare(fixed.iter().cloned(), Some(FieldSource::Fixed));
    let custom = prepare(
        custom.iter().map(CustomField::to_descriptor),
        Some(FieldSource::Custom),
    );

    let fixed_map: HashMap<&str, &FieldDescriptor> =
        fixed.iter().map(|f| (f.key.as_str(), f)).collect();
    let custom_map: HashMap<&str, &FieldDescriptor> =
        custom.iter().map(|f| (f.key.as_str(), f)).collect();

    let mut result = Vec::with_capacity(fixed.len() + custom.len());
    let mut used: HashSet<String> = HashSet::new();

    for entry in stored.iter().cloned().filter_map(FieldDescriptor::normalized) {
        if used.contains(&entry.key) {
            continue;
        }
        // Fixed wins when both sides define the key
        let Some(defining) = fixed_map
            .get(entry.key.as_str())
            .or_else(|| custom_map.get(entry.key.as_str()))
        else {
            continue;
        };

        let mut merged = FieldDescriptor {
            key: defining.key.clone(),
            field_type: defining.field_type,
            options: defining.options.clone(),
            source: defining.source,
            label: entry.label,
            required: entry.required,
            visible: entry.visible,
            placeholder: entry.placeholder,
        };
        pin_protected(&mut merged);
        used.insert(merged.key.clone());
        result.push(merged);
    }

    for field in fixed.iter().chain(custom.iter()) {
        if !used.insert(field.key.clone()) {
            continue;
        }
        let mut field = field.clone();
        pin_protected(&mut field);
        result.push(field);
    }

    result
}

/// Global defaults: the stored `order_form_defaults` merged over the base catalog
pub fn global_defaults(stored: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    merge(stored, &base_catalog(), &[])
}

/// Entries the public form renders
pub fn visible_fields(config: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    config.iter().filter(|f| f.visible).cloned().collect()
}

/// `key → label` from a merged configuration, custom labels as fallback
pub fn label_map(config: &[FieldDescriptor], custom: &[CustomField]) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::new();
    for field in config {
        let label = if field.label.is_empty() {
            field.key.clone()
        } else {
            field.label.clone()
        };
        map.entry(field.key.clone()).or_insert(label);
    }
    for field in custom {
        map.entry(field.key.clone()).or_insert_with(|| {
            if field.label.is_empty() {
                field.key.clone()
            } else {
                field.label.clone()
            }
        });
    }
    map
}
