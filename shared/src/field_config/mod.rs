//! Dynamic form configuration
//!
//! - [`catalog`]: built-in fields and protected keys
//! - [`sanitize`]: stored/admin JSON → typed definitions
//! - [`merge`]: snapshot + fixed catalog + custom fields → ordered field list
//! - [`editor`]: admin reorder/relabel/toggle operations

pub mod catalog;
pub mod editor;
pub mod merge;
pub mod sanitize;

pub use catalog::{
    FIXED_VALUE_KEYS, NOTE_KEY, PROTECTED_KEYS, base_catalog, base_label, is_protected,
    pin_protected,
};
pub use editor::{FieldEdit, apply_field_edit, move_field};
pub use merge::{global_defaults, label_map, merge, visible_fields};
pub use sanitize::{
    custom_fields_from_value, parse_custom_fields, read_custom_fields, sanitize_field_config,
};
