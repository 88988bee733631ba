//! Built-in order fields

use crate::models::{FieldDescriptor, FieldType, TRANSACTION_METHODS};

/// Keys whose `required`/`visible` flags are pinned to true
pub const PROTECTED_KEYS: [&str; 7] = [
    "customer_name",
    "phone",
    "email",
    "quantity",
    "transfer_account",
    "transfer_time",
    "transaction_method",
];

/// The seven fixed order columns, in canonical order
pub const FIXED_VALUE_KEYS: [&str; 7] = PROTECTED_KEYS;

pub const NOTE_KEY: &str = "note";

pub fn is_protected(key: &str) -> bool {
    PROTECTED_KEYS.contains(&key)
}

/// Force `required`/`visible` for protected keys
pub fn pin_protected(field: &mut FieldDescriptor) {
    if is_protected(&field.key) {
        field.required = true;
        field.visible = true;
    }
}

/// The hard-coded fixed catalog, in canonical order
pub fn base_catalog() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::fixed("customer_name", "姓名", FieldType::Text, true),
        FieldDescriptor::fixed("phone", "手機", FieldType::Tel, true)
            .with_placeholder("例如 0912345678"),
        FieldDescriptor::fixed("email", "Email", FieldType::Email, true),
        FieldDescriptor::fixed("quantity", "數量", FieldType::Number, true),
        FieldDescriptor::fixed("transfer_account", "匯款帳號", FieldType::Text, true)
            .with_placeholder("例如 12345 或 完整帳號"),
        FieldDescriptor::fixed("transfer_time", "匯款時間", FieldType::DatetimeLocal, true),
        FieldDescriptor::fixed("transaction_method", "交易方式", FieldType::Select, true)
            .with_options(&TRANSACTION_METHODS),
        FieldDescriptor::fixed(NOTE_KEY, "備註", FieldType::Textarea, false)
            .with_placeholder("可留空"),
    ]
}

/// Catalog label for a fixed key
pub fn base_label(key: &str) -> Option<&'static str> {
    match key {
        "customer_name" => Some("姓名"),
        "phone" => Some("手機"),
        "email" => Some("Email"),
        "quantity" => Some("數量"),
        "transfer_account" => Some("匯款帳號"),
        "transfer_time" => Some("匯款時間"),
        "transaction_method" => Some("交易方式"),
        NOTE_KEY => Some("備註"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        let catalog = base_catalog();
        assert_eq!(catalog.len(), 8);
        assert!(catalog.iter().all(|f| f.visible && !f.is_custom()));
        assert!(catalog
            .iter()
            .filter(|f| is_protected(&f.key))
            .all(|f| f.required));

        let note = catalog.last().unwrap();
        assert_eq!(note.key, "note");
        assert!(!note.required);

        let method = catalog.iter().find(|f| f.key == "transaction_method").unwrap();
        assert_eq!(method.options, vec!["面交", "賣貨便"]);
    }

    #[test]
    fn test_labels_match_catalog() {
        for field in base_catalog() {
            assert_eq!(base_label(&field.key), Some(field.label.as_str()));
        }
        assert_eq!(base_label("size"), None);
    }

    #[test]
    fn test_pin_protected() {
        let mut field = FieldDescriptor::fixed("phone", "手機", FieldType::Tel, false);
        field.visible = false;
        pin_protected(&mut field);
        assert!(field.required && field.visible);

        let mut note = FieldDescriptor::fixed("note", "備註", FieldType::Textarea, false);
        note.visible = false;
        pin_protected(&mut note);
        assert!(!note.visible);
    }
}
