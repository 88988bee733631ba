//! Admin field editor operations

use super::catalog::pin_protected;
use crate::models::FieldDescriptor;
use serde::{Deserialize, Serialize};

/// One edit applied to a field list at an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum FieldEdit {
    MoveUp,
    MoveDown,
    SetLabel(String),
    SetPlaceholder(String),
    SetRequired(bool),
    SetVisible(bool),
}

/// Move the entry at `index` by `delta`; out-of-range moves leave the list as is
pub fn move_field(fields: &mut [FieldDescriptor], index: usize, delta: isize) -> bool {
    let Some(target) = index.checked_add_signed(delta) else {
        return false;
    };
    if index >= fields.len() || target >= fields.len() {
        return false;
    }
    fields.swap(index, target);
    true
}

/// Apply `edit` to the entry at `index`. Returns false when nothing changed.
pub fn apply_field_edit(fields: &mut [FieldDescriptor], index: usize, edit: FieldEdit) -> bool {
    if index >= fields.len() {
        return false;
    }

    match edit {
        FieldEdit::MoveUp => return move_field(fields, index, -1),
        FieldEdit::MoveDown => return move_field(fields, index, 1),
        _ => {}
    }

    let before = fields[index].clone();
    let field = &mut fields[index];
    match edit {
        FieldEdit::SetLabel(label) => {
            let label = label.trim();
            field.label = if label.is_empty() {
                field.key.clone()
            } else {
                label.to_string()
            };
        }
        FieldEdit::SetPlaceholder(placeholder) => field.placeholder = placeholder,
        FieldEdit::SetRequired(required) => field.required = required,
        FieldEdit::SetVisible(visible) => field.visible = visible,
        FieldEdit::MoveUp | FieldEdit::MoveDown => {}
    }
    pin_protected(field);
    *field != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_config::catalog::base_catalog;

    fn keys(fields: &[FieldDescriptor]) -> Vec<&str> {
        fields.iter().map(|f| f.key.as_str()).collect()
    }

    #[test]
    fn test_move_up_and_down() {
        let mut fields = base_catalog();
        assert!(apply_field_edit(&mut fields, 1, FieldEdit::MoveUp));
        assert_eq!(&keys(&fields)[..2], &["phone", "customer_name"]);

        assert!(apply_field_edit(&mut fields, 0, FieldEdit::MoveDown));
        assert_eq!(&keys(&fields)[..2], &["customer_name", "phone"]);
    }

    #[test]
    fn test_out_of_range_moves_are_noops() {
        let mut fields = base_catalog();
        let original = fields.clone();
        assert!(!apply_field_edit(&mut fields, 0, FieldEdit::MoveUp));
        assert!(!apply_field_edit(&mut fields, 7, FieldEdit::MoveDown));
        assert!(!apply_field_edit(&mut fields, 42, FieldEdit::SetVisible(false)));
        assert_eq!(fields, original);
    }

    #[test]
    fn test_label_blank_falls_back_to_key() {
        let mut fields = base_catalog();
        apply_field_edit(&mut fields, 7, FieldEdit::SetLabel("  ".into()));
        assert_eq!(fields[7].label, "note");
        apply_field_edit(&mut fields, 7, FieldEdit::SetLabel(" 留言 ".into()));
        assert_eq!(fields[7].label, "留言");
    }

    #[test]
    fn test_protected_edits_are_repinned() {
        let mut fields = base_catalog();
        assert!(!apply_field_edit(&mut fields, 0, FieldEdit::SetVisible(false)));
        assert!(!apply_field_edit(&mut fields, 0, FieldEdit::SetRequired(false)));
        assert!(fields[0].visible && fields[0].required);

        assert!(apply_field_edit(&mut fields, 7, FieldEdit::SetRequired(true)));
        assert!(fields[7].required);
    }

    #[test]
    fn test_edit_wire_shape() {
        let edit: FieldEdit =
            serde_json::from_str(r#"{"action":"set_label","value":"姓名"}"#).unwrap();
        assert_eq!(edit, FieldEdit::SetLabel("姓名".into()));
        let edit: FieldEdit = serde_json::from_str(r#"{"action":"move_up"}"#).unwrap();
        assert_eq!(edit, FieldEdit::MoveUp);
    }
}
