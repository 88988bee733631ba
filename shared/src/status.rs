//! Order status vocabularies
//!
//! The global list is never empty (it falls back to [`DEFAULT_STATUS_OPTIONS`]).
//! A campaign list may be empty, meaning "inherit the global list".

use crate::error::{AppError, AppResult, ErrorCode};
use crate::field_config::sanitize::scalar_text;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// paid, purchased, arrived, completed
pub const DEFAULT_STATUS_OPTIONS: [&str; 4] = ["已匯款", "已採購", "已到貨", "已完成"];

/// Label given to a freshly added status
pub const NEW_STATUS_LABEL: &str = "新狀態";

pub fn default_status_options() -> Vec<String> {
    DEFAULT_STATUS_OPTIONS.iter().map(|s| s.to_string()).collect()
}

/// Trim, drop empties, drop duplicates keeping the first, preserve order
pub fn normalize<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(|item| {
            let text = item.as_ref().trim();
            (!text.is_empty() && seen.insert(text.to_string())).then(|| text.to_string())
        })
        .collect()
}

/// [`normalize`], substituting the default list when the result is empty
pub fn normalize_global<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let options = normalize(raw);
    if options.is_empty() {
        default_status_options()
    } else {
        options
    }
}

/// Normalize a stored JSON value; anything but an array yields `[]`
pub fn normalize_value(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => normalize(items.iter().filter_map(scalar_text)),
        _ => Vec::new(),
    }
}

/// Campaign list when it has entries, otherwise the global list (or the default)
pub fn resolve_for_campaign(campaign: &[String], global: &[String]) -> Vec<String> {
    let campaign = normalize(campaign);
    if !campaign.is_empty() {
        return campaign;
    }
    normalize_global(global)
}

/// Which list an editor operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusScope {
    Global,
    Campaign,
}

/// One status editor operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StatusEdit {
    Add,
    Rename { index: usize, text: String },
    MoveUp { index: usize },
    MoveDown { index: usize },
    Remove { index: usize },
}

/// Apply an editor operation and re-normalize the result
pub fn apply_status_edit(options: &[String], scope: StatusScope, edit: StatusEdit) -> Vec<String> {
    let mut next = options.to_vec();
    match edit {
        StatusEdit::Add => next.push(NEW_STATUS_LABEL.to_string()),
        StatusEdit::Rename { index, text } => {
            if let Some(slot) = next.get_mut(index) {
                *slot = text;
            }
        }
        StatusEdit::MoveUp { index } => {
            if index > 0 && index < next.len() {
                next.swap(index - 1, index);
            }
        }
        StatusEdit::MoveDown { index } => {
            if index + 1 < next.len() {
                next.swap(index, index + 1);
            }
        }
        StatusEdit::Remove { index } => {
            if index < next.len() {
                next.remove(index);
            }
        }
    }

    match scope {
        StatusScope::Global => normalize_global(next),
        StatusScope::Campaign => normalize(next),
    }
}

/// Normalize a global list for saving; an empty result is rejected
pub fn validate_global_for_save(options: &[String]) -> AppResult<Vec<String>> {
    let options = normalize(options);
    if options.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::StatusOptionsEmpty,
            "至少需要一個全域狀態",
        ));
    }
    Ok(options)
}

/// Value to store in `campaigns.status_options`: `[]` when inheriting
pub fn validate_campaign_for_save(options: &[String], use_global: bool) -> AppResult<Vec<String>> {
    if use_global {
        return Ok(Vec::new());
    }
    let options = normalize(options);
    if options.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::StatusOptionsEmpty,
            "活動自訂狀態至少需要一項",
        ));
    }
    Ok(options)
}

/// serde adapter: lenient `status_options` column / setting value
pub fn lenient_status_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_value(&Value::deserialize(deserializer)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(["a", " a", "b", "", "b"]), list(&["a", "b"]));
        assert!(normalize(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_normalize_global_defaults() {
        assert_eq!(normalize_global(Vec::<&str>::new()), default_status_options());
        assert_eq!(normalize_global(["  ", ""]).len(), 4);
        assert_eq!(normalize_global(["x"]), list(&["x"]));
    }

    #[test]
    fn test_normalize_value() {
        assert_eq!(normalize_value(&json!(["a", 1, null, "a"])), list(&["a", "1"]));
        assert!(normalize_value(&json!("a")).is_empty());
    }

    #[test]
    fn test_resolve_for_campaign() {
        let global = list(&["g1", "g2"]);
        assert_eq!(resolve_for_campaign(&list(&["c1"]), &global), list(&["c1"]));
        assert_eq!(resolve_for_campaign(&list(&[" "]), &global), global);
        assert_eq!(resolve_for_campaign(&[], &[]), default_status_options());
    }

    #[test]
    fn test_editor_operations() {
        let base = list(&["a", "b", "c"]);
        let scope = StatusScope::Campaign;

        assert_eq!(
            apply_status_edit(&base, scope, StatusEdit::Add),
            list(&["a", "b", "c", "新狀態"])
        );
        assert_eq!(
            apply_status_edit(&base, scope, StatusEdit::MoveUp { index: 2 }),
            list(&["a", "c", "b"])
        );
        assert_eq!(
            apply_status_edit(&base, scope, StatusEdit::MoveDown { index: 2 }),
            base
        );
        assert_eq!(
            apply_status_edit(&base, scope, StatusEdit::Remove { index: 0 }),
            list(&["b", "c"])
        );
        assert_eq!(
            apply_status_edit(
                &base,
                scope,
                StatusEdit::Rename {
                    index: 1,
                    text: "a".into()
                }
            ),
            list(&["a", "c"])
        );
    }

    #[test]
    fn test_global_editor_never_empties() {
        let result = apply_status_edit(&list(&["a"]), StatusScope::Global, StatusEdit::Remove {
            index: 0,
        });
        assert_eq!(result, default_status_options());

        let result = apply_status_edit(&list(&["a"]), StatusScope::Campaign, StatusEdit::Remove {
            index: 0,
        });
        assert!(result.is_empty());
    }

    #[test]
    fn test_save_validation() {
        let err = validate_global_for_save(&list(&[" "])).unwrap_err();
        assert_eq!(err.message, "至少需要一個全域狀態");
        assert_eq!(err.code, ErrorCode::StatusOptionsEmpty);

        let err = validate_campaign_for_save(&[], false).unwrap_err();
        assert_eq!(err.message, "活動自訂狀態至少需要一項");

        assert!(validate_campaign_for_save(&list(&["x"]), true).unwrap().is_empty());
        assert_eq!(
            validate_campaign_for_save(&list(&["x", "x "]), false).unwrap(),
            list(&["x"])
        );
    }

    #[test]
    fn test_edit_wire_shape() {
        let edit: StatusEdit =
            serde_json::from_str(r#"{"action":"rename","index":0,"text":"已出貨"}"#).unwrap();
        assert_eq!(
            edit,
            StatusEdit::Rename {
                index: 0,
                text: "已出貨".into()
            }
        );
    }
}
