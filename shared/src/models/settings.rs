//! App settings (key/value rows of `app_settings`)

use super::field::FieldDescriptor;
use crate::field_config::sanitize::lenient_field_config;
use crate::status::lenient_status_options;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Global field-configuration defaults
pub const SETTINGS_KEY_FIELDS: &str = "order_form_defaults";
/// Global status vocabulary
pub const SETTINGS_KEY_STATUSES: &str = "order_status_options";

/// One `app_settings` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSetting {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

/// Value stored under [`SETTINGS_KEY_FIELDS`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDefaults {
    #[serde(default, deserialize_with = "lenient_field_config")]
    pub field_config: Vec<FieldDescriptor>,
}

/// Value stored under [`SETTINGS_KEY_STATUSES`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusOptions {
    #[serde(default, deserialize_with = "lenient_status_options")]
    pub options: Vec<String>,
}

impl AppSetting {
    pub fn new(key: &str, value: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            key: key.to_string(),
            value: serde_json::to_value(value)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_defaults_tolerate_garbage() {
        let value: FieldDefaults =
            serde_json::from_str(r#"{"field_config":[{"key":""},"x",{"key":"phone"}]}"#).unwrap();
        assert_eq!(value.field_config.len(), 1);
        assert_eq!(value.field_config[0].key, "phone");

        let value: FieldDefaults = serde_json::from_str(r#"{"field_config":null}"#).unwrap();
        assert!(value.field_config.is_empty());
    }

    #[test]
    fn test_status_options_normalized_on_read() {
        let value: StatusOptions =
            serde_json::from_str(r#"{"options":["a"," a","b","","b",3]}"#).unwrap();
        assert_eq!(value.options, vec!["a", "b", "3"]);
    }

    #[test]
    fn test_setting_row() {
        let row = AppSetting::new(
            SETTINGS_KEY_STATUSES,
            StatusOptions {
                options: vec!["已匯款".into()],
            },
        )
        .unwrap();
        assert_eq!(row.value["options"][0], "已匯款");
    }
}
