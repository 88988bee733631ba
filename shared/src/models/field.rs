//! Form field models
//!
//! [`FieldDescriptor`] is one orderable entry of a resolved form.
//! [`CustomField`] is the validated campaign-specific field spec; it crosses
//! the wire in the flat `{key,label,type,required,options}` shape but is only
//! constructed through [`CustomField::try_from`], so an unknown `type` never
//! reaches the merge engine.

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    #[default]
    Text,
    Tel,
    Email,
    Number,
    Textarea,
    Select,
    DatetimeLocal,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Tel => "tel",
            Self::Email => "email",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::DatetimeLocal => "datetime-local",
        }
    }

    /// Parse a type name; `None` for anything outside the enumeration
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "text" => Some(Self::Text),
            "tel" => Some(Self::Tel),
            "email" => Some(Self::Email),
            "number" => Some(Self::Number),
            "textarea" => Some(Self::Textarea),
            "select" => Some(Self::Select),
            "datetime-local" => Some(Self::DatetimeLocal),
            _ => None,
        }
    }
}

/// Where a field is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    #[default]
    Fixed,
    Custom,
}

/// One entry of a resolved form configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub source: FieldSource,
}

fn default_visible() -> bool {
    true
}

impl FieldDescriptor {
    /// Fixed-field descriptor, visible, no placeholder or options
    pub fn fixed(key: &str, label: &str, field_type: FieldType, required: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            required,
            visible: true,
            placeholder: String::new(),
            options: Vec::new(),
            source: FieldSource::Fixed,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn is_custom(&self) -> bool {
        self.source == FieldSource::Custom
    }

    /// Trim key/label/options; `None` when the key is blank.
    ///
    /// A blank label falls back to the key.
    pub fn normalized(mut self) -> Option<Self> {
        let key = self.key.trim();
        if key.is_empty() {
            return None;
        }
        self.key = key.to_string();
        let label = self.label.trim();
        self.label = if label.is_empty() {
            self.key.clone()
        } else {
            label.to_string()
        };
        self.options = clean_options(self.options.iter().map(String::as_str));
        Some(self)
    }
}

/// Shape of a custom field definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Textarea,
    Select { options: Vec<String> },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text => FieldType::Text,
            Self::Number => FieldType::Number,
            Self::Textarea => FieldType::Textarea,
            Self::Select { .. } => FieldType::Select,
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            Self::Select { options } => options,
            _ => &[],
        }
    }
}

/// Why a custom field definition was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldSpecError {
    #[error("custom field #{index} has an empty key")]
    EmptyKey { index: usize },

    #[error("custom field '{key}' has unsupported type '{field_type}'")]
    UnsupportedType { key: String, field_type: String },

    #[error("custom field #{index} is not an object")]
    NotAnObject { index: usize },

    #[error("custom field key '{key}' is defined twice")]
    DuplicateKey { key: String },

    #[error("custom fields must be a JSON array")]
    NotAnArray,

    #[error("自訂欄位 JSON 格式錯誤")]
    Malformed,
}

impl From<FieldSpecError> for AppError {
    fn from(err: FieldSpecError) -> Self {
        let code = match err {
            FieldSpecError::Malformed | FieldSpecError::NotAnArray => {
                ErrorCode::CustomFieldsMalformed
            }
            _ => ErrorCode::CustomFieldInvalid,
        };
        AppError::with_message(code, err.to_string()).with_detail("field", "custom_fields")
    }
}

/// Validated campaign-specific field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CustomFieldRecord", try_from = "CustomFieldRecord")]
pub struct CustomField {
    pub key: String,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl CustomField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            required: false,
            kind,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    /// Descriptor used when the field has no stored configuration yet
    pub fn to_descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            key: self.key.clone(),
            label: self.label.clone(),
            field_type: self.kind.field_type(),
            required: self.required,
            visible: true,
            placeholder: String::new(),
            options: self.kind.options().to_vec(),
            source: FieldSource::Custom,
        }
    }
}

/// Wire shape of a custom field (`campaigns.custom_fields` entries)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomFieldRecord {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

impl From<CustomField> for CustomFieldRecord {
    fn from(field: CustomField) -> Self {
        Self {
            field_type: field.kind.field_type().as_str().to_string(),
            options: field.kind.options().to_vec(),
            key: field.key,
            label: field.label,
            required: field.required,
        }
    }
}

impl TryFrom<CustomFieldRecord> for CustomField {
    type Error = FieldSpecError;

    fn try_from(record: CustomFieldRecord) -> Result<Self, Self::Error> {
        let key = record.key.trim().to_string();
        if key.is_empty() {
            return Err(FieldSpecError::EmptyKey { index: 0 });
        }

        let type_name = record.field_type.trim();
        let kind = match type_name {
            "" | "text" => FieldKind::Text,
            "number" => FieldKind::Number,
            "textarea" => FieldKind::Textarea,
            // Empty option lists are tolerated; the renderer shows a placeholder option
            "select" => FieldKind::Select {
                options: clean_options(record.options.iter().map(String::as_str)),
            },
            other => {
                return Err(FieldSpecError::UnsupportedType {
                    key,
                    field_type: other.to_string(),
                });
            }
        };

        let label = record.label.trim();
        Ok(Self {
            label: if label.is_empty() {
                key.clone()
            } else {
                label.to_string()
            },
            key,
            required: record.required,
            kind,
        })
    }
}

/// Trimmed, non-empty option strings in order
pub fn clean_options<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
