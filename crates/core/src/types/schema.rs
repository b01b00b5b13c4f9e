//! Settings schemas and validation for section kinds.
//!
//! Every section kind publishes a schema describing the controls its
//! settings panel renders. The same schema drives validation before a
//! store is persisted.

use serde::Serialize;
use serde_json::Value;

use super::kind::SectionKind;
use super::settings::SettingsMap;

/// One configurable field in a section's settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingField {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub control: FieldControl,
}

/// Input control used to edit a field, with its constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum FieldControl {
    /// Single-line text input.
    Text,
    /// Multi-line text input.
    Textarea,
    /// Integer input with optional bounds.
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// Fixed choice between named options.
    Select { options: &'static [SelectOption] },
    /// On/off switch.
    Toggle,
    /// Integer slider with inclusive bounds.
    Range {
        min: i64,
        max: i64,
        step: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<&'static str>,
    },
    /// Color picker, stored as a CSS color string.
    Color,
    /// Image picker, stored as a URL string.
    Image,
    /// Repeatable list of sub-objects, each following `fields`.
    Items { fields: &'static [SettingField] },
}

/// One entry of a [`FieldControl::Select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// A single problem found while validating settings against a schema.
///
/// The `key` is a path into the settings object; list entries use index
/// notation, e.g. `quotes[0].author`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum SettingsViolation {
    #[error("setting `{key}` must be {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("setting `{key}` has unknown option `{value}`")]
    UnknownOption { key: String, value: String },

    #[error("setting `{key}` must be between {min} and {max}")]
    OutOfRange { key: String, min: i64, max: i64 },
}

/// Check settings against the schema for `kind`.
///
/// Only keys present in the settings are checked: missing keys fall back
/// to defaults at render time, and keys the schema does not know are
/// carried through untouched. Returns every violation found, not just the
/// first.
#[must_use]
pub fn validate_settings(kind: SectionKind, settings: &SettingsMap) -> Vec<SettingsViolation> {
    let schema = kind.settings_schema();
    let mut violations = Vec::new();
    for (key, value) in settings.iter() {
        if let Some(field) = schema.iter().find(|field| field.key == key) {
            check_control(key, &field.control, value, &mut violations);
        }
    }
    violations
}

fn check_control(
    path: &str,
    control: &FieldControl,
    value: &Value,
    violations: &mut Vec<SettingsViolation>,
) {
    match control {
        FieldControl::Text | FieldControl::Textarea | FieldControl::Color | FieldControl::Image => {
            if !value.is_string() {
                violations.push(SettingsViolation::WrongType {
                    key: path.to_owned(),
                    expected: "a string",
                });
            }
        }
        FieldControl::Number { min, max } => match value.as_i64() {
            Some(n) => {
                let low = min.unwrap_or(i64::MIN);
                let high = max.unwrap_or(i64::MAX);
                if n < low || n > high {
                    violations.push(SettingsViolation::OutOfRange {
                        key: path.to_owned(),
                        min: low,
                        max: high,
                    });
                }
            }
            None => violations.push(SettingsViolation::WrongType {
                key: path.to_owned(),
                expected: "an integer",
            }),
        },
        FieldControl::Select { options } => match value.as_str() {
            Some(chosen) => {
                if !options.iter().any(|option| option.value == chosen) {
                    violations.push(SettingsViolation::UnknownOption {
                        key: path.to_owned(),
                        value: chosen.to_owned(),
                    });
                }
            }
            None => violations.push(SettingsViolation::WrongType {
                key: path.to_owned(),
                expected: "a string",
            }),
        },
        FieldControl::Toggle => {
            if !value.is_boolean() {
                violations.push(SettingsViolation::WrongType {
                    key: path.to_owned(),
                    expected: "a boolean",
                });
            }
        }
        FieldControl::Range { min, max, .. } => match value.as_i64() {
            Some(n) => {
                if n < *min || n > *max {
                    violations.push(SettingsViolation::OutOfRange {
                        key: path.to_owned(),
                        min: *min,
                        max: *max,
                    });
                }
            }
            None => violations.push(SettingsViolation::WrongType {
                key: path.to_owned(),
                expected: "an integer",
            }),
        },
        FieldControl::Items { fields } => match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    check_item(path, index, fields, item, violations);
                }
            }
            None => violations.push(SettingsViolation::WrongType {
                key: path.to_owned(),
                expected: "a list",
            }),
        },
    }
}

fn check_item(
    path: &str,
    index: usize,
    fields: &[SettingField],
    item: &Value,
    violations: &mut Vec<SettingsViolation>,
) {
    let Some(entries) = item.as_object() else {
        violations.push(SettingsViolation::WrongType {
            key: format!("{path}[{index}]"),
            expected: "an object",
        });
        return;
    };
    for (key, value) in entries {
        if let Some(field) = fields.iter().find(|field| field.key == key) {
            let nested = format!("{path}[{index}].{key}");
            check_control(&nested, &field.control, value, violations);
        }
    }
}
