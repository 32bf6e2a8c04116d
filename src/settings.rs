//! The generic key/value store shape generators persist through.
//!
//! A [`ShapeSettings`] is a type tag plus a flat parameter map. Generators
//! read the keys they know, ignore the rest, and fall back to documented
//! defaults for missing ones, so a design saved by a newer library version
//! still loads in an older one with best-effort fidelity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single parameter value: number, boolean or string.
///
/// Numbers serialize through `serde_json::Number`, which always uses the
/// canonical dot-decimal representation. Exported designs are therefore
/// identical regardless of the process locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SettingsValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            SettingsValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingsValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingsValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for SettingsValue {
    fn from(v: f64) -> Self {
        SettingsValue::Number(v)
    }
}

impl From<bool> for SettingsValue {
    fn from(v: bool) -> Self {
        SettingsValue::Bool(v)
    }
}

impl From<&str> for SettingsValue {
    fn from(v: &str) -> Self {
        SettingsValue::Text(v.to_string())
    }
}

impl From<String> for SettingsValue {
    fn from(v: String) -> Self {
        SettingsValue::Text(v)
    }
}

/// A serialized shape configuration: the registry key of the generator plus
/// its parameters. Round-trips through JSON without loss for every built-in
/// generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShapeSettings {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, SettingsValue>,
}

impl ShapeSettings {
    pub fn new(type_name: impl Into<String>) -> Self {
        ShapeSettings { type_name: type_name.into(), parameters: BTreeMap::new() }
    }

    /// Builder-style parameter insertion.
    pub fn with(mut self, key: &str, value: impl Into<SettingsValue>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<SettingsValue>) {
        self.parameters.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&SettingsValue> {
        self.parameters.get(key)
    }

    /// Numeric parameter with a default for missing or mistyped values.
    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(SettingsValue::as_number).unwrap_or(default)
    }

    /// Numeric parameter clamped to `[0, 1]`. Out-of-range inputs are
    /// clamped, never rejected.
    pub fn fraction_or(&self, key: &str, default: f64) -> f64 {
        self.number_or(key, default).clamp(0.0, 1.0)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(SettingsValue::as_bool).unwrap_or(default)
    }
}
