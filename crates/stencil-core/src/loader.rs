//! Table document loading.
//!
//! A document is a map with an `attributes` map from column name to
//! `{type, allowNull?, comment?, validate?: {min, max}}`. Column fields are
//! read leniently: anything malformed degrades the column instead of
//! rejecting the document.

use std::path::Path;

use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::schema::{BoundValue, Bounds, ColumnDescriptor, TableDocument};

/// Extensions recognised as table documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["yml", "yaml", "json"];

/// Returns true when the path carries a supported document extension.
pub fn is_document_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}

impl TableDocument {
    /// Parse a YAML table document.
    pub fn from_yaml_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(name.into(), value)
    }

    /// Parse a JSON table document.
    pub fn from_json_str(name: impl Into<String>, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(name.into(), value)
    }

    /// Read a document from disk, picking the format from its extension.
    ///
    /// The document name is the file stem, so `users.yml` loads as `users`.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;
        let extension = path.extension().and_then(|ext| ext.to_str());

        match extension {
            Some("yml" | "yaml") => {
                let text = std::fs::read_to_string(path)?;
                Self::from_yaml_str(name, &text)
            }
            Some("json") => {
                let text = std::fs::read_to_string(path)?;
                Self::from_json_str(name, &text)
            }
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn from_value(name: String, value: Value) -> Result<Self> {
        let Value::Mapping(mut root) = value else {
            return Err(Error::InvalidDocument(format!(
                "{name}: document root must be a map"
            )));
        };

        let model_name = root
            .get("model_name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let attributes = match root.remove("attributes") {
            Some(Value::Mapping(attributes)) => attributes,
            Some(_) => {
                return Err(Error::InvalidDocument(format!(
                    "{name}: `attributes` must be a map"
                )));
            }
            None => {
                return Err(Error::InvalidDocument(format!(
                    "{name}: missing `attributes`"
                )));
            }
        };

        let mut columns = Vec::with_capacity(attributes.len());
        for (key, definition) in &attributes {
            let column_name = column_name(key).ok_or_else(|| {
                Error::InvalidDocument(format!("{name}: column names must be scalars"))
            })?;
            columns.push(column_from_value(column_name, definition));
        }

        Ok(Self {
            name,
            model_name,
            columns,
        })
    }
}

fn column_name(key: &Value) -> Option<String> {
    match key {
        Value::String(name) => Some(name.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn column_from_value(name: String, definition: &Value) -> ColumnDescriptor {
    let raw_type = definition
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let allow_null = definition
        .get("allowNull")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let comment = definition
        .get("comment")
        .and_then(Value::as_str)
        .map(str::to_string);

    ColumnDescriptor {
        name,
        raw_type,
        allow_null,
        comment,
        bounds: parse_bounds(definition.get("validate")),
    }
}

fn parse_bounds(validate: Option<&Value>) -> Bounds {
    let validate = match validate {
        None | Some(Value::Null) => return Bounds::Absent,
        Some(Value::Mapping(validate)) => validate,
        Some(_) => return Bounds::Malformed("`validate` must be a map".to_string()),
    };

    let min = validate.get("min").filter(|value| !value.is_null());
    let max = validate.get("max").filter(|value| !value.is_null());

    match (min, max) {
        (None, None) => Bounds::Absent,
        (Some(_), None) | (None, Some(_)) => Bounds::Partial,
        (Some(min), Some(max)) => match (bound_value(min), bound_value(max)) {
            (Ok(min), Ok(max)) => Bounds::Range { min, max },
            (Err(reason), _) => Bounds::Malformed(format!("min {reason}")),
            (_, Err(reason)) => Bounds::Malformed(format!("max {reason}")),
        },
    }
}

fn bound_value(value: &Value) -> std::result::Result<BoundValue, String> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(BoundValue::Int(int))
            } else {
                number
                    .as_f64()
                    .filter(|float| float.is_finite())
                    .map(BoundValue::Float)
                    .ok_or_else(|| format!("{number} is not a finite number"))
            }
        }
        Value::String(text) => {
            let text = text.trim();
            if let Ok(int) = text.parse::<i64>() {
                Ok(BoundValue::Int(int))
            } else {
                text.parse::<f64>()
                    .ok()
                    .filter(|float| float.is_finite())
                    .map(BoundValue::Float)
                    .ok_or_else(|| format!("'{text}' is not a number"))
            }
        }
        _ => Err("is not a number".to_string()),
    }
}
