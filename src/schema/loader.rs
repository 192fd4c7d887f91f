//! Schema loader turning raw document text into a `SchemaModel`
//!
//! Document shape:
//! `{ formTitle, formDescription, fields: [ { id, type, label, required,
//!   placeholder?, validation?: { pattern?, message? }, options?: [{ value, label }] } ] }`
//!
//! The loader checks schema shape only, never user values. It is a pure
//! transform: a document either yields a complete model or a single
//! `StructuralError`, never a partially applied schema.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::errors::{SchemaResult, StructuralError};
use super::pattern::FieldPattern;
use super::types::{FieldDescriptor, FieldKind, FieldOption, SchemaModel, ValidationRule};

/// Stateless schema document loader.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Parses and checks a raw schema document.
    ///
    /// # Errors
    ///
    /// - `MalformedDocument` if the text is not JSON
    /// - `MissingField` if a top-level key is absent or mistyped
    /// - `InvalidField` if a field entry breaks an invariant
    /// - `InvalidPattern` if a validation pattern does not compile
    pub fn load(raw_text: &str) -> SchemaResult<SchemaModel> {
        let document: Value = serde_json::from_str(raw_text)
            .map_err(|e| StructuralError::MalformedDocument(e.to_string()))?;

        Self::load_value(&document)
    }

    /// Checks an already-parsed document.
    pub fn load_value(document: &Value) -> SchemaResult<SchemaModel> {
        let root = document
            .as_object()
            .ok_or_else(|| StructuralError::MalformedDocument("document root must be an object".into()))?;

        let title = required_str(root, "formTitle")?;
        let description = required_str(root, "formDescription")?;
        let entries = root
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| StructuralError::MissingField("fields".into()))?;

        let mut seen_ids = HashSet::new();
        let mut fields = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let field = load_field(index, entry)?;

            if !seen_ids.insert(field.id.clone()) {
                return Err(StructuralError::invalid_field(&field.id, "duplicate field id"));
            }

            fields.push(field);
        }

        Ok(SchemaModel {
            title: title.to_string(),
            description: description.to_string(),
            fields,
        })
    }
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &str) -> SchemaResult<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| StructuralError::MissingField(key.into()))
}

/// Reads an optional string member; present-but-not-a-string is an error.
fn optional_str(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("'{}' must be a string", key)),
    }
}

fn load_field(index: usize, entry: &Value) -> SchemaResult<FieldDescriptor> {
    let position = format!("fields[{}]", index);

    let obj = entry
        .as_object()
        .ok_or_else(|| StructuralError::invalid_field(&position, "field entry must be an object"))?;

    let id = match obj.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            return Err(StructuralError::invalid_field(
                &position,
                "'id' must be a non-empty string",
            ))
        }
    };

    let tag = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| StructuralError::invalid_field(&id, "'type' must be a string"))?;
    let kind = FieldKind::from_tag(tag)
        .ok_or_else(|| StructuralError::invalid_field(&id, format!("unknown field type '{}'", tag)))?;

    let label = obj
        .get("label")
        .and_then(Value::as_str)
        .ok_or_else(|| StructuralError::invalid_field(&id, "'label' must be a string"))?
        .to_string();

    let required = obj
        .get("required")
        .and_then(Value::as_bool)
        .ok_or_else(|| StructuralError::invalid_field(&id, "'required' must be a boolean"))?;

    let placeholder =
        optional_str(obj, "placeholder").map_err(|reason| StructuralError::invalid_field(&id, reason))?;

    let options = if kind.requires_options() {
        let options = load_options(obj.get("options"))
            .map_err(|reason| StructuralError::invalid_field(&id, reason))?;
        if options.is_empty() {
            return Err(StructuralError::invalid_field(
                &id,
                format!("'{}' fields require a non-empty 'options' list", kind.tag()),
            ));
        }
        options
    } else {
        // Tolerated on free-text kinds; a malformed list is dropped rather than rejected.
        load_options(obj.get("options")).unwrap_or_default()
    };

    let validation = match obj.get("validation") {
        None | Some(Value::Null) => None,
        Some(Value::Object(rule)) => Some(load_rule(&id, rule)?),
        Some(_) => {
            return Err(StructuralError::invalid_field(&id, "'validation' must be an object"))
        }
    };

    Ok(FieldDescriptor {
        id,
        kind,
        label,
        required,
        placeholder,
        validation,
        options,
    })
}

fn load_options(raw: Option<&Value>) -> Result<Vec<FieldOption>, String> {
    let entries = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err("'options' must be a list".into()),
    };

    let mut seen_values = HashSet::new();
    let mut options = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        let value = entry.get("value").and_then(Value::as_str);
        let label = entry.get("label").and_then(Value::as_str);

        let (value, label) = match (value, label) {
            (Some(value), Some(label)) => (value, label),
            _ => return Err(format!("options[{}] must have string 'value' and 'label'", i)),
        };

        if !seen_values.insert(value) {
            return Err(format!("duplicate option value '{}'", value));
        }

        options.push(FieldOption::new(value, label));
    }

    Ok(options)
}

fn load_rule(id: &str, rule: &Map<String, Value>) -> SchemaResult<ValidationRule> {
    let source = optional_str(rule, "pattern").map_err(|reason| StructuralError::invalid_field(id, reason))?;
    let message = optional_str(rule, "message").map_err(|reason| StructuralError::invalid_field(id, reason))?;

    let pattern = match source {
        Some(source) => Some(
            FieldPattern::new(source).map_err(|e| StructuralError::invalid_pattern(id, e.to_string()))?,
        ),
        None => None,
    };

    Ok(ValidationRule { pattern, message })
}
