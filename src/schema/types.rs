//! Schema type definitions
//!
//! Supported field kinds:
//! - text: single-line free text
//! - email: single-line text with a built-in address shape check
//! - select: choice from a dropdown of options
//! - radio: choice from a group of options
//! - textarea: multi-line free text
//!
//! A `SchemaModel` is immutable once built. Field order is render order.

use serde::Serialize;

use super::pattern::FieldPattern;

/// Closed set of field kinds understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Select,
    Radio,
    Textarea,
}

impl FieldKind {
    /// Parses the document `type` tag. Returns `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(FieldKind::Text),
            "email" => Some(FieldKind::Email),
            "select" => Some(FieldKind::Select),
            "radio" => Some(FieldKind::Radio),
            "textarea" => Some(FieldKind::Textarea),
            _ => None,
        }
    }

    /// Returns the document `type` tag
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Select => "select",
            FieldKind::Radio => "radio",
            FieldKind::Textarea => "textarea",
        }
    }

    /// Whether this kind must carry a non-empty option list.
    pub fn requires_options(&self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::Radio)
    }
}

/// Author-supplied format rule. Only applies to non-empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<FieldPattern>,
    /// Message shown when the pattern does not match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One choice of a `select` or `radio` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A single input of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Unique within the owning schema
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
    /// Mandatory and non-empty for select/radio; tolerated and ignored otherwise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FieldDescriptor {
    /// Create a field with no placeholder, rule or options
    pub fn new(id: impl Into<String>, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            required: false,
            placeholder: None,
            validation: None,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_rule(mut self, pattern: Option<FieldPattern>, message: Option<String>) -> Self {
        self.validation = Some(ValidationRule { pattern, message });
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    /// Returns the options the view layer should offer, empty for free-text kinds.
    pub fn choices(&self) -> &[FieldOption] {
        if self.kind.requires_options() {
            &self.options
        } else {
            &[]
        }
    }
}

/// Complete form definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaModel {
    #[serde(rename = "formTitle")]
    pub title: String,
    #[serde(rename = "formDescription")]
    pub description: String,
    pub fields: Vec<FieldDescriptor>,
}

impl Default for SchemaModel {
    fn default() -> Self {
        Self {
            title: "Project Requirements Survey".to_string(),
            description: "Please fill out this survey about your project needs".to_string(),
            fields: Vec::new(),
        }
    }
}

impl SchemaModel {
    /// Looks up a field descriptor by id
    pub fn field(&self, id: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Field ids in render order
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.id.as_str())
    }

    /// Serializes back to the document shape accepted by `SchemaLoader`.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_tags_roundtrip() {
        for kind in [
            FieldKind::Text,
            FieldKind::Email,
            FieldKind::Select,
            FieldKind::Radio,
            FieldKind::Textarea,
        ] {
            assert_eq!(FieldKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(FieldKind::from_tag("checkbox"), None);
        assert_eq!(FieldKind::from_tag("Text"), None);
    }

    #[test]
    fn test_requires_options() {
        assert!(FieldKind::Select.requires_options());
        assert!(FieldKind::Radio.requires_options());
        assert!(!FieldKind::Text.requires_options());
        assert!(!FieldKind::Textarea.requires_options());
    }

    #[test]
    fn test_choices_ignored_for_free_text() {
        let field = FieldDescriptor::new("name", FieldKind::Text, "Name")
            .with_options(vec![FieldOption::new("a", "A")]);
        assert!(field.choices().is_empty());
        assert_eq!(field.options.len(), 1);
    }

    #[test]
    fn test_default_schema_is_empty_survey() {
        let schema = SchemaModel::default();
        assert_eq!(schema.title, "Project Requirements Survey");
        assert!(schema.fields.is_empty());
    }

    #[test]
    fn test_serializes_document_shape() {
        let schema = SchemaModel {
            title: "T".into(),
            description: "D".into(),
            fields: vec![FieldDescriptor::new("zip", FieldKind::Text, "Zip")
                .required()
                .with_rule(Some(FieldPattern::new(r"^\d{5}$").unwrap()), None)],
        };

        let value: serde_json::Value = serde_json::from_str(&schema.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "formTitle": "T",
                "formDescription": "D",
                "fields": [{
                    "id": "zip",
                    "type": "text",
                    "label": "Zip",
                    "required": true,
                    "validation": { "pattern": r"^\d{5}$" }
                }]
            })
        );
    }

    #[test]
    fn test_rule_equality_uses_pattern_source() {
        let a = ValidationRule {
            pattern: Some(FieldPattern::new("a+").unwrap()),
            message: None,
        };
        let b = ValidationRule {
            pattern: Some(FieldPattern::new("a+").unwrap()),
            message: None,
        };
        assert_eq!(a, b);
    }
}
