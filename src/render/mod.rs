//! Plain-text view layer
//!
//! Maps each `FieldKind` to a renderer capability. The validation engine
//! and the controller never import this module; it only consumes their
//! outputs (descriptors, values, errors).

use crate::schema::{FieldDescriptor, FieldKind, SchemaModel};
use crate::validation::{FieldErrors, FormValues};

/// Leading entry of every select widget
pub const SELECT_PROMPT: &str = "Select an option";

/// A rendered widget: one or more text lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub lines: Vec<String>,
}

impl Widget {
    fn single(line: String) -> Self {
        Self { lines: vec![line] }
    }
}

/// Renders one field kind
pub trait FieldRenderer: Send + Sync {
    fn render(&self, field: &FieldDescriptor, value: &str) -> Widget;
}

/// Single-line input for `text` and `email`
struct InputRenderer;

impl FieldRenderer for InputRenderer {
    fn render(&self, field: &FieldDescriptor, value: &str) -> Widget {
        let shown = match (value.is_empty(), &field.placeholder) {
            (true, Some(placeholder)) => format!("<{}>", placeholder),
            _ => value.to_string(),
        };
        Widget::single(format!("[{}] {}", field.kind.tag(), shown))
    }
}

/// Multi-line box
struct TextAreaRenderer;

impl FieldRenderer for TextAreaRenderer {
    fn render(&self, field: &FieldDescriptor, value: &str) -> Widget {
        if value.is_empty() {
            let hint = field.placeholder.as_deref().map(|p| format!("<{}>", p)).unwrap_or_default();
            return Widget::single(format!("| {}", hint));
        }
        Widget {
            lines: value.lines().map(|line| format!("| {}", line)).collect(),
        }
    }
}

/// Dropdown with a leading prompt entry
struct SelectRenderer;

impl FieldRenderer for SelectRenderer {
    fn render(&self, field: &FieldDescriptor, value: &str) -> Widget {
        let mut lines = Vec::with_capacity(field.options.len() + 1);
        lines.push(format!("{} {}", marker(value.is_empty(), '>'), SELECT_PROMPT));
        for option in field.choices() {
            lines.push(format!("{} {}", marker(option.value == value, '>'), option.label));
        }
        Widget { lines }
    }
}

/// One radio button per option
struct RadioRenderer;

impl FieldRenderer for RadioRenderer {
    fn render(&self, field: &FieldDescriptor, value: &str) -> Widget {
        Widget {
            lines: field
                .choices()
                .iter()
                .map(|option| {
                    let mark = if option.value == value { "(*)" } else { "( )" };
                    format!("{} {}", mark, option.label)
                })
                .collect(),
        }
    }
}

fn marker(selected: bool, symbol: char) -> char {
    if selected {
        symbol
    } else {
        ' '
    }
}

/// Returns the renderer for a field kind
pub fn renderer_for(kind: FieldKind) -> &'static dyn FieldRenderer {
    match kind {
        FieldKind::Text | FieldKind::Email => &InputRenderer,
        FieldKind::Textarea => &TextAreaRenderer,
        FieldKind::Select => &SelectRenderer,
        FieldKind::Radio => &RadioRenderer,
    }
}

/// Renders a whole form: title, description, then each field in order
/// with its label (`*` when required), widget and error line.
pub fn render_form(schema: &SchemaModel, values: &FormValues, errors: &FieldErrors) -> String {
    let mut out = String::new();
    out.push_str(&schema.title);
    out.push('\n');
    out.push_str(&schema.description);
    out.push('\n');

    for field in &schema.fields {
        out.push('\n');
        out.push_str(&field.label);
        if field.required {
            out.push_str(" *");
        }
        out.push('\n');

        let value = values.get(&field.id).map(String::as_str).unwrap_or("");
        for line in renderer_for(field.kind).render(field, value).lines {
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }

        if let Some(message) = errors.get(&field.id) {
            out.push_str("  ! ");
            out.push_str(message);
            out.push('\n');
        }
    }

    out
}
