//! View model for rendering a form field by field.
//!
//! A renderer is a pure function of the field schema and caller-owned
//! [`FieldState`]. It never validates beyond the required pre-check; rule
//! errors come from [`crate::validator`] and are only surfaced here.

pub mod text;

use serde::Serialize;

use crate::schema::{FieldSchema, FieldType, FormSchema};
use crate::value::FieldValue;

pub use text::to_text;

pub const SELECT_PROMPT: &str = "Select an option...";
pub const REQUIRED_MESSAGE: &str = "Required";

/// Value and error list for one field, owned by the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldState {
    pub value: Option<FieldValue>,
    pub errors: Vec<Option<String>>,
}

impl FieldState {
    pub fn with_value(value: FieldValue) -> Self {
        Self {
            value: Some(value),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Input control chosen for a field type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Control {
    TextInput { value: String },
    NumberInput { value: String },
    DateInput { value: String },
    TextArea { value: String },
    Select { prompt: &'static str, choices: Vec<ChoiceView> },
    Checklist { choices: Vec<ChoiceView> },
    Switch { on: bool, caption: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub id: String,
    pub label: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub control: Control,
    pub errors: Vec<String>,
}

impl RenderedField {
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Events a control reports back to the owner of the state
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    Change(Option<FieldValue>),
    /// Click on a checklist option or on a switch. The option value is
    /// ignored for switches.
    Toggle(String),
    Blur,
}

/// Client-side required check; `None` for optional fields
pub fn required_error(field: &FieldSchema, value: Option<&FieldValue>) -> Option<&'static str> {
    if !field.required {
        return None;
    }
    let missing = match value {
        None => true,
        Some(FieldValue::Text(s)) => s.trim().is_empty(),
        Some(FieldValue::List(items)) => items.is_empty(),
        Some(FieldValue::Number(_)) | Some(FieldValue::Bool(_)) => false,
    };
    missing.then_some(REQUIRED_MESSAGE)
}

pub fn render(field: &FieldSchema, state: &FieldState) -> RenderedField {
    let value = state.value.as_ref();
    let text = || value.map(FieldValue::display).unwrap_or_default();

    let control = match field.field_type {
        FieldType::Text => Control::TextInput { value: text() },
        FieldType::Number => Control::NumberInput { value: text() },
        FieldType::Date => Control::DateInput { value: text() },
        FieldType::Textarea => Control::TextArea { value: text() },
        FieldType::Select => {
            let current = value.and_then(FieldValue::as_text);
            Control::Select {
                prompt: SELECT_PROMPT,
                choices: choices(field, |v| current == Some(v)),
            }
        }
        FieldType::MultiSelect => {
            let current = value.and_then(FieldValue::as_list).unwrap_or(&[]);
            Control::Checklist {
                choices: choices(field, |v| current.iter().any(|c| c == v)),
            }
        }
        FieldType::Switch => {
            let on = value.map(is_truthy).unwrap_or(false);
            Control::Switch {
                on,
                caption: if on { "Yes" } else { "No" },
            }
        }
    };

    RenderedField {
        id: field.id.clone(),
        label: field.label.clone(),
        required: field.required,
        placeholder: field.placeholder.clone(),
        control,
        errors: state
            .errors
            .iter()
            .flatten()
            .filter(|e| !e.is_empty())
            .cloned()
            .collect(),
    }
}

/// Render every field of the form in schema order; fields without a state render empty
pub fn render_form(
    schema: &FormSchema,
    states: &std::collections::HashMap<String, FieldState>,
) -> Vec<RenderedField> {
    let empty = FieldState::default();
    schema
        .fields
        .iter()
        .map(|f| render(f, states.get(&f.id).unwrap_or(&empty)))
        .collect()
}

/// Next state after an event. Change and Blur re-run the required check.
pub fn apply(field: &FieldSchema, state: &FieldState, event: FieldEvent) -> FieldState {
    let value = match event {
        FieldEvent::Change(value) => value,
        FieldEvent::Toggle(option) => match field.field_type {
            FieldType::MultiSelect => {
                let mut current = state
                    .value
                    .as_ref()
                    .and_then(FieldValue::as_list)
                    .map(<[String]>::to_vec)
                    .unwrap_or_default();
                if let Some(pos) = current.iter().position(|v| *v == option) {
                    current.remove(pos);
                } else {
                    current.push(option);
                }
                Some(FieldValue::List(current))
            }
            FieldType::Switch => {
                let on = state.value.as_ref().map(is_truthy).unwrap_or(false);
                Some(FieldValue::Bool(!on))
            }
            _ => state.value.clone(),
        },
        FieldEvent::Blur => state.value.clone(),
    };

    let errors = vec![required_error(field, value.as_ref()).map(str::to_string)];
    FieldState { value, errors }
}

fn choices(field: &FieldSchema, selected: impl Fn(&str) -> bool) -> Vec<ChoiceView> {
    field
        .options()
        .iter()
        .map(|o| ChoiceView {
            value: o.value.clone(),
            label: o.label.clone(),
            selected: selected(&o.value),
        })
        .collect()
}

fn is_truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
        FieldValue::Text(s) => !s.is_empty(),
        FieldValue::List(_) => true,
    }
}
