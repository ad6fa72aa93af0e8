//! Server-side submission validation against a [`FormSchema`].
//!
//! Each field yields at most one message. When several rules fail on the same
//! field the last one checked wins (minLength, maxLength, then regex), so a
//! value that is both too short and malformed reports only "Invalid format".
//! Clients depend on those exact messages, so the order is kept as is.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::schema::{FieldSchema, FieldType, FormSchema, ValidationRules};
use crate::value::{date_of, is_empty, js_number, parse_date, to_number, utf16_len, Record};

/// field id → error message
pub type FieldErrors = BTreeMap<String, String>;

/// Validate a record against every field of the schema, in schema order.
pub fn validate(schema: &FormSchema, record: &Record) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in &schema.fields {
        if let Some(message) = validate_field(field, record.get(&field.id)) {
            errors.insert(field.id.clone(), message);
        }
    }
    errors
}

/// Validate one field value; `None` when the value is acceptable
pub fn validate_field(field: &FieldSchema, value: Option<&Value>) -> Option<String> {
    if is_empty(value) {
        return field
            .required
            .then(|| format!("{} is required", field.label));
    }

    let value = value?;
    let rules = field.validation.as_ref()?;

    let mut message = None;

    if let Value::String(s) = value {
        check_text(rules, s, &mut message);
    }

    match field.field_type {
        FieldType::Number => check_number(rules, value, &mut message),
        FieldType::MultiSelect => {
            if let Value::Array(items) = value {
                check_selection(rules, items.len(), &mut message);
            }
        }
        FieldType::Date => check_date(rules, value, &mut message),
        FieldType::Text
        | FieldType::Select
        | FieldType::Textarea
        | FieldType::Switch => {}
    }

    message
}

/// Zero-valued length and selection rules are inactive
fn active(rule: Option<u64>) -> Option<u64> {
    rule.filter(|n| *n > 0)
}

fn check_text(rules: &ValidationRules, s: &str, message: &mut Option<String>) {
    let len = utf16_len(s) as u64;
    if let Some(min) = active(rules.min_length) {
        if len < min {
            *message = Some(format!("Min length is {}", min));
        }
    }
    if let Some(max) = active(rules.max_length) {
        if len > max {
            *message = Some(format!("Max length is {}", max));
        }
    }
    if let Some(pattern) = &rules.regex {
        if !pattern.is_match(s) {
            *message = Some("Invalid format".to_string());
        }
    }
}

fn check_number(rules: &ValidationRules, value: &Value, message: &mut Option<String>) {
    // NaN compares false against both bounds
    let n = to_number(value);
    if let Some(min) = rules.min {
        if n < min {
            *message = Some(format!("Min value is {}", js_number(min)));
        }
    }
    if let Some(max) = rules.max {
        if n > max {
            *message = Some(format!("Max value is {}", js_number(max)));
        }
    }
}

fn check_selection(rules: &ValidationRules, count: usize, message: &mut Option<String>) {
    let count = count as u64;
    if let Some(min) = active(rules.min_selected) {
        if count < min {
            *message = Some(format!("Select at least {} options", min));
        }
    }
    if let Some(max) = active(rules.max_selected) {
        if count > max {
            *message = Some(format!("Select at most {} options", max));
        }
    }
}

fn check_date(rules: &ValidationRules, value: &Value, message: &mut Option<String>) {
    let Some(min_date) = rules.min_date.as_deref() else {
        return;
    };
    // An unparseable value never fails the lower bound
    if let (Some(input), Some(min)) = (date_of(value), parse_date(min_date)) {
        if input < min {
            *message = Some(format!("Date must be after {}", min_date));
        }
    }
}
