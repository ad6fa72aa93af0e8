pub mod error;
pub mod types;

pub use error::SchemaError;
pub use types::{FieldOption, FieldSchema, FieldType, FormSchema, Pattern, ValidationRules};

use std::collections::HashSet;
use std::path::Path;

use crate::value::parse_date;

const ONBOARDING_SCHEMA: &str = include_str!("onboarding.json");

/// The built-in "Employee Onboarding" form
pub fn builtin() -> Result<FormSchema, SchemaError> {
    from_json_str(ONBOARDING_SCHEMA)
}

pub fn from_json_str(source: &str) -> Result<FormSchema, SchemaError> {
    let schema: FormSchema = serde_json::from_str(source)?;
    check(&schema)?;
    Ok(schema)
}

pub fn from_yaml_str(source: &str) -> Result<FormSchema, SchemaError> {
    let schema: FormSchema = serde_yaml::from_str(source)?;
    check(&schema)?;
    Ok(schema)
}

/// Load a schema file; `.yaml`/`.yml` are read as YAML, anything else as JSON
pub fn load_file(path: impl AsRef<Path>) -> Result<FormSchema, SchemaError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let schema = if is_yaml {
        from_yaml_str(&source)?
    } else {
        from_json_str(&source)?
    };

    tracing::info!(
        "Loaded form schema '{}' ({} fields) from {}",
        schema.title,
        schema.fields.len(),
        path.display()
    );
    Ok(schema)
}

/// Load from `path` when given, else the built-in schema
pub fn load(path: Option<&Path>) -> Result<FormSchema, SchemaError> {
    match path {
        Some(p) => load_file(p),
        None => builtin(),
    }
}

/// Structural invariants a schema must satisfy before it is served.
/// Regex rules are already compiled during deserialization.
pub fn check(schema: &FormSchema) -> Result<(), SchemaError> {
    if schema.fields.is_empty() {
        return Err(SchemaError::NoFields);
    }

    let mut seen = HashSet::new();
    for (index, field) in schema.fields.iter().enumerate() {
        if field.id.trim().is_empty() {
            return Err(SchemaError::EmptyId(index));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(SchemaError::DuplicateId(field.id.clone()));
        }
        check_field(field)?;
    }
    Ok(())
}

fn check_field(field: &FieldSchema) -> Result<(), SchemaError> {
    let field_type = field.field_type;

    match (&field.options, field_type.has_options()) {
        (Some(opts), true) if !opts.is_empty() => {}
        (_, true) => return Err(SchemaError::MissingOptions(field.id.clone())),
        (Some(_), false) => {
            return Err(SchemaError::UnexpectedOptions {
                id: field.id.clone(),
                field_type: field_type.to_string(),
            })
        }
        (None, false) => {}
    }

    let Some(rules) = &field.validation else {
        return Ok(());
    };

    let not_applicable = |rule: &'static str| SchemaError::RuleNotApplicable {
        id: field.id.clone(),
        rule,
        field_type: field_type.to_string(),
    };
    let inverted = |lower: &'static str, upper: &'static str| SchemaError::InvertedBounds {
        id: field.id.clone(),
        lower,
        upper,
    };

    if field_type != FieldType::Number {
        if rules.min.is_some() {
            return Err(not_applicable("min"));
        }
        if rules.max.is_some() {
            return Err(not_applicable("max"));
        }
    }
    if field_type != FieldType::MultiSelect {
        if rules.min_selected.is_some() {
            return Err(not_applicable("minSelected"));
        }
        if rules.max_selected.is_some() {
            return Err(not_applicable("maxSelected"));
        }
    }
    if let Some(min_date) = &rules.min_date {
        if field_type != FieldType::Date {
            return Err(not_applicable("minDate"));
        }
        if parse_date(min_date).is_none() {
            return Err(SchemaError::InvalidMinDate {
                id: field.id.clone(),
                value: min_date.clone(),
            });
        }
    }

    if let (Some(lo), Some(hi)) = (rules.min_length, rules.max_length) {
        if lo > hi {
            return Err(inverted("minLength", "maxLength"));
        }
    }
    if let (Some(lo), Some(hi)) = (rules.min, rules.max) {
        if lo > hi {
            return Err(inverted("min", "max"));
        }
    }
    if let (Some(lo), Some(hi)) = (rules.min_selected, rules.max_selected) {
        if lo > hi {
            return Err(inverted("minSelected", "maxSelected"));
        }
    }

    Ok(())
}
