use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON schema document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML schema document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Form schema has no fields")]
    NoFields,

    #[error("Field id must not be empty (field #{0})")]
    EmptyId(usize),

    #[error("Duplicate field id: {0}")]
    DuplicateId(String),

    #[error("Field '{0}' must declare at least one option")]
    MissingOptions(String),

    #[error("Field '{id}' of type {field_type} cannot declare options")]
    UnexpectedOptions { id: String, field_type: String },

    #[error("Rule '{rule}' does not apply to field '{id}' of type {field_type}")]
    RuleNotApplicable {
        id: String,
        rule: &'static str,
        field_type: String,
    },

    #[error("Field '{id}' has minDate '{value}' which is not a date")]
    InvalidMinDate { id: String, value: String },

    #[error("Field '{id}' has {lower} greater than {upper}")]
    InvertedBounds {
        id: String,
        lower: &'static str,
        upper: &'static str,
    },
}
