use regex::Regex;
use serde::{Deserialize, Serialize};

/// Field control types a form schema can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Textarea,
    Switch,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi-select",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Switch => "switch",
        }
    }

    /// Select and multi-select carry an option list
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::MultiSelect)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Per-field validation rules. Which rules apply depends on the field type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<Pattern>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_bound")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "serialize_bound")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_selected: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selected: Option<u64>,
}

/// Whole-number bounds go out as integers (`18`, not `18.0`)
fn serialize_bound<S: serde::Serializer>(bound: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match bound {
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => serializer.serialize_i64(*n as i64),
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_none(),
    }
}

/// A regex rule as written in the schema, compiled once when the schema is loaded.
///
/// Serializes back to the source string so clients receive the pattern as data.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let compiled = Regex::new(&source)?;
        Ok(Self { source, compiled })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.compiled.is_match(value)
    }
}

impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(source.as_str())
            .map_err(|e| serde::de::Error::custom(format!("invalid regex '{}': {}", source, e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

impl FieldSchema {
    pub fn options(&self) -> &[FieldOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Label of the option with the given value, if any
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options()
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// Ordered list of fields plus display metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSchema {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<FieldSchema>,
}

impl FormSchema {
    pub fn field(&self, id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id == id)
    }
}
