use std::io::Read;

use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(obj)) = (data, response.as_object_mut()) {
                obj.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a JSON document as-is
pub fn output_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read a JSON document from a file, or stdin when no path (or "-") is given
pub fn read_json_input(path: Option<&str>) -> anyhow::Result<Value> {
    let source = match path {
        Some(p) if p != "-" => {
            std::fs::read_to_string(p).with_context(|| format!("failed to read {}", p))?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&source).context("input is not valid JSON")
}

/// A JSON object, or an error naming what was received instead
pub fn expect_object(value: Value) -> anyhow::Result<serde_json::Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("expected a JSON object, got {}", kind_of(&other)),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_object_names_the_wrong_kind() {
        assert!(expect_object(json!({ "a": 1 })).is_ok());
        let err = expect_object(json!([1])).unwrap_err();
        assert_eq!(err.to_string(), "expected a JSON object, got an array");
    }

    #[test]
    fn reads_json_file() {
        let path = std::env::temp_dir().join(format!("matbook-input-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{ "age": 30 }"#).unwrap();
        let value = read_json_input(path.to_str()).unwrap();
        assert_eq!(value, json!({ "age": 30 }));
        std::fs::remove_file(&path).unwrap();
    }
}
