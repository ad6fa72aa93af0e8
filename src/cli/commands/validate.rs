use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::cli::utils::{expect_object, output_json, read_json_input};
use crate::cli::OutputFormat;
use crate::render::{self, FieldState};
use crate::schema::{self, FormSchema};
use crate::validator::{self, FieldErrors};
use crate::value::{FieldValue, Record};

#[derive(Args)]
pub struct ValidateArgs {
    #[arg(help = "JSON record to validate (stdin when omitted)")]
    pub file: Option<String>,

    #[arg(long, help = "Schema file to validate against (built-in form when omitted)")]
    pub schema: Option<PathBuf>,
}

pub fn handle(args: ValidateArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let form = schema::load(args.schema.as_deref())?;
    let record = expect_object(read_json_input(args.file.as_deref())?)?;
    let errors = validator::validate(&form, &record);

    match output_format {
        OutputFormat::Json => output_json(&json!({
            "success": errors.is_empty(),
            "errors": errors,
        }))?,
        OutputFormat::Text => {
            print!("{}", render::to_text(&render::render_form(&form, &field_states(&form, &record, &errors))));
            if errors.is_empty() {
                println!("\n✓ Record is valid");
            } else {
                println!("\n✗ {} field(s) failed validation", errors.len());
            }
        }
    }

    if !errors.is_empty() {
        anyhow::bail!("validation failed");
    }
    Ok(())
}

/// Renderer state for each field: the submitted value plus its validation message
pub fn field_states(
    form: &FormSchema,
    record: &Record,
    errors: &FieldErrors,
) -> HashMap<String, FieldState> {
    form.fields
        .iter()
        .map(|f| {
            let state = FieldState {
                value: record.get(&f.id).and_then(FieldValue::from_json),
                errors: vec![errors.get(&f.id).cloned()],
            };
            (f.id.clone(), state)
        })
        .collect()
}
