use std::path::PathBuf;

use clap::Subcommand;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_json, output_success};
use crate::cli::OutputFormat;
use crate::render;
use crate::schema::{self, FormSchema};

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "Show a form schema (from the server unless --file or --builtin is given)")]
    Show {
        #[arg(long, help = "Read the schema from a JSON or YAML file")]
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "file", help = "Use the built-in onboarding form")]
        builtin: bool,
    },

    #[command(about = "Load a schema file and check its structure")]
    Check {
        #[arg(help = "JSON or YAML schema file")]
        file: PathBuf,
    },
}

pub async fn handle(
    cmd: SchemaCommands,
    client: &ApiClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        SchemaCommands::Show { file, builtin } => {
            let form = if builtin {
                schema::builtin()?
            } else if let Some(path) = file {
                schema::load_file(&path)?
            } else {
                let body = client.get("/form-schema", &[]).await?;
                serde_json::from_value(body)?
            };

            match output_format {
                OutputFormat::Json => output_json(&serde_json::to_value(&form)?),
                OutputFormat::Text => {
                    print!("{}", describe(&form));
                    Ok(())
                }
            }
        }
        SchemaCommands::Check { file } => {
            let form = schema::load_file(&file)?;
            output_success(
                output_format,
                &format!("{} is a valid form schema ({} fields)", file.display(), form.fields.len()),
                Some(serde_json::json!({ "title": form.title, "fields": form.fields.len() })),
            )
        }
    }
}

/// Title, description and the empty form as text
pub fn describe(form: &FormSchema) -> String {
    let mut out = format!("{}\n", form.title);
    if !form.description.is_empty() {
        out.push_str(&format!("{}\n", form.description));
    }
    out.push('\n');
    out.push_str(&render::to_text(&render::render_form(form, &Default::default())));
    out
}
