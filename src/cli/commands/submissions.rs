use clap::Subcommand;
use serde_json::Value;

use crate::cli::client::{ApiClient, RemoteError};
use crate::cli::utils::{expect_object, output_json, output_success, read_json_input};
use crate::cli::OutputFormat;
use crate::database::SortOrder;

#[derive(Subcommand)]
pub enum SubmissionCommands {
    #[command(about = "List submissions page by page")]
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, value_enum, default_value = "desc", help = "Sort by creation time")]
        sort: SortArg,
        #[arg(long, help = "Substring to look for anywhere in the record")]
        search: Option<String>,
    },

    #[command(about = "Show one submission")]
    Get {
        #[arg(help = "Submission ID")]
        id: String,
    },

    #[command(about = "Submit a record from a file or stdin")]
    Create {
        #[arg(help = "JSON record (stdin when omitted)")]
        file: Option<String>,
    },

    #[command(about = "Replace a submission with a record from a file or stdin")]
    Update {
        #[arg(help = "Submission ID")]
        id: String,
        #[arg(help = "JSON record (stdin when omitted)")]
        file: Option<String>,
    },

    #[command(about = "Delete a submission")]
    Delete {
        #[arg(help = "Submission ID")]
        id: String,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Asc,
            SortArg::Desc => SortOrder::Desc,
        }
    }
}

pub async fn handle(
    cmd: SubmissionCommands,
    client: &ApiClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let result = run(cmd, client, output_format).await;

    // Show what the server sent back before failing
    if let Some(remote) = result.as_ref().err().and_then(|e| e.downcast_ref::<RemoteError>()) {
        match output_format {
            OutputFormat::Json => output_json(&remote.body)?,
            OutputFormat::Text => {
                if let Some(Value::Object(errors)) = remote.body.get("errors") {
                    for (field, message) in errors {
                        eprintln!("  {}: {}", field, message.as_str().unwrap_or_default());
                    }
                }
            }
        }
    }
    result
}

async fn run(cmd: SubmissionCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SubmissionCommands::List { page, limit, sort, search } => {
            let mut query = vec![
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("sortOrder", SortOrder::from(sort).to_sql().to_ascii_lowercase()),
            ];
            if let Some(s) = search {
                query.push(("search", s));
            }

            let body = client.get("/submissions", &query).await?;
            match output_format {
                OutputFormat::Json => output_json(&body),
                OutputFormat::Text => {
                    print!("{}", listing_text(&body));
                    Ok(())
                }
            }
        }
        SubmissionCommands::Get { id } => {
            let body = client.get(&format!("/submissions/{}", id), &[]).await?;
            match output_format {
                OutputFormat::Json => output_json(&body),
                OutputFormat::Text => {
                    let data = body.get("data").cloned().unwrap_or(Value::Null);
                    println!("{}", serde_json::to_string_pretty(&data)?);
                    Ok(())
                }
            }
        }
        SubmissionCommands::Create { file } => {
            let record = Value::Object(expect_object(read_json_input(file.as_deref())?)?);
            let body = client.post("/submissions", &record).await?;
            let id = body.get("id").and_then(Value::as_str).unwrap_or_default();
            output_success(output_format, &format!("Created submission {}", id), Some(body.clone()))
        }
        SubmissionCommands::Update { id, file } => {
            let record = Value::Object(expect_object(read_json_input(file.as_deref())?)?);
            client.put(&format!("/submissions/{}", id), &record).await?;
            output_success(output_format, &format!("Updated submission {}", id), None)
        }
        SubmissionCommands::Delete { id } => {
            client.delete(&format!("/submissions/{}", id)).await?;
            output_success(output_format, &format!("Deleted submission {}", id), None)
        }
    }
}

/// One line per submission followed by the page summary
fn listing_text(body: &Value) -> String {
    let mut out = String::new();
    let items = body.get("data").and_then(Value::as_array).cloned().unwrap_or_default();
    if items.is_empty() {
        out.push_str("No submissions found\n");
    }
    for item in &items {
        let id = item.get("id").and_then(Value::as_str).unwrap_or("?");
        let created = item.get("createdAt").and_then(Value::as_str).unwrap_or("?");
        let data = item.get("data").map(Value::to_string).unwrap_or_default();
        out.push_str(&format!("{}  {}  {}\n", id, created, data));
    }

    let meta = body.get("meta");
    let number = |key: &str| meta.and_then(|m| m.get(key)).and_then(Value::as_u64).unwrap_or(0);
    out.push_str(&format!(
        "Page {} of {} ({} total)\n",
        number("page"),
        number("totalPages"),
        number("total")
    ));
    out
}
