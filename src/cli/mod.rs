pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "matbook")]
#[command(about = "MatBook CLI - validate form records and manage stored submissions")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "MATBOOK_SERVER",
        default_value = "http://localhost:3000",
        help = "Base URL of the MatBook API server"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show or check form schemas")]
    Schema {
        #[command(subcommand)]
        cmd: commands::schema::SchemaCommands,
    },

    #[command(about = "Validate a JSON record against a form schema locally")]
    Validate(commands::validate::ValidateArgs),

    #[command(about = "Manage submissions stored on the server")]
    Submissions {
        #[command(subcommand)]
        cmd: commands::submissions::SubmissionCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = client::ApiClient::new(&cli.server);

    match cli.command {
        Commands::Schema { cmd } => commands::schema::handle(cmd, &client, output_format).await,
        Commands::Validate(args) => commands::validate::handle(args, output_format),
        Commands::Submissions { cmd } => {
            commands::submissions::handle(cmd, &client, output_format).await
        }
    }
}
