pub mod commands;
pub mod errors;
pub mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// How the `statement` subcommand prints its result.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RenderMode {
    #[default]
    Json,
    Text,
    Html,
}

#[derive(Debug, Parser)]
#[command(
    name = "statement-cli",
    version,
    about = "Parse financial-statement workbooks and render statement views"
)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    #[arg(long, global = true)]
    pub compact: bool,

    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the sheet names of a workbook
    Sheets { source: String },
    /// Extract one sheet as a flat statement
    Statement {
        source: String,
        #[arg(long)]
        sheet: String,
        /// Section ids to render collapsed
        #[arg(long, value_delimiter = ',')]
        collapse: Vec<u32>,
        /// Drop any cached parse and re-fetch the source
        #[arg(long)]
        refresh: bool,
        #[arg(long, value_enum, default_value_t)]
        render: RenderMode,
    },
    /// Dump the layout-faithful template model for one sheet
    Template {
        source: String,
        #[arg(long)]
        sheet: String,
    },
    /// Run the HTTP service
    Serve {
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

/// Output of a one-shot command: a JSON payload, or text already rendered for
/// the terminal (text/html statement views).
pub enum CommandOutput {
    Json(serde_json::Value),
    Rendered(String),
}

pub async fn run_command(command: Commands) -> Result<CommandOutput> {
    match command {
        Commands::Sheets { source } => commands::view::sheets(source).await,
        Commands::Statement {
            source,
            sheet,
            collapse,
            refresh,
            render,
        } => commands::view::statement(source, sheet, collapse, refresh, render).await,
        Commands::Template { source, sheet } => commands::view::template(source, sheet).await,
        Commands::Serve { bind } => commands::serve::serve(bind).await,
    }
}
