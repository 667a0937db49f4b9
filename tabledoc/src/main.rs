//! Table definition report tool.
//!
//! Connects to a MySQL database and prints every table whose name starts
//! with a prefix, either as ER diagram entity blocks or as Markdown tables.

use clap::{Args, CommandFactory, Parser};
use std::io::{self, BufWriter};
use std::process::ExitCode;
use tabledoc_core::{
    DataSourceName, OutputKind, ReportConfig, Result, TableDocError, describe_database,
    init_logging, resolve_dsn,
};

/// Exit code for invocation errors (bad flags, bad DSN, bad credentials file)
const USAGE_EXIT_CODE: u8 = 1;
/// Exit code for failures while talking to the database or writing output
const FAILURE_EXIT_CODE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "tabledoc")]
#[command(about = "Print MySQL table definitions as ER diagram entities or Markdown tables")]
#[command(version)]
#[command(long_about = "
tabledoc - MySQL table definition reports

Lists the tables of one database (optionally only those starting with a
prefix) and prints each table's columns to standard output.

OUTPUT KINDS:
- diagram   entity blocks for text-based ER diagrams (default)
- markdown  one Markdown table per database table

EXAMPLES:
  tabledoc --dsn 'app:secret@tcp(127.0.0.1:3306)/shop'
  tabledoc --dsn dbinfo.json -k markdown -p usr_ -e created_at -e updated_at
")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Data source name or credentials file
    #[arg(
        long,
        env = "TABLEDOC_DSN",
        value_name = "DSN",
        help = "Data source name: user:pass@tcp(host:port)/db or a dbinfo.json file"
    )]
    dsn: Option<String>,

    /// Table name prefix
    #[arg(
        short,
        long,
        default_value = "",
        help = "Only describe tables whose name starts with this prefix"
    )]
    prefix: String,

    /// Output kind
    #[arg(
        short,
        long,
        default_value = "diagram",
        help = "Print ER diagram entities (diagram) or Markdown tables (markdown)"
    )]
    kind: String,

    /// Excluded columns
    #[arg(
        short,
        long,
        value_name = "COLUMN",
        help = "Column name to leave out of every table (repeatable)"
    )]
    exclude: Vec<String>,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity on stderr (-v, -vv, -vvv)"
    )]
    verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Only log errors")]
    quiet: bool,
}

impl Cli {
    /// Resolves the connection descriptor and validates the output kind.
    ///
    /// Nothing here touches the network.
    fn into_run(self) -> Result<(DataSourceName, ReportConfig)> {
        let dsn = self
            .dsn
            .as_deref()
            .filter(|dsn| !dsn.is_empty())
            .ok_or_else(|| TableDocError::usage("--dsn is required"))?;
        let dsn = resolve_dsn(dsn)?;
        let kind: OutputKind = self.kind.parse()?;

        let config = ReportConfig {
            prefix: self.prefix,
            kind,
            excluded_columns: self.exclude,
        };
        Ok((dsn, config))
    }
}

/// Renders an error followed by its source chain.
fn describe_error(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!("\n  Caused by: {}", cause));
        source = cause.source();
    }
    message
}

/// Exit status for a failed run.
const fn exit_code_for(error: &TableDocError) -> u8 {
    if error.is_invocation_error() {
        USAGE_EXIT_CODE
    } else {
        FAILURE_EXIT_CODE
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("Warning: {}", e);
    }

    let (dsn, config) = match cli.into_run() {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {}", describe_error(&e));
            eprintln!();
            eprintln!("{}", Cli::command().render_help());
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    let stdout = BufWriter::new(io::stdout());
    match describe_database(&dsn, &config, stdout).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", describe_error(&e));
            ExitCode::from(exit_code_for(&e))
        }
    }
}
