// toner-stock-cli/src/main.rs
// ============================================================================
// Module: Toner Stock CLI Entry Point
// Description: Command dispatcher for the toner server and inventory client.
// Purpose: Run the HTTP server, validate config, and manage stock remotely.
// Dependencies: clap, tokio, toner-stock-config, toner-stock-server, toner-stock-cli
// ============================================================================

//! ## Overview
//! `toner-stock` either runs the HTTP server (`serve`), checks a config file
//! (`config validate`), or acts as a client of a running server (`list`,
//! `add`, `edit`). Failures print one line to stderr and exit non-zero.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;
use toner_stock_cli::TonerApiClient;
use toner_stock_cli::TonerDraft;
use toner_stock_cli::render_stock_table;
use toner_stock_config::TonerStockConfig;
use toner_stock_core::TonerRecord;
use toner_stock_server::TonerServer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default server URL for client commands.
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "toner-stock", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the toner HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print the stock table from a running server.
    List(ListCommand),
    /// Add a new toner record.
    Add(RecordCommand),
    /// Replace an existing toner record.
    Edit(RecordCommand),
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to toner-stock.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a config file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to toner-stock.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `list`.
#[derive(Args, Debug)]
struct ListCommand {
    /// Server base URL.
    #[arg(long, value_name = "URL", default_value = DEFAULT_SERVER_URL)]
    url: String,
}

/// Arguments for `add` and `edit`.
#[derive(Args, Debug)]
struct RecordCommand {
    /// Server base URL.
    #[arg(long, value_name = "URL", default_value = DEFAULT_SERVER_URL)]
    url: String,
    /// Cartridge identifier (upper-cased before sending).
    #[arg(long, value_name = "ID")]
    id: String,
    /// Units in stock.
    #[arg(long, value_name = "N")]
    quantity: u32,
    /// Mark as a color cartridge.
    #[arg(long)]
    color: bool,
    /// Mark as a generic (non-OEM) cartridge.
    #[arg(long)]
    generic: bool,
    /// Mark as a high-capacity cartridge.
    #[arg(long)]
    high_capacity: bool,
    /// Compatible substitute identifier (repeatable).
    #[arg(long = "alternative", value_name = "ID")]
    alternatives: Vec<String>,
}

impl RecordCommand {
    /// Converts the arguments into a draft record.
    fn draft(&self) -> TonerDraft {
        TonerDraft {
            id: self.id.clone(),
            quantity: self.quantity,
            is_color: self.color,
            is_generic: self.generic,
            is_high_capacity: self.high_capacity,
            alternatives: self.alternatives.clone(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(&command),
        Commands::List(command) => command_list(&command).await,
        Commands::Add(command) => command_submit(&command, SubmitMode::Add).await,
        Commands::Edit(command) => command_submit(&command, SubmitMode::Edit).await,
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = TonerStockConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let server = tokio::task::spawn_blocking(move || TonerServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = TonerStockConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Client Commands
// ============================================================================

/// Which write route a record command targets.
#[derive(Debug, Clone, Copy)]
enum SubmitMode {
    /// `POST /toner/{id}/add`.
    Add,
    /// `PUT /toner/{id}/put`.
    Edit,
}

/// Executes the `list` command.
async fn command_list(command: &ListCommand) -> CliResult<ExitCode> {
    let client = connect(&command.url)?;
    let records =
        client.list().await.map_err(|err| CliError::new(format!("list failed: {err}")))?;
    write_stdout_bytes(render_stock_table(&records).as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `add` and `edit` commands.
async fn command_submit(command: &RecordCommand, mode: SubmitMode) -> CliResult<ExitCode> {
    let record = command
        .draft()
        .into_record()
        .map_err(|err| CliError::new(format!("invalid toner: {err}")))?;
    let client = connect(&command.url)?;
    let saved = match mode {
        SubmitMode::Add => client.add(&record).await,
        SubmitMode::Edit => client.edit(&record).await,
    }
    .map_err(|err| CliError::new(format!("saving toner {} failed: {err}", record.id)))?;
    write_record(&saved)?;
    Ok(ExitCode::SUCCESS)
}

/// Builds an API client for the given URL.
fn connect(url: &str) -> CliResult<TonerApiClient> {
    TonerApiClient::new(url).map_err(|err| CliError::new(err.to_string()))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a record as pretty JSON to stdout.
fn write_record(record: &TonerRecord) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(record)
        .map_err(|err| CliError::new(format!("failed to render toner: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_parses_flags_and_repeated_alternatives() {
        let cli = Cli::try_parse_from([
            "toner-stock",
            "add",
            "--id",
            "hp26a",
            "--quantity",
            "5",
            "--generic",
            "--alternative",
            "cf226x",
            "--alternative",
            "ce285a",
        ])
        .unwrap();
        let Commands::Add(command) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(command.url, DEFAULT_SERVER_URL);
        let record = command.draft().into_record().unwrap();
        assert_eq!(record.id.as_str(), "HP26A");
        assert!(record.is_generic);
        assert!(!record.is_color);
        assert_eq!(record.alternatives.len(), 2);
    }

    #[test]
    fn edit_rejects_negative_quantity() {
        let result =
            Cli::try_parse_from(["toner-stock", "edit", "--id", "HP26A", "--quantity", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_validate_accepts_path() {
        let cli = Cli::try_parse_from(["toner-stock", "config", "validate", "--config", "x.toml"])
            .unwrap();
        let Commands::Config {
            command: ConfigCommand::Validate(command),
        } = cli.command
        else {
            panic!("expected config validate");
        };
        assert_eq!(command.config, Some(PathBuf::from("x.toml")));
    }
}
