// crates/cascade-cli/src/main.rs
// ============================================================================
// Module: Cascade CLI Entry Point
// Description: Command dispatcher for server and offline directory workflows.
// Purpose: Serve the REST API and run structure/resolver checks offline.
// Dependencies: cascade-api, cascade-config, cascade-core, cascade-store-sqlite, clap, tokio
// ============================================================================

//! ## Overview
//! The Cascade CLI serves the REST API from a validated config and runs the
//! structure validator and perspective resolver offline over JSON
//! snapshots, replacing the ad hoc inspection scripts such deployments
//! accumulate. Inputs are untrusted and pass the same hardened file guards
//! as config loading. Offline checks exit non-zero when violations or
//! resolution failures are found so they compose with shell pipelines.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod snapshot;

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use cascade_api::ServerState;
use cascade_api::WriterAuditSink;
use cascade_config::CascadeConfig;
use cascade_config::StoreBackend;
use cascade_config::StoreConfig;
use cascade_config::StoreJournalMode;
use cascade_config::StoreSyncMode;
use cascade_core::DirectoryStore;
use cascade_core::KpiId;
use cascade_core::runtime::InMemoryDirectoryStore;
use cascade_core::runtime::resolve_perspective;
use cascade_core::runtime::validate_structure;
use cascade_store_sqlite::SqliteDirectoryStore;
use cascade_store_sqlite::SqliteJournalMode;
use cascade_store_sqlite::SqliteStoreConfig;
use cascade_store_sqlite::SqliteSyncMode;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use thiserror::Error;

use crate::snapshot::load_cascade;
use crate::snapshot::load_structure;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// Cascade directory service and offline tooling.
#[derive(Parser, Debug)]
#[command(name = "cascade", version, about = "Multi-tenant KPI directory service")]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API.
    Serve {
        /// Path to a TOML config file (defaults apply when omitted).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Org structure tooling.
    Structure {
        /// Structure subcommand.
        #[command(subcommand)]
        command: StructureCommand,
    },
    /// KPI tooling.
    Kpi {
        /// KPI subcommand.
        #[command(subcommand)]
        command: KpiCommand,
    },
    /// Configuration tooling.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Structure subcommands.
#[derive(Subcommand, Debug)]
enum StructureCommand {
    /// Validate an org structure snapshot.
    Check {
        /// Path to a JSON structure snapshot (`{ units, levels }`).
        #[arg(long)]
        input: PathBuf,
    },
}

/// KPI subcommands.
#[derive(Subcommand, Debug)]
enum KpiCommand {
    /// Resolve a KPI's effective perspective from a cascade snapshot.
    Resolve {
        /// Path to a JSON cascade snapshot (`{ kpis, components, perspectives }`).
        #[arg(long)]
        input: PathBuf,
        /// KPI identifier to resolve.
        #[arg(long)]
        kpi: String,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print a commented sample configuration.
    Sample,
    /// Load and validate a configuration file.
    Validate {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
}

// ============================================================================
// SECTION: CLI Errors
// ============================================================================

/// CLI failure wrapper; the message is already user-facing.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Rendered failure message.
    message: String,
}

impl CliError {
    /// Wraps a rendered message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

#[tokio::main]
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
        Command::Serve { config } => run_serve(config.as_deref()).await,
        Command::Structure {
            command: StructureCommand::Check { input },
        } => run_structure_check(&input),
        Command::Kpi {
            command: KpiCommand::Resolve { input, kpi },
        } => run_kpi_resolve(&input, &kpi),
        Command::Config { command } => match command {
            ConfigCommand::Sample => run_config_sample(),
            ConfigCommand::Validate { config } => run_config_validate(&config),
        },
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Loads config, builds the store, and serves the REST API.
async fn run_serve(config_path: Option<&std::path::Path>) -> CliResult<ExitCode> {
    let config = CascadeConfig::load(config_path).map_err(|err| CliError::new(err.to_string()))?;
    let store = build_store(&config.store)?;
    let state = ServerState::new(store, config.limits)
        .with_audit(Arc::new(WriterAuditSink::new(std::io::stderr())));

    if config.server.allow_non_loopback {
        write_stderr_line(&format!(
            "warning: serving on non-loopback bind {} without transport auth",
            config.server.bind
        ))
        .map_err(|err| CliError::new(format!("stderr write failed: {err}")))?;
    }
    write_stderr_line(&format!("cascade listening on {}", config.server.bind))
        .map_err(|err| CliError::new(format!("stderr write failed: {err}")))?;

    cascade_api::serve(state, &config.server)
        .await
        .map_err(|err| CliError::new(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the configured directory store.
fn build_store(config: &StoreConfig) -> CliResult<Arc<dyn DirectoryStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryDirectoryStore::new())),
        StoreBackend::Sqlite => {
            let path = config
                .path
                .clone()
                .ok_or_else(|| CliError::new("sqlite backend requires store path"))?;
            let store_config = SqliteStoreConfig {
                path,
                journal_mode: match config.journal_mode {
                    StoreJournalMode::Wal => SqliteJournalMode::Wal,
                    StoreJournalMode::Delete => SqliteJournalMode::Delete,
                },
                sync_mode: match config.sync_mode {
                    StoreSyncMode::Full => SqliteSyncMode::Full,
                    StoreSyncMode::Normal => SqliteSyncMode::Normal,
                },
                busy_timeout_ms: config.busy_timeout_ms,
            };
            let store = SqliteDirectoryStore::new(store_config)
                .map_err(|err| CliError::new(err.to_string()))?;
            Ok(Arc::new(store))
        }
    }
}

// ============================================================================
// SECTION: Offline Commands
// ============================================================================

/// Validates a structure snapshot and prints the report as JSON.
fn run_structure_check(input: &std::path::Path) -> CliResult<ExitCode> {
    let snapshot = load_structure(input).map_err(|err| CliError::new(err.to_string()))?;
    let report = validate_structure(&snapshot.units, &snapshot.levels);
    let summary = report.summary();

    #[derive(Serialize)]
    /// Combined check output.
    struct CheckOutput<'a> {
        /// Full validation report.
        report: &'a cascade_core::runtime::StructureReport,
        /// Client-safe summary.
        summary: &'a cascade_core::ValidationSummary,
    }
    write_json_line(&CheckOutput {
        report: &report,
        summary: &summary,
    })?;
    if report.is_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Resolves one KPI's perspective from a cascade snapshot.
fn run_kpi_resolve(input: &std::path::Path, kpi: &str) -> CliResult<ExitCode> {
    let snapshot = load_cascade(input).map_err(|err| CliError::new(err.to_string()))?;
    let kpi_id = KpiId::new(kpi);
    let Some(record) = snapshot.kpis.iter().find(|record| record.id == kpi_id) else {
        return Err(CliError::new(format!("kpi {kpi} not present in snapshot")));
    };
    let tenant = record.tenant_id;
    let store = snapshot
        .into_store()
        .map_err(|err| CliError::new(err.to_string()))?;

    match resolve_perspective(&store, tenant, &kpi_id) {
        Ok(resolved) => {
            #[derive(Serialize)]
            /// Offline resolution output.
            struct ResolveOutput<'a> {
                /// Inherited perspective.
                perspective: &'a cascade_core::Perspective,
                /// Root organizational KPI.
                root_kpi_id: &'a KpiId,
                /// Link hops taken.
                depth: usize,
                /// KPI identifiers walked.
                path: &'a [KpiId],
            }
            write_json_line(&ResolveOutput {
                perspective: &resolved.perspective,
                root_kpi_id: &resolved.root_kpi_id,
                depth: resolved.depth,
                path: &resolved.path,
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            write_stderr_line(&format!("resolution failed: {err}"))
                .map_err(|err| CliError::new(format!("stderr write failed: {err}")))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prints the commented sample configuration.
fn run_config_sample() -> CliResult<ExitCode> {
    write_stdout_line(CascadeConfig::sample_toml().trim_end())
        .map_err(|err| CliError::new(format!("stdout write failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates a configuration file.
fn run_config_validate(config: &std::path::Path) -> CliResult<ExitCode> {
    match CascadeConfig::load(Some(config)) {
        Ok(_) => {
            write_stdout_line("config ok")
                .map_err(|err| CliError::new(format!("stdout write failed: {err}")))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            write_stderr_line(&format!("config invalid: {err}"))
                .map_err(|err| CliError::new(format!("stderr write failed: {err}")))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes a value as one pretty-printed JSON document to stdout.
fn write_json_line<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("serialization failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(format!("stdout write failed: {err}")))
}

/// Writes a failure message and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
