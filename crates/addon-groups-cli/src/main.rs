// crates/addon-groups-cli/src/main.rs
// ============================================================================
// Module: Addon Groups CLI Entry Point
// Description: Command dispatcher for group inspection and offline checks.
// Purpose: Validate group declarations, check coverage, and preview resolution.
// Dependencies: addon-groups-config, addon-groups-core, clap, serde, thiserror.
// ============================================================================

//! ## Overview
//! The `addon-groups` CLI works offline against the groups document and an
//! addon index document. It never provisions clusters; it answers the
//! questions a group run would fail on (invalid declarations, unhandled
//! addons, resolution mismatches) before any cluster exists.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use addon_groups_config::GroupsConfig;
use addon_groups_config::load_addon_index;
use addon_groups_config::load_overrides;
use addon_groups_core::AddonName;
use addon_groups_core::AddonResolver;
use addon_groups_core::ClusterTarget;
use addon_groups_core::GroupRegistry;
use addon_groups_core::runtime::EventOutcome;
use addon_groups_core::runtime::FileRunEventSink;
use addon_groups_core::runtime::NoopRunEventSink;
use addon_groups_core::runtime::RunEvent;
use addon_groups_core::runtime::RunEventSink;
use addon_groups_core::runtime::find_unhandled;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "addon-groups", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Groups document utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Group inspection utilities.
    Groups {
        /// Selected groups subcommand.
        #[command(subcommand)]
        command: GroupsCommand,
    },
    /// Check that every indexed addon belongs to a group.
    Coverage(CoverageCommand),
    /// Resolve a group's addons against an index and print them.
    Resolve(ResolveCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a groups document.
    Validate(ConfigArgs),
}

/// Groups subcommands.
#[derive(Subcommand, Debug)]
enum GroupsCommand {
    /// List declared groups.
    List(GroupsListCommand),
}

/// Shared groups document selection.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Groups document path (defaults to groups.yaml or `ADDON_GROUPS_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `groups list`.
#[derive(Args, Debug)]
struct GroupsListCommand {
    /// Groups document selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = ListFormat::Text)]
    format: ListFormat,
}

/// Arguments for `coverage`.
#[derive(Args, Debug)]
struct CoverageCommand {
    /// Groups document selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Addon index document path.
    #[arg(long, value_name = "PATH")]
    index: PathBuf,
    /// Append coverage events as JSON lines to this file.
    #[arg(long, value_name = "PATH")]
    event_log: Option<PathBuf>,
}

/// Arguments for `resolve`.
#[derive(Args, Debug)]
struct ResolveCommand {
    /// Groups document selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Group to resolve.
    #[arg(long, value_name = "NAME")]
    group: String,
    /// Addon index document path.
    #[arg(long, value_name = "PATH")]
    index: PathBuf,
    /// Override document layered over the CI defaults.
    #[arg(long, value_name = "PATH")]
    overrides: Option<PathBuf>,
    /// Skip the built-in CI override payloads.
    #[arg(long, action = ArgAction::SetTrue)]
    no_default_overrides: bool,
}

/// Output formats for `groups list`.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ListFormat {
    /// One line per group.
    Text,
    /// JSON array.
    Json,
}

/// JSON view of one declared group.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupSummary {
    /// Group name.
    name: String,
    /// Whether the declaration converted cleanly.
    valid: bool,
    /// Canonical interface tag, for valid groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_interface: Option<String>,
    /// Platform version, when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    kubernetes_version: Option<String>,
    /// Provisioner identifier, for provisioned clusters.
    #[serde(skip_serializing_if = "Option::is_none")]
    provisioner_id: Option<String>,
    /// Declared addons.
    addons: Vec<AddonName>,
    /// Conversion failure, for invalid groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
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
fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("addon-groups {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
        },
        Commands::Groups {
            command,
        } => match command {
            GroupsCommand::List(command) => command_groups_list(&command),
        },
        Commands::Coverage(command) => command_coverage(&command),
        Commands::Resolve(command) => command_resolve(&command),
    }
}

/// Prints CLI help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes `config validate`.
fn command_config_validate(command: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(command)?;
    let mut problems = Vec::new();
    if let Err(err) = config.validate_strict() {
        problems.push(err.to_string());
    }
    for (group, addons) in config.registry().duplicate_addons() {
        let names: Vec<&str> = addons.iter().map(|name| name.as_str()).collect();
        problems.push(format!("group {group} lists addons more than once: {}", names.join(", ")));
    }
    if !problems.is_empty() {
        return Err(CliError::new(problems.join("\n")));
    }
    write_stdout_line(&format!(
        "config ok: {} groups in {}",
        config.registry().len(),
        config.source().display()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Group Commands
// ============================================================================

/// Executes `groups list`.
fn command_groups_list(command: &GroupsListCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let summaries = summarize_groups(config.registry());
    match command.format {
        ListFormat::Json => {
            let payload = serde_json::to_string_pretty(&summaries)
                .map_err(|err| CliError::new(format!("failed to encode groups: {err}")))?;
            write_stdout_line(&payload)
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ListFormat::Text => {
            for summary in &summaries {
                write_stdout_line(&format_summary(summary))
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Builds one summary per declared group, in name order.
fn summarize_groups(registry: &GroupRegistry) -> Vec<GroupSummary> {
    registry
        .names()
        .map(|name| {
            let addons =
                registry.declaration(name.as_str()).map(|decl| decl.addons.clone()).unwrap_or_default();
            match registry.lookup(name.as_str()) {
                Ok(group) => {
                    let (version, provisioner) = match &group.cluster {
                        ClusterTarget::EphemeralLocal {
                            version,
                        } => (Some(version.to_string()), None),
                        ClusterTarget::ProvisionedRemote {
                            provisioner_id,
                            version,
                        } => (version.as_ref().map(ToString::to_string), Some(provisioner_id.to_string())),
                    };
                    GroupSummary {
                        name: name.to_string(),
                        valid: true,
                        cluster_interface: Some(group.interface().as_str().to_string()),
                        kubernetes_version: version,
                        provisioner_id: provisioner,
                        addons,
                        error: None,
                    }
                }
                Err(err) => GroupSummary {
                    name: name.to_string(),
                    valid: false,
                    cluster_interface: None,
                    kubernetes_version: None,
                    provisioner_id: None,
                    addons,
                    error: Some(err.to_string()),
                },
            }
        })
        .collect()
}

/// Renders a summary as a single text line.
fn format_summary(summary: &GroupSummary) -> String {
    let addons: Vec<&str> = summary.addons.iter().map(AddonName::as_str).collect();
    if let Some(error) = &summary.error {
        return format!("{}\tINVALID\t{error}", summary.name);
    }
    let target = summary
        .provisioner_id
        .as_deref()
        .or(summary.kubernetes_version.as_deref())
        .unwrap_or("-");
    format!(
        "{}\t{}\t{}\t{}",
        summary.name,
        summary.cluster_interface.as_deref().unwrap_or("-"),
        target,
        addons.join(",")
    )
}

// ============================================================================
// SECTION: Coverage Command
// ============================================================================

/// Executes `coverage`.
fn command_coverage(command: &CoverageCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let repository = load_addon_index(&command.index)
        .map_err(|err| CliError::new(format!("failed to load addon index: {err}")))?;
    let sink = open_event_sink(command.event_log.as_deref())?;

    sink.record(&RunEvent::coverage(EventOutcome::Started, None));
    let report = find_unhandled(config.registry(), &repository)
        .map_err(|err| CliError::new(err.to_string()))?;
    if let Err(err) = report.ensure_covered() {
        sink.record(&RunEvent::coverage(EventOutcome::Error, Some(err.to_string())));
        return Err(CliError::new(err.to_string()));
    }
    sink.record(&RunEvent::coverage(EventOutcome::Ok, None));
    write_stdout_line(&format!(
        "coverage ok: all {} addons are handled by a testing group",
        report.inspected
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Opens the coverage event sink.
fn open_event_sink(path: Option<&Path>) -> CliResult<Box<dyn RunEventSink>> {
    match path {
        Some(path) => FileRunEventSink::new(path)
            .map(|sink| Box::new(sink) as Box<dyn RunEventSink>)
            .map_err(|err| CliError::new(format!("failed to open event log: {err}"))),
        None => Ok(Box::new(NoopRunEventSink)),
    }
}

// ============================================================================
// SECTION: Resolve Command
// ============================================================================

/// Executes `resolve`.
fn command_resolve(command: &ResolveCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let group = config.registry().lookup(&command.group).map_err(|err| CliError::new(err.to_string()))?;
    let repository = load_addon_index(&command.index)
        .map_err(|err| CliError::new(format!("failed to load addon index: {err}")))?;
    let overrides = load_overrides(command.overrides.as_deref(), !command.no_default_overrides)
        .map_err(|err| CliError::new(format!("failed to load overrides: {err}")))?;
    let resolver = AddonResolver::new(Arc::new(repository), overrides);
    let addons = resolver.resolve(&group.addons).map_err(|err| CliError::new(err.to_string()))?;
    let payload = serde_json::to_string_pretty(&addons)
        .map_err(|err| CliError::new(format!("failed to encode addons: {err}")))?;
    write_stdout_line(&payload).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads the groups document.
fn load_config(args: &ConfigArgs) -> CliResult<GroupsConfig> {
    GroupsConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load groups: {err}")))
}

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

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
