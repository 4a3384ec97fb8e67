// crates/foxden-doi-cli/src/main.rs
// ============================================================================
// Module: FOXDEN DOI CLI Entry Point
// Description: Command dispatcher for DOI publication and metadata updates.
// Purpose: Give operators a single binary for the publication workflow.
// Dependencies: clap, foxden-doi-config, foxden-doi-core, foxden-doi-providers,
// foxden-doi-services, tracing-subscriber.
// ============================================================================

//! ## Overview
//! `foxden-doi` wires the configured collaborators (token signer, metadata
//! catalog, provider registry) into the core workflow:
//! - `publish` mints a DOI for a dataset through a named provider.
//! - `update` writes a DOI onto every catalog record of a dataset.
//! - `config validate` checks a configuration file without network calls.
//!
//! Diagnostics go to stderr through `tracing`; results go to stdout.


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use foxden_doi_config::FoxdenDoiConfig;
use foxden_doi_core::DatasetId;
use foxden_doi_core::DatasetPublisher;
use foxden_doi_core::FailurePolicy;
use foxden_doi_core::MetadataReader;
use foxden_doi_core::MetadataSynchronizer;
use foxden_doi_core::ProviderResult;
use foxden_doi_core::SyncOutcome;
use foxden_doi_core::SyncReport;
use foxden_doi_core::TokenIssuer;
use foxden_doi_core::WorkflowError;
use foxden_doi_providers::ProviderRegistry;
use foxden_doi_services::Ed25519TokenSigner;
use foxden_doi_services::HttpMetadataCatalog;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directive.
const LOG_ENV_VAR: &str = "FOXDEN_DOI_LOG";
/// Filter used when no directive is configured.
const DEFAULT_LOG_DIRECTIVE: &str = "warn";
/// Filter used with `--verbose`.
const VERBOSE_LOG_DIRECTIVE: &str = "debug";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "foxden-doi", version, disable_help_subcommand = true)]
struct Cli {
    /// Configuration file (overrides `FOXDEN_DOI_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish a dataset through a DOI provider.
    Publish(PublishCommand),
    /// Write a DOI onto every catalog record of a dataset.
    Update(UpdateCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `publish`.
#[derive(Args, Debug)]
struct PublishCommand {
    /// User on whose behalf the catalog is read.
    #[arg(long)]
    user: String,
    /// Provider name (case-insensitive).
    #[arg(long)]
    provider: String,
    /// Dataset identifier.
    #[arg(long)]
    did: String,
    /// Human description of the dataset.
    #[arg(long, default_value = "")]
    description: String,
}

/// Arguments for `update`.
#[derive(Args, Debug)]
struct UpdateCommand {
    /// Dataset identifier.
    #[arg(long)]
    did: String,
    /// DOI to record.
    #[arg(long)]
    doi: String,
    /// Resolvable DOI link to record.
    #[arg(long = "doi-link")]
    doi_link: String,
    /// Override the configured failure policy.
    #[arg(long, value_enum)]
    failure_policy: Option<PolicyArg>,
}

/// Failure policy names accepted on the command line.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PolicyArg {
    /// Stop at the first failed record.
    StopOnFirst,
    /// Attempt every record.
    Continue,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::StopOnFirst => Self::StopOnFirst,
            PolicyArg::Continue => Self::Continue,
        }
    }
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a FOXDEN DOI configuration file.
    Validate,
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
        Self { message }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Publish(command) => command_publish(config_path, &command),
        Commands::Update(command) => command_update(config_path, &command),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(config_path),
    }
}

/// Installs the stderr log subscriber.
fn init_logging(verbose: bool) {
    let env_directive = std::env::var(LOG_ENV_VAR).ok();
    let directive = log_directive(verbose, env_directive.as_deref());
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Selects the log filter directive.
fn log_directive(verbose: bool, env_directive: Option<&str>) -> &str {
    if verbose {
        return VERBOSE_LOG_DIRECTIVE;
    }
    match env_directive {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => DEFAULT_LOG_DIRECTIVE,
    }
}

// ============================================================================
// SECTION: Workflow Wiring
// ============================================================================

/// Collaborators built from configuration.
struct Workflow {
    /// Token issuer backed by the configured signing key.
    issuer: TokenIssuer,
    /// Metadata catalog client.
    catalog: HttpMetadataCatalog,
    /// Registered DOI providers.
    registry: ProviderRegistry,
    /// Client name sent with catalog searches.
    client_name: String,
    /// Configured failure policy.
    failure_policy: FailurePolicy,
}

impl Workflow {
    /// Builds collaborators from a validated configuration.
    fn from_config(config: &FoxdenDoiConfig) -> CliResult<Self> {
        let signer = Ed25519TokenSigner::from_key_file(&config.authz.signing_key_path)
            .map_err(|err| CliError::new(err.to_string()))?;
        let catalog =
            HttpMetadataCatalog::new(&config.services.metadata_url, &config.catalog_http_config())
                .map_err(|err| CliError::new(err.to_string()))?;
        let registry = ProviderRegistry::with_builtin_providers(config.provider_configs())
            .map_err(|err| CliError::new(err.to_string()))?;
        Ok(Self {
            issuer: TokenIssuer::new(signer, config.token_issuer_config()),
            catalog,
            registry,
            client_name: config.services.client_name.clone(),
            failure_policy: config.sync.failure_policy,
        })
    }

    /// Returns a catalog reader over these collaborators.
    fn reader(&self) -> MetadataReader<'_> {
        MetadataReader::new(&self.issuer, &self.catalog).with_client_name(self.client_name.clone())
    }
}

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<FoxdenDoiConfig> {
    FoxdenDoiConfig::load(path)
        .map_err(|err| CliError::new(format!("failed to load configuration: {err}")))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the publish command.
fn command_publish(config_path: Option<&Path>, command: &PublishCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let workflow = Workflow::from_config(&config)?;
    let publisher = DatasetPublisher::new(workflow.reader(), &workflow.registry);
    let did = DatasetId::new(command.did.clone());
    let result = publisher
        .publish_dataset(&command.user, &command.provider, &did, &command.description)
        .map_err(|err| CliError::new(workflow_error_message(&err, &workflow.registry)))?;
    write_stdout_line(&render_publish(&result)?)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the update command.
fn command_update(config_path: Option<&Path>, command: &UpdateCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let workflow = Workflow::from_config(&config)?;
    let policy = command.failure_policy.map_or(workflow.failure_policy, FailurePolicy::from);
    let synchronizer = MetadataSynchronizer::new(workflow.reader(), policy);
    let did = DatasetId::new(command.did.clone());
    let report = synchronizer
        .apply(&did, &command.doi, &command.doi_link)
        .map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line(&render_report(&report)?)?;
    Ok(exit_code_for(report.outcome()))
}

/// Executes the config validation command.
fn command_config_validate(config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let registry = ProviderRegistry::with_builtin_providers(config.provider_configs())
        .map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line(&format!(
        "configuration ok (providers: {})",
        provider_list(&registry)
    ))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// JSON view of a sync report.
#[derive(Serialize)]
struct ReportView<'a> {
    /// Final workflow state.
    outcome: SyncOutcome,
    /// Underlying report.
    #[serde(flatten)]
    report: &'a SyncReport,
}

/// Renders a publish result as JSON.
fn render_publish(result: &ProviderResult) -> CliResult<String> {
    serde_json::to_string_pretty(result)
        .map_err(|err| CliError::new(format!("failed to render result: {err}")))
}

/// Renders a sync report as JSON.
fn render_report(report: &SyncReport) -> CliResult<String> {
    let view = ReportView {
        outcome: report.outcome(),
        report,
    };
    serde_json::to_string_pretty(&view)
        .map_err(|err| CliError::new(format!("failed to render report: {err}")))
}

/// Maps a sync outcome onto a process exit code.
fn exit_code_for(outcome: SyncOutcome) -> ExitCode {
    match outcome {
        SyncOutcome::Done => ExitCode::SUCCESS,
        SyncOutcome::PartiallyPropagated | SyncOutcome::Failed => ExitCode::FAILURE,
    }
}

/// Formats a workflow error, listing configured providers when relevant.
fn workflow_error_message(err: &WorkflowError, registry: &ProviderRegistry) -> String {
    match err {
        WorkflowError::UnsupportedProvider { .. } => {
            format!("{err} (configured providers: {})", provider_list(registry))
        }
        _ => err.to_string(),
    }
}

/// Comma-separated configured provider names, or `none`.
fn provider_list(registry: &ProviderRegistry) -> String {
    let names = registry.configured_provider_names();
    if names.is_empty() { "none".to_string() } else { names.join(", ") }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
        .map_err(|err| CliError::new(format!("failed to write to stdout: {err}")))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
