//! # Wazzup-Podio CLI
//!
//! Operator tools for the relay:
//! - checking API connectivity for both platforms
//! - showing and registering the Wazzup webhook
//! - sending a one-off chat message
//! - listing the Podio app's fields
//!
//! Credentials come from the same environment variables the service reads.

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};
use wazzup_podio_clients::{
    validate_base_url, ApiError, PodioClient, PodioConfig, WazzupClient, WazzupConfig,
    WebhookSubscriptions,
};
use wazzup_podio_core::RecordStore;

// ============================================================================
// CLI Structure
// ============================================================================

/// Wazzup-Podio CLI - operate the Wazzup to Podio relay
#[derive(Parser, Debug)]
#[command(name = "wazzup-podio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator tools for the Wazzup-Podio relay")]
pub struct Cli {
    /// Logging level
    #[arg(short, long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub wazzup: WazzupArgs,

    #[command(flatten)]
    pub podio: PodioArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check connectivity to Wazzup and Podio
    Check,

    /// Manage the Wazzup webhook registration
    Webhook {
        #[command(subcommand)]
        action: WebhookCommands,
    },

    /// Send a text message to a chat
    Send {
        /// Chat id (phone number for WhatsApp)
        #[arg(long)]
        chat_id: String,

        /// Message text
        #[arg(long)]
        text: String,
    },

    /// List the fields of the configured Podio app
    Fields,
}

/// Webhook subcommands
#[derive(Subcommand, Debug)]
pub enum WebhookCommands {
    /// Show the current webhook settings
    Show,

    /// Register the relay's webhook URL
    Setup {
        /// Public URL of the relay's `/webhook/wazzup` endpoint
        #[arg(long, env = "WEBHOOK_URL")]
        url: String,

        /// Also subscribe to contact and deal creation
        #[arg(long)]
        contacts: bool,

        /// Also subscribe to channel status updates
        #[arg(long)]
        channels: bool,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Wazzup connection arguments
#[derive(Args, Debug, Clone)]
pub struct WazzupArgs {
    /// Wazzup API key
    #[arg(long = "wazzup-api-key", env = "WAZZUP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Channel messages are sent from
    #[arg(long = "wazzup-channel-id", env = "WAZZUP_CHANNEL_ID")]
    pub channel_id: Option<String>,

    /// Wazzup API base URL
    #[arg(id = "wazzup_api_url", long = "wazzup-api-url", env = "WAZZUP_API_URL")]
    pub api_url: Option<String>,
}

impl WazzupArgs {
    pub fn to_config(&self) -> WazzupConfig {
        let mut config = WazzupConfig::default();
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key.clone());
        }
        if let Some(channel_id) = &self.channel_id {
            config = config.with_channel_id(channel_id.clone());
        }
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url.clone());
        }
        config
    }
}

/// Podio connection arguments
#[derive(Args, Debug, Clone)]
pub struct PodioArgs {
    #[arg(long = "podio-client-id", env = "PODIO_CLIENT_ID", default_value = "")]
    pub client_id: String,

    #[arg(
        long = "podio-client-secret",
        env = "PODIO_CLIENT_SECRET",
        hide_env_values = true,
        default_value = ""
    )]
    pub client_secret: String,

    #[arg(long = "podio-app-id", env = "PODIO_APP_ID", default_value = "")]
    pub app_id: String,

    #[arg(
        long = "podio-app-token",
        env = "PODIO_APP_TOKEN",
        hide_env_values = true,
        default_value = ""
    )]
    pub app_token: String,

    /// Podio API base URL
    #[arg(id = "podio_api_url", long = "podio-api-url", env = "PODIO_API_URL")]
    pub api_url: Option<String>,
}

impl PodioArgs {
    pub fn to_config(&self) -> PodioConfig {
        let config = PodioConfig::default().with_credentials(
            self.client_id.clone(),
            self.client_secret.clone(),
            self.app_id.clone(),
            self.app_token.clone(),
        );
        match &self.api_url {
            Some(api_url) => config.with_api_url(api_url.clone()),
            None => config,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {arg} - {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Connectivity check failed: {message}")]
    CheckFailed { message: String },

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

// ============================================================================
// Reports
// ============================================================================

/// Outcome of a command, rendered as text or JSON
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport {
    /// One-line summary
    pub summary: String,

    /// Structured details
    pub details: Value,
}

impl CommandReport {
    pub fn new(summary: impl Into<String>, details: Value) -> Self {
        Self {
            summary: summary.into(),
            details,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, CliError> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "summary": self.summary,
                "details": self.details,
            }))?),
            OutputFormat::Text => {
                let mut out = self.summary.clone();
                if !self.details.is_null() {
                    out.push('\n');
                    out.push_str(&serde_json::to_string_pretty(&self.details)?);
                }
                Ok(out)
            }
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Parse arguments, run the selected command and print its report.
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    if let Err(e) = initialize_logging(&cli.log_level) {
        eprintln!("warning: logging not initialized: {}", e);
    }

    let (report, outcome) = execute(&cli).await?;
    println!("{}", report.render(cli.format)?);

    outcome
}

/// Install a stderr subscriber; fails if one is already installed.
fn initialize_logging(level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

/// Run the selected command.
///
/// A failed connectivity check still produces a report, so the outcome is
/// returned next to it.
pub async fn execute(cli: &Cli) -> Result<(CommandReport, Result<(), CliError>), CliError> {
    let wazzup = WazzupClient::new(cli.wazzup.to_config())?;

    match &cli.command {
        Commands::Check => {
            let podio = PodioClient::new(cli.podio.to_config())?;
            Ok(check(&wazzup, &podio).await)
        }
        Commands::Webhook { action } => {
            let report = match action {
                WebhookCommands::Show => webhook_show(&wazzup).await?,
                WebhookCommands::Setup {
                    url,
                    contacts,
                    channels,
                } => {
                    let subscriptions = WebhookSubscriptions {
                        messages_and_statuses: true,
                        contacts_and_deals_creation: *contacts,
                        channels_updates: *channels,
                    };
                    webhook_setup(&wazzup, url, subscriptions).await?
                }
            };
            Ok((report, Ok(())))
        }
        Commands::Send { chat_id, text } => Ok((send(&wazzup, chat_id, text).await?, Ok(()))),
        Commands::Fields => {
            let podio = PodioClient::new(cli.podio.to_config())?;
            Ok((fields(&podio).await?, Ok(())))
        }
    }
}

/// Check both platforms, reporting each result.
pub async fn check(
    wazzup: &WazzupClient,
    podio: &PodioClient,
) -> (CommandReport, Result<(), CliError>) {
    let mut failures = Vec::new();

    let wazzup_status = match wazzup.list_channels().await {
        Ok(channels) => json!({ "status": "connected", "channels": channels.len() }),
        Err(e) => {
            failures.push(format!("wazzup: {}", e));
            json!({ "status": "error", "error": e.to_string() })
        }
    };

    let podio_status = if podio.check_connection().await {
        json!({ "status": "connected" })
    } else {
        failures.push("podio: not connected".to_string());
        json!({ "status": "disconnected" })
    };

    let details = json!({ "wazzup": wazzup_status, "podio": podio_status });
    if failures.is_empty() {
        (CommandReport::new("All connections OK", details), Ok(()))
    } else {
        (
            CommandReport::new("Connectivity check failed", details),
            Err(CliError::CheckFailed {
                message: failures.join("; "),
            }),
        )
    }
}

pub async fn webhook_show(wazzup: &WazzupClient) -> Result<CommandReport, CliError> {
    let settings = wazzup.webhook_settings().await?;
    Ok(CommandReport::new("Current webhook settings", settings))
}

/// Register `url` with Wazzup.
pub async fn webhook_setup(
    wazzup: &WazzupClient,
    url: &str,
    subscriptions: WebhookSubscriptions,
) -> Result<CommandReport, CliError> {
    validate_base_url("url", url).map_err(|e| CliError::InvalidArgument {
        arg: "--url".to_string(),
        message: e.to_string(),
    })?;

    let result = wazzup.configure_webhook(url, subscriptions).await?;
    info!(url = %url, "Webhook registered");
    Ok(CommandReport::new(format!("Webhook configured for {}", url), result))
}

pub async fn send(
    wazzup: &WazzupClient,
    chat_id: &str,
    text: &str,
) -> Result<CommandReport, CliError> {
    if chat_id.trim().is_empty() {
        return Err(CliError::InvalidArgument {
            arg: "--chat-id".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if text.trim().is_empty() {
        return Err(CliError::InvalidArgument {
            arg: "--text".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    let result = wazzup.send_text(chat_id, text).await?;
    Ok(CommandReport::new(format!("Message sent to {}", chat_id), result))
}

/// List the app's fields as `external_id`, `type` and `label`.
pub async fn fields(podio: &PodioClient) -> Result<CommandReport, CliError> {
    let fields: Vec<Value> = podio
        .get_app_fields()
        .await?
        .iter()
        .map(|field| {
            json!({
                "external_id": field.get("external_id").cloned().unwrap_or(Value::Null),
                "type": field.get("type").cloned().unwrap_or(Value::Null),
                "label": field.pointer("/config/label").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    Ok(CommandReport::new(
        format!("App has {} fields", fields.len()),
        Value::Array(fields),
    ))
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
