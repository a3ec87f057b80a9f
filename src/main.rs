mod commands;

use anyhow::{Context, Result};
use armctl::config::{Config, Overrides};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command-line client for Azure Resource Manager
#[derive(Parser, Debug)]
#[command(name = "armctl", version = armctl::VERSION, about, long_about = None)]
struct Args {
    /// Subscription to use
    #[arg(short, long, global = true)]
    subscription: Option<String>,

    /// Resource Manager endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the resource types this build knows about
    Types,

    /// Format, parse and validate resource IDs
    #[command(subcommand)]
    Id(IdCommand),

    /// Work with discriminated payloads
    #[command(subcommand)]
    Payload(PayloadCommand),

    /// Read a resource
    Get {
        /// Resource ID
        id: String,
        /// Resource type; inferred from the ID when omitted
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,
        /// Also decode the resource's discriminated payload
        #[arg(long)]
        decode: bool,
    },

    /// List resources of one type
    List {
        /// Resource type
        resource_type: String,
        /// Parent segment values as name=value. subscriptionId defaults to the
        /// configured subscription
        #[arg(short, long = "parent")]
        parents: Vec<String>,
    },

    /// Create a resource that does not exist yet
    Create {
        /// Resource ID
        id: String,
        /// JSON file holding the request body, '-' for stdin
        #[arg(short, long)]
        body: PathBuf,
        /// Resource type; inferred from the ID when omitted
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,
        /// Location, e.g. "West Europe"
        #[arg(short, long)]
        location: Option<String>,
        /// Tags as key=value
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Update an existing resource with its type's update method
    Update {
        /// Resource ID
        id: String,
        /// JSON file holding the request body, '-' for stdin
        #[arg(short, long)]
        body: PathBuf,
        /// Resource type; inferred from the ID when omitted
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,
        /// Tags as key=value
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a resource
    Delete {
        /// Resource ID
        id: String,
        /// Resource type; inferred from the ID when omitted
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,
    },

    /// Show or change the saved configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum IdCommand {
    /// Build an ID from segment values
    Format {
        /// Resource type
        resource_type: String,
        /// Segment values as name=value
        #[arg(long = "set")]
        values: Vec<String>,
    },
    /// Split an ID into its segment values
    Parse {
        /// Resource ID
        id: String,
        /// Resource type; inferred from the ID when omitted
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,
        /// Tolerate casing differences in literal segments
        #[arg(long)]
        insensitive: bool,
    },
    /// Check an ID against a resource type
    Validate {
        /// Resource type
        resource_type: String,
        /// Resource ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum PayloadCommand {
    /// Decode a JSON document as a member of a payload family
    Decode {
        /// Family name, e.g. TimeSeriesInsightsEnvironment
        family: String,
        /// JSON file, '-' for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
        /// JSON pointer to the payload within the document
        #[arg(short, long, default_value = "")]
        pointer: String,
    },
    /// List the payload families that can be decoded
    Families,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the saved configuration and where it lives
    Show,
    /// Update saved values
    Set {
        #[arg(long)]
        subscription: Option<String>,
        #[arg(long)]
        tenant: Option<String>,
        #[arg(long)]
        client_id: Option<String>,
        #[arg(long)]
        endpoint: Option<String>,
        /// Seconds between polls of long-running operations
        #[arg(long)]
        poll_interval: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("armctl {} started with log level: {:?}", armctl::VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("armctl").join("armctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".armctl").join("armctl.log");
    }
    PathBuf::from("armctl.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling");
                cancel.cancel();
            }
        });
    }

    let config = Config::load();
    let overrides = Overrides {
        subscription_id: args.subscription.clone(),
        endpoint: args.endpoint.clone(),
    };

    let result = commands::run(args.command, args.output, &config, &overrides, &cancel).await;
    if let Err(err) = &result {
        tracing::error!("Command failed: {:#}", err);
    }
    result
}
