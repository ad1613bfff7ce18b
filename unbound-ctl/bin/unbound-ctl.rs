//! Command-line utility for administering an Unbound resolver
//!
//! Talks to the daemon's remote control interface, either over its Unix
//! socket or over TLS with a client certificate, and covers the day to day
//! operations:
//! - Status and statistics
//! - Reloading and changing verbosity
//! - Flushing names and zones from the cache
//! - Managing forward zones and reading or setting options

use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use unbound_control::{
    ClientConfig, DEFAULT_CONTROL_SOCKET, DEFAULT_HOST, DEFAULT_PORT, Response, ResponseData,
    Target, Timeouts, TlsConfig, UnboundControlClient, ValidOption,
};

/// Command-line utility for administering an Unbound resolver
#[derive(Parser, Debug)]
#[command(name = "unbound-ctl")]
#[command(about = "Control a running Unbound resolver", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the control socket
    #[arg(short, long, conflicts_with_all = ["cert", "key"])]
    socket: Option<PathBuf>,

    /// Host of the TLS control interface
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port of the TLS control interface
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Client certificate (unbound_control.pem)
    #[arg(long, requires = "key")]
    cert: Option<PathBuf>,

    /// Client private key (unbound_control.key)
    #[arg(long, requires = "cert")]
    key: Option<PathBuf>,

    /// CA bundle to verify the server with (unbound_server.pem)
    #[arg(long)]
    ca: Option<PathBuf>,

    /// Name to verify the server certificate against
    #[arg(long)]
    server_name: Option<String>,

    /// Give up waiting for a reply after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the parsed reply as JSON instead of the daemon's text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show server status
    Status,
    /// Print statistics and reset the counters
    Stats,
    /// Print statistics without resetting the counters
    StatsNoreset,
    /// Change the logging verbosity (0-5)
    Verbosity {
        level: u8,
    },
    /// Reload the configuration and flush the cache
    Reload,
    /// Remove a name from the cache
    Flush {
        name: String,
        /// Also remove it from cachedb
        #[arg(long)]
        cachedb: bool,
    },
    /// Remove everything at or below a name from the cache
    FlushZone {
        name: String,
        /// Also remove it from cachedb
        #[arg(long)]
        cachedb: bool,
    },
    /// Add a forward zone
    ForwardAdd {
        zone: String,
        /// Upstream addresses
        #[arg(required = true)]
        addresses: Vec<String>,
        /// Mark the zone domain-insecure
        #[arg(long)]
        insecure: bool,
        /// Forward over TLS
        #[arg(long)]
        tls: bool,
    },
    /// Remove a forward zone
    ForwardRemove {
        zone: String,
        /// Also remove the domain-insecure mark
        #[arg(long)]
        insecure: bool,
    },
    /// Read an option from the running server
    GetOption {
        option: ValidOption,
    },
    /// Change an option without a reload
    SetOption {
        option: ValidOption,
        value: String,
    },
    /// List forward zones
    ListForwards,
    /// List local zones
    ListLocalZones,
    /// Show which servers would be queried for a name
    Lookup {
        name: String,
    },
}

impl Cli {
    fn config(&self) -> ClientConfig {
        let target = match (&self.socket, &self.cert, &self.key) {
            (Some(socket), _, _) => Target::unix(socket),
            (None, Some(cert), Some(key)) => {
                let mut tls = TlsConfig::new(cert, key);
                tls.ca.clone_from(&self.ca);
                tls.server_name.clone_from(&self.server_name);
                Target::tcp(&self.host, self.port, tls)
            }
            _ => Target::unix(DEFAULT_CONTROL_SOCKET),
        };

        let mut timeouts = Timeouts::default();
        if let Some(seconds) = self.timeout {
            timeouts = timeouts.with_response(Duration::from_secs(seconds));
        }

        ClientConfig { target, timeouts }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    tracing::debug!("Using control interface {}", config.target);

    let client = UnboundControlClient::new(config);
    let response = run(&client, cli.command)
        .await
        .context("Control command failed")?;

    print_response(&response, cli.json)
}

async fn run(
    client: &UnboundControlClient,
    command: Commands,
) -> unbound_control::Result<Response> {
    match command {
        Commands::Status => client.status().await,
        Commands::Stats => client.stats().await,
        Commands::StatsNoreset => client.stats_noreset().await,
        Commands::Verbosity { level } => client.verbosity(level).await,
        Commands::Reload => client.reload().await,
        Commands::Flush { name, cachedb } => client.flush(&name, cachedb).await,
        Commands::FlushZone { name, cachedb } => client.flush_zone(&name, cachedb).await,
        Commands::ForwardAdd {
            zone,
            addresses,
            insecure,
            tls,
        } => client.forward_add(&zone, &addresses, insecure, tls).await,
        Commands::ForwardRemove { zone, insecure } => client.forward_remove(&zone, insecure).await,
        Commands::GetOption { option } => client.get_option(option).await,
        Commands::SetOption { option, value } => client.set_option(option, &value).await,
        Commands::ListForwards => client.list_forwards().await,
        Commands::ListLocalZones => client.list_local_zones().await,
        Commands::Lookup { name } => client.lookup(&name).await,
    }
}

fn print_response(response: &Response, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    match &response.data {
        ResponseData::Lines(lines) if lines.is_empty() => println!("(none)"),
        _ => print!("{}", response.raw),
    }

    Ok(())
}
