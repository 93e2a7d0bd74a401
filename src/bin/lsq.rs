use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use livestatus_client::postfilter::{DetectNumbers, EmptyToNull};
use livestatus_client::shared::config::{DEFAULT_PORT, Settings, load_settings, load_settings_from};
use livestatus_client::{Endpoint, ExecutionMode, LivestatusClient, Query, logging};

#[derive(Parser)]
#[command(name = "lsq")]
#[command(about = "Query one or more Livestatus monitors", long_about = None)]
struct Args {
    /// Table to query, e.g. hosts or services
    #[arg(short, long)]
    table: String,

    /// Comma-separated column list; all columns when omitted
    #[arg(short, long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Filter line, e.g. "state = 0" or "Or: 2". Repeatable
    #[arg(short, long)]
    filter: Vec<String>,

    /// Stats line, e.g. "state = 2". Repeatable
    #[arg(long)]
    stats: Vec<String>,

    /// Extra endpoint as [name=]host[:port]. Repeatable
    #[arg(short, long)]
    endpoint: Vec<String>,

    /// Settings file. Falls back to LIVESTATUS_CONFIG, then ./config.*
    #[arg(long)]
    config: Option<PathBuf>,

    /// Query all monitors concurrently
    #[arg(long)]
    parallel: bool,

    /// Look up column types and convert fields
    #[arg(long)]
    auto_detect: bool,

    /// Leave out the monitor column
    #[arg(long)]
    omit_monitor: bool,

    /// Turn empty fields into null
    #[arg(long)]
    empty_to_null: bool,

    /// Turn numeric-looking fields into numbers
    #[arg(long)]
    numbers: bool,

    /// Per-monitor timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn parse_endpoint(arg: &str) -> anyhow::Result<Endpoint> {
    let (name, address) = match arg.split_once('=') {
        Some((name, address)) => (Some(name), address),
        None => (None, arg),
    };
    let (host, port) = match address.rsplit_once(':') {
        Some((host, port)) => (
            host,
            port.parse::<u16>()
                .with_context(|| format!("invalid port in endpoint '{}'", arg))?,
        ),
        None => (address, DEFAULT_PORT),
    };
    if host.is_empty() {
        bail!("endpoint '{}' has no host", arg);
    }

    let endpoint = Endpoint::new(host, port);
    Ok(match name {
        Some(name) => endpoint.with_name(name),
        None => endpoint,
    })
}

fn settings(args: &Args) -> anyhow::Result<Settings> {
    match &args.config {
        Some(path) => load_settings_from(path)
            .with_context(|| format!("failed to load {}", path.display())),
        // No settings file is fine when endpoints come from the command line.
        None if !args.endpoint.is_empty() => Ok(load_settings().unwrap_or_default()),
        None => load_settings().context("failed to load settings"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = settings(&args)?;
    logging::init(&settings.logging)?;

    let mut client = LivestatusClient::from_settings(&settings)?;
    for arg in &args.endpoint {
        client.registry_mut().register(parse_endpoint(arg)?)?;
    }
    if args.parallel {
        client = client.with_mode(ExecutionMode::Parallel);
    }
    if let Some(ms) = args.timeout_ms {
        client = client.with_timeout(Duration::from_millis(ms));
    }

    let mut query = Query::new(&args.table)
        .with_columns(args.columns.iter().map(|c| c.trim()).filter(|c| !c.is_empty()))
        .auto_detect_types(args.auto_detect)
        .omit_monitor_column(args.omit_monitor);
    for filter in &args.filter {
        query = query.with_filter(filter.as_str());
    }
    for stats in &args.stats {
        query = query.with_stats(stats.as_str());
    }
    if args.empty_to_null {
        query = query.with_post_filter(EmptyToNull);
    }
    if args.numbers {
        query = query.with_post_filter(DetectNumbers);
    }

    let result = match client.run(&query).await {
        Ok(result) => result,
        Err(e) => {
            e.log_error();
            return Err(e.into());
        }
    };

    println!("{}", result.to_json()?);
    for failure in result.failures() {
        eprintln!("monitor {} failed: {}", failure.endpoint, failure.error);
    }
    for conversion in result.conversion_errors() {
        eprintln!("{}", conversion);
    }
    Ok(())
}
