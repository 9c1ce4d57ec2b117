use anyhow::{Context, Result};
use clap::Parser;
use relay_host::HostConfig;
use relay_sim::{run_scenario, ScenarioParams};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "relay-sim", version, about = "Run the frontend upgrade scenario")]
struct Cli {
    /// Host configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Value stored through V1 before the upgrade
    #[arg(long, default_value_t = 42)]
    initial_value: u128,

    /// Message stored through V2 after the upgrade
    #[arg(long, default_value = "hello from v2")]
    message: String,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => HostConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => HostConfig::default(),
    };
    let params = ScenarioParams {
        initial_value: cli.initial_value,
        message: cli.message,
    };

    let report = run_scenario(config, &params)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.generate_text());
    }

    std::process::exit(if report.passed() { 0 } else { 1 });
}
