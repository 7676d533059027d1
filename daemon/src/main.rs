//! Burn verification daemon — command-line entry point.

use anyhow::Context;
use burnproof_types::{DeploymentMode, Network, RejectReason, VerificationResult};
use burnproof_utils::{init_logging, LogFormat};
use burnproof_verification::{BurnVerifier, VerifierConfig};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "burnproof-daemon", about = "Token burn transaction verifier")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override
    /// the file's settings.
    #[arg(long, env = "BURNPROOF_CONFIG")]
    config: Option<PathBuf>,

    /// Deployment mode: "production", "development" or "test".
    /// Anything else means production.
    #[arg(long, env = "BURNPROOF_DEPLOYMENT")]
    deployment: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BURNPROOF_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BURNPROOF_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Verify one burn transaction and print the result as JSON.
    Verify {
        #[arg(long)]
        signature: String,

        #[arg(long)]
        wallet: String,

        /// "devnet" or "mainnet".
        #[arg(long, default_value = "devnet")]
        network: Network,

        /// Print Prometheus metrics to stderr afterwards.
        #[arg(long)]
        metrics: bool,
    },
    /// Verify newline-delimited JSON requests from stdin, one result per line.
    /// Signatures are consumed across the whole batch.
    Batch,
    /// Validate the configuration and print it with defaults filled in.
    CheckConfig,
}

/// One line of `batch` input.
#[derive(Debug, Deserialize)]
struct BatchRequest {
    signature: String,
    wallet: String,
    #[serde(default = "default_network")]
    network: Network,
}

fn default_network() -> Network {
    Network::Devnet
}

fn load_config(cli: &Cli) -> anyhow::Result<VerifierConfig> {
    let mut config = match &cli.config {
        Some(path) => VerifierConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()))?,
        None => VerifierConfig::default(),
    };
    if let Some(flag) = cli.deployment.as_deref() {
        config.deployment = DeploymentMode::from_flag(Some(flag));
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

/// A line that does not parse is answered with an `InvalidFormat` result so
/// the rest of the batch still runs.
fn parse_batch_line(line: &str) -> Result<BatchRequest, VerificationResult> {
    serde_json::from_str(line).map_err(|e| {
        tracing::warn!(error = %e, "unparseable batch line");
        VerificationResult::rejected_with(Network::Devnet, RejectReason::InvalidFormat, "batch line")
    })
}

async fn run_batch(verifier: &BurnVerifier) -> anyhow::Result<ExitCode> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut all_valid = true;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let result = match parse_batch_line(line) {
            Ok(request) => {
                verifier
                    .verify(&request.signature, &request.wallet, request.network)
                    .await
            }
            Err(rejected) => rejected,
        };
        all_valid &= result.is_valid();
        println!("{}", serde_json::to_string(&result)?);
    }
    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format: LogFormat = config.log_format.parse().map_err(anyhow::Error::msg)?;
    init_logging(format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::CheckConfig => {
            config.validate()?;
            print!("{}", config.to_toml_string()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify {
            signature,
            wallet,
            network,
            metrics,
        } => {
            let verifier = BurnVerifier::from_config(&config)?;
            let result = verifier.verify(&signature, &wallet, network).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if metrics {
                eprint!("{}", verifier.metrics().encode());
            }
            Ok(if result.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Batch => {
            let verifier = BurnVerifier::from_config(&config)?;
            run_batch(&verifier).await
        }
    }
}
