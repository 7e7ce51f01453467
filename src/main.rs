// src/main.rs
//
// cep - resolve CEPs from the command line
//
// Prints one JSON address per resolved code; failures go to stderr and
// make the process exit non-zero.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;

use cep::{Context, HttpConfig, ResolutionService};

#[derive(Debug, Parser)]
#[command(name = "cep", version, about = "Look up Brazilian postal codes (CEP)")]
struct Args {
    /// Seconds to wait for each code before giving up
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Codes to look up, with or without the '-'
    #[arg(required = true)]
    codes: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let timeout = Duration::from_secs(args.timeout);

    // 1. FETCHERS
    let config = HttpConfig {
        timeout,
        ..HttpConfig::default()
    };
    let service = ResolutionService::with_config(&config).context("failed to build HTTP client")?;

    // 2. LOOKUPS
    let mut failed = false;
    for code in &args.codes {
        let (ctx, _cancel) = Context::background().with_timeout(timeout);
        match service.resolve(&ctx, code).await {
            Ok(address) => println!("{}", serde_json::to_string_pretty(&address)?),
            Err(err) => {
                eprintln!("{}: {}", code, err);
                failed = true;
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
