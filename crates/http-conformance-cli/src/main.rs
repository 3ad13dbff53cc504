//! Differential HTTP conformance runner
//!
//! Replays the request catalog against a reference server and a server under
//! test, prints one line per test and writes a `.diff` file for every failure.

use anyhow::{Context, Result};
use clap::Parser;
use http_conformance::catalog::{default_catalog, known_crashers};
use http_conformance::config::{
    DEFAULT_CANDIDATE_URL, DEFAULT_REFERENCE_URL, DEFAULT_RESULTS_DIR, DEFAULT_TIMEOUT,
};
use http_conformance::{ComparisonConfig, ComparisonRunner};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Compare an HTTP server under test against a reference server.
#[derive(Debug, Parser)]
#[command(name = "webserv-compare", version, about)]
struct Args {
    /// Base URL of the trusted reference server
    #[arg(long, env = "NGINX_SERVER", default_value = DEFAULT_REFERENCE_URL)]
    reference_url: String,

    /// Base URL of the server under test
    #[arg(long, env = "CPP_SERVER", default_value = DEFAULT_CANDIDATE_URL)]
    candidate_url: String,

    /// Directory for failure artifacts, wiped at the start of every run
    #[arg(long, default_value = DEFAULT_RESULTS_DIR)]
    results_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Also run the scenarios known to crash one of the servers
    #[arg(long)]
    include_known_crashers: bool,

    /// Write a JSON report of every test to this path
    #[arg(long)]
    json_summary: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> ComparisonConfig {
        ComparisonConfig::new(&self.reference_url, &self.candidate_url)
            .with_results_dir(&self.results_dir)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config();
    info!(?config, "Starting comparison run");

    let mut runner = ComparisonRunner::new(config)?;
    runner.prepare().context("cannot prepare results directory")?;
    println!(
        "🧹 Cleaned {}/ and prepared fresh test run.\n",
        runner.config.results_dir.display()
    );
    println!(
        "Comparing Servers...\nBase: {}\nTest: {}\n",
        runner.config.reference_url, runner.config.candidate_url
    );

    let mut cases = default_catalog();
    if args.include_known_crashers {
        for crasher in known_crashers() {
            warn!(
                test = %crasher.case.name,
                "Running scenario known to crash the {} server",
                crasher.breaks
            );
            cases.push(crasher.case);
        }
    }

    runner
        .run_all(&cases)
        .await
        .context("comparison run aborted")?;
    runner.print_summary();

    if let Some(ref path) = args.json_summary {
        runner.write_json_summary(path)?;
        info!("Wrote JSON summary to {:?}", path);
    }

    Ok(if runner.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
