//! BondSwap Simulator
//!
//! Offline harness for the bond exchange group authorizer: evaluate group
//! files, replay the built-in scenarios, and run seeded mutation campaigns.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bondswap_common::{TransactionGroup, TransactionRecord};
use bondswap_predicate::{GroupAuthorizer, Verdict};

mod config;
mod controller;
mod groups;
mod metrics;
mod report;
mod scenario;

use config::SimulatorConfig;
use controller::SimulationController;
use report::VerdictReport;
use scenario::{Scenario, SCENARIO_NAMES};

/// BondSwap Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "BondSwap group authorizer test and simulation environment")]
struct Args {
    /// JSON file of TMPL_* parameter values (overrides environment)
    #[arg(long, global = true, env = "BONDSWAP_PARAMS")]
    params: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a group read from a JSON file (or - for stdin)
    Evaluate {
        /// JSON array of transaction records
        #[arg(short, long)]
        group: String,
    },
    /// Run a built-in scenario, or all of them
    Scenario {
        /// Scenario name
        #[arg(default_value = "all")]
        name: String,

        /// List scenario names and exit
        #[arg(long)]
        list: bool,
    },
    /// Run random single-field mutations of valid groups
    Fuzz {
        /// Number of mutations
        #[arg(short, long, default_value = "10000")]
        iterations: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the bound template parameters
    Template,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = SimulatorConfig::from_env();
    if let Some(path) = &args.params {
        config.merge_params_file(path)?;
    }

    init_logging(&config, args.json_logs);

    let params = config.bound_parameters().map_err(|e| {
        error!(
            code = e.error_code(),
            variable = e.variable(),
            error = %e,
            "Invalid template parameters"
        );
        anyhow::anyhow!("Configuration error: {}", e)
    })?;
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }
    let authorizer = GroupAuthorizer::new(params);

    match args.command {
        Command::Evaluate { group } => evaluate(authorizer, &group),
        Command::Scenario { name, list } => {
            if list {
                for name in SCENARIO_NAMES {
                    println!("{name}");
                }
                return Ok(ExitCode::SUCCESS);
            }
            run_scenarios(authorizer, &name)
        }
        Command::Fuzz { iterations, seed } => fuzz(authorizer, iterations, seed),
        Command::Template => {
            let template = authorizer.params().to_template();
            println!("{}", serde_json::to_string_pretty(&template)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(config: &SimulatorConfig, json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn evaluate(authorizer: GroupAuthorizer, source: &str) -> anyhow::Result<ExitCode> {
    let text = if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading group from stdin")?;
        text
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading group from {source}"))?
    };

    let verdict = evaluate_text(authorizer, &text).with_context(|| format!("evaluating {source}"))?;
    println!("{}", serde_json::to_string(&VerdictReport::from(&verdict))?);

    Ok(if verdict.is_approved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Decode a JSON group and evaluate it.
fn evaluate_text(authorizer: GroupAuthorizer, text: &str) -> anyhow::Result<Verdict> {
    let members: Vec<TransactionRecord> =
        serde_json::from_str(text).context("parsing transaction records")?;
    let group = TransactionGroup::new(members).map_err(|e| {
        error!(code = e.error_code(), error = %e, "Invalid group");
        anyhow::Error::new(e)
    })?;

    let mut controller = SimulationController::new(authorizer, None);
    Ok(controller.evaluate(group.members()))
}

fn run_scenarios(authorizer: GroupAuthorizer, name: &str) -> anyhow::Result<ExitCode> {
    let scenarios = if name == "all" {
        Scenario::all(authorizer.params())?
    } else {
        vec![Scenario::load(name, authorizer.params())?]
    };

    let mut controller = SimulationController::new(authorizer, None);
    let mut failed = 0;
    for scenario in &scenarios {
        let outcome = controller.run_scenario(scenario);
        let status = if outcome.passed { "PASS" } else { "FAIL" };
        println!(
            "{status} {} -> {}",
            outcome.name,
            serde_json::to_string(&VerdictReport::from(&outcome.verdict))?
        );
        if !outcome.passed {
            failed += 1;
        }
    }

    info!(total = scenarios.len(), failed, "Scenarios complete");
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn fuzz(authorizer: GroupAuthorizer, iterations: u64, seed: Option<u64>) -> anyhow::Result<ExitCode> {
    let mut controller = SimulationController::new(authorizer, seed);
    let disagreements = controller.run_mutations(iterations);

    let metrics = controller.metrics();
    info!("Mutation campaign complete");
    info!("Evaluations: {}", metrics.total_evaluations);
    info!("Approved: {}", metrics.approved);
    info!("Rejected: {}", metrics.rejected);
    for (code, count) in metrics.rejections_by_code() {
        info!("  {}: {}", code, count);
    }
    info!("Approval rate: {:.3}", metrics.approval_rate());
    info!("Average evaluation: {}ns", metrics.average_latency_ns());
    info!("p99 evaluation: {}ns", metrics.p99_latency_ns());

    if disagreements > 0 {
        error!(disagreements, "Verdicts disagreed with mutation expectations");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
