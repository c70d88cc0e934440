use clap::Parser;
use std::fs::File;
use std::io;
use std::process::ExitCode;

use sdm_eon_sim::api::config_dto::ConfigDto;
use sdm_eon_sim::api::scenario_dto::ScenarioDto;
use sdm_eon_sim::domain::simulation::replication::run_replications;
use sdm_eon_sim::domain::simulation::report::write_summaries;
use sdm_eon_sim::error::Result;
use sdm_eon_sim::loader::parser::parse_json_file;
use sdm_eon_sim::logger;

/// Replays a connection scenario on an SDM elastic optical network.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Network, physical layer and simulation configuration (JSON).
    #[arg(long)]
    config: String,

    /// Ordered establish/release events (JSON).
    #[arg(long)]
    scenario: String,

    /// CSV file for the per-replication results; stdout if omitted.
    #[arg(long)]
    output: Option<String>,

    /// Overrides the configured number of replications.
    #[arg(long)]
    replications: Option<usize>,
}

fn run(args: &Args) -> Result<()> {
    let config: ConfigDto = parse_json_file(&args.config)?;
    let scenario: ScenarioDto = parse_json_file(&args.scenario)?;
    log::info!("Loaded '{}' and '{}' ({} events).", args.config, args.scenario, scenario.events.len());

    let replications = args.replications.unwrap_or(config.simulation.replications).max(1);
    let summaries = run_replications(&config, &scenario, replications)?;

    match &args.output {
        Some(path) => {
            write_summaries(File::create(path)?, &summaries)?;
            log::info!("Results written to '{}'.", path);
        }
        None => write_summaries(io::stdout().lock(), &summaries)?,
    }

    Ok(())
}

fn main() -> ExitCode {
    logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
