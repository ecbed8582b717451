mod cli;
mod error;
mod ingest;
mod logging;
mod sink;
mod worker;

use std::process::ExitCode;
use std::sync::atomic::Ordering;

use clap::Parser;

use cli::Cli;
use error::{format_error_with_suggestion, CliError};
use umi_core::partition::partition_by_reference;
use umi_core::DistanceParams;
use worker::RunConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.debug) {
        eprintln!("failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{}", format_error_with_suggestion(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    log::info!("reading {}", cli.input.display());
    let ingested = ingest::ingest(&cli.input)?;
    log::info!(
        "loaded {} read(s) across {} reference(s)",
        ingested.reads.len(),
        ingested.reference_order.len()
    );

    let partitions = partition_by_reference(ingested.reads, &ingested.reference_order)?;
    log::info!("partitioned into {} reference group(s)", partitions.len());

    let (pool, cancelled) = worker::build_pool(cli.threads)?;
    let config = RunConfig {
        distance: DistanceParams::new(cli.umi_threshold, cli.coord_window),
        vote_weights: cli.vote_weights,
    };

    let consensus_reads = worker::process_partitions(&pool, partitions, &config, &cancelled)?;

    if cancelled.load(Ordering::SeqCst) {
        log::warn!("run cancelled before completion; suppressing partial output");
        return Err(CliError::Cancelled);
    }
    log::info!("built {} consensus read(s)", consensus_reads.len());

    match &cli.output {
        Some(path) => {
            let mut sink = sink::FastqSink::to_file(path, !cli.no_raw_quality_line)?;
            sink.write_all(&consensus_reads)?;
        }
        None => {
            let mut sink = sink::FastqSink::to_stdout(!cli.no_raw_quality_line);
            sink.write_all(&consensus_reads)?;
        }
    }

    Ok(())
}
