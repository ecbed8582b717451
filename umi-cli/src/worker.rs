//! Worker pool: a rayon thread pool capped at the available core count, a
//! shared Ctrl-C cancellation flag, and the per-partition cluster/consensus
//! pipeline.
//!
//! Partitioning always runs, even at thread count 1, and results are
//! collected into one ordered `Vec` before anything is flushed, so output is
//! byte-identical regardless of how many threads processed it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use umi_core::partition::Partition;
use umi_core::{build_consensus, cluster_partition, CoreError, ConsensusRead, DistanceParams};

use crate::error::{CliError, CliResult};

/// Parameters threaded through to every partition's cluster/consensus run.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub distance: DistanceParams,
    pub vote_weights: (f64, f64),
}

/// Builds a rayon pool sized `min(requested_threads, available_cores)` and
/// installs a Ctrl-C handler that flips a shared flag instead of killing the
/// process, so in-flight partitions can finish and flush cleanly.
pub fn build_pool(requested_threads: usize) -> CliResult<(rayon::ThreadPool, Arc<AtomicBool>)> {
    let threads = requested_threads.max(1).min(num_cpus::get());
    log::debug!("starting worker pool with {threads} thread(s)");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| CliError::WorkerPool(e.to_string()))?;

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    // A second Ctrl-C handler registered in the same process returns an
    // error; that's fine here, not a reason to fail the run.
    let _ = ctrlc::set_handler(move || {
        log::warn!("interrupt received, finishing in-flight partitions before exiting");
        flag.store(true, Ordering::SeqCst);
    });

    Ok((pool, cancelled))
}

/// Clusters and builds consensus reads for every partition, in parallel
/// across partitions, preserving partition order in the returned vector.
///
/// `EmptyCluster` is the only absorb-and-skip error per the error taxonomy;
/// every skip is counted, and a single summary line is logged once all
/// partitions have finished. Any other core error aborts the whole run.
pub fn process_partitions(
    pool: &rayon::ThreadPool,
    partitions: Vec<Partition>,
    config: &RunConfig,
    cancelled: &Arc<AtomicBool>,
) -> CliResult<Vec<ConsensusRead>> {
    let skipped = AtomicUsize::new(0);

    let per_partition: Vec<CliResult<Vec<ConsensusRead>>> = pool.install(|| {
        partitions
            .into_par_iter()
            .map(|partition| process_one_partition(partition, config, cancelled, &skipped))
            .collect()
    });

    let mut consensus_reads = Vec::new();
    for result in per_partition {
        consensus_reads.extend(result?);
    }

    let skipped = skipped.load(Ordering::SeqCst);
    if skipped > 0 {
        log::warn!("skipped {skipped} empty cluster(s) across all partitions");
    }

    Ok(consensus_reads)
}

fn process_one_partition(
    partition: Partition,
    config: &RunConfig,
    cancelled: &Arc<AtomicBool>,
    skipped: &AtomicUsize,
) -> CliResult<Vec<ConsensusRead>> {
    if cancelled.load(Ordering::SeqCst) {
        return Ok(Vec::new());
    }

    let input_count = partition.reads.len();
    let clusters = cluster_partition(partition.reads, config.distance);
    umi_core::cluster::verify_integrity(input_count, &clusters)?;
    log::debug!(
        "reference '{}': {} reads clustered into {} clusters",
        partition.reference,
        input_count,
        clusters.len()
    );

    let mut consensus_reads = Vec::with_capacity(clusters.len());
    for cluster in &clusters {
        if cancelled.load(Ordering::SeqCst) {
            break;
        }
        match build_consensus(cluster, config.vote_weights) {
            Ok(consensus) => consensus_reads.push(consensus),
            Err(CoreError::EmptyCluster(msg)) => {
                skipped.fetch_add(1, Ordering::SeqCst);
                log::warn!(
                    "skipping an empty cluster of {} read(s) on reference '{}': {msg}",
                    cluster.len(),
                    partition.reference
                );
            }
            Err(e) => return Err(CliError::Core(e)),
        }
    }
    Ok(consensus_reads)
}
