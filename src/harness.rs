//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! End-to-end run orchestration.
//!
//! One run proceeds on a single logical thread, in a fixed order: identity
//! check, artifact metadata, seeded sampling, commitment digests, the private
//! drive, the public drive, the participation query, the simulated period
//! advance, the tally integrity check, the coordinator's publish and reveal,
//! the result queries, and finally metric aggregation and report assembly.
//! Every private-protocol submission completes before the first public one
//! begins, and any failure aborts the run with no partial report.

use crate::artifacts::ArtifactStore;
use crate::config::SimulationConfig;
use crate::driver::ProtocolDriver;
use crate::error::HarnessError;
use crate::metrics::{compare, ProtocolMetrics};
use crate::prng::SeededRng;
use crate::protocol::ProtocolAdapter;
use crate::report::{Report, ReportInputs};
use crate::sampler::{self, SamplingResult};
use sha3::{Digest, Sha3_256};

/// External account identities supplied by the environment.
#[derive(Debug, Clone)]
pub struct Roster {
    /// Identity allowed to publish and reveal on the private protocol.
    pub coordinator: String,
    /// Voter identities, addressed by voter index.
    pub voters: Vec<String>,
}

fn account_id(tag: &str, index: usize) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(b"BALLOT_BENCH_ACCOUNT");
    hasher.update(tag.as_bytes());
    hasher.update((index as u64).to_be_bytes());
    let digest = hasher.finalize();
    format!("0x{}", hex::encode(&digest[..20]))
}

impl Roster {
    /// Derives a deterministic synthetic roster of `count` voter identities.
    pub fn synthetic(count: usize) -> Self {
        Self {
            coordinator: account_id("coordinator", 0),
            voters: (0..count).map(|i| account_id("voter", i)).collect(),
        }
    }
}

/// Everything a completed run produces.
#[derive(Debug)]
pub struct RunOutcome {
    /// The assembled report snapshot.
    pub report: Report,
    /// The sampling decisions the run was driven by.
    pub sampling: SamplingResult,
}

/// Executes one complete benchmark run.
///
/// `advance_period` is invoked once, after both drives and before the
/// coordinator steps; it stands in for the passage of the voting period in
/// whatever environment hosts the protocols.  Errors propagate unmodified
/// from the first failing step.
pub fn run_simulation(
    config: &SimulationConfig,
    roster: &Roster,
    store: &ArtifactStore,
    private: &mut dyn ProtocolAdapter,
    public: &mut dyn ProtocolAdapter,
    mut advance_period: impl FnMut(),
) -> Result<RunOutcome, HarnessError> {
    if roster.voters.len() < config.eligible_voters {
        return Err(HarnessError::InsufficientIdentities {
            required: config.eligible_voters,
            available: roster.voters.len(),
        });
    }

    let metadata = store.load_metadata()?;

    let mut rng = SeededRng::new(config.seed);
    let sampling = sampler::sample(
        config.eligible_voters,
        config.participation_rate,
        config.simulate_partial,
        metadata.configuration.yes_votes,
        &mut rng,
    );

    // Commitments for the whole population are derived up front so a missing
    // blob aborts before any protocol interaction.
    let commitments = store.vote_digests(config.eligible_voters)?;

    let mut private_driver = ProtocolDriver::new("private");
    let private_drive = private_driver.run(&sampling.active, |index| {
        private.submit_commitment(&roster.voters[index], &commitments[index].digest)
    })?;

    let mut public_driver = ProtocolDriver::new("public");
    let public_drive = public_driver.run(&sampling.active, |index| {
        public.submit_choice(&roster.voters[index], sampling.yes_set.contains(&index))
    })?;

    let participation = private.query_participation();

    advance_period();

    // Integrity must hold before any reveal step executes.
    let tally_digest = store.verify_tally_integrity()?;

    let tally_receipt = private
        .publish_aggregate(&roster.coordinator, &tally_digest)
        .map_err(|err| HarnessError::Submission {
            protocol: "private".to_string(),
            reason: format!("publish: {err}"),
        })?;

    let yes_actual = sampling.yes_set.len() as u64;
    let no_actual = (sampling.active.len() - sampling.yes_set.len()) as u64;
    let reveal_receipt = private
        .reveal_result(&roster.coordinator, yes_actual, no_actual)
        .map_err(|err| HarnessError::Submission {
            protocol: "private".to_string(),
            reason: format!("reveal: {err}"),
        })?;

    let private_results = private.query_results();
    let public_results = public.query_results();

    let private_metrics =
        ProtocolMetrics::from_outcomes(&private_drive.outcomes, private_drive.total_elapsed_ms);
    let public_metrics =
        ProtocolMetrics::from_outcomes(&public_drive.outcomes, public_drive.total_elapsed_ms);
    let private_total = private_metrics.total_cost
        + tally_receipt.cost as u128
        + reveal_receipt.cost as u128;
    let comparison = compare(private_total, public_metrics.total_cost);

    let report = Report::build(ReportInputs {
        config,
        sampling: &sampling,
        private_metrics: &private_metrics,
        public_metrics: &public_metrics,
        tally_cost: tally_receipt.cost,
        reveal_cost: reveal_receipt.cost,
        private_total,
        comparison,
        offchain_tally_ms: metadata.performance.tally_time_ms,
        tally_digest: &tally_digest,
        private_results: &private_results,
        public_results: &public_results,
        participation,
    });

    Ok(RunOutcome { report, sampling })
}
