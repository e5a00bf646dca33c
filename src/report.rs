//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! Final report assembly and persistence.
//!
//! The report is a read-only composition step: it combines the configuration,
//! the sampling sizes, the per-protocol metrics and the protocol query views
//! into one immutable snapshot without recomputing anything.  The snapshot is
//! serialized to disk exactly once per run, as a single complete JSON
//! document; a failed write is fatal and never retried.

use crate::config::SimulationConfig;
use crate::error::HarnessError;
use crate::metrics::{CostComparison, CostLabel, ProtocolMetrics};
use crate::protocol::{ParticipationView, ResultsView};
use crate::sampler::SamplingResult;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Configuration echo embedded in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportParams {
    /// Eligible voter count.
    pub eligible_voters: usize,
    /// Voting period length, in days.
    pub voting_period_days: u64,
    /// Quorum threshold in basis points.
    pub quorum_bps: u64,
    /// Whether partial participation was simulated.
    pub simulate_partial: bool,
    /// Whether full participation was forced.
    pub all_must_vote: bool,
    /// Effective participation rate after overrides.
    pub participation_rate: f64,
}

/// Realized sampling sizes.
#[derive(Debug, Clone, Serialize)]
pub struct ReportVoters {
    /// Eligible voter count.
    pub eligible: usize,
    /// Number of participating voters.
    pub active: usize,
    /// Number of abstaining voters.
    pub inactive: usize,
    /// Realized participation fraction.
    pub rate: f64,
}

/// Realized yes/no assignment over the participants.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDistribution {
    /// Participants assigned a yes vote.
    pub yes_target: usize,
    /// Participants implicitly assigned a no vote.
    pub no_target: usize,
}

/// Turnout reported by the private protocol after both drives.
#[derive(Debug, Clone, Serialize)]
pub struct ReportParticipation {
    /// Voters recorded by the protocol.
    pub voted: u64,
    /// Eligible voters known to the protocol.
    pub total: u64,
    /// Integer participation percentage.
    pub percentage: u64,
}

/// Cost block comparing the two protocols.
#[derive(Debug, Clone, Serialize)]
pub struct ReportCost {
    /// Public protocol vote-submission total.
    pub public_total: u128,
    /// Private protocol vote-submission total, excluding coordinator steps.
    pub private_votes_total: u128,
    /// Cost of publishing the aggregate digest.
    pub private_tally: u64,
    /// Cost of revealing the decrypted counts.
    pub private_reveal: u64,
    /// Private total including coordinator steps.
    pub private_total: u128,
    /// Truncating per-vote average, public protocol.
    pub avg_per_vote_public: u128,
    /// Truncating per-vote average, private protocol.
    pub avg_per_vote_private: u128,
    /// Signed cost difference, private minus public.
    pub diff: i128,
    /// Relative difference, one-decimal rounded.
    pub overhead_pct: f64,
    /// `overhead` or `saving`.
    pub label: CostLabel,
}

/// Latency summary for one protocol.
#[derive(Debug, Clone, Serialize)]
pub struct ReportLatencyBlock {
    /// Wall-clock duration of the whole drive.
    pub total: u64,
    /// Median per-submission latency.
    pub p50: u64,
    /// 95th-percentile per-submission latency.
    pub p95: u64,
}

/// Latency block for both protocols, in milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct ReportLatency {
    /// Public protocol latencies.
    pub public: ReportLatencyBlock,
    /// Private protocol latencies.
    pub private: ReportLatencyBlock,
}

/// Offline aggregation information carried from the artifact metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOffchainTally {
    /// Offline tally duration, in milliseconds.
    pub duration_ms: f64,
    /// Digest of the final aggregate blob.
    pub final_tally_hash: String,
}

/// Artifact-verification status.
#[derive(Debug, Clone, Serialize)]
pub struct ReportVerification {
    /// Reproducible tally digest.
    pub tally_digest: String,
    /// True when the double derivation agreed (always true in a written
    /// report; a mismatch aborts the run before assembly).
    pub consistent: bool,
}

/// Result counts for one protocol.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResultEntry {
    /// Yes votes.
    pub yes: u64,
    /// No votes.
    pub no: u64,
    /// Total submissions.
    pub total: u64,
    /// Whether the counts were revealed.
    pub revealed: bool,
}

/// Final results and decision.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResults {
    /// Private protocol counts, post-reveal.
    pub private: ReportResultEntry,
    /// Public protocol counts.
    pub public: ReportResultEntry,
    /// `approved` when the revealed private yes count strictly exceeds the
    /// no count, `rejected` otherwise.
    pub decision: String,
}

/// Immutable snapshot of one complete benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report flavor marker.
    pub mode: String,
    /// Seed the run was sampled with.
    pub seed: u64,
    /// Question text under vote.
    pub question: String,
    /// Configuration echo.
    pub params: ReportParams,
    /// Realized sampling sizes.
    pub voters: ReportVoters,
    /// Realized yes/no assignment.
    pub distribution: ReportDistribution,
    /// Turnout reported by the private protocol.
    pub participation: ReportParticipation,
    /// Cost comparison.
    pub cost: ReportCost,
    /// Latency comparison.
    pub latency_ms: ReportLatency,
    /// Offline aggregation info.
    pub offchain_tally: ReportOffchainTally,
    /// Artifact-verification status.
    pub verification: ReportVerification,
    /// Final counts and decision.
    pub results: ReportResults,
}

/// Everything the builder composes into a [`Report`].
///
/// All fields arrive precomputed; the builder never re-derives a metric.
#[derive(Debug)]
pub struct ReportInputs<'a> {
    /// Merged run configuration.
    pub config: &'a SimulationConfig,
    /// Sampling outcome for the run.
    pub sampling: &'a SamplingResult,
    /// Aggregated private-drive statistics.
    pub private_metrics: &'a ProtocolMetrics,
    /// Aggregated public-drive statistics.
    pub public_metrics: &'a ProtocolMetrics,
    /// Cost of the aggregate publication step.
    pub tally_cost: u64,
    /// Cost of the reveal step.
    pub reveal_cost: u64,
    /// Private total including coordinator steps.
    pub private_total: u128,
    /// Signed comparison of `private_total` against the public total.
    pub comparison: CostComparison,
    /// Offline tally duration from the artifact metadata.
    pub offchain_tally_ms: f64,
    /// Verified, reproducible tally digest.
    pub tally_digest: &'a str,
    /// Private protocol results after reveal.
    pub private_results: &'a ResultsView,
    /// Public protocol results.
    pub public_results: &'a ResultsView,
    /// Turnout from the private protocol.
    pub participation: ParticipationView,
}

impl Report {
    /// Assembles the snapshot.  Pure composition, no recomputation.
    pub fn build(inputs: ReportInputs<'_>) -> Self {
        let ReportInputs {
            config,
            sampling,
            private_metrics,
            public_metrics,
            tally_cost,
            reveal_cost,
            private_total,
            comparison,
            offchain_tally_ms,
            tally_digest,
            private_results,
            public_results,
            participation,
        } = inputs;
        let active = sampling.active.len();
        let decision = if private_results.yes > private_results.no {
            "approved"
        } else {
            "rejected"
        };
        Self {
            mode: "simulation".to_string(),
            seed: config.seed,
            question: config.question.clone(),
            params: ReportParams {
                eligible_voters: config.eligible_voters,
                voting_period_days: config.voting_period_days,
                quorum_bps: config.quorum_bps,
                simulate_partial: config.simulate_partial,
                all_must_vote: config.all_must_vote,
                participation_rate: config.participation_rate,
            },
            voters: ReportVoters {
                eligible: config.eligible_voters,
                active,
                inactive: sampling.inactive.len(),
                rate: if config.eligible_voters == 0 {
                    0.0
                } else {
                    active as f64 / config.eligible_voters as f64
                },
            },
            distribution: ReportDistribution {
                yes_target: sampling.yes_set.len(),
                no_target: active - sampling.yes_set.len(),
            },
            participation: ReportParticipation {
                voted: participation.voted,
                total: participation.total,
                percentage: participation.percentage,
            },
            cost: ReportCost {
                public_total: public_metrics.total_cost,
                private_votes_total: private_metrics.total_cost,
                private_tally: tally_cost,
                private_reveal: reveal_cost,
                private_total,
                avg_per_vote_public: public_metrics.average_cost,
                avg_per_vote_private: private_metrics.average_cost,
                diff: comparison.diff,
                overhead_pct: (comparison.overhead_pct * 10.0).round() / 10.0,
                label: comparison.label,
            },
            latency_ms: ReportLatency {
                public: ReportLatencyBlock {
                    total: public_metrics.total_time_ms,
                    p50: public_metrics.p50_latency_ms,
                    p95: public_metrics.p95_latency_ms,
                },
                private: ReportLatencyBlock {
                    total: private_metrics.total_time_ms,
                    p50: private_metrics.p50_latency_ms,
                    p95: private_metrics.p95_latency_ms,
                },
            },
            offchain_tally: ReportOffchainTally {
                duration_ms: offchain_tally_ms,
                final_tally_hash: tally_digest.to_string(),
            },
            verification: ReportVerification {
                tally_digest: tally_digest.to_string(),
                consistent: true,
            },
            results: ReportResults {
                private: ReportResultEntry {
                    yes: private_results.yes,
                    no: private_results.no,
                    total: private_results.total,
                    revealed: private_results.revealed,
                },
                public: ReportResultEntry {
                    yes: public_results.yes,
                    no: public_results.no,
                    total: public_results.total,
                    revealed: public_results.revealed,
                },
                decision: decision.to_string(),
            },
        }
    }
}

/// Serializes the report to `path` in one complete write.
pub fn write_report(path: impl AsRef<Path>, report: &Report) -> Result<(), HarnessError> {
    let body = serde_json::to_string_pretty(report)
        .map_err(|err| HarnessError::ReportWrite(err.to_string()))?;
    fs::write(path.as_ref(), body + "\n")
        .map_err(|err| HarnessError::ReportWrite(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{write_report, Report, ReportInputs};
    use crate::config::{ConfigDocument, EnvOverrides, SimulationConfig};
    use crate::metrics::{compare, CostLabel, ProtocolMetrics};
    use crate::protocol::{ParticipationView, ResultsView};
    use crate::sampler::SamplingResult;
    use std::collections::BTreeSet;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn fixture_config() -> SimulationConfig {
        let doc: ConfigDocument = serde_json::from_str(
            r#"{
                "seed": 42,
                "question": "Adopt the proposal?",
                "voters": {
                    "total": 4,
                    "yes": 3,
                    "no": 1,
                    "simulate_partial": false,
                    "all_must_vote": false,
                    "participation_rate": 1.0
                },
                "voting": {"period_days": 7, "quorum_bps": 1000}
            }"#,
        )
        .unwrap();
        SimulationConfig::compose(doc, EnvOverrides::default()).unwrap()
    }

    fn fixture_inputs<'a>(
        config: &'a SimulationConfig,
        sampling: &'a SamplingResult,
        metrics: &'a ProtocolMetrics,
        private_results: &'a ResultsView,
        public_results: &'a ResultsView,
    ) -> ReportInputs<'a> {
        ReportInputs {
            config,
            sampling,
            private_metrics: metrics,
            public_metrics: metrics,
            tally_cost: 50,
            reveal_cost: 40,
            private_total: 1090,
            comparison: compare(1090, 1000),
            offchain_tally_ms: 128.5,
            tally_digest: "0xabc",
            private_results,
            public_results,
            participation: ParticipationView {
                voted: 4,
                total: 4,
                percentage: 100,
            },
        }
    }

    fn fixture_sampling() -> SamplingResult {
        SamplingResult {
            active: vec![2, 0, 3, 1],
            inactive: BTreeSet::new(),
            yes_set: BTreeSet::from([2, 0, 3]),
        }
    }

    fn fixture_metrics() -> ProtocolMetrics {
        ProtocolMetrics {
            submissions: 4,
            total_cost: 1000,
            average_cost: 250,
            p50_latency_ms: 3,
            p95_latency_ms: 9,
            total_time_ms: 20,
        }
    }

    fn results(yes: u64, no: u64, revealed: bool) -> ResultsView {
        ResultsView {
            yes,
            no,
            total: yes + no,
            revealed,
            subject: "Adopt the proposal?".to_string(),
        }
    }

    #[test]
    fn test_decision_follows_revealed_private_counts() {
        let config = fixture_config();
        let sampling = fixture_sampling();
        let metrics = fixture_metrics();
        let public = results(3, 1, true);

        let approved = results(3, 1, true);
        let report = Report::build(fixture_inputs(
            &config, &sampling, &metrics, &approved, &public,
        ));
        assert_eq!(report.results.decision, "approved");

        let tied = results(2, 2, true);
        let report = Report::build(fixture_inputs(&config, &sampling, &metrics, &tied, &public));
        assert_eq!(report.results.decision, "rejected");
    }

    #[test]
    fn test_report_composes_without_recomputing() {
        let config = fixture_config();
        let sampling = fixture_sampling();
        let metrics = fixture_metrics();
        let private = results(3, 1, true);
        let public = results(3, 1, true);
        let report = Report::build(fixture_inputs(
            &config, &sampling, &metrics, &private, &public,
        ));
        assert_eq!(report.seed, 42);
        assert_eq!(report.voters.active, 4);
        assert_eq!(report.distribution.yes_target, 3);
        assert_eq!(report.distribution.no_target, 1);
        assert_eq!(report.cost.private_total, 1090);
        assert_eq!(report.cost.diff, 90);
        assert_eq!(report.cost.overhead_pct, 9.0);
        assert_eq!(report.cost.label, CostLabel::Overhead);
        assert!(report.verification.consistent);
    }

    #[test]
    fn test_write_report_is_single_valid_document() {
        let config = fixture_config();
        let sampling = fixture_sampling();
        let metrics = fixture_metrics();
        let private = results(3, 1, true);
        let public = results(3, 1, true);
        let report = Report::build(fixture_inputs(
            &config, &sampling, &metrics, &private, &public,
        ));

        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("ballot_bench_report_{unique}"));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("simulation_report.json");
        write_report(&path, &report).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["seed"], 42);
        assert_eq!(parsed["results"]["decision"], "approved");
        assert_eq!(parsed["cost"]["label"], "overhead");
        fs::remove_dir_all(&dir).unwrap();
    }
}
