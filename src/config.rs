//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! Run configuration with layered environment overrides.
//!
//! Configuration is built in two explicit stages: the base JSON document is
//! parsed into a typed structure, then a list of named overrides captured
//! from the process environment is applied field by field in a fixed order.
//! The merged value is immutable and passed explicitly into every component
//! that needs it; nothing reads configuration ambiently after this point.

use crate::error::HarnessError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable that selects the configuration document path.
pub const CONFIG_PATH_VAR: &str = "VOTE_CONF";

/// Default configuration document location.
pub const DEFAULT_CONFIG_PATH: &str = "config/vote_simulation.json";

#[derive(Debug, Clone, Deserialize)]
struct VotersSection {
    total: usize,
    yes: u64,
    no: u64,
    simulate_partial: bool,
    all_must_vote: bool,
    participation_rate: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct VotingSection {
    period_days: u64,
    quorum_bps: u64,
}

/// Base configuration document, prior to overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigDocument {
    seed: u64,
    question: String,
    voters: VotersSection,
    voting: VotingSection,
}

impl ConfigDocument {
    /// Loads the base document from `path`.
    ///
    /// Fails with [`HarnessError::ConfigurationMissing`] when the file does
    /// not exist and [`HarnessError::ConfigurationInvalid`] when it cannot be
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(HarnessError::ConfigurationMissing(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|err| HarnessError::Io(err.to_string()))?;
        serde_json::from_str(&contents)
            .map_err(|err| HarnessError::ConfigurationInvalid(err.to_string()))
    }
}

/// Named overrides applied on top of the base document.
///
/// Overrides are applied in declaration order: seed, question, voter totals,
/// participation flags, rate, then protocol timing.  A `None` field leaves
/// the document value untouched.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// Overrides the sampling seed (`SEED`).
    pub seed: Option<u64>,
    /// Overrides the question text (`QUESTION`).
    pub question: Option<String>,
    /// Overrides the eligible voter count (`VOTERS_TOTAL`).
    pub voters_total: Option<usize>,
    /// Overrides the target yes count (`VOTERS_YES`).
    pub voters_yes: Option<u64>,
    /// Overrides the target no count (`VOTERS_NO`).
    pub voters_no: Option<u64>,
    /// Overrides partial-participation simulation (`SIMULATE_PARTIAL`).
    pub simulate_partial: Option<bool>,
    /// Overrides forced full participation (`ALL_MUST_VOTE`).
    pub all_must_vote: Option<bool>,
    /// Overrides the participation rate (`PARTICIPATION_RATE`).
    pub participation_rate: Option<f64>,
    /// Overrides the voting period length (`VOTING_PERIOD_DAYS`).
    pub voting_period_days: Option<u64>,
    /// Overrides the quorum threshold (`QUORUM_BPS`).
    pub quorum_bps: Option<u64>,
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, HarnessError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| HarnessError::ConfigurationInvalid(format!("cannot parse {name}={raw}"))),
        Err(_) => Ok(None),
    }
}

fn parse_flag(name: &str) -> Option<bool> {
    // Anything other than the literal string "true" disables the flag.
    env::var(name).ok().map(|raw| raw == "true")
}

impl EnvOverrides {
    /// Captures the recognized override variables from the environment.
    pub fn from_env() -> Result<Self, HarnessError> {
        Ok(Self {
            seed: parse_var("SEED")?,
            question: env::var("QUESTION").ok(),
            voters_total: parse_var("VOTERS_TOTAL")?,
            voters_yes: parse_var("VOTERS_YES")?,
            voters_no: parse_var("VOTERS_NO")?,
            simulate_partial: parse_flag("SIMULATE_PARTIAL"),
            all_must_vote: parse_flag("ALL_MUST_VOTE"),
            participation_rate: parse_var("PARTICIPATION_RATE")?,
            voting_period_days: parse_var("VOTING_PERIOD_DAYS")?,
            quorum_bps: parse_var("QUORUM_BPS")?,
        })
    }
}

/// Immutable, fully merged configuration for one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Seed for all sampling decisions.
    pub seed: u64,
    /// Question text the protocols are deployed with.
    pub question: String,
    /// Number of eligible voters.
    pub eligible_voters: usize,
    /// Configured target yes count over the full population.
    pub yes_target: u64,
    /// Configured target no count over the full population.
    pub no_target: u64,
    /// Whether to simulate partial participation.
    pub simulate_partial: bool,
    /// Whether every eligible voter is forced to participate.
    pub all_must_vote: bool,
    /// Fraction of eligible voters who participate, in `[0, 1]`.
    pub participation_rate: f64,
    /// Voting period length, in days.
    pub voting_period_days: u64,
    /// Quorum threshold, in basis points of the eligible population.
    pub quorum_bps: u64,
}

impl SimulationConfig {
    /// Merges the base document with overrides into one immutable value.
    ///
    /// `all_must_vote` forces the participation rate to exactly `1.0`
    /// regardless of the configured or overridden rate.
    pub fn compose(doc: ConfigDocument, overrides: EnvOverrides) -> Result<Self, HarnessError> {
        let all_must_vote = overrides.all_must_vote.unwrap_or(doc.voters.all_must_vote);
        let configured_rate = overrides
            .participation_rate
            .unwrap_or(doc.voters.participation_rate);
        if !(0.0..=1.0).contains(&configured_rate) {
            return Err(HarnessError::ConfigurationInvalid(format!(
                "participation_rate {configured_rate} outside [0, 1]"
            )));
        }
        let quorum_bps = overrides.quorum_bps.unwrap_or(doc.voting.quorum_bps);
        if quorum_bps > 10_000 {
            return Err(HarnessError::ConfigurationInvalid(format!(
                "quorum_bps {quorum_bps} exceeds 10000"
            )));
        }
        Ok(Self {
            seed: overrides.seed.unwrap_or(doc.seed),
            question: overrides.question.unwrap_or(doc.question),
            eligible_voters: overrides.voters_total.unwrap_or(doc.voters.total),
            yes_target: overrides.voters_yes.unwrap_or(doc.voters.yes),
            no_target: overrides.voters_no.unwrap_or(doc.voters.no),
            simulate_partial: overrides
                .simulate_partial
                .unwrap_or(doc.voters.simulate_partial),
            all_must_vote,
            participation_rate: if all_must_vote { 1.0 } else { configured_rate },
            voting_period_days: overrides
                .voting_period_days
                .unwrap_or(doc.voting.period_days),
            quorum_bps,
        })
    }

    /// Loads the document at `path` and merges the given overrides.
    pub fn load(path: impl AsRef<Path>, overrides: EnvOverrides) -> Result<Self, HarnessError> {
        Self::compose(ConfigDocument::load(path)?, overrides)
    }
}
