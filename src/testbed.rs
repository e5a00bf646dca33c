//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! In-memory reference implementations of the two protocols under test.
//!
//! These adapters stand in for the deployed contracts the harness would
//! measure in a live environment.  They enforce the same observable rules —
//! eligibility, one vote per identity, a voting period that must elapse
//! before the coordinator may publish or reveal, a quorum threshold — and
//! charge a deterministic resource cost per operation so runs are comparable.
//! Costs vary per identity through a hash-derived jitter to keep the latency
//! and cost distributions non-degenerate.

use crate::protocol::{
    OperationReceipt, ParticipationView, ProtocolAdapter, ResultsView, SubmissionError,
    SubmissionReceipt, VoterRecordView,
};
use sha3::{Digest, Sha3_256};
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

const COMMITMENT_BASE_COST: u64 = 68_400;
const CHOICE_BASE_COST: u64 = 46_200;
const PUBLISH_BASE_COST: u64 = 51_800;
const REVEAL_BASE_COST: u64 = 38_700;
const COST_JITTER_RANGE: u64 = 1_024;

/// Deterministic per-identity cost variation in `[0, 1024)`.
fn cost_jitter(identity: &str) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(b"BALLOT_BENCH_COST");
    hasher.update(identity.as_bytes());
    let digest = hasher.finalize();
    let mut chunk = [0u8; 8];
    chunk.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(chunk) % COST_JITTER_RANGE
}

/// Shared handle over the simulated voting period.
///
/// Both deployments observe the same clock; the harness's period hook flips
/// it once after the drives, standing in for the passage of the configured
/// number of days.  The run is single-threaded, so a plain `Rc<Cell<_>>`
/// suffices.
#[derive(Debug, Clone, Default)]
pub struct PeriodClock(Rc<Cell<bool>>);

impl PeriodClock {
    /// Creates a clock with the voting period still open.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the voting period has elapsed.
    pub fn elapsed(&self) -> bool {
        self.0.get()
    }

    /// Marks the voting period as elapsed.
    pub fn advance(&self) {
        self.0.set(true);
    }
}

#[derive(Debug, Clone)]
struct Ballot {
    choice: Option<bool>,
    commitment: Option<String>,
}

/// Commitment-based voting protocol with a coordinated reveal.
#[derive(Debug)]
pub struct PrivateVoting {
    subject: String,
    coordinator: String,
    ballots: BTreeMap<String, Option<Ballot>>,
    voted: u64,
    quorum_bps: u64,
    clock: PeriodClock,
    aggregate: Option<String>,
    revealed: Option<(u64, u64)>,
}

impl PrivateVoting {
    /// Deploys the protocol with a fixed roll of eligible identities.
    pub fn new(
        subject: impl Into<String>,
        coordinator: impl Into<String>,
        eligible: &[String],
        quorum_bps: u64,
        clock: PeriodClock,
    ) -> Self {
        Self {
            subject: subject.into(),
            coordinator: coordinator.into(),
            ballots: eligible.iter().map(|id| (id.clone(), None)).collect(),
            voted: 0,
            quorum_bps,
            clock,
            aggregate: None,
            revealed: None,
        }
    }

    /// Published aggregate digest, if any.
    pub fn aggregate(&self) -> Option<&str> {
        self.aggregate.as_deref()
    }

    /// Stored commitment hash for a voter, if any.
    pub fn commitment_of(&self, voter: &str) -> Option<&str> {
        self.ballots
            .get(voter)
            .and_then(|slot| slot.as_ref())
            .and_then(|ballot| ballot.commitment.as_deref())
    }
}

impl ProtocolAdapter for PrivateVoting {
    fn submit_commitment(
        &mut self,
        voter: &str,
        commitment: &str,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if self.clock.elapsed() {
            return Err(SubmissionError::new("voting period has ended"));
        }
        let slot = self
            .ballots
            .get_mut(voter)
            .ok_or_else(|| SubmissionError::new(format!("{voter} is not eligible")))?;
        if slot.is_some() {
            return Err(SubmissionError::new(format!("{voter} already voted")));
        }
        *slot = Some(Ballot {
            choice: None,
            commitment: Some(commitment.to_string()),
        });
        self.voted += 1;
        Ok(SubmissionReceipt {
            cost: COMMITMENT_BASE_COST + cost_jitter(voter),
            confirmed: true,
        })
    }

    fn submit_choice(&mut self, _voter: &str, _support: bool) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::new(
            "private protocol only accepts commitments",
        ))
    }

    fn publish_aggregate(
        &mut self,
        coordinator: &str,
        aggregate: &str,
    ) -> Result<OperationReceipt, SubmissionError> {
        if coordinator != self.coordinator {
            return Err(SubmissionError::new("only the coordinator may publish"));
        }
        if !self.clock.elapsed() {
            return Err(SubmissionError::new("voting period still active"));
        }
        if self.aggregate.is_some() {
            return Err(SubmissionError::new("aggregate already published"));
        }
        self.aggregate = Some(aggregate.to_string());
        Ok(OperationReceipt {
            cost: PUBLISH_BASE_COST + cost_jitter(aggregate),
        })
    }

    fn reveal_result(
        &mut self,
        coordinator: &str,
        yes: u64,
        no: u64,
    ) -> Result<OperationReceipt, SubmissionError> {
        if coordinator != self.coordinator {
            return Err(SubmissionError::new("only the coordinator may reveal"));
        }
        if self.aggregate.is_none() {
            return Err(SubmissionError::new("aggregate not yet published"));
        }
        if self.revealed.is_some() {
            return Err(SubmissionError::new("result already revealed"));
        }
        if yes + no != self.voted {
            return Err(SubmissionError::new(format!(
                "revealed counts {} do not match {} recorded ballots",
                yes + no,
                self.voted
            )));
        }
        let total = self.ballots.len() as u64;
        if total > 0 && self.voted * 10_000 < self.quorum_bps * total {
            return Err(SubmissionError::new("quorum not reached"));
        }
        self.revealed = Some((yes, no));
        Ok(OperationReceipt {
            cost: REVEAL_BASE_COST + cost_jitter(coordinator),
        })
    }

    fn query_results(&self) -> ResultsView {
        let (yes, no) = self.revealed.unwrap_or((0, 0));
        ResultsView {
            yes,
            no,
            total: self.voted,
            revealed: self.revealed.is_some(),
            subject: self.subject.clone(),
        }
    }

    fn query_participation(&self) -> ParticipationView {
        let total = self.ballots.len() as u64;
        ParticipationView {
            voted: self.voted,
            total,
            percentage: if total == 0 { 0 } else { self.voted * 100 / total },
        }
    }

    fn query_voter_record(&self, voter: &str) -> VoterRecordView {
        let has_voted = matches!(self.ballots.get(voter), Some(Some(_)));
        // Individual choices stay hidden; only the fact of voting is visible.
        VoterRecordView {
            has_voted,
            choice: None,
        }
    }
}

/// Plaintext voting protocol that tallies immediately.
#[derive(Debug)]
pub struct PublicVoting {
    subject: String,
    ballots: BTreeMap<String, Option<Ballot>>,
    voted: u64,
    yes: u64,
    clock: PeriodClock,
}

impl PublicVoting {
    /// Deploys the protocol with a fixed roll of eligible identities.
    pub fn new(subject: impl Into<String>, eligible: &[String], clock: PeriodClock) -> Self {
        Self {
            subject: subject.into(),
            ballots: eligible.iter().map(|id| (id.clone(), None)).collect(),
            voted: 0,
            yes: 0,
            clock,
        }
    }
}

impl ProtocolAdapter for PublicVoting {
    fn submit_commitment(
        &mut self,
        _voter: &str,
        _commitment: &str,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::new(
            "public protocol only accepts plaintext choices",
        ))
    }

    fn submit_choice(
        &mut self,
        voter: &str,
        support: bool,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if self.clock.elapsed() {
            return Err(SubmissionError::new("voting period has ended"));
        }
        let slot = self
            .ballots
            .get_mut(voter)
            .ok_or_else(|| SubmissionError::new(format!("{voter} is not eligible")))?;
        if slot.is_some() {
            return Err(SubmissionError::new(format!("{voter} already voted")));
        }
        *slot = Some(Ballot {
            choice: Some(support),
            commitment: None,
        });
        self.voted += 1;
        if support {
            self.yes += 1;
        }
        Ok(SubmissionReceipt {
            cost: CHOICE_BASE_COST + cost_jitter(voter),
            confirmed: true,
        })
    }

    fn publish_aggregate(
        &mut self,
        _coordinator: &str,
        _aggregate: &str,
    ) -> Result<OperationReceipt, SubmissionError> {
        Err(SubmissionError::new(
            "public protocol has no aggregate to publish",
        ))
    }

    fn reveal_result(
        &mut self,
        _coordinator: &str,
        _yes: u64,
        _no: u64,
    ) -> Result<OperationReceipt, SubmissionError> {
        Err(SubmissionError::new("public protocol has nothing to reveal"))
    }

    fn query_results(&self) -> ResultsView {
        ResultsView {
            yes: self.yes,
            no: self.voted - self.yes,
            total: self.voted,
            revealed: true,
            subject: self.subject.clone(),
        }
    }

    fn query_participation(&self) -> ParticipationView {
        let total = self.ballots.len() as u64;
        ParticipationView {
            voted: self.voted,
            total,
            percentage: if total == 0 { 0 } else { self.voted * 100 / total },
        }
    }

    fn query_voter_record(&self, voter: &str) -> VoterRecordView {
        match self.ballots.get(voter) {
            Some(Some(ballot)) => VoterRecordView {
                has_voted: true,
                choice: ballot.choice,
            },
            _ => VoterRecordView {
                has_voted: false,
                choice: None,
            },
        }
    }
}
