//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! Boundary between the harness and the voting protocols under test.
//!
//! The harness never looks inside a protocol: it calls the fixed capability
//! set below and reads typed results back.  A private protocol accepts
//! commitment hashes and reveals its aggregate later through a coordinator;
//! a public protocol accepts plaintext choices and tallies immediately.
//! Each adapter implements the subset of operations its protocol supports
//! and rejects the rest.

use std::error::Error;
use std::fmt;

/// Cost and confirmation reported for one vote submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Resource units consumed by the operation.
    pub cost: u64,
    /// Whether the protocol confirmed the submission.
    pub confirmed: bool,
}

/// Cost reported for a coordinator operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationReceipt {
    /// Resource units consumed by the operation.
    pub cost: u64,
}

/// Aggregate results as exposed by a protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    /// Yes votes counted, zero until revealed for a private protocol.
    pub yes: u64,
    /// No votes counted, zero until revealed for a private protocol.
    pub no: u64,
    /// Total submissions recorded.
    pub total: u64,
    /// Whether the aggregate has been revealed.
    pub revealed: bool,
    /// Question text the protocol was deployed with.
    pub subject: String,
}

/// Turnout as exposed by a protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipationView {
    /// Number of eligible voters who have submitted.
    pub voted: u64,
    /// Number of eligible voters.
    pub total: u64,
    /// Integer participation percentage, `voted * 100 / total`.
    pub percentage: u64,
}

/// Per-voter record as exposed by a protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoterRecordView {
    /// Whether the identity has submitted a vote.
    pub has_voted: bool,
    /// Plaintext choice, when the protocol makes it visible.
    pub choice: Option<bool>,
}

/// Failure reported by an adapter operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionError {
    /// Human-readable reason for the rejection.
    pub reason: String,
}

impl SubmissionError {
    /// Creates an error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl Error for SubmissionError {}

/// Capability set the harness drives against each protocol.
pub trait ProtocolAdapter {
    /// Submits an opaque commitment hash on behalf of `voter`.
    fn submit_commitment(
        &mut self,
        voter: &str,
        commitment: &str,
    ) -> Result<SubmissionReceipt, SubmissionError>;

    /// Submits a plaintext choice on behalf of `voter`.
    fn submit_choice(
        &mut self,
        voter: &str,
        support: bool,
    ) -> Result<SubmissionReceipt, SubmissionError>;

    /// Publishes the aggregate digest; coordinator only.
    fn publish_aggregate(
        &mut self,
        coordinator: &str,
        aggregate: &str,
    ) -> Result<OperationReceipt, SubmissionError>;

    /// Reveals the decrypted counts; coordinator only.
    fn reveal_result(
        &mut self,
        coordinator: &str,
        yes: u64,
        no: u64,
    ) -> Result<OperationReceipt, SubmissionError>;

    /// Reads the current aggregate results.
    fn query_results(&self) -> ResultsView;

    /// Reads the current turnout.
    fn query_participation(&self) -> ParticipationView;

    /// Reads the record for one voter identity.
    fn query_voter_record(&self, voter: &str) -> VoterRecordView;
}
