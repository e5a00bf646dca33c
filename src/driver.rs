//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! Sequential protocol driving with per-operation instrumentation.
//!
//! The driver submits one operation per active voter, strictly in sampling
//! order, and records the resource cost and wall-clock latency of each.
//! Submissions are never concurrent: latency must reflect per-operation cost
//! without cross-operation interference, and both protocols must be measured
//! under identical ordering for the comparison to be fair.  Any failure is
//! terminal — the driver transitions to `Failed` and the run aborts with no
//! partial report.

use crate::error::HarnessError;
use crate::protocol::{SubmissionError, SubmissionReceipt};
use std::time::Instant;

/// Result of one instrumented vote submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    /// Voter index the submission was made for.
    pub voter: usize,
    /// Resource units the protocol charged.
    pub cost: u64,
    /// Wall-clock latency of the blocking call, in whole milliseconds.
    pub latency_ms: u64,
}

/// Lifecycle of one protocol drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// `run` has not been called yet.
    NotStarted,
    /// Submissions are in flight.
    Running,
    /// Every submission completed.
    Completed,
    /// A submission failed; the state is terminal.
    Failed,
}

/// Everything measured while driving one protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveRecord {
    /// Per-voter outcomes, in submission order.
    pub outcomes: Vec<VoteOutcome>,
    /// Wall-clock duration of the whole drive, in milliseconds.
    pub total_elapsed_ms: u64,
}

/// Drives one protocol over the active voter sequence.
#[derive(Debug)]
pub struct ProtocolDriver {
    label: &'static str,
    state: DriverState,
}

impl ProtocolDriver {
    /// Creates a driver for the protocol named by `label`.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            state: DriverState::NotStarted,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Label the driver was created with.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Submits once per voter in `active`, in order, blocking on each.
    ///
    /// `submit` performs the protocol's single vote-submission capability for
    /// one voter index and blocks until its receipt is available.  The first
    /// error transitions the driver to [`DriverState::Failed`] and surfaces
    /// as [`HarnessError::Submission`].  A driver can only run once.
    pub fn run<F>(&mut self, active: &[usize], mut submit: F) -> Result<DriveRecord, HarnessError>
    where
        F: FnMut(usize) -> Result<SubmissionReceipt, SubmissionError>,
    {
        if self.state != DriverState::NotStarted {
            return Err(HarnessError::Submission {
                protocol: self.label.to_string(),
                reason: "driver already consumed".to_string(),
            });
        }
        self.state = DriverState::Running;
        let drive_start = Instant::now();
        let mut outcomes = Vec::with_capacity(active.len());
        for &voter in active {
            let start = Instant::now();
            let receipt = match submit(voter) {
                Ok(receipt) => receipt,
                Err(err) => {
                    self.state = DriverState::Failed;
                    return Err(HarnessError::Submission {
                        protocol: self.label.to_string(),
                        reason: format!("voter {voter}: {err}"),
                    });
                }
            };
            let latency_ms = start.elapsed().as_millis() as u64;
            if !receipt.confirmed {
                self.state = DriverState::Failed;
                return Err(HarnessError::Submission {
                    protocol: self.label.to_string(),
                    reason: format!("voter {voter}: submission not confirmed"),
                });
            }
            outcomes.push(VoteOutcome {
                voter,
                cost: receipt.cost,
                latency_ms,
            });
        }
        self.state = DriverState::Completed;
        Ok(DriveRecord {
            outcomes,
            total_elapsed_ms: drive_start.elapsed().as_millis() as u64,
        })
    }
}
