//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! Error taxonomy shared across the harness.
//!
//! Every failure is fatal: errors propagate unmodified to the run entry
//! point, which logs them and exits non-zero.  There is no partial-success
//! mode — either a complete report is produced, or none is.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Errors surfaced while preparing or executing a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// The required configuration document was absent.
    ConfigurationMissing(PathBuf),
    /// The configuration document or an override could not be interpreted.
    ConfigurationInvalid(String),
    /// Fewer voter identities were available than the configured eligible count.
    InsufficientIdentities {
        /// Number of identities the configuration requires.
        required: usize,
        /// Number of identities the environment supplied.
        available: usize,
    },
    /// No committed-vote blob exists for a sampled voter index.
    ArtifactMissing {
        /// Voter index with no YES or NO blob on disk.
        index: usize,
    },
    /// The final tally digest could not be reproduced from the same bytes.
    IntegrityMismatch {
        /// Digest from the first derivation.
        first: String,
        /// Digest from the second derivation.
        second: String,
    },
    /// A protocol operation failed; the run aborts without a report.
    Submission {
        /// Label of the protocol being driven.
        protocol: String,
        /// Reason reported by the adapter.
        reason: String,
    },
    /// The final report could not be persisted.
    ReportWrite(String),
    /// An underlying I/O operation failed outside the cases above.
    Io(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationMissing(path) => {
                write!(f, "configuration document not found: {}", path.display())
            }
            Self::ConfigurationInvalid(reason) => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::InsufficientIdentities {
                required,
                available,
            } => write!(
                f,
                "insufficient identities: need {required}, have {available}"
            ),
            Self::ArtifactMissing { index } => {
                write!(f, "no committed-vote artifact for voter index {index}")
            }
            Self::IntegrityMismatch { first, second } => write!(
                f,
                "tally digest not reproducible: {first} != {second}"
            ),
            Self::Submission { protocol, reason } => {
                write!(f, "{protocol} protocol submission failed: {reason}")
            }
            Self::ReportWrite(reason) => write!(f, "failed to write report: {reason}"),
            Self::Io(reason) => write!(f, "i/o failure: {reason}"),
        }
    }
}

impl Error for HarnessError {}
