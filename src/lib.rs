#![deny(missing_docs)]

//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! # ballot_bench
//!
//! **ballot_bench** is a deterministic benchmarking harness that drives two
//! alternative vote-submission protocols side by side: a *private* protocol
//! where each voter submits an opaque commitment hash and a trusted
//! coordinator later reveals the aggregate, and a *public* protocol where each
//! voter submits a plaintext choice immediately.  The harness produces a
//! reproducible report comparing resource cost, latency and turnout between
//! the two.
//!
//! ## Features
//!
//! * **Seeded randomness**: the [`prng`](prng/index.html) module exposes a
//!   compact deterministic stream generator; identical seeds yield identical
//!   sampling decisions forever.
//! * **Reproducible sampling**: the [`sampler`](sampler/index.html) module
//!   shuffles the voter population, partitions it into participants and
//!   abstainers, and assigns yes/no choices against a target ratio.
//! * **Artifact verification**: the [`artifacts`](artifacts/index.html)
//!   module loads committed-vote blobs from disk, derives SHA3-256 content
//!   digests and checks that the final tally digest is reproducible.
//! * **Sequential protocol driving**: the [`driver`](driver/index.html)
//!   module submits one operation per active voter, strictly in sampling
//!   order, recording per-operation cost and wall-clock latency.
//! * **Comparison metrics**: the [`metrics`](metrics/index.html) module
//!   computes totals, truncating averages, nearest-rank percentiles and the
//!   signed overhead between the two protocols.
//!
//! ## Usage
//!
//! Sampling decisions depend only on the seed:
//!
//! ```rust
//! use ballot_bench::{sampler, SeededRng};
//!
//! let mut first = SeededRng::new(42);
//! let mut second = SeededRng::new(42);
//! assert_eq!(sampler::permute(10, &mut first), sampler::permute(10, &mut second));
//! ```
//!
//! The `referendum` binary wires the library against the in-memory reference
//! protocols in [`testbed`](testbed/index.html) and writes a single JSON
//! report per run.

pub mod artifacts;
pub mod config;
pub mod driver;
mod error;
pub mod harness;
pub mod metrics;
mod prng;
pub mod protocol;
pub mod report;
pub mod sampler;
pub mod testbed;

pub use artifacts::{content_digest, ArtifactMetadata, ArtifactStore, TallyArtifact, VoteArtifact};
pub use config::{EnvOverrides, SimulationConfig};
pub use driver::{DriveRecord, DriverState, ProtocolDriver, VoteOutcome};
pub use error::HarnessError;
pub use harness::{run_simulation, Roster};
pub use metrics::{average, compare, percentile, CostComparison, CostLabel, ProtocolMetrics};
pub use prng::SeededRng;
pub use protocol::{
    OperationReceipt, ParticipationView, ProtocolAdapter, ResultsView, SubmissionError,
    SubmissionReceipt, VoterRecordView,
};
pub use report::{write_report, Report};
pub use sampler::SamplingResult;
pub use testbed::{PeriodClock, PrivateVoting, PublicVoting};
