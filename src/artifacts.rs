//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! Committed-vote artifact loading and integrity verification.
//!
//! The harness does not produce the artifacts it consumes: an offline
//! pipeline emits one opaque blob per voter (`vote_{index:03}_YES.bin` or
//! `vote_{index:03}_NO.bin`), a `final_tally.bin` aggregate and a
//! `metadata.json` document describing the configured totals.  This module
//! reads that layout, derives SHA3-256 content digests and asserts that the
//! tally digest is reproducible from the same bytes.

use crate::error::HarnessError;
use serde::Deserialize;
use sha3::{Digest, Sha3_256};
use std::fs;
use std::path::{Path, PathBuf};

/// Derives the hex content digest used for commitments, `0x`-prefixed.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(bytes);
    format!("0x{}", hex::encode(hasher.finalize()))
}

/// One voter's committed-vote blob and its derived digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteArtifact {
    /// Voter index the blob belongs to.
    pub index: usize,
    /// Intended choice encoded in the blob's filename tag.
    pub intended_yes: bool,
    /// SHA3-256 content digest, hex with `0x` prefix.
    pub digest: String,
    /// Blob size in bytes.
    pub size: usize,
    /// True when both a YES and a NO blob exist for this index.
    ///
    /// The YES blob wins in that case.  Coexistence is a caller error in the
    /// offline pipeline but is tolerated here rather than rejected.
    pub duplicate: bool,
}

/// The final aggregate blob and its derived digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyArtifact {
    /// Raw aggregate bytes.
    pub bytes: Vec<u8>,
    /// SHA3-256 content digest, hex with `0x` prefix.
    pub digest: String,
}

/// Configured vote totals recorded by the offline pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfiguration {
    /// Number of eligible voters the artifacts were generated for.
    pub total_voters: u64,
    /// Number of YES blobs generated.
    pub yes_votes: u64,
    /// Number of NO blobs generated.
    pub no_votes: u64,
}

/// Offline aggregation timings recorded by the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataPerformance {
    /// Wall-clock duration of the offline tally, in milliseconds.
    pub tally_time_ms: f64,
}

/// Reference to the final aggregate blob inside the metadata document.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataFinalTally {
    /// Filename of the aggregate blob.
    pub filename: String,
    /// Digest the pipeline recorded for the blob.
    pub hash: String,
}

/// Metadata document emitted alongside the artifacts.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactMetadata {
    /// Question text the votes answer, when recorded.
    #[serde(default)]
    pub question: Option<String>,
    /// Configured totals.
    pub configuration: MetadataConfiguration,
    /// Offline timing information.
    pub performance: MetadataPerformance,
    /// Aggregate blob reference, when recorded.
    #[serde(default)]
    pub final_tally: Option<MetadataFinalTally>,
}

/// Read-only view over one on-disk artifact directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Opens a store rooted at `dir`.  No files are touched until a load.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory this store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn vote_path(&self, index: usize, yes: bool) -> PathBuf {
        let tag = if yes { "YES" } else { "NO" };
        self.dir.join(format!("vote_{index:03}_{tag}.bin"))
    }

    /// Loads the committed-vote blob for one voter index.
    ///
    /// Both filename variants are checked; the YES blob takes precedence if
    /// both exist.  Fails with [`HarnessError::ArtifactMissing`] when neither
    /// variant is present.
    pub fn load_vote(&self, index: usize) -> Result<VoteArtifact, HarnessError> {
        let yes_path = self.vote_path(index, true);
        let no_path = self.vote_path(index, false);
        let has_yes = yes_path.is_file();
        let has_no = no_path.is_file();
        let (path, intended_yes) = if has_yes {
            (yes_path, true)
        } else if has_no {
            (no_path, false)
        } else {
            return Err(HarnessError::ArtifactMissing { index });
        };
        let bytes = fs::read(&path).map_err(|err| HarnessError::Io(err.to_string()))?;
        Ok(VoteArtifact {
            index,
            intended_yes,
            digest: content_digest(&bytes),
            size: bytes.len(),
            duplicate: has_yes && has_no,
        })
    }

    /// Loads and digests the blobs for voter indices `0..count`, in order.
    ///
    /// The first missing index aborts the whole load; downstream metrics
    /// would be undefined with a gap in the commitment sequence.
    pub fn vote_digests(&self, count: usize) -> Result<Vec<VoteArtifact>, HarnessError> {
        (0..count).map(|index| self.load_vote(index)).collect()
    }

    /// Parses the `metadata.json` document.
    pub fn load_metadata(&self) -> Result<ArtifactMetadata, HarnessError> {
        let path = self.dir.join("metadata.json");
        if !path.is_file() {
            return Err(HarnessError::ConfigurationMissing(path));
        }
        let contents = fs::read_to_string(&path).map_err(|err| HarnessError::Io(err.to_string()))?;
        serde_json::from_str(&contents)
            .map_err(|err| HarnessError::ConfigurationInvalid(err.to_string()))
    }

    /// Loads the final aggregate blob and derives its digest.
    pub fn load_final_tally(&self) -> Result<TallyArtifact, HarnessError> {
        let path = self.dir.join("final_tally.bin");
        let bytes = fs::read(&path).map_err(|err| {
            HarnessError::Io(format!("{}: {err}", path.display()))
        })?;
        let digest = content_digest(&bytes);
        Ok(TallyArtifact { bytes, digest })
    }

    /// Checks that the tally digest is reproducible and returns it.
    ///
    /// The blob is loaded and hashed twice, independently.  A disagreement
    /// means the hash computation itself is nondeterministic or the bytes
    /// were corrupted mid-run, and fails the run before any reveal step.
    pub fn verify_tally_integrity(&self) -> Result<String, HarnessError> {
        verify_tally_with(|| self.load_final_tally().map(|tally| tally.bytes))
    }
}

/// Integrity check over an arbitrary tally loader.
///
/// `load` is invoked twice; each returned byte vector is hashed and the two
/// digests must agree.  The loader seam lets tests substitute bytes between
/// the derivations.
pub fn verify_tally_with<F>(mut load: F) -> Result<String, HarnessError>
where
    F: FnMut() -> Result<Vec<u8>, HarnessError>,
{
    let first = content_digest(&load()?);
    let second = content_digest(&load()?);
    if first != second {
        return Err(HarnessError::IntegrityMismatch { first, second });
    }
    Ok(first)
}
