//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! Statistical aggregation over measured vote outcomes.
//!
//! All cost arithmetic is exact integer arithmetic: totals accumulate in
//! `u128`, the signed difference lives in `i128`, and averages truncate.
//! Floating point appears only in the final overhead percentage, which is
//! presentation, not accumulation.

use crate::driver::VoteOutcome;
use serde::Serialize;
use std::fmt;

/// Nearest-rank percentile of `values` at `p` (0–100).
///
/// The sample is sorted ascending and indexed at `floor(p/100 * (len-1))`,
/// without interpolation.  An empty sample yields zero; a single-element
/// sample yields that element for every `p`.
pub fn percentile(values: &[u64], p: u64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let index = (p as usize).saturating_mul(sorted.len() - 1) / 100;
    sorted[index.min(sorted.len() - 1)]
}

/// Truncating integer average; zero for an empty sample.
///
/// Truncation is a contract, not an approximation: `average(3, 2)` over a
/// total of three units across two samples is one, never rounded to two.
pub fn average(total: u128, count: usize) -> u128 {
    if count == 0 {
        0
    } else {
        total / count as u128
    }
}

/// Label attached to a signed cost comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CostLabel {
    /// The measured protocol costs at least as much as the baseline.
    Overhead,
    /// The measured protocol costs less than the baseline.
    Saving,
}

impl fmt::Display for CostLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overhead => write!(f, "overhead"),
            Self::Saving => write!(f, "saving"),
        }
    }
}

/// Signed difference and relative overhead between two cost totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostComparison {
    /// `measured - baseline`, signed.
    pub diff: i128,
    /// `diff / max(1, baseline) * 100`.
    pub overhead_pct: f64,
    /// `overhead` when `diff >= 0`, `saving` otherwise.
    pub label: CostLabel,
}

/// Compares a measured cost total against a baseline total.
///
/// The `max(1, baseline)` guard keeps the percentage defined when the
/// baseline total is zero.
pub fn compare(measured: u128, baseline: u128) -> CostComparison {
    let diff = measured as i128 - baseline as i128;
    let overhead_pct = diff as f64 / baseline.max(1) as f64 * 100.0;
    let label = if diff >= 0 {
        CostLabel::Overhead
    } else {
        CostLabel::Saving
    };
    CostComparison {
        diff,
        overhead_pct,
        label,
    }
}

/// Summary statistics over one protocol's measured outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolMetrics {
    /// Number of submissions measured.
    pub submissions: usize,
    /// Exact cost total.
    pub total_cost: u128,
    /// Truncating per-submission cost average.
    pub average_cost: u128,
    /// Median submission latency, nearest-rank.
    pub p50_latency_ms: u64,
    /// 95th-percentile submission latency, nearest-rank.
    pub p95_latency_ms: u64,
    /// Wall-clock duration of the whole drive.
    pub total_time_ms: u64,
}

impl ProtocolMetrics {
    /// Aggregates a drive's outcomes into summary statistics.
    pub fn from_outcomes(outcomes: &[VoteOutcome], total_time_ms: u64) -> Self {
        let total_cost: u128 = outcomes.iter().map(|o| o.cost as u128).sum();
        let latencies: Vec<u64> = outcomes.iter().map(|o| o.latency_ms).collect();
        Self {
            submissions: outcomes.len(),
            total_cost,
            average_cost: average(total_cost, outcomes.len()),
            p50_latency_ms: percentile(&latencies, 50),
            p95_latency_ms: percentile(&latencies, 95),
            total_time_ms,
        }
    }
}
