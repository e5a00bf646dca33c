//! `ballot_bench` favors reproducibility over realism: every run is a pure
//! function of its seed and configuration, so a measurement can be replayed,
//! audited and compared across machines without hidden entropy.
//!
//! Reproducible voter sampling.
//!
//! The sampler consumes the seeded generator to shuffle the eligible voter
//! indices, splits the shuffle into participating and abstaining subsets, and
//! assigns a yes/no choice to each participant against a target ratio.  All
//! three steps are pure functions of their inputs; rerunning them with the
//! same seed reproduces the same sets in the same order.

use crate::prng::SeededRng;
use std::collections::BTreeSet;

/// Outcome of one sampling pass over the eligible population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingResult {
    /// Participating voter indices, in shuffled submission order.
    pub active: Vec<usize>,
    /// Abstaining voter indices.
    pub inactive: BTreeSet<usize>,
    /// Subset of `active` assigned a yes vote.
    pub yes_set: BTreeSet<usize>,
}

/// Produces a uniform permutation of `0..count` using Fisher–Yates.
///
/// The shuffle iterates from the last position down to index 1, drawing
/// `j = floor(unit * (i + 1))` at each step, and therefore consumes exactly
/// `count - 1` values from `rng` (none when `count <= 1`).
pub fn permute(count: usize, rng: &mut SeededRng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..count).collect();
    for i in (1..count).rev() {
        let j = (rng.next_unit() * (i as f64 + 1.0)) as usize;
        order.swap(i, j);
    }
    order
}

/// Splits a permutation into participating and abstaining subsets.
///
/// When `force_full` is set the whole permutation participates.  Otherwise
/// the first `floor(len * rate)` entries participate, preserving shuffle
/// order, and the remainder abstains.
pub fn partition(
    permutation: Vec<usize>,
    rate: f64,
    force_full: bool,
) -> (Vec<usize>, BTreeSet<usize>) {
    let cut = if force_full {
        permutation.len()
    } else {
        (permutation.len() as f64 * rate) as usize
    };
    let mut active = permutation;
    let inactive: BTreeSet<usize> = active.split_off(cut).into_iter().collect();
    (active, inactive)
}

/// Assigns yes votes to the first participants in shuffle order.
///
/// The realized yes count is `floor(yes_target * |active| / eligible)`, which
/// scales the configured target by the participation level and never rounds
/// up past the target ratio.  The remaining participants implicitly vote no.
pub fn assign_choices(active: &[usize], yes_target: u64, eligible: usize) -> BTreeSet<usize> {
    if eligible == 0 {
        return BTreeSet::new();
    }
    let yes_count = (yes_target as usize * active.len()) / eligible;
    active.iter().take(yes_count).copied().collect()
}

/// Runs the full sampling pipeline for one benchmark run.
pub fn sample(
    eligible: usize,
    rate: f64,
    simulate_partial: bool,
    yes_target: u64,
    rng: &mut SeededRng,
) -> SamplingResult {
    let permutation = permute(eligible, rng);
    let (active, inactive) = partition(permutation, rate, !simulate_partial);
    let yes_set = assign_choices(&active, yes_target, eligible);
    SamplingResult {
        active,
        inactive,
        yes_set,
    }
}

#[cfg(test)]
mod tests {
    use super::{assign_choices, partition, permute, sample};
    use crate::prng::SeededRng;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_permute_is_bijection() {
        let mut rng = SeededRng::new(42);
        let order = permute(100, &mut rng);
        let seen: BTreeSet<usize> = order.iter().copied().collect();
        assert_eq!(order.len(), 100);
        assert_eq!(seen.len(), 100);
        assert_eq!(seen.iter().copied().max(), Some(99));
    }

    #[test]
    fn test_permute_trivial_sizes() {
        let mut rng = SeededRng::new(1);
        assert!(permute(0, &mut rng).is_empty());
        assert_eq!(permute(1, &mut rng), vec![0]);
    }

    #[test]
    fn test_full_participation_scenario() {
        // seed=42, N=10, rate=1.0, yes target 6: all ten participate and
        // exactly six of them vote yes.
        let mut rng = SeededRng::new(42);
        let result = sample(10, 1.0, false, 6, &mut rng);
        assert_eq!(result.active.len(), 10);
        assert!(result.inactive.is_empty());
        assert_eq!(result.yes_set.len(), 6);
        for idx in &result.yes_set {
            assert!(result.active.contains(idx));
        }
    }

    #[test]
    fn test_partial_participation_is_reproducible() {
        // seed=42, N=10, rate=0.5: five participants, and a rerun with the
        // same seed yields the same five in the same order.
        let mut rng = SeededRng::new(42);
        let first = sample(10, 0.5, true, 6, &mut rng);
        assert_eq!(first.active.len(), 5);
        assert_eq!(first.inactive.len(), 5);
        let mut rng = SeededRng::new(42);
        let second = sample(10, 0.5, true, 6, &mut rng);
        assert_eq!(first, second);
    }

    #[test]
    fn test_partition_force_full_ignores_rate() {
        let (active, inactive) = partition(vec![3, 1, 2, 0], 0.25, true);
        assert_eq!(active, vec![3, 1, 2, 0]);
        assert!(inactive.is_empty());
    }

    #[test]
    fn test_assign_choices_boundaries() {
        let active = vec![4, 2, 7, 0];
        assert!(assign_choices(&active, 0, 8).is_empty());
        assert_eq!(assign_choices(&active, 8, 8).len(), 4);
        assert!(assign_choices(&[], 6, 10).is_empty());
        assert!(assign_choices(&active, 6, 0).is_empty());
    }

    #[test]
    fn test_assign_choices_preserves_order_prefix() {
        let active = vec![9, 3, 5, 1, 7];
        let yes = assign_choices(&active, 6, 10);
        // floor(6 * 5 / 10) = 3 yes votes, taken from the front of `active`.
        assert_eq!(yes, BTreeSet::from([9, 3, 5]));
    }

    proptest! {
        #[test]
        fn prop_permute_contains_each_index_once(n in 0usize..256, seed in any::<u64>()) {
            let mut rng = SeededRng::new(seed);
            let order = permute(n, &mut rng);
            let seen: BTreeSet<usize> = order.iter().copied().collect();
            prop_assert_eq!(order.len(), n);
            prop_assert_eq!(seen, (0..n).collect::<BTreeSet<usize>>());
        }

        #[test]
        fn prop_partition_is_complete_and_disjoint(
            n in 0usize..256,
            seed in any::<u64>(),
            rate in 0.0f64..=1.0,
        ) {
            let mut rng = SeededRng::new(seed);
            let (active, inactive) = partition(permute(n, &mut rng), rate, false);
            prop_assert_eq!(active.len() + inactive.len(), n);
            prop_assert_eq!(active.len(), (n as f64 * rate) as usize);
            for idx in &active {
                prop_assert!(!inactive.contains(idx));
            }
        }

        #[test]
        fn prop_yes_count_never_exceeds_scaled_target(
            n in 1usize..256,
            seed in any::<u64>(),
            rate in 0.0f64..=1.0,
            yes_target in 0u64..256,
        ) {
            let yes_target = yes_target.min(n as u64);
            let mut rng = SeededRng::new(seed);
            let (active, _) = partition(permute(n, &mut rng), rate, false);
            let yes = assign_choices(&active, yes_target, n);
            prop_assert!(yes.len() <= active.len());
            prop_assert!(yes.len() as u64 * n as u64 <= yes_target * active.len() as u64);
        }
    }
}
