//! Property-based tests for slot weight arithmetic

use dockyard_core::tree::SplitFractions;
use proptest::prelude::*;

// ============================================================================
// Test Strategies
// ============================================================================

/// Between two and six slots with weights small enough that every slot of a
/// 200px split gets at least one pixel
fn weights_strategy() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(1u32..=10, 2..=6)
}

/// Weights mixing unit slots with slots past the rescale threshold
fn extreme_weights_strategy() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(prop_oneof![Just(1u32), 1u32..=10, 1_000_000u32..=u32::MAX], 1..=6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Sizes always sum to the total, whatever the rounding
    #[test]
    fn prop_sizes_sum_to_total(
        weights in proptest::collection::vec(1u32..=1000, 1..=8),
        total in 0i64..5000,
    ) {
        let fractions = SplitFractions::new(weights);
        let sizes = fractions.sizes_for(total);
        prop_assert_eq!(sizes.iter().sum::<i64>(), total);
    }

    /// Offsets are the running sum of sizes
    #[test]
    fn prop_offsets_are_prefix_sums(
        weights in weights_strategy(),
        total in 200i64..2000,
    ) {
        let fractions = SplitFractions::new(weights);
        let sizes = fractions.sizes_for(total);
        let offsets = fractions.offsets_for(total);
        let mut running = 0;
        for (offset, size) in offsets.iter().zip(&sizes) {
            prop_assert_eq!(*offset, running);
            running += size;
        }
    }

    /// Scaling every weight by the same factor does not move any pixel
    #[test]
    fn prop_only_ratios_matter(
        weights in weights_strategy(),
        factor in 1u32..50,
        total in 200i64..2000,
    ) {
        let plain = SplitFractions::new(weights.clone());
        let scaled = SplitFractions::new(weights.iter().map(|w| w * factor).collect());
        prop_assert_eq!(plain.sizes_for(total), scaled.sizes_for(total));
    }

    /// A divider move never pushes either neighbor below the minimum and
    /// leaves every other slot at its exact pixel size
    #[test]
    fn prop_adjust_respects_clamp(
        weights in weights_strategy(),
        total in 200i64..2000,
        index_seed in any::<usize>(),
        delta in -3000i64..3000,
        min in 1i64..30,
    ) {
        let mut fractions = SplitFractions::new(weights);
        let index = index_seed % (fractions.len() - 1);
        let before = fractions.sizes_for(total);
        prop_assume!(before[index] >= min && before[index + 1] >= min);

        let applied = fractions.adjust(index, delta, total, min);
        let after = fractions.sizes_for(total);

        prop_assert_eq!(after.iter().sum::<i64>(), total);
        prop_assert!(applied.abs() <= delta.abs());
        prop_assert!(after[index] >= min, "slot {} shrank to {}", index, after[index]);
        prop_assert!(after[index + 1] >= min, "slot {} shrank to {}", index + 1, after[index + 1]);
        prop_assert_eq!(after[index], before[index] + applied);
        for (i, (a, b)) in after.iter().zip(&before).enumerate() {
            if i != index && i != index + 1 {
                prop_assert_eq!(a, b, "slot {} outside the pair moved", i);
            }
        }
    }

    /// Splitting a slot keeps the outer slots' shares
    #[test]
    fn prop_split_slot_keeps_other_slots(
        weights in weights_strategy(),
        index_seed in any::<usize>(),
        fraction in 0.05f64..0.95,
        leading in any::<bool>(),
    ) {
        let mut fractions = SplitFractions::new(weights);
        let index = index_seed % fractions.len();
        let before: Vec<f64> = (0..fractions.len()).map(|i| fractions.share(i)).collect();

        let new_index = fractions.split_slot(index, fraction, leading);
        let kept = if leading { index + 1 } else { index };
        prop_assert_eq!(new_index, if leading { index } else { index + 1 });

        let combined = fractions.share(new_index) + fractions.share(kept);
        prop_assert!((combined - before[index]).abs() < 1e-3);
        for (i, share) in before.iter().enumerate().filter(|(i, _)| *i != index) {
            let moved = if i > index { i + 1 } else { i };
            prop_assert!((fractions.share(moved) - share).abs() < 1e-3);
        }
    }

    /// Splitting any slot of any valid weight vector adds exactly one
    /// positive slot and still tiles the total
    #[test]
    fn prop_split_slot_accepts_extreme_weights(
        weights in extreme_weights_strategy(),
        index_seed in any::<usize>(),
        fraction in 0.0f64..=1.0,
        leading in any::<bool>(),
        total in 0i64..5000,
    ) {
        let mut fractions = SplitFractions::new(weights);
        let len = fractions.len();
        let index = index_seed % len;

        let new_index = fractions.split_slot(index, fraction, leading);

        prop_assert_eq!(new_index, if leading { index } else { index + 1 });
        prop_assert_eq!(fractions.len(), len + 1);
        prop_assert!(fractions.weights().iter().all(|&w| w >= 1));
        prop_assert_eq!(fractions.sizes_for(total).iter().sum::<i64>(), total);
    }
}
