//! Property-based tests for bin construction and classification
//!
//! Properties covered:
//! 1. n thresholds give n + 1 bins partitioning the non-negative integers
//! 2. Every non-negative value lands in exactly one bin
//! 3. Classification is deterministic across independently built bins
//! 4. A record adds exactly calls * ranks to one bin, whatever the value

use binnacle::bins::{self, ClassifyMode};
use binnacle::notation;
use proptest::prelude::*;

/// Strictly increasing, positive threshold lists
fn thresholds_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(1i64..10_000_000, 1..12).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_bins_partition_non_negative_integers(thresholds in thresholds_strategy()) {
        let bins = bins::create(&thresholds).unwrap();

        prop_assert_eq!(bins.len(), thresholds.len() + 1);
        prop_assert_eq!(bins[0].min, 0);
        for pair in bins.windows(2) {
            prop_assert_eq!(pair[0].max, Some(pair[1].min));
        }
        prop_assert!(bins.last().unwrap().is_unbounded());
        prop_assert!(bins[..bins.len() - 1].iter().all(|b| !b.is_unbounded()));
    }

    #[test]
    fn prop_every_value_matches_exactly_one_bin(
        thresholds in thresholds_strategy(),
        val in 0i64..20_000_000,
    ) {
        let bins = bins::create(&thresholds).unwrap();
        let matches = bins.iter().filter(|b| b.contains(val)).count();
        prop_assert_eq!(matches, 1);
    }

    #[test]
    fn prop_classification_is_deterministic(
        thresholds in thresholds_strategy(),
        counts in prop::collection::vec(0i64..100_000, 1..30),
        calls in 1usize..10,
        datatype_size in 1usize..16,
    ) {
        let line = format!(
            "Rank(s) 0-3: {}",
            counts.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
        );
        let records = vec![line];

        let mut first = bins::create(&thresholds).unwrap();
        let mut second = bins::create(&thresholds).unwrap();
        bins::classify_counts(&mut first, &records, calls, datatype_size, ClassifyMode::Strict).unwrap();
        bins::classify_counts(&mut second, &records, calls, datatype_size, ClassifyMode::Strict).unwrap();

        prop_assert_eq!(&first, &second);
        let total: u64 = first.iter().map(|b| b.size).sum();
        prop_assert_eq!(total, (counts.len() * calls * 4) as u64);
    }

    #[test]
    fn prop_increment_is_calls_times_ranks(
        thresholds in thresholds_strategy(),
        count in 0i64..1_000_000,
        calls in 1usize..50,
        ranks in prop::collection::btree_set(0i64..512, 1..64),
    ) {
        let ranks: Vec<i64> = ranks.into_iter().collect();
        let records = vec![format!("Rank(s) {}: {}", notation::compress(&ranks), count)];

        let mut bins = bins::create(&thresholds).unwrap();
        bins::classify_counts(&mut bins, &records, calls, 1, ClassifyMode::Strict).unwrap();

        let touched: Vec<_> = bins.iter().filter(|b| b.size > 0).collect();
        prop_assert_eq!(touched.len(), 1);
        prop_assert!(touched[0].contains(count));
        prop_assert_eq!(touched[0].size, (calls * ranks.len()) as u64);
    }

    #[test]
    fn prop_zero_datatype_size_never_modifies(
        thresholds in thresholds_strategy(),
        record in "\\PC*",
    ) {
        let mut bins = bins::create(&thresholds).unwrap();
        let before = bins.clone();
        let result = bins::classify_counts(&mut bins, &[record], 1, 0, ClassifyMode::Lenient);

        prop_assert!(result.is_err());
        prop_assert_eq!(bins, before);
    }
}
