use chrono::{Days, NaiveDate};
use lotofacil_db::models::{Draw, DrawCollection, POOL_SIZE, Period};
use lotofacil_engine::analysis::Analysis;
use lotofacil_engine::config::EngineConfig;
use lotofacil_engine::dedup::dedup_columns;
use lotofacil_engine::frequency::FrequencyTable;
use lotofacil_engine::generators::{cold_numbers, cyclic_rotation, pattern_fit};
use lotofacil_engine::period::filter_period;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use rand::SeedableRng;
use rand::rngs::StdRng;

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn pool() -> Vec<u8> {
    (1..=POOL_SIZE).collect()
}

fn draw_numbers_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::sample::subsequence(pool(), 15).prop_shuffle()
}

/// Historique du plus récent au plus ancien, écarts de 0 à 3 jours entre tirages.
fn history_strategy() -> impl Strategy<Value = Vec<Draw>> {
    prop::collection::vec((draw_numbers_strategy(), 0u64..4), 1..60).prop_map(|raw| {
        let n = raw.len();
        let mut offset = 0u64;
        let draws = raw
            .into_iter()
            .enumerate()
            .map(|(i, (numbers, gap))| {
                offset += gap;
                let date = base_date() - Days::new(offset);
                Draw::new((n - i) as u32, date, &numbers).unwrap()
            })
            .collect();
        DrawCollection::new(draws).as_slice().to_vec()
    })
}

fn period_strategy() -> impl Strategy<Value = Period> {
    prop::sample::select(vec![Period::LastWeek, Period::LastMonth, Period::Last10, Period::All])
}

fn anchor_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((-60i64..10).prop_map(|delta| {
        if delta >= 0 {
            base_date() + Days::new(delta as u64)
        } else {
            base_date() - Days::new(delta.unsigned_abs())
        }
    }))
}

fn distinct_counts_strategy() -> impl Strategy<Value = FrequencyTable> {
    Just((0..POOL_SIZE as u32).collect::<Vec<u32>>())
        .prop_shuffle()
        .prop_map(|counts| {
            let mut table = [0u32; POOL_SIZE as usize];
            table.copy_from_slice(&counts);
            FrequencyTable::from_counts(table)
        })
}

fn is_subsequence(part: &[Draw], whole: &[Draw]) -> bool {
    let mut it = whole.iter();
    part.iter().all(|d| it.any(|w| w == d))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        max_shrink_iters: 1024,
        failure_persistence: Some(Box::new(FileFailurePersistence::Direct("proptest-regressions/tests/proptest_invariants.txt"))),
        .. ProptestConfig::default()
    })]

    #[test]
    fn period_filter_is_ordered_subsequence(
        draws in history_strategy(),
        period in period_strategy(),
        anchor in anchor_strategy(),
    ) {
        let window = filter_period(&draws, period, anchor);
        prop_assert!(is_subsequence(window, &draws));
        if let Some(anchor) = anchor {
            prop_assert!(window.iter().all(|d| d.date <= anchor));
        }
        if period == Period::Last10 {
            prop_assert!(window.len() <= 10);
        }
    }

    #[test]
    fn top_and_bottom_are_total_and_disjoint(
        table in distinct_counts_strategy(),
        k1 in 0usize..=25,
        k2 in 0usize..=25,
    ) {
        let top = table.top_k(k1);
        let bottom = table.bottom_k(k2);
        prop_assert_eq!(top.len(), k1);
        prop_assert_eq!(bottom.len(), k2);
        if k1 + k2 <= 25 {
            prop_assert!(top.iter().all(|n| !bottom.contains(n)));
        }
    }

    #[test]
    fn cold_and_pattern_fit_give_fifteen_distinct(
        draws in history_strategy(),
        period in period_strategy(),
    ) {
        let Ok(analysis) = Analysis::for_period(&draws, period, None, EngineConfig::default()) else {
            return Ok(());
        };
        for suggestion in [cold_numbers(&analysis), pattern_fit(&analysis)] {
            let mut numbers = suggestion.numbers.clone();
            numbers.dedup();
            prop_assert_eq!(numbers.len(), 15);
            prop_assert!(numbers.iter().all(|&n| (1..=POOL_SIZE).contains(&n)));
        }
    }

    #[test]
    fn dedup_yields_fifteen_distinct_sorted(
        raw in prop::collection::vec(1u8..=POOL_SIZE, 15),
        weights in prop::collection::vec(0u32..5, 25),
        seed in any::<u64>(),
    ) {
        let mut columns = [[0u8; 5]; 3];
        for (i, n) in raw.iter().enumerate() {
            columns[i / 5][i % 5] = *n;
        }
        let mut counts = [0u32; POOL_SIZE as usize];
        counts.copy_from_slice(&weights);
        let table = FrequencyTable::from_counts(counts);

        let out = dedup_columns(columns, [&table, &table, &table], &mut StdRng::seed_from_u64(seed));
        for column in &out {
            prop_assert!(column.windows(2).all(|w| w[0] < w[1]));
        }
        let mut all: Vec<u8> = out.iter().flatten().copied().collect();
        all.sort_unstable();
        all.dedup();
        prop_assert_eq!(all.len(), 15);
        prop_assert!(all.iter().all(|&n| (1..=POOL_SIZE).contains(&n)));
    }

    #[test]
    fn cyclic_rotation_advances_once_per_call(
        draws in history_strategy(),
        start in 0u64..1_000,
        calls in 1usize..12,
        seed in any::<u64>(),
    ) {
        let analysis = Analysis::for_period(&draws, Period::All, None, EngineConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cursor = start;
        for _ in 0..calls {
            let (suggestion, next) = cyclic_rotation(&analysis, cursor, &mut rng);
            prop_assert_eq!(suggestion.numbers.len(), 15);
            cursor = next;
        }
        prop_assert_eq!(cursor, start + calls as u64);
    }
}
