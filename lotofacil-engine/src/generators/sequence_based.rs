use rand::{Rng, RngExt};
use tracing::debug;

use lotofacil_db::models::{COLUMN_COUNT, COLUMN_SIZE, ColumnExplanation, Strategy, Suggestion};

use crate::analysis::Analysis;
use crate::dedup::{Columns, dedup_columns};

/// Assemble trois séquences choisies (une par colonne) en une grille valide.
/// `ranks[c]` est l'indice de la séquence retenue dans le classement de la colonne c.
fn assemble(
    strategy: Strategy,
    analysis: &Analysis,
    ranks: [usize; COLUMN_COUNT],
    rng: &mut impl Rng,
) -> Suggestion {
    let mut selected: Columns = [[0; COLUMN_SIZE]; COLUMN_COUNT];
    let mut observed = [0u32; COLUMN_COUNT];
    for c in 0..COLUMN_COUNT {
        // fenêtre non vide : chaque colonne a au moins une séquence
        if let Some(rank) = analysis.rankings[c].get(ranks[c]) {
            selected[c] = rank.sequence;
            observed[c] = rank.count;
        }
    }

    let adjusted = dedup_columns(selected, analysis.column_weights(), rng);

    let columns: Vec<ColumnExplanation> = (0..COLUMN_COUNT)
        .map(|c| {
            let mut original = selected[c];
            original.sort_unstable();
            ColumnExplanation {
                column: c,
                rank: ranks[c],
                selected: selected[c],
                adjusted_to: adjusted[c],
                observed: observed[c],
                adjusted: adjusted[c] != original,
            }
        })
        .collect();

    let numbers: Vec<u8> = adjusted.iter().flatten().copied().collect();
    Suggestion::new(strategy, numbers).with_columns(columns)
}

/// La séquence la plus fréquente de chaque colonne.
pub fn top_top_top(analysis: &Analysis, rng: &mut impl Rng) -> Suggestion {
    assemble(Strategy::TopTopTop, analysis, [0; COLUMN_COUNT], rng)
}

/// Rang `(cursor + c) mod n_c` pour la colonne c. Retourne le curseur avancé de 1.
pub fn cyclic_rotation(analysis: &Analysis, cursor: u64, rng: &mut impl Rng) -> (Suggestion, u64) {
    let ranks: [usize; COLUMN_COUNT] = std::array::from_fn(|c| {
        let len = analysis.rankings[c].len().max(1) as u64;
        (cursor.wrapping_add(c as u64) % len) as usize
    });
    debug!(cursor, ?ranks, "rotation");
    let suggestion = assemble(Strategy::CyclicRotation, analysis, ranks, rng)
        .with_note(format!("Rotation n° {}", cursor.wrapping_add(1)));
    (suggestion, cursor.wrapping_add(1))
}

/// Rang tiré uniformément parmi les K premières séquences de chaque colonne,
/// K adaptatif selon la couverture des tirages.
pub fn weighted_top_k(analysis: &Analysis, rng: &mut impl Rng) -> Suggestion {
    let total = analysis.draws.len();
    let ks: [usize; COLUMN_COUNT] =
        std::array::from_fn(|c| analysis.rankings[c].adaptive_k(total, &analysis.config).max(1));
    let ranks: [usize; COLUMN_COUNT] = std::array::from_fn(|c| rng.random_range(0..ks[c]));
    debug!(?ks, ?ranks, "top-k");
    assemble(Strategy::WeightedTopK, analysis, ranks, rng).with_note(format!(
        "K par colonne : {} / {} / {}",
        ks[0], ks[1], ks[2]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::make_test_draws;
    use chrono::NaiveDate;
    use lotofacil_db::models::{Draw, POOL_SIZE, Period};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn draw(contest: u32, numbers: &[u8]) -> Draw {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(contest as u64);
        Draw::new(contest, date, numbers).unwrap()
    }

    fn assert_valid(suggestion: &Suggestion) {
        assert_eq!(suggestion.numbers.len(), 15, "{:?}", suggestion.numbers);
        assert!(suggestion.numbers.windows(2).all(|w| w[0] < w[1]));
        assert!(suggestion.numbers.iter().all(|&n| (1..=POOL_SIZE).contains(&n)));
        assert_eq!(suggestion.columns.len(), 3);
    }

    #[test]
    fn test_top_top_top_disjoint_is_deterministic() {
        let nums: Vec<u8> = (1..=15).collect();
        let draws = vec![draw(3, &nums), draw(2, &nums), draw(1, &(2..=16).collect::<Vec<u8>>())];
        let analysis = Analysis::for_period(&draws, Period::All, None, EngineConfig::default()).unwrap();
        let a = top_top_top(&analysis, &mut StdRng::seed_from_u64(1));
        let b = top_top_top(&analysis, &mut StdRng::seed_from_u64(2));
        assert_eq!(a.numbers, nums);
        assert_eq!(a.numbers, b.numbers);
        assert!(a.columns.iter().all(|c| !c.adjusted));
        assert_eq!(a.columns[0].observed, 2);
    }

    #[test]
    fn test_top_top_top_flags_adjusted_columns() {
        // col0 [1..5], col1 [5..9] (5 répété), col2 [11..15]
        let draws = vec![draw(1, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])];
        let mut analysis = Analysis::for_period(&draws, Period::All, None, EngineConfig::default()).unwrap();
        analysis.rankings[1].ranks[0].sequence = [5, 6, 7, 8, 9];
        let suggestion = top_top_top(&analysis, &mut StdRng::seed_from_u64(11));
        assert_valid(&suggestion);
        assert!(!suggestion.columns[0].adjusted);
        assert!(suggestion.columns[1].adjusted);
        assert_eq!(suggestion.columns[1].selected, [5, 6, 7, 8, 9]);
        assert!(!suggestion.columns[1].adjusted_to.contains(&5));
    }

    #[test]
    fn test_cyclic_rotation_advances_cursor() {
        let draws = make_test_draws(40);
        let analysis = Analysis::for_period(&draws, Period::All, None, EngineConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut cursor = 0;
        for i in 0..10 {
            let (suggestion, next) = cyclic_rotation(&analysis, cursor, &mut rng);
            assert_eq!(next, cursor + 1);
            assert_valid(&suggestion);
            for (c, column) in suggestion.columns.iter().enumerate() {
                assert_eq!(column.rank, (i + c) % analysis.rankings[c].len());
            }
            cursor = next;
        }
        assert_eq!(cursor, 10);
    }

    #[test]
    fn test_cyclic_rotation_wraps() {
        let nums: Vec<u8> = (1..=15).collect();
        let draws = vec![draw(2, &nums), draw(1, &nums)];
        let analysis = Analysis::for_period(&draws, Period::All, None, EngineConfig::default()).unwrap();
        // une seule séquence par colonne : toujours le rang 0
        let (suggestion, next) = cyclic_rotation(&analysis, 41, &mut StdRng::seed_from_u64(0));
        assert_eq!(next, 42);
        assert!(suggestion.columns.iter().all(|c| c.rank == 0));
        assert_eq!(suggestion.numbers, nums);
    }

    #[test]
    fn test_weighted_top_k_within_k() {
        let draws = make_test_draws(60);
        let analysis = Analysis::for_period(&draws, Period::All, None, EngineConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..20 {
            let suggestion = weighted_top_k(&analysis, &mut rng);
            assert_valid(&suggestion);
            for (c, column) in suggestion.columns.iter().enumerate() {
                let k = analysis.rankings[c].adaptive_k(draws.len(), &analysis.config);
                assert!(column.rank < k, "rang {} hors de K = {k}", column.rank);
            }
        }
    }

    #[test]
    fn test_weighted_top_k_seeded() {
        let draws = make_test_draws(60);
        let analysis = Analysis::for_period(&draws, Period::All, None, EngineConfig::default()).unwrap();
        let a = weighted_top_k(&analysis, &mut StdRng::seed_from_u64(8));
        let b = weighted_top_k(&analysis, &mut StdRng::seed_from_u64(8));
        assert_eq!(a.numbers, b.numbers);
    }
}
