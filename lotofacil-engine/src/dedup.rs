use std::collections::HashSet;

use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::{Rng, RngExt};
use tracing::debug;

use lotofacil_db::models::{COLUMN_COUNT, COLUMN_SIZE, POOL_SIZE};

use crate::frequency::FrequencyTable;

pub type Columns = [[u8; COLUMN_SIZE]; COLUMN_COUNT];

/// Tirage d'un candidat avec probabilité proportionnelle à son poids,
/// uniforme si tous les poids sont nuls. `None` si aucun candidat.
pub fn weighted_pick(candidates: &[u8], weights: &FrequencyTable, rng: &mut impl Rng) -> Option<u8> {
    if candidates.is_empty() {
        return None;
    }
    let w: Vec<u32> = candidates.iter().map(|&n| weights.count(n)).collect();
    match WeightedIndex::new(&w) {
        Ok(dist) => Some(candidates[dist.sample(rng)]),
        Err(_) => Some(candidates[rng.random_range(0..candidates.len())]),
    }
}

fn candidates_excluding(excluded: impl Fn(u8) -> bool) -> Vec<u8> {
    (1..=POOL_SIZE).filter(|&n| !excluded(n)).collect()
}

/// Rend les trois colonnes disjointes et sans doublon interne.
///
/// 1. doublons internes : remplacés par un numéro absent de la colonne ;
/// 2. collisions entre colonnes (ordre 0, 1, 2, case par case) : remplacées
///    par un numéro ni déjà placé ni présent dans la colonne courante, en
///    relâchant la seconde condition si nécessaire ;
/// 3. chaque colonne est triée.
///
/// Les remplacements sont pondérés par la fréquence du numéro dans la colonne.
pub fn dedup_columns(
    mut columns: Columns,
    weights: [&FrequencyTable; COLUMN_COUNT],
    rng: &mut impl Rng,
) -> Columns {
    for (c, column) in columns.iter_mut().enumerate() {
        let mut seen: HashSet<u8> = HashSet::new();
        for slot in 0..COLUMN_SIZE {
            let n = column[slot];
            if seen.insert(n) {
                continue;
            }
            let current: HashSet<u8> = column.iter().copied().collect();
            let candidates = candidates_excluding(|x| current.contains(&x));
            if let Some(replacement) = weighted_pick(&candidates, weights[c], rng) {
                debug!(column = c, from = n, to = replacement, "doublon interne remplacé");
                column[slot] = replacement;
                seen.insert(replacement);
            }
        }
    }

    let mut used: HashSet<u8> = HashSet::new();
    for (c, column) in columns.iter_mut().enumerate() {
        for slot in 0..COLUMN_SIZE {
            let n = column[slot];
            if !used.contains(&n) {
                used.insert(n);
                continue;
            }
            let mut candidates = candidates_excluding(|x| used.contains(&x) || column.contains(&x));
            if candidates.is_empty() {
                candidates = candidates_excluding(|x| used.contains(&x));
            }
            if let Some(replacement) = weighted_pick(&candidates, weights[c], rng) {
                debug!(column = c, from = n, to = replacement, "collision entre colonnes remplacée");
                column[slot] = replacement;
                used.insert(replacement);
            }
        }
    }

    for column in columns.iter_mut() {
        column.sort_unstable();
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn uniform() -> FrequencyTable {
        FrequencyTable::from_counts([1; POOL_SIZE as usize])
    }

    fn assert_valid(columns: &Columns) {
        let mut all: Vec<u8> = columns.iter().flatten().copied().collect();
        for column in columns {
            assert!(column.windows(2).all(|w| w[0] < w[1]), "colonne non triée ou doublon : {:?}", column);
        }
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 15, "{:?}", columns);
        assert!(all.iter().all(|&n| (1..=POOL_SIZE).contains(&n)));
    }

    #[test]
    fn test_disjoint_input_only_sorted() {
        let w = uniform();
        let mut rng = StdRng::seed_from_u64(1);
        let input = [[5, 4, 3, 2, 1], [6, 7, 8, 9, 10], [15, 11, 12, 13, 14]];
        let out = dedup_columns(input, [&w, &w, &w], &mut rng);
        assert_eq!(out, [[1, 2, 3, 4, 5], [6, 7, 8, 9, 10], [11, 12, 13, 14, 15]]);
    }

    #[test]
    fn test_identical_columns_become_disjoint() {
        let w = uniform();
        let mut rng = StdRng::seed_from_u64(7);
        let input = [[1, 2, 3, 4, 5]; 3];
        let out = dedup_columns(input, [&w, &w, &w], &mut rng);
        assert_eq!(out[0], [1, 2, 3, 4, 5]);
        assert_valid(&out);
    }

    #[test]
    fn test_internal_duplicates_removed() {
        let w = uniform();
        let mut rng = StdRng::seed_from_u64(3);
        let input = [[1, 1, 1, 2, 2], [6, 7, 8, 9, 10], [11, 12, 13, 14, 15]];
        let out = dedup_columns(input, [&w, &w, &w], &mut rng);
        assert_valid(&out);
    }

    #[test]
    fn test_weighted_replacement_is_exact_with_single_weight() {
        // seul 20 a un poids non nul parmi les candidats de la colonne 1
        let mut counts = [0u32; POOL_SIZE as usize];
        counts[19] = 9;
        let only_twenty = FrequencyTable::from_counts(counts);
        let w = uniform();
        let mut rng = StdRng::seed_from_u64(99);
        let input = [[1, 2, 3, 4, 5], [5, 6, 7, 8, 9], [11, 12, 13, 14, 15]];
        let out = dedup_columns(input, [&w, &only_twenty, &w], &mut rng);
        assert_eq!(out[1], [6, 7, 8, 9, 20]);
        assert_valid(&out);
    }

    #[test]
    fn test_internal_duplicate_weighted_replacement_is_exact() {
        // seul 22 a un poids non nul hors de la colonne 0
        let mut counts = [0u32; POOL_SIZE as usize];
        counts[21] = 4;
        let only_twenty_two = FrequencyTable::from_counts(counts);
        let w = uniform();
        let input = [[1, 1, 2, 3, 4], [6, 7, 8, 9, 10], [11, 12, 13, 14, 15]];
        for seed in 0..20 {
            let out = dedup_columns(input, [&only_twenty_two, &w, &w], &mut StdRng::seed_from_u64(seed));
            assert_eq!(out[0], [1, 2, 3, 4, 22], "seed {seed}");
            assert_valid(&out);
        }
    }

    #[test]
    fn test_weighted_pick_zero_weights_is_uniform() {
        let zeros = FrequencyTable::new();
        let mut rng = StdRng::seed_from_u64(5);
        let candidates = [3u8, 8, 21];
        for _ in 0..50 {
            let n = weighted_pick(&candidates, &zeros, &mut rng).unwrap();
            assert!(candidates.contains(&n));
        }
        assert_eq!(weighted_pick(&[], &zeros, &mut rng), None);
    }

    #[test]
    fn test_seed_determinism() {
        let w = uniform();
        let input = [[1, 2, 3, 4, 5]; 3];
        let a = dedup_columns(input, [&w, &w, &w], &mut StdRng::seed_from_u64(42));
        let b = dedup_columns(input, [&w, &w, &w], &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
