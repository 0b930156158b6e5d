use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use lotofacil_db::models::{COLUMN_COUNT, COLUMN_SIZE, Draw};

use crate::config::EngineConfig;
use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceRank {
    pub sequence: [u8; COLUMN_SIZE],
    pub count: u32,
    /// Plus petit indice de récence où la séquence apparaît (0 = dernier tirage).
    pub last_seen: usize,
}

impl SequenceRank {
    /// Ordre du classement : fréquence décroissante, puis la plus récente,
    /// puis ordre lexicographique de la séquence.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then(self.last_seen.cmp(&other.last_seen))
            .then(self.sequence.cmp(&other.sequence))
    }
}

#[derive(Debug, Clone)]
pub struct ColumnRanking {
    pub column: usize,
    pub ranks: Vec<SequenceRank>,
    /// Fréquence de chaque numéro dans cette colonne, pour les substitutions pondérées.
    pub weights: FrequencyTable,
}

impl ColumnRanking {
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn get(&self, rank: usize) -> Option<&SequenceRank> {
        self.ranks.get(rank)
    }

    /// Plus petit K dont les K premières séquences couvrent `coverage` des
    /// `total_draws` tirages, borné à [k_min, k_max] puis au nombre de séquences.
    pub fn adaptive_k(&self, total_draws: usize, config: &EngineConfig) -> usize {
        let target = total_draws as f64 * config.coverage;
        let mut cumulative = 0u32;
        let mut k = self.ranks.len();
        for (i, rank) in self.ranks.iter().enumerate() {
            cumulative += rank.count;
            if cumulative as f64 >= target {
                k = i + 1;
                break;
            }
        }
        k.clamp(config.k_min, config.k_max.max(config.k_min)).min(self.ranks.len())
    }
}

pub fn rank_column(draws: &[Draw], column: usize) -> ColumnRanking {
    let mut seen: HashMap<[u8; COLUMN_SIZE], (u32, usize)> = HashMap::new();
    let mut weights = FrequencyTable::new();

    for (recency, draw) in draws.iter().enumerate() {
        let sequence = draw.column(column);
        for n in sequence {
            weights.record(n);
        }
        let entry = seen.entry(sequence).or_insert((0, recency));
        entry.0 += 1;
        entry.1 = entry.1.min(recency);
    }

    let mut ranks: Vec<SequenceRank> = seen
        .into_iter()
        .map(|(sequence, (count, last_seen))| SequenceRank { sequence, count, last_seen })
        .collect();
    ranks.sort_by(SequenceRank::rank_cmp);

    ColumnRanking { column, ranks, weights }
}

/// Classement des séquences pour les trois colonnes. `draws` du plus récent au plus ancien.
pub fn rank_sequences(draws: &[Draw]) -> [ColumnRanking; COLUMN_COUNT] {
    std::array::from_fn(|c| rank_column(draws, c))
}
