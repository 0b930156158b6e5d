use lotofacil_db::models::{COLUMN_COUNT, Draw, NumberStats, POOL_SIZE};

const SIZE: usize = POOL_SIZE as usize;

/// Nombre d'apparitions de chaque numéro 1..=25.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyTable {
    counts: [u32; SIZE],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `counts[i]` = nombre d'apparitions du numéro i + 1.
    pub fn from_counts(counts: [u32; SIZE]) -> Self {
        Self { counts }
    }

    pub fn record(&mut self, number: u8) {
        if let Some(c) = self.counts.get_mut((number as usize).wrapping_sub(1)) {
            *c += 1;
        }
    }

    pub fn count(&self, number: u8) -> u32 {
        self.counts
            .get((number as usize).wrapping_sub(1))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Les 25 numéros par fréquence décroissante, à égalité par numéro croissant.
    pub fn ranked_desc(&self) -> Vec<u8> {
        let mut numbers: Vec<u8> = (1..=POOL_SIZE).collect();
        numbers.sort_by(|&a, &b| self.count(b).cmp(&self.count(a)).then(a.cmp(&b)));
        numbers
    }

    /// Les k numéros les plus fréquents (k borné à 25), dans l'ordre du classement.
    pub fn top_k(&self, k: usize) -> Vec<u8> {
        let mut ranked = self.ranked_desc();
        ranked.truncate(k);
        ranked
    }

    /// Les k numéros les moins fréquents, à égalité par numéro croissant.
    pub fn bottom_k(&self, k: usize) -> Vec<u8> {
        let mut numbers: Vec<u8> = (1..=POOL_SIZE).collect();
        numbers.sort_by(|&a, &b| self.count(a).cmp(&self.count(b)).then(a.cmp(&b)));
        numbers.truncate(k);
        numbers
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequencies {
    pub overall: FrequencyTable,
    pub columns: [FrequencyTable; COLUMN_COUNT],
}

pub fn compute_frequencies(draws: &[Draw]) -> Frequencies {
    let mut overall = FrequencyTable::new();
    let mut columns: [FrequencyTable; COLUMN_COUNT] = Default::default();

    for draw in draws {
        for (c, table) in columns.iter_mut().enumerate() {
            for n in draw.column(c) {
                table.record(n);
                overall.record(n);
            }
        }
    }

    Frequencies { overall, columns }
}

/// Fréquences et retard de chaque numéro. draws[0] = le plus récent ;
/// le retard est l'indice du dernier tirage contenant le numéro, ou la
/// taille de la fenêtre s'il n'est jamais sorti.
pub fn compute_stats(draws: &[Draw]) -> Vec<NumberStats> {
    let freqs = compute_frequencies(draws);

    (1..=POOL_SIZE)
        .map(|n| {
            let gap = draws
                .iter()
                .position(|d| d.contains(n))
                .unwrap_or(draws.len()) as u32;
            NumberStats {
                number: n,
                frequency: freqs.overall.count(n),
                columns: [
                    freqs.columns[0].count(n),
                    freqs.columns[1].count(n),
                    freqs.columns[2].count(n),
                ],
                gap,
            }
        })
        .collect()
}
