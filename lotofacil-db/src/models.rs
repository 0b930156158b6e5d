use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DrawError;

pub const POOL_SIZE: u8 = 25;
pub const PICK_COUNT: usize = 15;
pub const COLUMN_COUNT: usize = 3;
pub const COLUMN_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub contest: u32,
    pub date: NaiveDate,
    /// Toujours triés par ordre croissant.
    pub numbers: [u8; PICK_COUNT],
}

impl Draw {
    pub fn new(contest: u32, date: NaiveDate, numbers: &[u8]) -> Result<Self, DrawError> {
        let numbers = validate_numbers(numbers).map_err(|reason| DrawError::malformed(contest, reason))?;
        Ok(Self { contest, date, numbers })
    }

    /// Colonne `c` : rangs 5c+1 à 5c+5 de la grille triée.
    pub fn column(&self, c: usize) -> [u8; COLUMN_SIZE] {
        let mut col = [0u8; COLUMN_SIZE];
        col.copy_from_slice(&self.numbers[c * COLUMN_SIZE..(c + 1) * COLUMN_SIZE]);
        col
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.binary_search(&n).is_ok()
    }
}

pub fn validate_numbers(numbers: &[u8]) -> Result<[u8; PICK_COUNT], String> {
    if numbers.len() != PICK_COUNT {
        return Err(format!("{} numéros au lieu de {}", numbers.len(), PICK_COUNT));
    }
    for &n in numbers {
        if n < 1 || n > POOL_SIZE {
            return Err(format!("numéro {} hors limites (1-{})", n, POOL_SIZE));
        }
    }
    let mut sorted = [0u8; PICK_COUNT];
    sorted.copy_from_slice(numbers);
    sorted.sort_unstable();
    if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(format!("numéro en double : {}", w[0]));
    }
    Ok(sorted)
}

/// Historique ordonné du plus récent au plus ancien (date puis concours décroissants).
/// Les filtres renvoient des tranches, la collection n'est jamais modifiée.
#[derive(Debug, Clone, Default)]
pub struct DrawCollection {
    draws: Vec<Draw>,
}

impl DrawCollection {
    pub fn new(mut draws: Vec<Draw>) -> Self {
        draws.sort_by(|a, b| b.date.cmp(&a.date).then(b.contest.cmp(&a.contest)));
        let mut seen = std::collections::HashSet::new();
        draws.retain(|d| seen.insert(d.contest));
        Self { draws }
    }

    pub fn as_slice(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn latest(&self) -> Option<&Draw> {
        self.draws.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[value(name = "last_week")]
    LastWeek,
    #[value(name = "last_month")]
    LastMonth,
    #[value(name = "last_10")]
    #[serde(rename = "last_10")]
    Last10,
    #[value(name = "all")]
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::LastWeek => "last_week",
            Period::LastMonth => "last_month",
            Period::Last10 => "last_10",
            Period::All => "all",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Strategy {
    #[value(name = "hot-columns")]
    #[serde(rename = "hot-columns")]
    HotColumns,
    #[value(name = "cold")]
    #[serde(rename = "cold")]
    ColdNumbers,
    #[value(name = "pattern-fit")]
    #[serde(rename = "pattern-fit")]
    PatternFit,
    #[value(name = "top")]
    #[serde(rename = "top")]
    TopTopTop,
    #[value(name = "cyclic")]
    #[serde(rename = "cyclic")]
    CyclicRotation,
    #[value(name = "weighted-top-k")]
    #[serde(rename = "weighted-top-k")]
    WeightedTopK,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::HotColumns,
        Strategy::ColdNumbers,
        Strategy::PatternFit,
        Strategy::TopTopTop,
        Strategy::CyclicRotation,
        Strategy::WeightedTopK,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::HotColumns => "Colonnes chaudes",
            Strategy::ColdNumbers => "Numéros froids",
            Strategy::PatternFit => "Profil pair/bas/répétitions",
            Strategy::TopTopTop => "Top/Top/Top",
            Strategy::CyclicRotation => "Rotation cyclique",
            Strategy::WeightedTopK => "Top-K aléatoire",
        }
    }

    /// Stratégies construites à partir du classement des séquences par colonne.
    pub fn is_sequence_based(&self) -> bool {
        matches!(
            self,
            Strategy::TopTopTop | Strategy::CyclicRotation | Strategy::WeightedTopK
        )
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub columns: [u32; COLUMN_COUNT],
    pub gap: u32,
}

/// Provenance d'une colonne pour les stratégies par séquences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnExplanation {
    pub column: usize,
    pub rank: usize,
    pub selected: [u8; COLUMN_SIZE],
    pub adjusted_to: [u8; COLUMN_SIZE],
    pub observed: u32,
    pub adjusted: bool,
}

impl std::fmt::Display for ColumnExplanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Colonne {} (rang {}) : {}, vue {} fois",
            self.column + 1,
            self.rank + 1,
            format_numbers(&self.adjusted_to),
            self.observed
        )?;
        if self.adjusted {
            write!(f, " [ajustée, séquence d'origine {}]", format_numbers(&self.selected))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub strategy: Strategy,
    pub numbers: Vec<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnExplanation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Suggestion {
    pub fn new(strategy: Strategy, mut numbers: Vec<u8>) -> Self {
        numbers.sort_unstable();
        Self {
            strategy,
            numbers,
            columns: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnExplanation>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ")
}
