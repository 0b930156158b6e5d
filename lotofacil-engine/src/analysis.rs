use chrono::NaiveDate;

use lotofacil_db::models::{COLUMN_COUNT, Draw, Period};

use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::frequency::{Frequencies, FrequencyTable, compute_frequencies};
use crate::period::select_window;
use crate::sequence::{ColumnRanking, rank_sequences};

/// Tout ce que les générateurs lisent : la fenêtre filtrée (non vide,
/// draws[0] = le plus récent), ses fréquences et ses classements de séquences.
#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    pub period: Period,
    pub draws: &'a [Draw],
    pub frequencies: Frequencies,
    pub rankings: [ColumnRanking; COLUMN_COUNT],
    pub config: EngineConfig,
}

impl<'a> Analysis<'a> {
    pub fn new(window: &'a [Draw], period: Period, config: EngineConfig) -> Result<Self, AnalysisError> {
        if window.is_empty() {
            return Err(AnalysisError::EmptyPeriod { period });
        }
        Ok(Self {
            period,
            draws: window,
            frequencies: compute_frequencies(window),
            rankings: rank_sequences(window),
            config,
        })
    }

    /// Filtre l'historique complet puis analyse la fenêtre obtenue.
    pub fn for_period(
        draws: &'a [Draw],
        period: Period,
        anchor: Option<NaiveDate>,
        config: EngineConfig,
    ) -> Result<Self, AnalysisError> {
        let window = select_window(draws, period, anchor)?;
        Self::new(window, period, config)
    }

    pub fn latest(&self) -> &'a Draw {
        &self.draws[0]
    }

    pub fn overall(&self) -> &FrequencyTable {
        &self.frequencies.overall
    }

    pub fn column_weights(&self) -> [&FrequencyTable; COLUMN_COUNT] {
        [
            &self.rankings[0].weights,
            &self.rankings[1].weights,
            &self.rankings[2].weights,
        ]
    }
}
