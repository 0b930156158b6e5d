use thiserror::Error;

use lotofacil_db::models::Period;

/// Conditions signalées à l'appelant. Aucune n'est fatale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Aucun tirage pour la période sélectionnée ({period})")]
    EmptyPeriod { period: Period },

    #[error("Historique insuffisant : {available} tirage(s), au moins 2 requis")]
    InsufficientHistory { available: usize },
}
