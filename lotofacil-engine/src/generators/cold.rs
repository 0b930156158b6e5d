use lotofacil_db::models::{PICK_COUNT, Strategy, Suggestion};

use crate::analysis::Analysis;

/// Les 15 numéros les moins sortis sur la fenêtre.
pub fn cold_numbers(analysis: &Analysis) -> Suggestion {
    Suggestion::new(Strategy::ColdNumbers, analysis.overall().bottom_k(PICK_COUNT))
}
