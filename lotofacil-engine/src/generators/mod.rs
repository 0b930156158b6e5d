//! Les six stratégies de suggestion. Toutes lisent une même `Analysis` ;
//! la rotation lit et rend le curseur, l'aléa est injecté par l'appelant.

pub mod cold;
pub mod hot_columns;
pub mod pattern_fit;
pub mod sequence_based;

use rand::Rng;
use tracing::info;

use lotofacil_db::models::{Strategy, Suggestion};

use crate::analysis::Analysis;

pub use cold::cold_numbers;
pub use hot_columns::hot_columns;
pub use pattern_fit::pattern_fit;
pub use sequence_based::{cyclic_rotation, top_top_top, weighted_top_k};

/// Exécute une stratégie. Le curseur rendu n'avance que pour la rotation.
pub fn generate(strategy: Strategy, analysis: &Analysis, cursor: u64, rng: &mut impl Rng) -> (Suggestion, u64) {
    let (suggestion, next) = match strategy {
        Strategy::HotColumns => (hot_columns(analysis), cursor),
        Strategy::ColdNumbers => (cold_numbers(analysis), cursor),
        Strategy::PatternFit => (pattern_fit(analysis), cursor),
        Strategy::TopTopTop => (top_top_top(analysis, rng), cursor),
        Strategy::CyclicRotation => cyclic_rotation(analysis, cursor, rng),
        Strategy::WeightedTopK => (weighted_top_k(analysis, rng), cursor),
    };
    info!(
        strategy = strategy.label(),
        period = %analysis.period,
        draws = analysis.draws.len(),
        "suggestion générée"
    );
    (suggestion, next)
}

/// Toutes les stratégies dans l'ordre de `Strategy::ALL` ; le curseur avance une fois.
pub fn suggest_all(analysis: &Analysis, cursor: u64, rng: &mut impl Rng) -> (Vec<Suggestion>, u64) {
    let mut next_cursor = cursor;
    let mut suggestions = Vec::with_capacity(Strategy::ALL.len());
    for strategy in Strategy::ALL {
        let (suggestion, next) = generate(strategy, analysis, cursor, &mut *rng);
        if strategy == Strategy::CyclicRotation {
            next_cursor = next;
        }
        suggestions.push(suggestion);
    }
    (suggestions, next_cursor)
}
