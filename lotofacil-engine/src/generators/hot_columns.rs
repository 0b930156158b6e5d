use lotofacil_db::models::{COLUMN_SIZE, PICK_COUNT, Strategy, Suggestion};

use crate::analysis::Analysis;

/// Union des 5 numéros les plus fréquents de chaque colonne. Les colonnes
/// se recouvrent souvent : la grille peut compter moins de 15 numéros.
pub fn hot_columns(analysis: &Analysis) -> Suggestion {
    let mut numbers: Vec<u8> = analysis
        .frequencies
        .columns
        .iter()
        .flat_map(|table| table.top_k(COLUMN_SIZE))
        .collect();
    numbers.sort_unstable();
    numbers.dedup();

    let count = numbers.len();
    let suggestion = Suggestion::new(Strategy::HotColumns, numbers);
    if count < PICK_COUNT {
        suggestion.with_note(format!(
            "Recouvrement entre colonnes : {count} numéros distincts au lieu de {PICK_COUNT}"
        ))
    } else {
        suggestion
    }
}
