pub mod analysis;
pub mod config;
pub mod dedup;
pub mod error;
pub mod frequency;
pub mod generators;
pub mod period;
pub mod sequence;

use chrono::NaiveDate;
use lotofacil_db::models::{Draw, POOL_SIZE, PICK_COUNT};

/// Tirages synthétiques, draws[0] = le plus récent (un tirage par jour).
/// Le tirage i couvre 15 numéros consécutifs (modulo 25) à partir de 3i.
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    (0..n)
        .map(|i| {
            let start = (i * 3) % POOL_SIZE as usize;
            let numbers: Vec<u8> = (0..PICK_COUNT)
                .map(|j| ((start + j) % POOL_SIZE as usize) as u8 + 1)
                .collect();
            let date = base
                .checked_add_days(chrono::Days::new((n - 1 - i) as u64))
                .unwrap_or(base);
            Draw {
                contest: (n - i) as u32,
                date,
                numbers: lotofacil_db::models::validate_numbers(&numbers).unwrap_or_default(),
            }
        })
        .collect()
}
