use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use lotofacil_db::models::{Draw, PICK_COUNT, Strategy, Suggestion};

use crate::analysis::Analysis;
use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::frequency::FrequencyTable;

/// Profil appris sur la fenêtre : nombre de pairs, de bas (≤ 13) et de
/// numéros repris du tirage précédent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternTargets {
    pub even: usize,
    pub low: usize,
    pub repeat: usize,
}

/// Valeur la plus fréquente, la plus petite en cas d'égalité.
pub fn mode(values: impl IntoIterator<Item = usize>) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(value, _)| value)
}

/// Mode du nombre de numéros communs entre tirages consécutifs.
pub fn repeat_mode(draws: &[Draw]) -> Result<usize, AnalysisError> {
    if draws.len() < 2 {
        return Err(AnalysisError::InsufficientHistory { available: draws.len() });
    }
    let shared = draws
        .windows(2)
        .map(|pair| pair[0].numbers.iter().filter(|&&n| pair[1].contains(n)).count());
    mode(shared).ok_or(AnalysisError::InsufficientHistory { available: draws.len() })
}

/// Bornes asymétriques : < 7 devient 8, > 11 devient 10, 7 et 11 restent tels quels.
pub fn clamp_repeat(value: usize) -> usize {
    if value < 7 {
        8
    } else if value > 11 {
        10
    } else {
        value
    }
}

pub fn learn_targets(draws: &[Draw], config: &EngineConfig) -> PatternTargets {
    let even = mode(draws.iter().map(|d| d.numbers.iter().filter(|&&n| n % 2 == 0).count())).unwrap_or(0);
    let low = mode(draws.iter().map(|d| d.numbers.iter().filter(|&&n| n <= config.low_max).count())).unwrap_or(0);
    let repeat = match repeat_mode(draws) {
        Ok(v) => clamp_repeat(v),
        Err(e) => {
            debug!("{e} : cible de répétitions par défaut {}", config.repeat_fallback);
            config.repeat_fallback
        }
    };
    PatternTargets { even, low, repeat }
}

fn count_matching(picked: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    picked.iter().filter(|&&n| pred(n)).count()
}

/// Tant que trop de numéros vérifient `is_member`, échange le moins fréquent
/// d'entre eux contre le plus fréquent des numéros non choisis qui ne le vérifie pas.
fn rebalance(picked: &mut [u8], ranked: &[u8], is_member: impl Fn(u8) -> bool, target: usize) {
    while count_matching(picked, &is_member) > target {
        let Some(out) = ranked.iter().rev().copied().find(|&n| is_member(n) && picked.contains(&n)) else {
            break;
        };
        let Some(replacement) = ranked.iter().copied().find(|&n| !is_member(n) && !picked.contains(&n)) else {
            break;
        };
        if let Some(slot) = picked.iter_mut().find(|slot| **slot == out) {
            *slot = replacement;
        }
    }
}

/// Construit la grille à partir du dernier tirage, du classement global et des cibles.
pub fn build_pick(latest: &Draw, overall: &FrequencyTable, targets: PatternTargets, low_max: u8) -> Vec<u8> {
    let ranked = overall.ranked_desc();
    let is_even = |n: u8| n % 2 == 0;
    let is_low = |n: u8| n <= low_max;

    let mut picked: Vec<u8> = ranked
        .iter()
        .copied()
        .filter(|&n| latest.contains(n))
        .take(targets.repeat)
        .collect();

    let mut even = count_matching(&picked, is_even);
    let mut low = count_matching(&picked, is_low);
    for &n in &ranked {
        if picked.len() >= PICK_COUNT {
            break;
        }
        if picked.contains(&n) {
            continue;
        }
        let next_even = even + usize::from(is_even(n));
        let next_low = low + usize::from(is_low(n));
        let remaining_after = PICK_COUNT as isize - (picked.len() as isize + 1);
        if (next_even <= targets.even && next_low <= targets.low) || remaining_after < 0 {
            picked.push(n);
            even = next_even;
            low = next_low;
        }
    }

    for &n in &ranked {
        if picked.len() >= PICK_COUNT {
            break;
        }
        if !picked.contains(&n) {
            picked.push(n);
        }
    }

    rebalance(&mut picked, &ranked, is_even, targets.even);
    rebalance(&mut picked, &ranked, is_low, targets.low);

    picked.sort_unstable();
    picked
}

pub fn pattern_fit(analysis: &Analysis) -> Suggestion {
    let targets = learn_targets(analysis.draws, &analysis.config);
    let numbers = build_pick(analysis.latest(), analysis.overall(), targets, analysis.config.low_max);
    debug!(?targets, "profil appris");

    let mut suggestion = Suggestion::new(Strategy::PatternFit, numbers).with_note(format!(
        "Cibles : {} pairs, {} bas (≤ {}), {} répétitions du dernier tirage",
        targets.even, targets.low, analysis.config.low_max, targets.repeat
    ));
    if analysis.draws.len() < 2 {
        suggestion = suggestion.with_note("Historique insuffisant pour les répétitions, valeur par défaut utilisée");
    }
    suggestion
}
