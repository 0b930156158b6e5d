use chrono::{Days, NaiveDate};
use tracing::debug;

use lotofacil_db::models::{Draw, Period};

use crate::error::AnalysisError;

const LAST_N: usize = 10;

/// Largeur de la fenêtre en jours, pour les périodes calendaires.
fn window_days(period: Period) -> Option<u64> {
    match period {
        Period::LastWeek => Some(7),
        Period::LastMonth => Some(30),
        Period::Last10 | Period::All => None,
    }
}

/// Restreint l'historique à la période demandée.
///
/// `draws` doit être ordonné du plus récent au plus ancien. La fenêtre est
/// calculée à partir de `anchor`, ou à défaut de la date du dernier tirage,
/// ce qui rend le résultat reproductible sur des données figées. Les tirages
/// postérieurs à une ancre explicite sont exclus.
///
/// Le résultat est toujours une tranche contiguë de `draws`, donc une
/// sous-séquence dans le même ordre. Il peut être vide.
pub fn filter_period(draws: &[Draw], period: Period, anchor: Option<NaiveDate>) -> &[Draw] {
    let anchor = match anchor.or_else(|| draws.first().map(|d| d.date)) {
        Some(a) => a,
        None => return &[],
    };

    let start = draws.iter().position(|d| d.date <= anchor).unwrap_or(draws.len());
    let eligible = &draws[start..];

    match window_days(period) {
        Some(days) => {
            let cutoff = anchor.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
            let end = eligible.iter().position(|d| d.date < cutoff).unwrap_or(eligible.len());
            &eligible[..end]
        }
        None if period == Period::Last10 => &eligible[..eligible.len().min(LAST_N)],
        None => eligible,
    }
}

/// Comme [`filter_period`], mais une fenêtre vide devient `EmptyPeriod`.
pub fn select_window(
    draws: &[Draw],
    period: Period,
    anchor: Option<NaiveDate>,
) -> Result<&[Draw], AnalysisError> {
    let window = filter_period(draws, period, anchor);
    debug!(%period, total = draws.len(), selected = window.len(), "fenêtre d'analyse");
    if window.is_empty() {
        return Err(AnalysisError::EmptyPeriod { period });
    }
    Ok(window)
}
