use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use lotofacil_db::error::DrawError;
use lotofacil_db::models::{Draw, DrawCollection, PICK_COUNT};
use lotofacil_db::store::{NumberField, RawDraw, parse_records, save_draws};

pub struct ImportResult {
    pub total_records: u32,
    pub imported: u32,
    pub duplicates: u32,
    pub errors: u32,
}

/// Ligne `concurso;data;d1;...;d15`.
fn parse_csv_record(record: &csv::StringRecord) -> Result<Draw, DrawError> {
    let field = |idx: usize| record.get(idx).map(|s| s.trim().to_string());
    let contest = field(0).unwrap_or_default();
    if record.len() < 2 + PICK_COUNT {
        return Err(DrawError::malformed(
            &contest,
            format!("{} champs au lieu de {}", record.len(), 2 + PICK_COUNT),
        ));
    }
    let raw = RawDraw {
        concurso: Some(NumberField::Text(contest)),
        data: field(1),
        dezenas: (2..2 + PICK_COUNT)
            .filter_map(field)
            .map(NumberField::Text)
            .collect(),
    };
    raw.into_draw()
}

fn read_csv(path: &Path) -> Result<Vec<Result<Draw, DrawError>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    Ok(reader
        .records()
        .enumerate()
        .map(|(idx, record)| match record {
            Ok(record) => parse_csv_record(&record),
            Err(e) => Err(DrawError::malformed(format!("ligne {}", idx + 2), e.to_string())),
        })
        .collect())
}

fn read_json(path: &Path) -> Result<Vec<Result<Draw, DrawError>>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let doc: serde_json::Value = serde_json::from_str(&json)
        .with_context(|| format!("JSON invalide dans {:?}", path))?;
    parse_records(doc)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

/// Lit un export JSON ou CSV et construit la nouvelle collection.
/// Les enregistrements invalides sont signalés puis ignorés.
pub fn read_draws(path: &Path) -> Result<(DrawCollection, ImportResult)> {
    let records = if is_csv(path) { read_csv(path)? } else { read_json(path)? };

    let mut result = ImportResult {
        total_records: records.len() as u32,
        imported: 0,
        duplicates: 0,
        errors: 0,
    };

    let mut draws = Vec::with_capacity(records.len());
    for record in records {
        match record {
            Ok(draw) => draws.push(draw),
            Err(e) => {
                warn!("{e} (ignoré)");
                result.errors += 1;
            }
        }
    }

    let valid = draws.len() as u32;
    let collection = DrawCollection::new(draws);
    result.imported = collection.len() as u32;
    result.duplicates = valid - result.imported;
    Ok((collection, result))
}

/// Remplace la collection stockée dans `store` par le contenu de `file`.
pub fn import_file(file: &Path, store: &Path) -> Result<ImportResult> {
    let (collection, result) = read_draws(file)?;
    if collection.is_empty() {
        anyhow::bail!("Aucun tirage valide dans {:?}, collection existante conservée", file);
    }
    save_draws(store, &collection)?;
    info!(imported = result.imported, path = %store.display(), "collection remplacée");
    Ok(result)
}
