use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::DrawError;
use crate::models::{Draw, DrawCollection};

const DRAWS_FILE: &str = "draws.json";
const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn data_dir() -> PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path
}

pub fn draws_path(dir: &Path) -> PathBuf {
    dir.join(DRAWS_FILE)
}

/// Nombre ou texte numérique : l'API publie `dezenas` sous forme de chaînes ("01").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    Int(i64),
    Text(String),
}

impl NumberField {
    pub fn value(&self) -> Option<i64> {
        match self {
            NumberField::Int(n) => Some(*n),
            NumberField::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Enregistrement au format de l'API (`concurso`, `data` JJ/MM/AAAA, `dezenas`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDraw {
    pub concurso: Option<NumberField>,
    pub data: Option<String>,
    #[serde(default)]
    pub dezenas: Vec<NumberField>,
}

impl RawDraw {
    pub fn into_draw(self) -> Result<Draw, DrawError> {
        let contest_label = self
            .concurso
            .as_ref()
            .map(|c| match c {
                NumberField::Int(n) => n.to_string(),
                NumberField::Text(s) => s.clone(),
            })
            .unwrap_or_else(|| "?".to_string());

        let contest = self
            .concurso
            .as_ref()
            .and_then(NumberField::value)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| DrawError::malformed(&contest_label, "champ concurso manquant ou invalide"))?;

        let raw_date = self
            .data
            .as_deref()
            .ok_or_else(|| DrawError::malformed(contest, "champ data manquant"))?;
        let date = parse_date(raw_date)
            .ok_or_else(|| DrawError::malformed(contest, format!("date invalide '{}'", raw_date)))?;

        let numbers = self
            .dezenas
            .iter()
            .map(|n| n.value().and_then(|v| u8::try_from(v).ok()))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| DrawError::malformed(contest, "dezenas non numériques"))?;

        Draw::new(contest, date, &numbers)
    }

    pub fn from_draw(draw: &Draw) -> Self {
        Self {
            concurso: Some(NumberField::Int(draw.contest as i64)),
            data: Some(draw.date.format(DATE_FORMAT).to_string()),
            dezenas: draw.numbers.iter().map(|&n| NumberField::Int(n as i64)).collect(),
        }
    }
}

/// Accepte `JJ/MM/AAAA` (API) ou `AAAA-MM-JJ`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Convertit un document JSON en tirages, enregistrement par enregistrement.
/// Accepte un tableau ou l'enveloppe `{ "ok": true, "data": [...] }` du proxy de mise à jour.
pub fn parse_records(doc: serde_json::Value) -> Result<Vec<Result<Draw, DrawError>>> {
    let items = match doc {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut obj) => match obj.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => anyhow::bail!("Document JSON sans tableau 'data'"),
        },
        _ => anyhow::bail!("Document JSON inattendu : tableau de tirages attendu"),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value::<RawDraw>(item)
                .map_err(|e| DrawError::malformed(format!("#{}", idx + 1), e.to_string()))
                .and_then(RawDraw::into_draw)
        })
        .collect())
}

pub fn load_draws(path: &Path) -> Result<DrawCollection> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}. Lancez d'abord : lotofacil import", path))?;
    let doc: serde_json::Value = serde_json::from_str(&json)
        .with_context(|| format!("JSON invalide dans {:?}", path))?;

    let mut draws = Vec::new();
    for record in parse_records(doc)? {
        match record {
            Ok(draw) => draws.push(draw),
            Err(e) => warn!("{e} (ignoré)"),
        }
    }
    debug!(count = draws.len(), path = %path.display(), "tirages chargés");
    Ok(DrawCollection::new(draws))
}

/// Remplace le fichier en entier : la collection n'est jamais modifiée sur place.
pub fn save_draws(path: &Path, collection: &DrawCollection) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    // Ordre chronologique croissant, comme le fichier produit par l'API
    let records: Vec<RawDraw> = collection.as_slice().iter().rev().map(RawDraw::from_draw).collect();
    let json = serde_json::to_string_pretty(&records)?;

    // fichier voisin puis renommage
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).with_context(|| format!("Impossible d'écrire {:?}", tmp))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Impossible de remplacer {:?} par {:?}", path, tmp))?;
    Ok(())
}
