use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plus grand numéro de la moitié basse (1..=13 contre 14..=25).
    pub low_max: u8,
    /// Cible de répétitions quand l'historique compte moins de 2 tirages.
    pub repeat_fallback: usize,
    /// Part des tirages que le top-K doit couvrir.
    pub coverage: f64,
    pub k_min: usize,
    pub k_max: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            low_max: 13,
            repeat_fallback: 9,
            coverage: 0.8,
            k_min: 5,
            k_max: 15,
        }
    }
}

pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: EngineConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    Ok(config)
}

/// Fichier absent = valeurs par défaut ; fichier illisible = erreur.
pub fn load_config_or_default(path: &Path) -> Result<EngineConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(EngineConfig::default())
    }
}
