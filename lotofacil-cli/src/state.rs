use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ROTATION_FILE: &str = "rotation.json";
const CONFIG_FILE: &str = "engine.json";

/// Curseur de la rotation cyclique, conservé entre deux invocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub cursor: u64,
}

pub fn rotation_path(dir: &Path) -> PathBuf {
    dir.join(ROTATION_FILE)
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

impl RotationState {
    /// Fichier absent : curseur à zéro.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {:?}", path))?;
        serde_json::from_str(&json).with_context(|| format!("État de rotation invalide dans {:?}", path))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_starts_at_zero() {
        let state = RotationState::load(Path::new("/nonexistent/lotofacil/rotation.json")).unwrap();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("lotofacil-state-{}", std::process::id()));
        let path = rotation_path(&dir);
        RotationState { cursor: 17 }.save(&path).unwrap();
        assert_eq!(RotationState::load(&path).unwrap(), RotationState { cursor: 17 });
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("lotofacil-state-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = rotation_path(&dir);
        std::fs::write(&path, "pas du json").unwrap();
        assert!(RotationState::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
