use thiserror::Error;

/// Rejet d'un enregistrement à l'ingestion. Le moteur ne voit jamais de tirage invalide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("Tirage {contest} invalide : {reason}")]
    MalformedDraw { contest: String, reason: String },
}

impl DrawError {
    pub fn malformed(contest: impl ToString, reason: impl Into<String>) -> Self {
        DrawError::MalformedDraw {
            contest: contest.to_string(),
            reason: reason.into(),
        }
    }
}
