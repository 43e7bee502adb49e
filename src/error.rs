use thiserror::Error;

/// Pipeline stage in which a failure occurred. Carried in batch errors so a
/// caller can report per-item failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Translate,
    Romanize,
    Restore,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Validate => "validate",
            Stage::Translate => "translate",
            Stage::Romanize => "romanize",
            Stage::Restore => "restore",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum MixError {
    /// Bad caller-supplied parameter (threshold, empty input). Raised before
    /// any collaborator is invoked.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Target string does not name a registered language/script combination.
    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),

    /// Translator or romanizer is not reachable (service down, model not
    /// loaded). Fatal to the request; retries belong to the caller.
    #[error("upstream unavailable ({stage}): {detail}")]
    UpstreamUnavailable { stage: Stage, detail: String },

    /// Collaborator-reported translation failure for a specific input.
    #[error("translation failed: {0}")]
    Translation(String),

    /// Collaborator-reported transliteration failure (unsupported script or
    /// service error).
    #[error("transliteration failed: {0}")]
    Transliteration(String),

    /// A single item of a batch failed; wraps the underlying error with the
    /// input index and stage.
    #[error("input {index} failed at {stage}: {source}")]
    Item {
        index: usize,
        stage: Stage,
        #[source]
        source: Box<MixError>,
    },

    #[error("lexicon load: {0}")]
    LexiconLoad(String),
}

impl MixError {
    pub fn at_item(self, index: usize, stage: Stage) -> MixError {
        match self {
            // Already annotated; keep the innermost position.
            e @ MixError::Item { .. } => e,
            other => MixError::Item {
                index,
                stage,
                source: Box::new(other),
            },
        }
    }
}

pub type MixResult<T> = Result<T, MixError>;
