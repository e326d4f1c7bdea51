pub type CuelineResult<T> = Result<T, CuelineError>;

#[derive(thiserror::Error, Debug)]
pub enum CuelineError {
    #[error("alignment length mismatch: {characters} characters vs {starts} starts / {ends} ends")]
    AlignmentLengthMismatch {
        characters: usize,
        starts: usize,
        ends: usize,
    },

    #[error("non-monotonic timestamp at character {index}: {prev}s followed by {next}s")]
    NonMonotonicTimestamp { index: usize, prev: f64, next: f64 },

    #[error("authoring timing error: {0}")]
    AuthoringTiming(String),

    #[error("missing asset: {0}")]
    MissingAsset(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CuelineError {
    pub fn authoring(msg: impl Into<String>) -> Self {
        Self::AuthoringTiming(msg.into())
    }

    pub fn missing_asset(path: impl Into<String>) -> Self {
        Self::MissingAsset(path.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CuelineError::authoring("x")
                .to_string()
                .contains("authoring timing error:")
        );
        assert!(
            CuelineError::missing_asset("a/b.mp3")
                .to_string()
                .contains("missing asset:")
        );
        assert!(
            CuelineError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            CuelineError::evaluation("x")
                .to_string()
                .contains("evaluation error:")
        );
    }

    #[test]
    fn structured_variants_carry_positions() {
        let e = CuelineError::NonMonotonicTimestamp {
            index: 7,
            prev: 1.5,
            next: 1.2,
        };
        let s = e.to_string();
        assert!(s.contains("character 7"));
        assert!(s.contains("1.5"));
    }
}
