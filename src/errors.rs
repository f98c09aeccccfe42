use thiserror::Error;

/// Errors emitted while assembling synthetic records.
///
/// Every variant is fatal at the point of detection: a missing catalog key or
/// an empty choice input is a configuration bug, not a runtime condition to
/// retry. Assemblers either return a fully populated entity or propagate one
/// of these.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no such catalog key: '{key}'")]
    MissingKey { key: String },
    #[error("catalog key '{key}' has the wrong shape: expected {expected}")]
    WrongShape {
        key: String,
        expected: &'static str,
    },
    #[error("cannot choose from an empty sequence")]
    EmptyInput,
    #[error("cannot choose {requested} elements from a sequence of {available}")]
    InsufficientElements { requested: usize, available: usize },
    #[error("unsupported locale: '{0}'")]
    UnsupportedLocale(String),
    #[error("invalid identifier seed: {0}")]
    InvalidIdentifier(String),
    #[error("{0} draft left incomplete by its field steps")]
    IncompleteDraft(&'static str),
    #[error("data file error: {0}")]
    DataFile(String),
}

impl From<serde_yaml::Error> for GenerationError {
    fn from(err: serde_yaml::Error) -> Self {
        GenerationError::DataFile(err.to_string())
    }
}
