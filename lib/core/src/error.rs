use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The input table is empty or malformed. Maps to a client error.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Two pipeline stages disagree on the feature dimension.
    #[error("Shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The classifier produced a cluster id the label map does not know.
    #[error("Unknown cluster: {0} has no label")]
    UnknownCluster(usize),

    /// A feature became infinite or NaN inside the model, e.g. after scaling.
    #[error("Non-finite feature: {0}")]
    NonFinite(String),

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// True when the caller sent bad input, as opposed to a server-side fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Schema(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
