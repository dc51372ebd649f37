use std::path::PathBuf;

/// Reasons a position string is rejected by the feature encoder.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum FenFormatError {
    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid piece placement `{0}`")]
    InvalidPlacement(String),

    #[error("invalid side to move `{0}`")]
    InvalidSideToMove(String),
}

#[derive(thiserror::Error, Debug)]
pub enum PsqtError {
    /// Malformed placement or side-to-move token
    #[error("invalid position format `{fen}`: {source}")]
    InvalidPositionFormat {
        fen: String,
        #[source]
        source: FenFormatError,
    },

    /// A vector or matrix does not have the length the layout requires
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("{}:{line}: {reason}", path.display())]
    InvalidSample {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("dataset contains no samples")]
    EmptyDataset,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Tch(#[from] tch::TchError),
}

pub type Result<T> = std::result::Result<T, PsqtError>;

impl PsqtError {
    pub(crate) fn invalid_position(fen: &str, source: FenFormatError) -> Self {
        PsqtError::InvalidPositionFormat {
            fen: fen.to_string(),
            source,
        }
    }
}
