use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("paper directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("no record at position {position} (collection has {len})")]
    RecordNotFound { position: isize, len: usize },

    #[error("malformed record {}: {reason}", path.display())]
    MalformedRecord { path: PathBuf, reason: String },

    #[error("metadata file not found: {0}")]
    MetadataFileNotFound(PathBuf),

    #[error("metadata file {} has no '{column}' column", path.display())]
    MetadataColumnNotFound { column: &'static str, path: PathBuf },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn malformed(
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
