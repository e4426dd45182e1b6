use std::path::PathBuf;

use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("no output path specified")]
    MissingOutputPath,

    #[error("i/o error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read tabular data: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported output format `{extension}`")]
    UnsupportedFormat { extension: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("render backend failure: {0}")]
    Backend(String),
}

impl PlotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
