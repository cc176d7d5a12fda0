use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures. Anything that can degrade to a placeholder in the
/// rendered report never becomes one of these.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Required input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Failed to read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to render dashboard: {0}")]
    Render(#[source] std::io::Error),
}

impl DashboardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DashboardError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
