// ==========================================
// GPL Cart - import module error type
// ==========================================
// Tool: thiserror derive
// Row-level validation failures are RowRejected and never abort a job;
// everything else is a job-level failure.
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File errors =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("CSV write failed: {0}")]
    CsvWriteError(String),

    // ===== Pipeline errors =====
    #[error("unknown import handler: {0}")]
    UnknownHandler(String),

    #[error("missing required columns: {}", .missing.join(", "))]
    HeaderMismatch { missing: Vec<String> },

    #[error("line {line} rejected: {}", .errors.join("; "))]
    RowRejected { line: u64, errors: Vec<String> },

    #[error("job not found: {0}")]
    JobNotFound(String),

    // ===== Database errors =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== General =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// Messages to write to the job error log
    pub fn messages(&self) -> Vec<String> {
        match self {
            ImportError::RowRejected { errors, .. } => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Repository(RepositoryError::from(err))
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
