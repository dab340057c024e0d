use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Label,
    Scraped,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label => f.write_str("label"),
            Self::Scraped => f.write_str("scraped"),
        }
    }
}

/// Errors raised by the dashboard itself.
///
/// Failures of the manager behind `RecordStore`/`ClassificationManager` are
/// not listed here: those operations hand back the collaborator's own error.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid {kind} filter {value:?} (expected one of: {expected})")]
    InvalidFilter {
        kind: FilterKind,
        value: String,
        expected: String,
    },

    #[error("unknown branch {0:?}")]
    UnknownBranch(String),

    #[error("unknown experiment {experiment:?} in branch {branch:?}")]
    UnknownExperiment { branch: String, experiment: String },

    #[error("db backend {0:?} is not implemented")]
    BackendNotImplemented(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DashboardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
#[error("ConfigError: {0}")]
pub struct ConfigError(pub String);

