use std::path::PathBuf;

use thiserror::Error;

use romaudit_lib::{AuditError, DatError};

/// Errors that end a command. Per-file problems never become one of these.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog could not be opened or parsed
    #[error("Unable to load {}: {source}", path.display())]
    Dat {
        path: PathBuf,
        #[source]
        source: DatError,
    },

    /// Output destination could not be created or written
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn dat(path: impl Into<PathBuf>, source: DatError) -> Self {
        Self::Dat {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
