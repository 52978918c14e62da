use std::path::PathBuf;

use thiserror::Error;

use romaudit_dat::DatError;

/// Errors that can occur while auditing a collection.
///
/// Per-file problems are reported through [`crate::audit::PathOutcome`]
/// rather than returned; these are the errors that reach a caller.
#[derive(Debug, Error)]
pub enum AuditError {
    /// I/O error while reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive could not be read or written
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Catalog could not be loaded
    #[error(transparent)]
    Dat(#[from] DatError),

    /// A file could not be renamed
    #[error("Unable to rename {} to {to}: {reason}", from.display())]
    Rename {
        from: PathBuf,
        to: String,
        reason: String,
    },

    /// A requested output destination could not be created
    #[error("Cannot create output {}: {reason}", path.display())]
    Output { path: PathBuf, reason: String },
}

impl AuditError {
    pub fn rename(from: impl Into<PathBuf>, to: impl Into<String>, reason: impl ToString) -> Self {
        Self::Rename {
            from: from.into(),
            to: to.into(),
            reason: reason.to_string(),
        }
    }

    pub fn output(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Output {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
