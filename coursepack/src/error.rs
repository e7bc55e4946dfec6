//! Error types for module loading and staging.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for loading and staging operations.
pub type StageResult<T> = Result<T, StageError>;

/// Errors that can occur while loading a module or staging its artifacts.
///
/// Validation findings are not errors; see [`crate::Module::validate`].
#[derive(Debug, Error)]
pub enum StageError {
    /// Source file passed to a loader does not exist.
    #[error("path not valid: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Path has no usable parent directory or file name.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Module folder name does not start with an `m<number>` token.
    #[error("cannot derive module index from id '{0}'")]
    InvalidModuleId(String),

    /// Failed to read a file.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to copy a file or directory.
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    /// Source descriptor is not valid YAML or lacks required fields.
    #[error("failed to parse {}: {source}", path.display())]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Metadata file is not well-formed XML.
    #[error("failed to parse {}: {reason}", path.display())]
    XmlParse { path: PathBuf, reason: String },

    /// Metadata file lacks a required element.
    #[error("missing <{element}> element in {}", path.display())]
    MissingElement {
        path: PathBuf,
        element: &'static str,
    },

    /// Failed to serialize the metadata document.
    #[error("failed to build metadata document: {0}")]
    XmlWrite(String),

    /// Neither questions file exists in the module folder.
    #[error("neither questions.txt nor no-questions.txt found in {}", .0.display())]
    QuestionsNotFound(PathBuf),

    /// Demo archive could not be built.
    #[error("archive failed for {}: {reason}", path.display())]
    ArchiveFailed { path: PathBuf, reason: String },

    /// A blocking worker task panicked or was cancelled.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl StageError {
    /// True for the errors that report a missing input file.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StageError::PathNotFound(_) | StageError::QuestionsNotFound(_)
        )
    }
}

impl From<tokio::task::JoinError> for StageError {
    fn from(e: tokio::task::JoinError) -> Self {
        StageError::TaskFailed(e.to_string())
    }
}
