//! Error types shared by every part of the engine.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Everything that can go wrong while indexing, querying or persisting.
///
/// Mutations fail eagerly with one of the document-level variants. Queries
/// only surface `InvalidArgument` for malformed parameters and `Operation`
/// when the fan-out machinery itself fails; individual sub-task failures are
/// reported through the facade's log and excluded from the merged result.
#[derive(Debug, Error)]
pub enum SearchError {
  /// A document field failed validation.
  #[error("document validation error: {0}")]
  Validation(String),

  /// A document with the same identifier is already indexed.
  #[error("document already exists: {id}")]
  Conflict {
    /// The duplicated identifier.
    id: String,
  },

  /// No document with this identifier is indexed.
  #[error("document not found: {id}")]
  NotFound {
    /// The unknown identifier.
    id: String,
  },

  /// A query parameter is malformed, e.g. a negative fuzzy tolerance.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// An unexpected failure while running a query. Always carries the
  /// message of the underlying cause.
  #[error("search operation error: {0}")]
  Operation(String),

  /// Reading or writing a persisted index failed.
  #[error("I/O error on {}: {source}", path.display())]
  Io {
    /// The file being read or written.
    path: PathBuf,
    /// The underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// An engine configuration could not be parsed.
  #[error("invalid configuration: {0}")]
  Config(#[from] serde_json::Error),
}

impl SearchError {
  pub(crate) fn validation(message: impl Into<String>) -> Self {
    SearchError::Validation(message.into())
  }

  pub(crate) fn not_found(id: impl Into<String>) -> Self {
    SearchError::NotFound { id: id.into() }
  }

  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    SearchError::Io {
      path: path.into(),
      source,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages_carry_context() {
    let err = SearchError::Conflict { id: "a".into() };
    assert_eq!(err.to_string(), "document already exists: a");

    let err = SearchError::not_found("missing");
    assert_eq!(err.to_string(), "document not found: missing");

    let err = SearchError::Operation("worker panicked".into());
    assert!(err.to_string().contains("worker panicked"));
  }

  #[test]
  fn test_io_error_keeps_source() {
    let source = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
    let err = SearchError::io("/tmp/index.bin", source);
    assert!(err.to_string().contains("/tmp/index.bin"));
    assert!(std::error::Error::source(&err).is_some());
  }
}
