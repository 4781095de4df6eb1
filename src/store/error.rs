//! Store error types.

use derive_more::{Display, Error};
use tracing::{error, instrument};

/// Broad category of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StoreErrorKind {
    /// The document does not exist.
    #[display("missing")]
    Missing,
    /// A conditional write saw a different revision.
    #[display("conflict")]
    Conflict,
    /// Transport or backend failure.
    #[display("backend")]
    Backend,
}

/// Store error with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Store error ({}): {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// Failure category.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        if kind == StoreErrorKind::Backend {
            error!(error_message = %message, "Store backend error");
        }
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The document does not exist.
    #[track_caller]
    pub fn missing(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Missing, message)
    }

    /// A conditional write lost a race.
    #[track_caller]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Conflict, message)
    }

    /// Backend failure.
    #[track_caller]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Backend, message)
    }

    /// Whether a conditional write lost a race.
    pub fn is_conflict(&self) -> bool {
        self.kind == StoreErrorKind::Conflict
    }

    /// Whether the document does not exist.
    pub fn is_missing(&self) -> bool {
        self.kind == StoreErrorKind::Missing
    }
}
