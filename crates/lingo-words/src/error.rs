use std::fmt;

use lingo_db::StoreError;
use thiserror::Error;

use crate::metrics;

/// Why a write was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The row already exists (unique constraint)
    Duplicate,
    /// The row points at something that does not exist (foreign key)
    MissingReference,
    /// No row matched the write
    NoMatchingRow,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = match self {
            Self::Duplicate => "already exists",
            Self::MissingReference => "references a missing row",
            Self::NoMatchingRow => "matched no row",
        };
        f.write_str(cause)
    }
}

/// Steps of adding a new word for a user, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStep {
    InsertWord,
    InsertStatus,
    InsertTranslation,
    LinkTranslation,
    Commit,
}

impl fmt::Display for CreateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            Self::InsertWord => "insert word",
            Self::InsertStatus => "insert status",
            Self::InsertTranslation => "insert translation",
            Self::LinkTranslation => "link translation",
            Self::Commit => "commit",
        };
        f.write_str(step)
    }
}

#[derive(Error, Debug)]
pub enum WordError {
    #[error("could not find {entity} with id {id}")]
    NotFound { entity: &'static str, id: i64 },
    #[error("could not {operation}: {cause}")]
    Rejected {
        operation: &'static str,
        cause: Rejection,
    },
    #[error("adding the word failed at step '{step}', nothing was saved")]
    UserWordAborted {
        step: CreateStep,
        #[source]
        source: Box<WordError>,
    },
    #[error("cancelled before step '{before}', nothing was saved")]
    Cancelled { before: CreateStep },
    #[error(
        "misaligned translations for word {word_id}: {ids} ids, {texts} texts, {contexts} contexts, {languages:?} languages"
    )]
    MisalignedTranslations {
        word_id: i64,
        ids: usize,
        texts: usize,
        contexts: usize,
        languages: Option<usize>,
    },
    #[error("invalid input: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Store(StoreError),
}

impl WordError {
    pub(crate) const fn rejected(operation: &'static str, cause: Rejection) -> Self {
        Self::Rejected { operation, cause }
    }

    /// Map a store failure raised by a write. Constraint violations become
    /// rejections, anything else stays an opaque store error.
    pub(crate) fn from_write(operation: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { .. } => Self::rejected(operation, Rejection::Duplicate),
            StoreError::ForeignKeyViolation { .. } => {
                Self::rejected(operation, Rejection::MissingReference)
            }
            other => Self::Store(other),
        }
    }

    /// The rejection cause, looking through an aborted composite write.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected { cause, .. } => Some(*cause),
            Self::UserWordAborted { source, .. } => source.rejection(),
            _ => None,
        }
    }
}

/// Unwrap the row returned by a write, turning zero rows and constraint
/// violations into rejections.
pub(crate) fn expect_written<T>(
    operation: &'static str,
    result: Result<Option<T>, StoreError>,
) -> Result<T, WordError> {
    let err = match result {
        Ok(Some(row)) => return Ok(row),
        Ok(None) => WordError::rejected(operation, Rejection::NoMatchingRow),
        Err(err) => WordError::from_write(operation, err),
    };
    if let Some(cause) = err.rejection() {
        tracing::debug!(operation, %cause, "write rejected");
        metrics::record_rejection(operation, cause);
    }
    Err(err)
}

impl From<StoreError> for WordError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
