use std::path::PathBuf;

use thiserror::Error;

/// Main library error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),
}

/// Failures while reading or parsing a catalog document.
///
/// Any of these aborts catalog construction.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog {path}: {details}")]
    Malformed { path: PathBuf, details: String },
}

impl LoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::Io { path, .. } | LoadError::Malformed { path, .. } => path,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        LoadError::Malformed {
            path: path.into(),
            details: details.into(),
        }
    }
}

/// Why a book field could not be turned into a record value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// The required child element is absent
    MissingField,
    /// The child element exists but its text does not parse as the field's type
    InvalidValue { value: String, details: String },
}

impl std::fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldProblem::MissingField => write!(f, "missing required element"),
            FieldProblem::InvalidValue { value, details } => {
                write!(f, "invalid value {:?} ({})", value, details)
            }
        }
    }
}

/// A matched book element cannot be turned into a complete record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed book record {id}: field '{field}' - {problem}")]
pub struct MalformedRecordError {
    pub id: String,
    pub field: String,
    pub problem: FieldProblem,
}

impl MalformedRecordError {
    pub fn missing(id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            problem: FieldProblem::MissingField,
        }
    }

    pub fn invalid(
        id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            problem: FieldProblem::InvalidValue {
                value: value.into(),
                details: details.into(),
            },
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Load result type alias
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Record result type alias
pub type RecordResult<T> = std::result::Result<T, MalformedRecordError>;
