use std::fmt;

use camino::Utf8PathBuf;

use crate::model::Field;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Recipe index out of bounds: {index} (the book has {len} recipes)")]
    Index { index: usize, len: usize },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("A recipe is already being composed")]
    AlreadyComposing,
    #[error("No recipe is being composed")]
    NotComposing,
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index { .. })
    }
}

/// One or more required draft fields are blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    blank: Vec<Field>,
}

impl ValidationError {
    pub(crate) fn new(blank: Vec<Field>) -> Self {
        debug_assert!(!blank.is_empty());
        Self { blank }
    }

    pub fn blank_fields(&self) -> &[Field] {
        &self.blank
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Please fill in every field (missing: ")?;
        for (i, field) in self.blank.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to read '{key}' from {path}")]
    Read {
        key: String,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write '{key}' to {path}")]
    Write {
        key: String,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage for '{0}' is read only")]
    ReadOnly(String),
    #[error("Stored recipes could not be decoded")]
    Decode(#[source] serde_json::Error),
    #[error("Recipes could not be encoded")]
    Encode(#[source] serde_json::Error),
    #[error("The background writer is not running")]
    WriterStopped,
}
