//! Repository layer: persistence gateways consumed by the map core.
//!
//! # Responsibility
//! - Define narrow, id-keyed storage contracts (notes, photos, categories,
//!   settings).
//! - Keep SQLite query details out of the selection state machine.
//!
//! # Invariants
//! - Write paths report missing rows as semantic `NotFound` errors instead of
//!   silently succeeding.
//! - Read paths reject malformed persisted data instead of masking it.

pub mod category_repo;
pub mod note_repo;
pub mod settings_repo;

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::note::NoteId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every gateway/store operation.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NoteNotFound(NoteId),
    CategoryNotFound(CategoryId),
    InvalidData(String),
    Io(std::io::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Io(err) => write!(f, "photo file error: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::NoteNotFound(_) | Self::CategoryNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
