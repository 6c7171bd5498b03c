//! The module contains the errors the engine can throw.
//!
//! Every failure inside a posting or cancellation transaction aborts the
//! whole unit of work; no partial state survives a returned error.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("\"{0}\" not found")]
    KeyNotFound(String),
    #[error("access denied: {0}")]
    Forbidden(String),
    #[error("document already cancelled: {0}")]
    AlreadyCancelled(String),
    #[error("stock item is referenced by documents: {0}")]
    ReferencedByDocuments(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::AlreadyCancelled(a), Self::AlreadyCancelled(b)) => a == b,
            (Self::ReferencedByDocuments(a), Self::ReferencedByDocuments(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
