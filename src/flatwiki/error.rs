use crate::model::PageId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WikiError {
    #[error("unexistent page \"{0}\"")]
    UnexistentPage(PageId),

    #[error("corrupted record {path:?}: {reason}")]
    CorruptedRecord { path: PathBuf, reason: String },

    #[error("storage error: {0}")]
    StorageIo(#[from] io::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    Config(serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] pagetmpl::Error),
}

impl WikiError {
    /// True when the failure means "there is no such page", whichever layer noticed it.
    pub fn is_not_found(&self) -> bool {
        match self {
            WikiError::UnexistentPage(_) => true,
            WikiError::StorageIo(err) => err.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, WikiError>;
