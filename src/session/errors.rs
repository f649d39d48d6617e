//! Session errors
//!
//! Every variant is recoverable: the front end shows it as a notice and
//! carries on.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session is running")]
    NoSession,

    #[error("session has ended")]
    SessionEnded,

    #[error("saved sessions are read-only")]
    Detached,

    #[error("pick a pitch type and a result first")]
    MissingSelection,

    #[error("end the session before saving")]
    NotEnded,

    #[error("session already saved as {0}")]
    AlreadySaved(String),

    #[error("no saved session with id {0}")]
    UnknownId(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
