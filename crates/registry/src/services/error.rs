use reqwest::StatusCode;
use thiserror::Error;

use crate::models::email::NameField;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Directory rejected the request with status {status}")]
    Upstream { status: StatusCode },

    #[error("An account for {0} is already registered.")]
    AlreadyRegistered(String),

    #[error("Invalid directory URL: {0}")]
    InvalidUrl(String),
}

/// Failure variants of a resolution run, usable with `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    #[error("The directory could not be reached; try again.")]
    LookupFailed,

    #[error("Every name combination is already taken; contact an administrator.")]
    Exhausted,

    #[error("This exact name pair is already registered.")]
    ConflictBothSingleToken,

    #[error("The {0} has no usable words.")]
    EmptyTokenSequence(NameField),
}
