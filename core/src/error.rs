//! Error types for the shared-list core.
//!
//! # Design
//! Every failure is returned to the host as a value. `DuplicateItemId` gets
//! its own variant instead of folding into `MalformedPayload` because the
//! host may want to tell "garbled link" apart from "two items claim the same
//! id"; both mean the input is rejected as a whole, never deduplicated.

use std::fmt;

use thiserror::Error;

/// Which configured bound a payload exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    ItemCount,
    NameLength,
    PayloadBytes,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::ItemCount => write!(f, "item count"),
            Limit::NameLength => write!(f, "name length"),
            Limit::PayloadBytes => write!(f, "payload size"),
        }
    }
}

/// Errors returned by `ListCodec`, `ListMerger` and the list edit operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// The link could not be parsed into a list.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A list or link exceeds one of the configured bounds.
    #[error("payload too large: {limit} is {actual}, maximum is {max}")]
    PayloadTooLarge { limit: Limit, max: usize, actual: usize },

    /// Two items in the same list share an id.
    #[error("duplicate item id: {0}")]
    DuplicateItemId(String),

    /// An edit referenced an item id the list does not contain.
    #[error("unknown item id: {0}")]
    UnknownItem(String),

    /// Host-supplied configuration failed to parse or validate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ListResult<T> = Result<T, ListError>;
