//! Error types shared across the core crate.

use thiserror::Error;

/// Why a single form field was rejected.
///
/// The `Display` text is the message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Please enter a city.")]
    RequiredFieldMissing,

    #[error("Must be a number.")]
    NotANumber,
}

/// Failures talking to the persistent slot.
///
/// `Read`, `Corrupt` and `NotASequence` are read failures: the store recovers
/// from them with an empty collection. `Write` and `Encode` are write failures
/// and are handed back to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read slot '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("slot '{key}' does not hold valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("slot '{key}' does not hold a sequence of cards")]
    NotASequence { key: String },

    #[error("failed to write slot '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode cards: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from mutating the card collection.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Nothing changed: a card with this id is already in the collection.
    #[error("a card with id '{0}' already exists")]
    DuplicateId(String),

    /// The in-memory collection changed but the slot could not be updated.
    #[error(transparent)]
    Store(#[from] StoreError),
}
