//! Error types for meshforge

use crate::id::{DocumentId, ObjectId};
use thiserror::Error;

/// Result type alias using meshforge's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in meshforge operations
#[derive(Error, Debug)]
pub enum Error {
    /// A provider returned a collection tagged with the wrong entity
    #[error("provider returned a collection for {actual}, expected {expected}")]
    ObjectIdMismatch { expected: ObjectId, actual: ObjectId },

    /// Two geometry units reused a display cache key with different bytes
    #[error("display cache key reused with different mesh content")]
    CacheKeyConflict,

    /// A display handle outlived its cache slot
    #[error("stale display handle (slot {index}, generation {generation})")]
    StaleHandle { index: usize, generation: u32 },

    /// A provider was asked for a parameter it does not expose
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Invalid parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A provider with this id is already registered
    #[error("provider {0} is already registered")]
    DuplicateProvider(crate::id::ProviderId),

    /// The document's tracker was discarded
    #[error("document {0} is closed")]
    DocumentClosed(DocumentId),
}
