//! Identifiers for scene entities, providers, and documents
//!
//! All three are 128-bit globally-unique values with no internal structure.
//! An [`ObjectId`] may name a real scene entity or a synthetic non-entity
//! source that supplies its own primitives; synthetic ids must never collide
//! with real entity ids, and uniqueness is the registering provider's
//! responsibility.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies a scene entity or a synthetic non-entity geometry source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

/// Stable per-provider identifier, set once at registration
///
/// Used as a cache-tracker and chain-ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderId(Uuid);

/// Identifies a document for per-document cache trackers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Generate a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The nil identifier (all zero bits)
            pub fn nil() -> Self {
                Self(Uuid::nil())
            }

            /// Whether this is the nil identifier
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// Build from a raw 128-bit value
            pub fn from_u128(raw: u128) -> Self {
                Self(Uuid::from_u128(raw))
            }

            /// The raw 128-bit value
            pub fn as_u128(&self) -> u128 {
                self.0.as_u128()
            }

            /// The identifier as bytes, for hashing
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(ObjectId);
impl_id!(ProviderId);
impl_id!(DocumentId);
