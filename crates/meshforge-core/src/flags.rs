//! Query flags and the caller-shared flag word
//!
//! A single 32-bit word carries both caller hints and callee status bits.
//! Callers set request-shaping bits up front; providers OR in `CANCELED`
//! and `INCOMPLETE` through the shared atomic word while the chain runs, and
//! long-running providers poll the same word for cooperative cancellation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Bit field shaping a pipeline query and reporting its outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryFlags(u32);

impl QueryFlags {
    /// The caller (or the user) canceled the computation
    pub const CANCELED: Self = Self(1 << 0);
    /// Bypass the provider tracker for this query
    pub const DISABLE_CACHING: Self = Self(1 << 1);
    /// Expand block instances recursively
    pub const RECURSIVE: Self = Self(1 << 2);
    /// Caller hint: the entity lives in the document
    pub const IS_DOCUMENT_OBJECT: Self = Self(1 << 3);
    /// Caller hint: the entity does not live in the document
    pub const IS_NON_DOCUMENT_OBJECT: Self = Self(1 << 4);
    /// Force defensive copies of document-owned resources so the result
    /// outlives document mutation
    pub const ALWAYS_COPY_DOCUMENT_CONTENT: Self = Self(1 << 5);
    /// Strip the document-standard material from seeded instances; requires
    /// main-thread document access and must not be combined with
    /// off-main-thread use
    pub const RETURN_NULL_FOR_STANDARD_MATERIAL: Self = Self(1 << 6);
    /// Set by a provider whose result is not yet final
    pub const INCOMPLETE: Self = Self(1 << 7);

    /// Bits that never participate in a cache key
    const TRANSIENT: u32 =
        Self::CANCELED.0 | Self::INCOMPLETE.0 | Self::DISABLE_CACHING.0;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// The flag-variant key the cache uses
    ///
    /// The same entity can legitimately be cached under incompatible flag
    /// combinations (preview vs. full render shapes) at the same time, so
    /// the variant keeps the request-shaping bits and masks off the bits
    /// that describe a single call's outcome.
    pub const fn cache_variant(self) -> u32 {
        self.0 & !Self::TRANSIENT
    }
}

impl std::ops::BitOr for QueryFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// The caller-shared flag word, accumulated across the provider chain
///
/// Cloning shares the same underlying word. Providers set status bits;
/// callers poll [`SharedFlags::is_canceled`] to drive cooperative
/// cancellation of long-running stages.
#[derive(Debug, Clone)]
pub struct SharedFlags(Arc<AtomicU32>);

impl SharedFlags {
    pub fn new(initial: QueryFlags) -> Self {
        Self(Arc::new(AtomicU32::new(initial.bits())))
    }

    /// OR a flag into the shared word
    pub fn set(&self, flag: QueryFlags) {
        self.0.fetch_or(flag.bits(), Ordering::Relaxed);
    }

    pub fn contains(&self, flag: QueryFlags) -> bool {
        self.snapshot().contains(flag)
    }

    /// Whether the caller has requested cancellation
    pub fn is_canceled(&self) -> bool {
        self.contains(QueryFlags::CANCELED)
    }

    /// The current value of the word
    pub fn snapshot(&self) -> QueryFlags {
        QueryFlags::from_bits(self.0.load(Ordering::Relaxed))
    }
}

impl Default for SharedFlags {
    fn default() -> Self {
        Self::new(QueryFlags::empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains_remove() {
        let mut flags = QueryFlags::empty();
        flags.insert(QueryFlags::RECURSIVE);
        flags.insert(QueryFlags::CANCELED);
        assert!(flags.contains(QueryFlags::RECURSIVE));
        assert!(flags.contains(QueryFlags::CANCELED));
        flags.remove(QueryFlags::CANCELED);
        assert!(!flags.contains(QueryFlags::CANCELED));
    }

    #[test]
    fn test_cache_variant_masks_transient_bits() {
        let a = QueryFlags::RECURSIVE | QueryFlags::CANCELED | QueryFlags::DISABLE_CACHING;
        let b = QueryFlags::RECURSIVE | QueryFlags::INCOMPLETE;
        assert_eq!(a.cache_variant(), b.cache_variant());
        assert_ne!(
            a.cache_variant(),
            QueryFlags::IS_DOCUMENT_OBJECT.cache_variant()
        );
    }

    #[test]
    fn test_shared_flags_accumulate() {
        let shared = SharedFlags::new(QueryFlags::RECURSIVE);
        let clone = shared.clone();
        clone.set(QueryFlags::INCOMPLETE);
        assert!(shared.contains(QueryFlags::INCOMPLETE));
        assert!(shared.contains(QueryFlags::RECURSIVE));
        assert!(!shared.is_canceled());
        shared.set(QueryFlags::CANCELED);
        assert!(clone.is_canceled());
    }
}
