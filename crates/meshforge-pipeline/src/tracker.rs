//! The per-document provider tracker (caching helper)
//!
//! Providers and the manager consult the tracker to avoid recomputing
//! unchanged geometry. Records are keyed by (ObjectId, flag variant): the
//! same entity can legitimately be cached under incompatible flag
//! combinations (preview vs. full render, embedded vs. referenced content)
//! at the same time, and those entries must not be conflated.
//!
//! Tracker access is safe for concurrent use from multiple rendering
//! threads. This is a deliberate, narrow exception to the surrounding rule
//! that document access is main-thread only. Internal locking is the tracker's
//! responsibility; callers get clone-out snapshots, never references into
//! the locked map.

use glam::Mat4;
use meshforge_core::collection::PrimitiveCollection;
use meshforge_core::document::Document;
use meshforge_core::id::{DocumentId, ObjectId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// One cached result for a (ObjectId, flag-variant) key
#[derive(Debug, Clone)]
pub struct CachedEntry {
    hash: u32,
    /// Document revision the entry was built against
    revision: u64,
    collection: PrimitiveCollection,
}

impl CachedEntry {
    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn collection(&self) -> &PrimitiveCollection {
        &self.collection
    }
}

/// Snapshot of everything cached for one entity
#[derive(Debug, Clone, Default)]
pub struct TrackerRecord {
    entries: HashMap<u32, CachedEntry>,
}

impl TrackerRecord {
    /// Whether an entry exists for a flag variant
    pub fn record_exists(&self, variant: u32) -> bool {
        self.entries.contains_key(&variant)
    }

    /// The cached collection for a flag variant
    pub fn primitives(&self, variant: u32) -> Option<&PrimitiveCollection> {
        self.entries.get(&variant).map(CachedEntry::collection)
    }

    pub fn entry(&self, variant: u32) -> Option<&CachedEntry> {
        self.entries.get(&variant)
    }

    /// The cached hash for a flag variant
    pub fn hash(&self, variant: u32) -> Option<u32> {
        self.entries.get(&variant).map(CachedEntry::hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-document cache of computed collections
#[derive(Debug)]
pub struct ProviderTracker {
    document: DocumentId,
    records: RwLock<HashMap<ObjectId, HashMap<u32, CachedEntry>>>,
}

impl ProviderTracker {
    fn new(document: DocumentId) -> Self {
        Self {
            document,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Snapshot of everything cached for an entity
    pub fn record(&self, object_id: ObjectId) -> Option<TrackerRecord> {
        self.records.read().get(&object_id).map(|entries| TrackerRecord {
            entries: entries.clone(),
        })
    }

    /// Whether a (ObjectId, variant) entry exists
    pub fn record_exists(&self, object_id: ObjectId, variant: u32) -> bool {
        self.records
            .read()
            .get(&object_id)
            .is_some_and(|entries| entries.contains_key(&variant))
    }

    /// Copy of the cached collection for a (ObjectId, variant) key
    pub fn primitives(&self, object_id: ObjectId, variant: u32) -> Option<PrimitiveCollection> {
        self.records
            .read()
            .get(&object_id)
            .and_then(|entries| entries.get(&variant))
            .map(|entry| entry.collection.make_copy())
    }

    /// Cached hash and build revision for a (ObjectId, variant) key
    pub fn entry_state(&self, object_id: ObjectId, variant: u32) -> Option<(u32, u64)> {
        self.records
            .read()
            .get(&object_id)
            .and_then(|entries| entries.get(&variant))
            .map(|entry| (entry.hash, entry.revision))
    }

    /// Insert or overwrite an entry under an explicit flag variant
    pub fn add_primitives(&self, variant: u32, revision: u64, collection: PrimitiveCollection) {
        let mut records = self.records.write();
        records
            .entry(collection.object_id())
            .or_default()
            .insert(
                variant,
                CachedEntry {
                    hash: collection.hash(),
                    revision,
                    collection,
                },
            );
    }

    /// Insert or overwrite keyed by the collection's own ObjectId and flags
    pub fn set(&self, revision: u64, collection: PrimitiveCollection) {
        let variant = collection.flags().cache_variant();
        self.add_primitives(variant, revision, collection);
    }

    /// Incremental update: re-place a cached entry without a rebuild
    ///
    /// Left-composes `xform` onto every cached instance transform in place
    /// and assigns the caller-computed `new_hash`, under the contract that
    /// `new_hash` equals what a full hash recomputation would have produced.
    /// Lets a provider skip a full rebuild when only the entity's world
    /// placement changed. Returns false if no such entry exists.
    pub fn transform_and_set_new_hash(
        &self,
        object_id: ObjectId,
        variant: u32,
        new_hash: u32,
        xform: &Mat4,
    ) -> bool {
        let mut records = self.records.write();
        let Some(entry) = records
            .get_mut(&object_id)
            .and_then(|entries| entries.get_mut(&variant))
        else {
            return false;
        };

        for instance in entry.collection.iter_mut() {
            instance.apply_transform(xform);
        }
        entry.collection.set_hash(new_hash);
        entry.hash = new_hash;
        true
    }

    /// Drop every cached entry for an entity
    pub fn invalidate(&self, object_id: ObjectId) -> bool {
        self.records.write().remove(&object_id).is_some()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Number of entities with at least one cached entry
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

/// Lazily-created trackers, one per open document
#[derive(Debug, Default)]
pub struct TrackerSet {
    trackers: Mutex<HashMap<DocumentId, Arc<ProviderTracker>>>,
}

impl TrackerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tracker for a document, created on first use
    pub fn tracker(&self, doc: &Document) -> Arc<ProviderTracker> {
        self.trackers
            .lock()
            .entry(doc.id())
            .or_insert_with(|| Arc::new(ProviderTracker::new(doc.id())))
            .clone()
    }

    /// The tracker for a document id, if one was ever created
    pub fn existing(&self, id: DocumentId) -> Option<Arc<ProviderTracker>> {
        self.trackers.lock().get(&id).cloned()
    }

    /// Discard a document's tracker; cached collections go with it
    pub fn close_document(&self, id: DocumentId) -> bool {
        self.trackers.lock().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.trackers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.lock().is_empty()
    }
}
