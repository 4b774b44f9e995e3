//! Geometry units and the display cache arena
//!
//! A [`GeometryUnit`] wraps a shared, read-only mesh plus its mapping
//! channels and an optional display-buffer handle. Units that should share a
//! single display-side buffer carry the same non-nil [`CacheKey`]; a nil key
//! disables sharing. The invariant that two units with the same key wrap
//! byte-identical meshes is checked by the [`DisplayCache`] arena rather
//! than assumed: `acquire` compares content hashes and rejects a reuse that
//! does not match.

use crate::error::{Error, Result};
use crate::mapping::MappingChannels;
use crate::mesh::Mesh;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Groups geometry units intended to share one display-side buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(Uuid);

impl CacheKey {
    /// A fresh key for a new sharing group
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The nil key: this unit never shares a display buffer
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for CacheKey {
    fn default() -> Self {
        Self::nil()
    }
}

/// A plain copyable handle into the display cache
///
/// Index plus generation, so a released-and-reused slot invalidates old
/// handles instead of silently aliasing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayHandle {
    pub index: usize,
    pub generation: u32,
}

/// An immutable mesh payload with its mapping channels and display handle
#[derive(Debug, Clone)]
pub struct GeometryUnit {
    mesh: Arc<Mesh>,
    cache_key: CacheKey,
    display_handle: Option<DisplayHandle>,
    channels: Arc<MappingChannels>,
}

impl GeometryUnit {
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self {
            mesh,
            cache_key: CacheKey::nil(),
            display_handle: None,
            channels: Arc::new(MappingChannels::new()),
        }
    }

    /// Attach a sharing key; callers must reuse a key only for identical bytes
    pub fn with_cache_key(mut self, key: CacheKey) -> Self {
        self.cache_key = key;
        self
    }

    pub fn with_channels(mut self, channels: Arc<MappingChannels>) -> Self {
        self.channels = channels;
        self
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn cache_key(&self) -> CacheKey {
        self.cache_key
    }

    pub fn display_handle(&self) -> Option<DisplayHandle> {
        self.display_handle
    }

    pub fn channels(&self) -> &Arc<MappingChannels> {
        &self.channels
    }

    /// Register this unit's mesh with a display cache and remember the handle
    ///
    /// Units with a nil key always get a private slot.
    pub fn bind_display(&mut self, cache: &mut DisplayCache) -> Result<DisplayHandle> {
        let handle = cache.acquire(self.cache_key, &self.mesh)?;
        self.display_handle = Some(handle);
        Ok(handle)
    }
}

/// One slot in the display cache
#[derive(Debug)]
struct Slot {
    content_hash: u32,
    generation: u32,
    refs: usize,
    live: bool,
}

/// Arena of display-buffer slots keyed by [`CacheKey`]
///
/// Stands in for the renderer-side vertex buffer store: what matters to the
/// pipeline is slot identity and the byte-equality check, not the buffers
/// themselves.
#[derive(Debug, Default)]
pub struct DisplayCache {
    slots: Vec<Slot>,
    by_key: HashMap<CacheKey, usize>,
    free: Vec<usize>,
}

impl DisplayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the slot for a key, verifying the sharing invariant
    ///
    /// A non-nil key that already has a slot is only returned when the mesh
    /// bytes match the slot's recorded content hash; a mismatch is
    /// [`Error::CacheKeyConflict`]. A nil key always allocates a private
    /// slot.
    pub fn acquire(&mut self, key: CacheKey, mesh: &Mesh) -> Result<DisplayHandle> {
        let content_hash = mesh.content_hash();

        if !key.is_nil() {
            if let Some(&index) = self.by_key.get(&key) {
                let slot = &mut self.slots[index];
                if slot.content_hash != content_hash {
                    return Err(Error::CacheKeyConflict);
                }
                slot.refs += 1;
                return Ok(DisplayHandle {
                    index,
                    generation: slot.generation,
                });
            }
        }

        let index = self.alloc_slot(content_hash);
        if !key.is_nil() {
            self.by_key.insert(key, index);
        }
        Ok(DisplayHandle {
            index,
            generation: self.slots[index].generation,
        })
    }

    /// Drop one reference; the slot is recycled when the last holder leaves
    pub fn release(&mut self, handle: DisplayHandle) -> Result<()> {
        let slot = self.slot_mut(handle)?;
        slot.refs -= 1;
        if slot.refs == 0 {
            slot.live = false;
            self.by_key.retain(|_, &mut idx| idx != handle.index);
            self.free.push(handle.index);
        }
        Ok(())
    }

    /// Number of live slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.live).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reference count of a slot, for diagnostics
    pub fn ref_count(&self, handle: DisplayHandle) -> Result<usize> {
        match self.slots.get(handle.index) {
            Some(slot) if slot.live && slot.generation == handle.generation => Ok(slot.refs),
            _ => Err(Error::StaleHandle {
                index: handle.index,
                generation: handle.generation,
            }),
        }
    }

    fn alloc_slot(&mut self, content_hash: u32) -> usize {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.content_hash = content_hash;
            slot.generation += 1;
            slot.refs = 1;
            slot.live = true;
            index
        } else {
            self.slots.push(Slot {
                content_hash,
                generation: 0,
                refs: 1,
                live: true,
            });
            self.slots.len() - 1
        }
    }

    fn slot_mut(&mut self, handle: DisplayHandle) -> Result<&mut Slot> {
        match self.slots.get_mut(handle.index) {
            Some(slot) if slot.live && slot.generation == handle.generation => Ok(slot),
            _ => Err(Error::StaleHandle {
                index: handle.index,
                generation: handle.generation,
            }),
        }
    }
}
