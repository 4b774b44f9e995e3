//! Render-primitive collections
//!
//! The ordered set of placed geometry instances produced for one entity
//! after the provider chain runs, carrying the running hash, the provider
//! that last touched it, and the query flags it was built under. Instance
//! order is insertion order; it matters only for display determinism.

use crate::bounds::Aabb;
use crate::flags::QueryFlags;
use crate::hash;
use crate::id::{DocumentId, ObjectId, ProviderId};
use crate::instance::RenderInstance;
use glam::Mat4;

/// The primitives produced for one entity
#[derive(Debug, Clone)]
pub struct PrimitiveCollection {
    document: DocumentId,
    object_id: ObjectId,
    provider: ProviderId,
    instances: Vec<RenderInstance>,
    hash: u32,
    flags: QueryFlags,
}

impl PrimitiveCollection {
    pub fn new(
        document: DocumentId,
        object_id: ObjectId,
        provider: ProviderId,
        seed_hash: u32,
        flags: QueryFlags,
    ) -> Self {
        Self {
            document,
            object_id,
            provider,
            instances: Vec::new(),
            hash: seed_hash,
            flags,
        }
    }

    /// An empty collection seeded from the entity's own hash
    pub fn seeded(document: DocumentId, object_id: ObjectId, flags: QueryFlags) -> Self {
        Self::new(
            document,
            object_id,
            ProviderId::nil(),
            hash::seed_for_object(object_id),
            flags,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// The provider that last touched this collection
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    pub fn set_provider(&mut self, provider: ProviderId) {
        self.provider = provider;
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn set_hash(&mut self, hash: u32) {
        self.hash = hash;
    }

    /// Fold a stage modification hash into the running hash
    pub fn combine_hash(&mut self, stage: u32) {
        self.hash = hash::combine(self.hash, stage);
    }

    pub fn flags(&self) -> QueryFlags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut QueryFlags {
        &mut self.flags
    }

    // ========================================================================
    // Instances
    // ========================================================================

    pub fn add_instance(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Iterate instances in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, RenderInstance> {
        self.instances.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, RenderInstance> {
        self.instances.iter_mut()
    }

    pub fn instances(&self) -> &[RenderInstance] {
        &self.instances
    }

    // ========================================================================
    // Whole-collection operations
    // ========================================================================

    /// Left-compose a transform onto every instance and restamp the hash
    ///
    /// Replaying a provider chain once and re-stamping the result per
    /// placement is far cheaper than re-running the chain for each of many
    /// repeated block instances; the hash update is deterministic in the
    /// prior hash and the transform so cached copies stay comparable.
    pub fn transform(&mut self, xform: &Mat4) {
        for instance in &mut self.instances {
            instance.apply_transform(xform);
        }
        self.hash = hash::combine_transform(self.hash, xform);
    }

    /// Copy that shares geometry and materials but owns its placement
    ///
    /// Geometry, material and mapping payloads stay shared (still
    /// immutable); the instance list itself is deep-copied so transforms and
    /// override state can diverge safely.
    pub fn make_copy(&self) -> Self {
        // RenderInstance::clone shares the Arc payloads and copies the rest
        self.clone()
    }

    /// World-space bounding box over all instances
    pub fn bounding_box(&self) -> Aabb {
        let mut bbox = Aabb::empty();
        for instance in &self.instances {
            bbox = bbox.union(&instance.bounding_box());
        }
        bbox
    }
}

impl<'a> IntoIterator for &'a PrimitiveCollection {
    type Item = &'a RenderInstance;
    type IntoIter = std::slice::Iter<'a, RenderInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
