//! The document collaborator model
//!
//! The pipeline treats the document as an external collaborator: it supplies
//! each entity's standard render geometry and the document-standard
//! material, and it bumps a revision counter when anything changes so cached
//! collections can notice staleness. Documents are NOT thread-safe; worker
//! threads must request defensive copies via
//! `QueryFlags::ALWAYS_COPY_DOCUMENT_CONTENT` and hold Arc snapshots.

use crate::geometry::GeometryUnit;
use crate::id::{DocumentId, ObjectId};
use crate::material::Material;
use std::collections::HashMap;
use std::sync::Arc;

/// A scene document: entity geometry plus the standard material
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    revision: u64,
    geometry: HashMap<ObjectId, GeometryUnit>,
    standard_material: Arc<Material>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: DocumentId::new(),
            revision: 0,
            geometry: HashMap::new(),
            standard_material: Arc::new(Material::standard()),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Monotonic counter bumped on every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The entity's standard render geometry, if it has any
    pub fn render_geometry(&self, object_id: ObjectId) -> Option<&GeometryUnit> {
        self.geometry.get(&object_id)
    }

    pub fn standard_material(&self) -> &Arc<Material> {
        &self.standard_material
    }

    pub fn contains(&self, object_id: ObjectId) -> bool {
        self.geometry.contains_key(&object_id)
    }

    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.geometry.keys().copied()
    }

    // ========================================================================
    // Mutation (main thread only)
    // ========================================================================

    /// Insert or replace an entity's geometry
    pub fn set_geometry(&mut self, object_id: ObjectId, geometry: GeometryUnit) {
        self.geometry.insert(object_id, geometry);
        self.touch();
    }

    pub fn remove_geometry(&mut self, object_id: ObjectId) -> Option<GeometryUnit> {
        let removed = self.geometry.remove(&object_id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn set_standard_material(&mut self, material: Arc<Material>) {
        self.standard_material = material;
        self.touch();
    }

    /// Record a mutation without structural change
    pub fn touch(&mut self) {
        self.revision += 1;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
