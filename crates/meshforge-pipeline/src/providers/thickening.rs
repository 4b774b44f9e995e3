//! Thickening provider
//!
//! Shells a surface into a solid: vertices move half the shell distance
//! outward along their normals, and a mirrored inward copy with reversed
//! winding closes the back side. Closed input surfaces are assumed;
//! boundary edges of open meshes are not stitched.

use crate::params::{ParamValue, ProviderCaps};
use crate::provider::{MeshProvider, RenderQuery};
use meshforge_core::collection::PrimitiveCollection;
use meshforge_core::document::Document;
use meshforge_core::geometry::GeometryUnit;
use meshforge_core::hash::Fnv1a32;
use meshforge_core::id::{ObjectId, ProviderId};
use meshforge_core::mesh::Mesh;
use meshforge_core::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// Normal-offset shelling stage
pub struct ThickeningProvider {
    id: ProviderId,
    distance: RwLock<f32>,
    enabled: RwLock<HashSet<ObjectId>>,
}

impl ThickeningProvider {
    pub fn new() -> Self {
        Self {
            id: ProviderId::new(),
            distance: RwLock::new(0.05),
            enabled: RwLock::new(HashSet::new()),
        }
    }

    /// Attach thickening to an entity
    pub fn enable(&self, object_id: ObjectId) {
        self.enabled.write().insert(object_id);
    }

    pub fn disable(&self, object_id: ObjectId) {
        self.enabled.write().remove(&object_id);
    }

    fn is_enabled(&self, object_id: ObjectId) -> bool {
        self.enabled.read().contains(&object_id)
    }

    fn stage_hash(&self) -> u32 {
        let mut h = Fnv1a32::new();
        h.write_bytes(b"thickening");
        h.write_f32(*self.distance.read());
        h.finish()
    }

    fn shell(mesh: &Mesh, distance: f32) -> Mesh {
        let half = distance * 0.5;
        let count = mesh.vertices.len() as u32;
        let mut out = Mesh::new();
        out.vertices.reserve(mesh.vertices.len() * 2);
        out.indices.reserve(mesh.indices.len() * 2);

        // Outer surface
        for v in &mesh.vertices {
            let mut moved = *v;
            for axis in 0..3 {
                moved.position[axis] += v.normal[axis] * half;
            }
            out.vertices.push(moved);
        }
        // Inner surface, normals flipped
        for v in &mesh.vertices {
            let mut moved = *v;
            for axis in 0..3 {
                moved.position[axis] -= v.normal[axis] * half;
                moved.normal[axis] = -v.normal[axis];
            }
            out.vertices.push(moved);
        }

        out.indices.extend_from_slice(&mesh.indices);
        // Reversed winding keeps the inner surface front-facing from inside
        for tri in mesh.indices.chunks_exact(3) {
            out.indices.push(tri[2] + count);
            out.indices.push(tri[1] + count);
            out.indices.push(tri[0] + count);
        }
        out
    }
}

impl Default for ThickeningProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshProvider for ThickeningProvider {
    fn provider_id(&self) -> ProviderId {
        self.id
    }

    fn name(&self) -> &str {
        "thickening"
    }

    fn has_custom_primitives(&self, query: &RenderQuery<'_>, _doc: &Document) -> bool {
        self.is_enabled(query.object_id)
    }

    fn render_meshes(
        &self,
        query: &RenderQuery<'_>,
        _doc: &Document,
        previous: &PrimitiveCollection,
    ) -> Result<Option<PrimitiveCollection>> {
        if !self.is_enabled(query.object_id) || previous.is_empty() {
            return Ok(None);
        }

        let distance = *self.distance.read();
        let mut next = PrimitiveCollection::new(
            previous.document(),
            previous.object_id(),
            self.id,
            previous.hash(),
            previous.flags(),
        );
        for instance in previous.iter() {
            let shelled = Self::shell(instance.geometry().mesh(), distance);
            next.add_instance(instance.with_geometry(GeometryUnit::new(Arc::new(shelled))));
        }
        next.combine_hash(self.stage_hash());
        Ok(Some(next))
    }

    fn modification_hash(&self, query: &RenderQuery<'_>, _doc: &Document) -> Option<u32> {
        self.is_enabled(query.object_id).then(|| self.stage_hash())
    }

    fn parameter(&self, name: &str) -> Option<ParamValue> {
        match name {
            "distance" => Some(ParamValue::Float(f64::from(*self.distance.read()))),
            _ => None,
        }
    }

    fn set_parameter(&self, name: &str, value: ParamValue) -> Result<()> {
        match name {
            "distance" => {
                let d = value
                    .as_float()
                    .ok_or_else(|| Error::InvalidParameter("distance must be a number".into()))?;
                if d <= 0.0 {
                    return Err(Error::InvalidParameter("distance must be positive".into()));
                }
                *self.distance.write() = d as f32;
                Ok(())
            }
            _ => Err(Error::UnknownParameter(name.to_string())),
        }
    }

    fn capabilities(&self) -> ProviderCaps {
        ProviderCaps {
            has_progress: false,
            cheap_hash_probe: true,
            long_running: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use meshforge_core::flags::{QueryFlags, SharedFlags};
    use meshforge_core::hash;
    use meshforge_core::instance::RenderInstance;
    use meshforge_core::mesh::unit_quad;

    fn seeded(doc: &Document, object_id: ObjectId) -> PrimitiveCollection {
        let mut coll = PrimitiveCollection::seeded(doc.id(), object_id, QueryFlags::empty());
        coll.add_instance(RenderInstance::new(
            object_id,
            GeometryUnit::new(Arc::new(unit_quad())),
        ));
        coll
    }

    #[test]
    fn test_shell_doubles_geometry() {
        let quad = unit_quad();
        let shelled = ThickeningProvider::shell(&quad, 0.2);
        assert_eq!(shelled.vertex_count(), quad.vertex_count() * 2);
        assert_eq!(shelled.triangle_count(), quad.triangle_count() * 2);
        // Outer surface sits half the distance along +Z, inner along -Z
        assert_relative_eq!(shelled.vertices[0].position[2], 0.1);
        assert_relative_eq!(shelled.vertices[4].position[2], -0.1);
        assert_relative_eq!(shelled.vertices[4].normal[2], -1.0);
    }

    #[test]
    fn test_render_meshes_folds_stage_hash() {
        let provider = ThickeningProvider::new();
        let doc = Document::new();
        let object_id = ObjectId::new();
        provider.enable(object_id);

        let previous = seeded(&doc, object_id);
        let query = RenderQuery::new(object_id, SharedFlags::default());
        let next = provider
            .render_meshes(&query, &doc, &previous)
            .unwrap()
            .unwrap();
        let stage = provider.modification_hash(&query, &doc).unwrap();
        assert_eq!(next.hash(), hash::combine(previous.hash(), stage));
        assert_eq!(next.provider(), provider.provider_id());
    }

    #[test]
    fn test_distance_parameter_feeds_hash() {
        let provider = ThickeningProvider::new();
        let doc = Document::new();
        let object_id = ObjectId::new();
        provider.enable(object_id);
        let query = RenderQuery::new(object_id, SharedFlags::default());

        let before = provider.modification_hash(&query, &doc).unwrap();
        provider
            .set_parameter("distance", ParamValue::Float(0.2))
            .unwrap();
        assert_ne!(provider.modification_hash(&query, &doc).unwrap(), before);
        // Stored as f32, so compare with a tolerance
        let read_back = provider.parameter("distance").unwrap().as_float().unwrap();
        assert_relative_eq!(read_back, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_disable_restores_pass_through() {
        let provider = ThickeningProvider::new();
        let doc = Document::new();
        let object_id = ObjectId::new();
        provider.enable(object_id);
        provider.disable(object_id);

        let query = RenderQuery::new(object_id, SharedFlags::default());
        assert!(provider
            .render_meshes(&query, &doc, &seeded(&doc, object_id))
            .unwrap()
            .is_none());
    }
}
