//! Render instances: one geometry unit placed in space
//!
//! An instance pairs a geometry unit with a transform, an optional shared
//! material, an optional mapping-channel override, and dependency flags.
//! After construction only the transform and the mapping override may
//! change; the geometry is immutable once attached. A provider rewriting
//! geometry builds the replacement with [`RenderInstance::with_geometry`],
//! which keeps the previous instance's material, override, transform and
//! flags ("replace geometry, keep provenance").

use crate::bounds::Aabb;
use crate::geometry::GeometryUnit;
use crate::id::ObjectId;
use crate::mapping::MappingChannels;
use crate::material::Material;
use glam::Mat4;
use std::sync::Arc;

/// One geometry unit placed in space
#[derive(Debug, Clone)]
pub struct RenderInstance {
    object_id: ObjectId,
    geometry: GeometryUnit,
    material: Option<Arc<Material>>,
    mapping_override: Option<Arc<MappingChannels>>,
    transform: Mat4,
    view_dependent: bool,
    requester_dependent: bool,
    forced_material: bool,
}

impl RenderInstance {
    pub fn new(object_id: ObjectId, geometry: GeometryUnit) -> Self {
        Self {
            object_id,
            geometry,
            material: None,
            mapping_override: None,
            transform: Mat4::IDENTITY,
            view_dependent: false,
            requester_dependent: false,
            forced_material: false,
        }
    }

    /// Clone this instance's provenance onto a new geometry unit
    pub fn with_geometry(&self, geometry: GeometryUnit) -> Self {
        Self {
            geometry,
            ..self.clone()
        }
    }

    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self
    }

    /// Mark the material as forced: downstream stages must not swap it
    pub fn with_forced_material(mut self, material: Arc<Material>) -> Self {
        self.material = Some(material);
        self.forced_material = true;
        self
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mapping_override(mut self, channels: Arc<MappingChannels>) -> Self {
        self.mapping_override = Some(channels);
        self
    }

    pub fn view_dependent(mut self, value: bool) -> Self {
        self.view_dependent = value;
        self
    }

    pub fn requester_dependent(mut self, value: bool) -> Self {
        self.requester_dependent = value;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn geometry(&self) -> &GeometryUnit {
        &self.geometry
    }

    pub fn material(&self) -> Option<&Arc<Material>> {
        self.material.as_ref()
    }

    pub fn mapping_override(&self) -> Option<&Arc<MappingChannels>> {
        self.mapping_override.as_ref()
    }

    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    pub fn is_view_dependent(&self) -> bool {
        self.view_dependent
    }

    pub fn is_requester_dependent(&self) -> bool {
        self.requester_dependent
    }

    pub fn is_forced_material(&self) -> bool {
        self.forced_material
    }

    // ========================================================================
    // Post-construction mutation (transform and mapping override only)
    // ========================================================================

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// Left-compose a transform onto the current placement
    pub fn apply_transform(&mut self, xform: &Mat4) {
        self.transform = *xform * self.transform;
    }

    pub fn set_mapping_override(&mut self, channels: Option<Arc<MappingChannels>>) {
        self.mapping_override = channels;
    }

    /// Drop the material, falling back to the document standard
    pub fn clear_material(&mut self) {
        self.material = None;
        self.forced_material = false;
    }

    /// The mesh-level channels resolved against the instance override
    pub fn resolved_channels(&self) -> MappingChannels {
        match &self.mapping_override {
            Some(overrides) => self.geometry.channels().merge_override(overrides),
            None => self.geometry.channels().as_ref().clone(),
        }
    }

    /// World-space bounding box of this placement
    pub fn bounding_box(&self) -> Aabb {
        self.geometry.mesh().bounding_box().transform(&self.transform)
    }
}
