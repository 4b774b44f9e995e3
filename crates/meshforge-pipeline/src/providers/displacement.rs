//! Displacement provider
//!
//! Offsets every vertex along its normal by a Perlin noise field. The
//! heaviest built-in stage: per-vertex sampling runs in parallel over
//! fixed-size chunks, the shared `CANCELED` bit is polled between chunks,
//! and a stopped build returns the instances finished so far with
//! `INCOMPLETE` set so the caller can poll by re-issuing the request.

use crate::params::{ParamValue, ProviderCaps};
use crate::progress::{ProgressReport, ProgressState};
use crate::provider::{MeshProvider, RenderQuery};
use meshforge_core::collection::PrimitiveCollection;
use meshforge_core::document::Document;
use meshforge_core::flags::{QueryFlags, SharedFlags};
use meshforge_core::geometry::GeometryUnit;
use meshforge_core::hash::Fnv1a32;
use meshforge_core::id::{ObjectId, ProviderId};
use meshforge_core::mesh::Mesh;
use meshforge_core::{Error, Result};
use noise::{NoiseFn, Perlin};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Vertices displaced per cancellation check
const DISPLACE_CHUNK: usize = 4096;

#[derive(Debug, Clone, Copy)]
struct DisplacementParams {
    amplitude: f32,
    frequency: f32,
    seed: u32,
}

impl Default for DisplacementParams {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 4.0,
            seed: 0,
        }
    }
}

impl DisplacementParams {
    fn stage_hash(self) -> u32 {
        let mut h = Fnv1a32::new();
        h.write_bytes(b"displacement");
        h.write_f32(self.amplitude);
        h.write_f32(self.frequency);
        h.write_u32(self.seed);
        h.finish()
    }
}

/// Noise-driven vertex displacement stage
pub struct DisplacementProvider {
    id: ProviderId,
    params: RwLock<DisplacementParams>,
    enabled: RwLock<HashSet<ObjectId>>,
    progress: RwLock<HashMap<ObjectId, ProgressState>>,
}

impl DisplacementProvider {
    pub fn new() -> Self {
        Self {
            id: ProviderId::new(),
            params: RwLock::new(DisplacementParams::default()),
            enabled: RwLock::new(HashSet::new()),
            progress: RwLock::new(HashMap::new()),
        }
    }

    /// Attach displacement to an entity
    pub fn enable(&self, object_id: ObjectId) {
        self.enabled.write().insert(object_id);
    }

    pub fn disable(&self, object_id: ObjectId) {
        self.enabled.write().remove(&object_id);
        self.progress.write().remove(&object_id);
    }

    fn is_enabled(&self, object_id: ObjectId) -> bool {
        self.enabled.read().contains(&object_id)
    }

    /// Displace a mesh copy, polling the cancel bit between chunks
    ///
    /// Returns `None` when asked to stop mid-mesh; the partial copy is
    /// discarded so callers only ever see untouched or fully displaced
    /// geometry.
    fn displace(
        &self,
        mesh: &Mesh,
        params: DisplacementParams,
        flags: &SharedFlags,
    ) -> Option<Mesh> {
        let perlin = Perlin::new(params.seed);
        let mut out = mesh.clone();

        for chunk in out.vertices.chunks_mut(DISPLACE_CHUNK) {
            if flags.is_canceled() {
                return None;
            }
            chunk.par_iter_mut().for_each(|v| {
                let p = [
                    f64::from(v.position[0] * params.frequency),
                    f64::from(v.position[1] * params.frequency),
                    f64::from(v.position[2] * params.frequency),
                ];
                let offset = perlin.get(p) as f32 * params.amplitude;
                for axis in 0..3 {
                    v.position[axis] += v.normal[axis] * offset;
                }
            });
        }

        out.recalculate_normals();
        Some(out)
    }
}

impl Default for DisplacementProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshProvider for DisplacementProvider {
    fn provider_id(&self) -> ProviderId {
        self.id
    }

    fn name(&self) -> &str {
        "displacement"
    }

    fn has_custom_primitives(&self, query: &RenderQuery<'_>, _doc: &Document) -> bool {
        // Attached-configuration heuristic only; no geometry is built here
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

        let params = *self.params.read();
        let total = previous.len();
        let mut next = PrimitiveCollection::new(
            previous.document(),
            previous.object_id(),
            self.id,
            previous.hash(),
            previous.flags(),
        );

        for (done, instance) in previous.iter().enumerate() {
            let Some(displaced) = self.displace(instance.geometry().mesh(), params, &query.flags)
            else {
                // Best-effort partial result: the interrupted instance and
                // the rest pass through undisplaced
                for rest in previous.iter().skip(done) {
                    next.add_instance(rest.clone());
                }
                query.flags.set(QueryFlags::INCOMPLETE);
                self.progress.write().insert(
                    query.object_id,
                    ProgressState::Running {
                        fraction: done as f32 / total as f32,
                    },
                );
                next.combine_hash(params.stage_hash());
                return Ok(Some(next));
            };
            next.add_instance(instance.with_geometry(GeometryUnit::new(Arc::new(displaced))));
            self.progress.write().insert(
                query.object_id,
                ProgressState::Running {
                    fraction: (done + 1) as f32 / total as f32,
                },
            );
        }

        self.progress.write().insert(query.object_id, ProgressState::Done);
        next.combine_hash(params.stage_hash());
        Ok(Some(next))
    }

    fn modification_hash(&self, query: &RenderQuery<'_>, _doc: &Document) -> Option<u32> {
        self.is_enabled(query.object_id)
            .then(|| self.params.read().stage_hash())
    }

    fn parameter(&self, name: &str) -> Option<ParamValue> {
        let params = self.params.read();
        match name {
            "amplitude" => Some(ParamValue::Float(f64::from(params.amplitude))),
            "frequency" => Some(ParamValue::Float(f64::from(params.frequency))),
            "seed" => Some(ParamValue::Int(i64::from(params.seed))),
            _ => None,
        }
    }

    fn set_parameter(&self, name: &str, value: ParamValue) -> Result<()> {
        let mut params = self.params.write();
        match name {
            "amplitude" => {
                params.amplitude = value
                    .as_float()
                    .ok_or_else(|| Error::InvalidParameter("amplitude must be a number".into()))?
                    as f32;
            }
            "frequency" => {
                let f = value
                    .as_float()
                    .ok_or_else(|| Error::InvalidParameter("frequency must be a number".into()))?;
                if f <= 0.0 {
                    return Err(Error::InvalidParameter("frequency must be positive".into()));
                }
                params.frequency = f as f32;
            }
            "seed" => {
                params.seed = value
                    .as_int()
                    .ok_or_else(|| Error::InvalidParameter("seed must be an integer".into()))?
                    as u32;
            }
            _ => return Err(Error::UnknownParameter(name.to_string())),
        }
        Ok(())
    }

    fn capabilities(&self) -> ProviderCaps {
        ProviderCaps {
            has_progress: true,
            cheap_hash_probe: true,
            long_running: true,
        }
    }

    fn progress(&self, _doc: &Document, objects: Option<&[ObjectId]>) -> Vec<ProgressReport> {
        let progress = self.progress.read();
        progress
            .iter()
            .filter(|(object, _)| objects.is_none_or(|wanted| wanted.contains(object)))
            .map(|(object, state)| ProgressReport::new(self.id, *state).for_object(*object))
            .collect()
    }
}
