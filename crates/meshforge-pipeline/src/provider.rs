//! The provider contract
//!
//! A provider is one stage in the mesh-generation pipeline: given the
//! previous stage's collection it either passes through unchanged
//! (`Ok(None)`, never an error) or returns a rewritten collection whose
//! running hash folds in the stage's own modification hash. The fold must go
//! through [`meshforge_core::hash::combine`] so the final hash encodes
//! pipeline history rather than final byte content: two histories that
//! converge on the same geometry still hash apart, and "nothing changed" is
//! detectable without deep comparison.

use crate::params::{ParamValue, ProviderCaps};
use crate::progress::ProgressReport;
use meshforge_core::collection::PrimitiveCollection;
use meshforge_core::document::Document;
use meshforge_core::flags::SharedFlags;
use meshforge_core::id::{ObjectId, ProviderId};
use meshforge_core::{Error, Result};

/// Which representation of the entity the caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshKind {
    /// Full render geometry
    #[default]
    Render,
    /// Cheaper interactive-preview geometry
    Preview,
    /// Geometry for measurement/analysis, never decimated
    Analysis,
}

/// Display attribute knobs forwarded to providers
///
/// Opaque to the pipeline itself; providers read whichever knobs they care
/// about when deciding density and quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayAttributes {
    pub mesh_density: f32,
    pub high_quality: bool,
}

impl Default for DisplayAttributes {
    fn default() -> Self {
        Self {
            mesh_density: 0.5,
            high_quality: false,
        }
    }
}

/// Everything a provider needs to know about one pipeline query
#[derive(Debug, Clone)]
pub struct RenderQuery<'a> {
    pub kind: MeshKind,
    /// Opaque viewport identity for view-dependent stages
    pub viewport: Option<u64>,
    /// The entity being built (real or synthetic)
    pub object_id: ObjectId,
    /// Chain of containing instances, outermost first; attribute
    /// inheritance only, never geometric transformation
    pub ancestry: &'a [ObjectId],
    /// The caller-shared flag word; providers OR in status bits and poll
    /// for cancellation
    pub flags: SharedFlags,
    /// Opaque identity of the requesting renderer
    pub requester: Option<u64>,
    pub attributes: DisplayAttributes,
}

impl<'a> RenderQuery<'a> {
    pub fn new(object_id: ObjectId, flags: SharedFlags) -> Self {
        Self {
            kind: MeshKind::Render,
            viewport: None,
            object_id,
            ancestry: &[],
            flags,
            requester: None,
            attributes: DisplayAttributes::default(),
        }
    }

    pub fn with_kind(mut self, kind: MeshKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_ancestry(mut self, ancestry: &'a [ObjectId]) -> Self {
        self.ancestry = ancestry;
        self
    }

    pub fn with_viewport(mut self, viewport: u64) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_requester(mut self, requester: u64) -> Self {
        self.requester = Some(requester);
        self
    }

    pub fn with_attributes(mut self, attributes: DisplayAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// One stage in the mesh-generation pipeline
pub trait MeshProvider: Send + Sync {
    /// Stable identifier, set once at registration
    fn provider_id(&self) -> ProviderId;

    /// Human-readable name for diagnostics
    fn name(&self) -> &str;

    /// Fast existence check: would this provider supply primitives?
    ///
    /// MUST be cheap. Implementations use heuristics (object type, presence
    /// of attached configuration), never build geometry.
    fn has_custom_primitives(&self, query: &RenderQuery<'_>, doc: &Document) -> bool;

    /// Transform the previous stage's collection, or pass through
    ///
    /// `Ok(None)` means "no contribution, keep the previous collection" and
    /// is never an error. A returned collection must carry the queried
    /// ObjectId and a hash equal to `combine(previous.hash(),
    /// self.modification_hash(..))`.
    fn render_meshes(
        &self,
        query: &RenderQuery<'_>,
        doc: &Document,
        previous: &PrimitiveCollection,
    ) -> Result<Option<PrimitiveCollection>>;

    /// The stage's own modification hash for this query, without building
    ///
    /// `None` when the stage would pass through. The manager replays the
    /// chain over these values to answer hash-only probes, so the value must
    /// agree with what `render_meshes` folds.
    fn modification_hash(&self, query: &RenderQuery<'_>, doc: &Document) -> Option<u32>;

    /// Synthetic entities this provider supplies independent of any real
    /// scene entity
    fn non_object_ids(&self) -> Vec<ObjectId> {
        Vec::new()
    }

    /// Read a named parameter
    fn parameter(&self, _name: &str) -> Option<ParamValue> {
        None
    }

    /// Write a named parameter
    fn set_parameter(&self, name: &str, _value: ParamValue) -> Result<()> {
        Err(Error::UnknownParameter(name.to_string()))
    }

    /// What this provider implements beyond the required contract
    fn capabilities(&self) -> ProviderCaps {
        ProviderCaps::default()
    }

    /// Progress of asynchronous or long-running computation
    fn progress(&self, _doc: &Document, _objects: Option<&[ObjectId]>) -> Vec<ProgressReport> {
        Vec::new()
    }
}
