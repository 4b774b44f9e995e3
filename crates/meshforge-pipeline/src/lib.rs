//! # Meshforge Pipeline
//!
//! The provider chain, per-document cache, and pipeline manager.
//!
//! A renderer asks [`MeshPipeline`] for an entity's primitives; the manager
//! seeds a collection from the document (or a caller-supplied initial set),
//! runs every registered [`MeshProvider`] in registration order, and caches
//! the result keyed by entity, flag variant, and document revision. A
//! 32-bit running hash of pipeline history answers "did anything change"
//! without rebuilding geometry.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use meshforge_core::prelude::*;
//! use meshforge_pipeline::prelude::*;
//! use meshforge_core::mesh::unit_quad;
//!
//! # fn main() -> anyhow::Result<()> {
//! // A document with one entity
//! let mut doc = Document::new();
//! let object_id = ObjectId::new();
//! doc.set_geometry(object_id, GeometryUnit::new(Arc::new(unit_quad())));
//!
//! // Register a displacement stage and attach it to the entity
//! let displacement = Arc::new(DisplacementProvider::new());
//! displacement.enable(object_id);
//! let mut registry = ProviderRegistry::new();
//! registry.register(displacement)?;
//!
//! // Build primitives through the chain
//! let pipeline = MeshPipeline::new(&registry);
//! let query = RenderQuery::new(object_id, SharedFlags::default());
//! let primitives = pipeline.render_meshes(&query, &doc, None)?;
//! assert_eq!(primitives.hash(), pipeline.render_meshes_hash(&query, &doc)?);
//! # Ok(())
//! # }
//! ```

pub mod manager;
pub mod params;
pub mod progress;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod tracker;

// Re-export the core model alongside the pipeline surface
pub use meshforge_core::{Error, Result};

pub use manager::MeshPipeline;
pub use params::{ParamValue, ProviderCaps};
pub use progress::{ProgressReport, ProgressState};
pub use provider::{DisplayAttributes, MeshKind, MeshProvider, RenderQuery};
pub use providers::{DisplacementProvider, ThickeningProvider};
pub use registry::ProviderRegistry;
pub use tracker::{ProviderTracker, TrackerRecord, TrackerSet};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::manager::MeshPipeline;
    pub use crate::params::{ParamValue, ProviderCaps};
    pub use crate::progress::{ProgressReport, ProgressState};
    pub use crate::provider::{DisplayAttributes, MeshKind, MeshProvider, RenderQuery};
    pub use crate::providers::{DisplacementProvider, ThickeningProvider};
    pub use crate::registry::ProviderRegistry;
    pub use crate::tracker::{ProviderTracker, TrackerSet};

    pub use meshforge_core::prelude::*;
}
