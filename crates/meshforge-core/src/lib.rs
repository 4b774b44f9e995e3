//! # Meshforge Core
//!
//! Data model for the meshforge render-primitive pipeline.
//!
//! A renderer asks the pipeline for the primitives of a scene entity; an
//! ordered chain of providers progressively rewrites an immutable,
//! reference-shared geometry model, and a running 32-bit hash of pipeline
//! history makes "did anything change" checks cheap. This crate holds the
//! model those pieces agree on:
//!
//! - [`id`]: 128-bit entity / provider / document identifiers
//! - [`mesh`], [`bounds`]: triangle payloads and world-space boxes
//! - [`geometry`]: shared geometry units and the display-cache arena
//! - [`mapping`], [`material`]: mapping channels and material value objects
//! - [`instance`], [`collection`]: placed instances and the per-entity
//!   collection with its running hash
//! - [`hash`]: the pure combine functions behind that hash
//! - [`flags`]: the 32-bit query flag word, plain and atomic-shared
//! - [`document`]: the minimal document collaborator the pipeline consumes
//!
//! ## Conventions
//!
//! - **Transforms**: `glam::Mat4`, column-major, left-composed (`T1 * T0`
//!   applies `T0` first)
//! - **Coordinate system**: right-handed, Y-up
//! - **Sharing**: geometry, materials and mapping sets are `Arc`-shared and
//!   immutable once attached

pub mod bounds;
pub mod collection;
pub mod document;
pub mod flags;
pub mod geometry;
pub mod hash;
pub mod id;
pub mod instance;
pub mod mapping;
pub mod material;
pub mod mesh;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bounds::Aabb;
    pub use crate::collection::PrimitiveCollection;
    pub use crate::document::Document;
    pub use crate::flags::{QueryFlags, SharedFlags};
    pub use crate::geometry::{CacheKey, DisplayCache, DisplayHandle, GeometryUnit};
    pub use crate::id::{DocumentId, ObjectId, ProviderId};
    pub use crate::instance::RenderInstance;
    pub use crate::mapping::{MappingChannel, MappingChannels};
    pub use crate::material::Material;
    pub use crate::mesh::{Mesh, Vertex};

    // Math (re-export glam)
    pub use glam::{Mat4, Vec2, Vec3};

    // Error handling
    pub use crate::{Error, Result};
}
