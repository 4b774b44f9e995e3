//! The running hash carried by render-primitive collections
//!
//! The hash is a 32-bit accumulated, order-dependent fingerprint of pipeline
//! history, not a hash of mesh bytes: each stage folds its own modification
//! hash into the prior value with [`combine`], seeded from the originating
//! entity with [`seed_for_object`]. Two collections with equal ObjectId and
//! equal hash may be treated as interchangeable for display without deep
//! comparison, and two different histories that converge on the same bytes
//! still hash apart.

use crate::id::ObjectId;
use glam::Mat4;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Incremental FNV-1a writer over the 32-bit hash word
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a32(u32);

impl Fnv1a32 {
    pub fn new() -> Self {
        Self(FNV_OFFSET)
    }

    /// Resume from an existing hash value
    pub fn with_state(state: u32) -> Self {
        Self(state)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u32::from(b);
            h = h.wrapping_mul(FNV_PRIME);
        }
        self.0 = h;
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    /// Hash a float by bit pattern, so -0.0 and 0.0 stay distinct inputs
    /// and the result is exact across runs
    pub fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    pub fn finish(self) -> u32 {
        self.0
    }
}

impl Default for Fnv1a32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a byte slice from scratch
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut h = Fnv1a32::new();
    h.write_bytes(bytes);
    h.finish()
}

/// Hash a float slice from scratch, by bit pattern
pub fn hash_f32s(values: &[f32]) -> u32 {
    let mut h = Fnv1a32::new();
    for &v in values {
        h.write_f32(v);
    }
    h.finish()
}

/// The chain seed derived from the originating entity
pub fn seed_for_object(object_id: ObjectId) -> u32 {
    hash_bytes(object_id.as_bytes())
}

/// Fold a stage's modification hash into the running hash
///
/// Pure and order-dependent: `combine(combine(s, a), b)` differs from
/// `combine(combine(s, b), a)`. This is the only way a provider may alter
/// the running hash, so the final value encodes pipeline history.
pub fn combine(prior: u32, stage: u32) -> u32 {
    let mut h = Fnv1a32::with_state(prior);
    h.write_u32(stage);
    h.finish()
}

/// Restamp the running hash for a transform applied to a whole collection
///
/// Deterministic in the prior hash and the transform coefficients, so a
/// cached chain result can be re-placed many times (repeated block
/// instances) without replaying the providers.
pub fn combine_transform(prior: u32, xform: &Mat4) -> u32 {
    let mut h = Fnv1a32::with_state(prior);
    for v in xform.to_cols_array() {
        h.write_f32(v);
    }
    h.finish()
}
