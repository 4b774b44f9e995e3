//! Material value objects
//!
//! Materials are opaque to the pipeline: shared read-only via `Arc`, swapped
//! whole by providers, never edited in place. The small PBR surface here is
//! enough for providers to construct replacements and for the running hash
//! to notice a swap.

use crate::hash::Fnv1a32;

/// A PBR material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub albedo: [f32; 4],
    pub roughness: f32,
    pub metallic: f32,
    pub emissive: [f32; 3],
    pub emissive_strength: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            albedo: [0.8, 0.8, 0.8, 1.0],
            roughness: 0.5,
            metallic: 0.0,
            emissive: [0.0, 0.0, 0.0],
            emissive_strength: 0.0,
        }
    }
}

impl Material {
    /// The document-standard material
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set albedo color
    pub fn albedo_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.albedo = [r, g, b, 1.0];
        self
    }

    /// Set roughness value
    pub fn roughness(mut self, value: f32) -> Self {
        self.roughness = value;
        self
    }

    /// Set metallic value
    pub fn metallic(mut self, value: f32) -> Self {
        self.metallic = value;
        self
    }

    /// Set emissive color
    pub fn emissive(mut self, r: f32, g: f32, b: f32, strength: f32) -> Self {
        self.emissive = [r, g, b];
        self.emissive_strength = strength;
        self
    }

    /// Whether this is the document-standard material
    pub fn is_standard(&self) -> bool {
        self.name == "standard"
    }

    /// Hash of the material values, for stage modification hashes
    pub fn content_hash(&self) -> u32 {
        let mut h = Fnv1a32::new();
        h.write_bytes(self.name.as_bytes());
        for v in self.albedo {
            h.write_f32(v);
        }
        h.write_f32(self.roughness);
        h.write_f32(self.metallic);
        for v in self.emissive {
            h.write_f32(v);
        }
        h.write_f32(self.emissive_strength);
        h.finish()
    }
}
