//! Texture mapping channels
//!
//! A mesh carries a channel set describing how UVs are generated or
//! transformed per channel number; a render instance may carry an override
//! set that shadows individual channels without touching the shared mesh.

use crate::hash::Fnv1a32;
use glam::Mat4;

/// One mapping channel: a channel number and its UV transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingChannel {
    pub channel: u32,
    pub uv_transform: Mat4,
}

impl MappingChannel {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            uv_transform: Mat4::IDENTITY,
        }
    }

    pub fn with_transform(mut self, uv_transform: Mat4) -> Self {
        self.uv_transform = uv_transform;
        self
    }
}

/// An ordered set of mapping channels, keyed by channel number
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingChannels {
    channels: Vec<MappingChannel>,
}

impl MappingChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the channel with the same number
    pub fn set(&mut self, channel: MappingChannel) {
        match self.channels.iter_mut().find(|c| c.channel == channel.channel) {
            Some(existing) => *existing = channel,
            None => self.channels.push(channel),
        }
    }

    pub fn get(&self, channel: u32) -> Option<&MappingChannel> {
        self.channels.iter().find(|c| c.channel == channel)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingChannel> {
        self.channels.iter()
    }

    /// Resolve mesh-level channels against an instance-level override
    ///
    /// Override channels shadow same-numbered mesh channels; mesh channels
    /// without an override pass through unchanged.
    pub fn merge_override(&self, overrides: &MappingChannels) -> MappingChannels {
        let mut merged = self.clone();
        for ch in overrides.iter() {
            merged.set(*ch);
        }
        merged
    }

    /// Hash of the channel set, for folding into a stage modification hash
    pub fn content_hash(&self) -> u32 {
        let mut h = Fnv1a32::new();
        for ch in &self.channels {
            h.write_u32(ch.channel);
            for v in ch.uv_transform.to_cols_array() {
                h.write_f32(v);
            }
        }
        h.finish()
    }
}
