//! The provider registry
//!
//! An explicit, ordered registry owned by whoever hosts the pipeline,
//! never a process-wide global. Providers are appended at plugin-load time
//! and the chain runs in registration order; teardown is dropping the
//! registry (or unregistering a plugin's providers when it unloads).
//! Duplicate provider ids are rejected so chain order stays well-defined.

use crate::provider::MeshProvider;
use meshforge_core::id::{ObjectId, ProviderId};
use meshforge_core::{Error, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Ordered set of registered providers
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MeshProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the chain
    pub fn register(&mut self, provider: Arc<dyn MeshProvider>) -> Result<()> {
        let id = provider.provider_id();
        if self.providers.iter().any(|p| p.provider_id() == id) {
            return Err(Error::DuplicateProvider(id));
        }
        tracing::debug!(provider = %id, name = provider.name(), "registered provider");
        self.providers.push(provider);
        Ok(())
    }

    /// Remove a provider; returns whether it was registered
    pub fn unregister(&mut self, id: ProviderId) -> bool {
        let before = self.providers.len();
        self.providers.retain(|p| p.provider_id() != id);
        before != self.providers.len()
    }

    /// Look up a provider by id
    pub fn provider(&self, id: ProviderId) -> Option<&Arc<dyn MeshProvider>> {
        self.providers.iter().find(|p| p.provider_id() == id)
    }

    /// Providers in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MeshProvider>> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Union of all providers' synthetic entity ids
    pub fn non_object_ids(&self) -> BTreeSet<ObjectId> {
        self.providers
            .iter()
            .flat_map(|p| p.non_object_ids())
            .collect()
    }
}
