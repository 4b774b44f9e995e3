//! The pipeline manager
//!
//! Orchestrates the ordered provider chain for one query: seeds a starting
//! collection, consults the per-document tracker, runs each provider in
//! registration order, validates what comes back, accumulates status flags,
//! and stores the result for the next identical request.
//!
//! Conflict policy: chained rewriting in registration order. Each provider
//! receives the previous provider's output and full replacement is legal,
//! so when two providers both claim an entity the later registration wins.
//! Replacements of a non-empty collection are logged at debug level so
//! overlapping providers are diagnosable.

use crate::progress::ProgressReport;
use crate::provider::{MeshProvider, RenderQuery};
use crate::registry::ProviderRegistry;
use crate::tracker::{ProviderTracker, TrackerSet};
use anyhow::Result;
use meshforge_core::bounds::Aabb;
use meshforge_core::collection::PrimitiveCollection;
use meshforge_core::document::Document;
use meshforge_core::flags::QueryFlags;
use meshforge_core::geometry::GeometryUnit;
use meshforge_core::hash;
use meshforge_core::id::{DocumentId, ObjectId, ProviderId};
use meshforge_core::instance::RenderInstance;
use meshforge_core::mapping::MappingChannels;
use meshforge_core::mesh::Mesh;
use std::sync::Arc;

/// Runs the registered provider chain and caches its results
pub struct MeshPipeline<'r> {
    registry: &'r ProviderRegistry,
    trackers: TrackerSet,
}

impl<'r> MeshPipeline<'r> {
    pub fn new(registry: &'r ProviderRegistry) -> Self {
        Self {
            registry,
            trackers: TrackerSet::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Would any registered provider supply primitives for this entity?
    ///
    /// Iterates providers in registration order and returns true at the
    /// first yes. Cheap by contract: providers answer from heuristics, not
    /// by building geometry.
    pub fn has_custom_primitives(&self, query: &RenderQuery<'_>, doc: &Document) -> bool {
        self.registry
            .iter()
            .any(|p| p.has_custom_primitives(query, doc))
    }

    /// Run the provider chain and return the entity's primitives
    ///
    /// Seeds from `initial` if supplied, otherwise from the entity's
    /// standard render geometry (or an empty collection for a synthetic
    /// id). Each provider sees the previous stage's collection; `Ok(None)`
    /// keeps it unchanged. `CANCELED` and `INCOMPLETE` bits set by providers
    /// through the shared flag word are surfaced on the returned
    /// collection's flags, never thrown as errors.
    pub fn render_meshes(
        &self,
        query: &RenderQuery<'_>,
        doc: &Document,
        initial: Option<PrimitiveCollection>,
    ) -> Result<PrimitiveCollection> {
        let flags = query.flags.snapshot();
        let caching = !flags.contains(QueryFlags::DISABLE_CACHING) && initial.is_none();
        let variant = flags.cache_variant();
        let tracker = self.trackers.tracker(doc);

        if caching
            && let Some(cached) = Self::cache_lookup(&tracker, query.object_id, variant, doc)
        {
            tracing::trace!(object = %query.object_id, "primitive cache hit");
            return Ok(cached);
        }

        let mut current = match initial {
            Some(seed) => seed,
            None => self.seed_collection(query, doc, flags),
        };

        for provider in self.registry.iter() {
            if query.flags.is_canceled() {
                break;
            }

            let prior_hash = current.hash();
            match provider.render_meshes(query, doc, &current)? {
                None => {}
                Some(next) => {
                    if next.object_id() != query.object_id {
                        return Err(meshforge_core::Error::ObjectIdMismatch {
                            expected: query.object_id,
                            actual: next.object_id(),
                        }
                        .into());
                    }
                    if !current.is_empty() {
                        tracing::debug!(
                            object = %query.object_id,
                            provider = provider.name(),
                            "provider replaced a non-empty collection"
                        );
                    }
                    if let Some(stage) = provider.modification_hash(query, doc) {
                        let expected = hash::combine(prior_hash, stage);
                        if next.hash() != expected {
                            tracing::warn!(
                                provider = provider.name(),
                                "returned hash does not fold the stage modification hash"
                            );
                        }
                    }
                    current = next;
                    current.set_provider(provider.provider_id());
                }
            }
        }

        // Surface OR-accumulated status bits on the result
        let status = query.flags.snapshot();
        if status.contains(QueryFlags::CANCELED) {
            current.flags_mut().insert(QueryFlags::CANCELED);
        }
        if status.contains(QueryFlags::INCOMPLETE) {
            current.flags_mut().insert(QueryFlags::INCOMPLETE);
        }

        let degraded = current.flags().contains(QueryFlags::CANCELED)
            || current.flags().contains(QueryFlags::INCOMPLETE);
        if caching && !degraded {
            tracker.add_primitives(variant, doc.revision(), current.make_copy());
        }

        Ok(current)
    }

    /// The hash `render_meshes` would produce, without building geometry
    ///
    /// Replays the chain in hash-only mode over each provider's modification
    /// hash.
    pub fn render_meshes_hash(&self, query: &RenderQuery<'_>, doc: &Document) -> Result<u32> {
        let flags = query.flags.snapshot();
        let variant = flags.cache_variant();
        let tracker = self.trackers.tracker(doc);

        if !flags.contains(QueryFlags::DISABLE_CACHING)
            && let Some((cached_hash, revision)) = tracker.entry_state(query.object_id, variant)
            && revision == doc.revision()
        {
            return Ok(cached_hash);
        }

        let mut h = hash::seed_for_object(query.object_id);
        for provider in self.registry.iter() {
            if let Some(stage) = provider.modification_hash(query, doc) {
                h = hash::combine(h, stage);
            }
        }
        Ok(h)
    }

    /// World-space bounding box of a full build
    ///
    /// Derived from `render_meshes`; callers wanting both should keep the
    /// built collection instead of calling this separately.
    pub fn bounding_box(&self, query: &RenderQuery<'_>, doc: &Document) -> Result<Aabb> {
        Ok(self.render_meshes(query, doc, None)?.bounding_box())
    }

    /// Look up a registered provider
    pub fn provider(&self, id: ProviderId) -> Option<&Arc<dyn MeshProvider>> {
        self.registry.provider(id)
    }

    /// Union of all providers' synthetic entity ids
    pub fn non_object_ids(&self) -> std::collections::BTreeSet<ObjectId> {
        self.registry.non_object_ids()
    }

    /// Progress reports from every provider with pending work
    pub fn progress(&self, doc: &Document, objects: Option<&[ObjectId]>) -> Vec<ProgressReport> {
        self.registry
            .iter()
            .flat_map(|p| p.progress(doc, objects))
            .collect()
    }

    /// Discard a closed document's cached collections
    pub fn close_document(&self, id: DocumentId) -> bool {
        self.trackers.close_document(id)
    }

    /// The tracker backing a document's cache, for providers that maintain
    /// their own incremental records
    pub fn tracker(&self, doc: &Document) -> Arc<ProviderTracker> {
        self.trackers.tracker(doc)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn cache_lookup(
        tracker: &ProviderTracker,
        object_id: ObjectId,
        variant: u32,
        doc: &Document,
    ) -> Option<PrimitiveCollection> {
        let (_, revision) = tracker.entry_state(object_id, variant)?;
        if revision != doc.revision() {
            return None;
        }
        tracker.primitives(object_id, variant)
    }

    /// The starting collection before any provider runs
    fn seed_collection(
        &self,
        query: &RenderQuery<'_>,
        doc: &Document,
        flags: QueryFlags,
    ) -> PrimitiveCollection {
        let mut coll = PrimitiveCollection::seeded(doc.id(), query.object_id, flags);

        // The IS_NON_DOCUMENT_OBJECT hint skips the document lookup entirely
        if flags.contains(QueryFlags::IS_NON_DOCUMENT_OBJECT) {
            return coll;
        }

        let Some(geometry) = doc.render_geometry(query.object_id) else {
            return coll;
        };

        let geometry = if flags.contains(QueryFlags::ALWAYS_COPY_DOCUMENT_CONTENT) {
            Self::detached_copy(geometry)
        } else {
            geometry.clone()
        };

        let mut instance = RenderInstance::new(query.object_id, geometry);
        if !flags.contains(QueryFlags::RETURN_NULL_FOR_STANDARD_MATERIAL) {
            instance = instance.with_material(doc.standard_material().clone());
        }
        coll.add_instance(instance);
        coll
    }

    /// Deep copy of a document-owned geometry unit
    ///
    /// The defensive-copy flag promises the result stays self-consistent
    /// even while the document mutates, so the mesh and channel payloads get
    /// fresh allocations rather than shared Arcs.
    fn detached_copy(geometry: &GeometryUnit) -> GeometryUnit {
        let mesh: Mesh = geometry.mesh().as_ref().clone();
        let channels: MappingChannels = geometry.channels().as_ref().clone();
        GeometryUnit::new(Arc::new(mesh))
            .with_cache_key(geometry.cache_key())
            .with_channels(Arc::new(channels))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::{MeshKind, RenderQuery};
    use meshforge_core::flags::SharedFlags;
    use meshforge_core::mesh::unit_quad;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Appends one quad instance and folds a fixed stage hash, counting
    /// every invocation
    struct CountingProvider {
        id: ProviderId,
        stage_hash: u32,
        invocations: AtomicUsize,
        claimed: Vec<ObjectId>,
        mark_incomplete: bool,
    }

    impl CountingProvider {
        fn new(stage_hash: u32) -> Self {
            Self {
                id: ProviderId::new(),
                stage_hash,
                invocations: AtomicUsize::new(0),
                claimed: Vec::new(),
                mark_incomplete: false,
            }
        }

        fn claiming(mut self, objects: Vec<ObjectId>) -> Self {
            self.claimed = objects;
            self
        }

        fn incomplete(mut self) -> Self {
            self.mark_incomplete = true;
            self
        }

        fn count(&self) -> usize {
            self.invocations.load(Ordering::SeqCst)
        }
    }

    impl MeshProvider for CountingProvider {
        fn provider_id(&self) -> ProviderId {
            self.id
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn has_custom_primitives(&self, query: &RenderQuery<'_>, _doc: &Document) -> bool {
            self.claimed.is_empty() || self.claimed.contains(&query.object_id)
        }

        fn render_meshes(
            &self,
            query: &RenderQuery<'_>,
            _doc: &Document,
            previous: &PrimitiveCollection,
        ) -> meshforge_core::Result<Option<PrimitiveCollection>> {
            if !self.claimed.is_empty() && !self.claimed.contains(&query.object_id) {
                return Ok(None);
            }
            self.invocations.fetch_add(1, Ordering::SeqCst);

            let mut next = previous.make_copy();
            next.add_instance(RenderInstance::new(
                query.object_id,
                GeometryUnit::new(Arc::new(unit_quad())),
            ));
            next.combine_hash(self.stage_hash);
            if self.mark_incomplete {
                query.flags.set(QueryFlags::INCOMPLETE);
            }
            Ok(Some(next))
        }

        fn modification_hash(
            &self,
            query: &RenderQuery<'_>,
            _doc: &Document,
        ) -> Option<u32> {
            (self.claimed.is_empty() || self.claimed.contains(&query.object_id))
                .then_some(self.stage_hash)
        }
    }

    /// Always passes through
    struct NoopProvider {
        id: ProviderId,
    }

    impl MeshProvider for NoopProvider {
        fn provider_id(&self) -> ProviderId {
            self.id
        }

        fn name(&self) -> &str {
            "noop"
        }

        fn has_custom_primitives(&self, _query: &RenderQuery<'_>, _doc: &Document) -> bool {
            false
        }

        fn render_meshes(
            &self,
            _query: &RenderQuery<'_>,
            _doc: &Document,
            _previous: &PrimitiveCollection,
        ) -> meshforge_core::Result<Option<PrimitiveCollection>> {
            Ok(None)
        }

        fn modification_hash(&self, _query: &RenderQuery<'_>, _doc: &Document) -> Option<u32> {
            None
        }
    }

    /// Returns a collection tagged with the wrong entity
    struct MisbehavingProvider {
        id: ProviderId,
    }

    impl MeshProvider for MisbehavingProvider {
        fn provider_id(&self) -> ProviderId {
            self.id
        }

        fn name(&self) -> &str {
            "misbehaving"
        }

        fn has_custom_primitives(&self, _query: &RenderQuery<'_>, _doc: &Document) -> bool {
            true
        }

        fn render_meshes(
            &self,
            _query: &RenderQuery<'_>,
            doc: &Document,
            _previous: &PrimitiveCollection,
        ) -> meshforge_core::Result<Option<PrimitiveCollection>> {
            Ok(Some(PrimitiveCollection::seeded(
                doc.id(),
                ObjectId::new(),
                QueryFlags::empty(),
            )))
        }

        fn modification_hash(&self, _query: &RenderQuery<'_>, _doc: &Document) -> Option<u32> {
            Some(1)
        }
    }

    fn document_with_quad() -> (Document, ObjectId) {
        let mut doc = Document::new();
        let object_id = ObjectId::new();
        doc.set_geometry(object_id, GeometryUnit::new(Arc::new(unit_quad())));
        (doc, object_id)
    }

    fn query(object_id: ObjectId, flags: QueryFlags) -> RenderQuery<'static> {
        RenderQuery::new(object_id, SharedFlags::new(flags))
    }

    #[test]
    fn test_no_provider_returns_seed_unchanged() {
        let (doc, object_id) = document_with_quad();
        let registry = ProviderRegistry::new();
        let pipeline = MeshPipeline::new(&registry);

        let coll = pipeline
            .render_meshes(&query(object_id, QueryFlags::empty()), &doc, None)
            .unwrap();
        assert_eq!(coll.len(), 1);
        assert_eq!(coll.hash(), hash::seed_for_object(object_id));
        assert!(coll.iter().next().unwrap().material().unwrap().is_standard());
    }

    #[test]
    fn test_pass_through_identity() {
        let (doc, object_id) = document_with_quad();
        let counting = Arc::new(CountingProvider::new(0xCAFE));

        let mut with_noop = ProviderRegistry::new();
        with_noop
            .register(Arc::new(NoopProvider { id: ProviderId::new() }))
            .unwrap();
        with_noop.register(counting.clone()).unwrap();
        with_noop
            .register(Arc::new(NoopProvider { id: ProviderId::new() }))
            .unwrap();

        let mut without_noop = ProviderRegistry::new();
        without_noop.register(counting.clone()).unwrap();

        let q = query(object_id, QueryFlags::DISABLE_CACHING);
        let a = MeshPipeline::new(&with_noop)
            .render_meshes(&q, &doc, None)
            .unwrap();
        let b = MeshPipeline::new(&without_noop)
            .render_meshes(&q, &doc, None)
            .unwrap();

        assert_eq!(a.len(), b.len());
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_hash_matches_full_build() {
        let (doc, object_id) = document_with_quad();
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(CountingProvider::new(0xA))).unwrap();
        registry.register(Arc::new(CountingProvider::new(0xB))).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        let q = query(object_id, QueryFlags::empty());
        let built = pipeline.render_meshes(&q, &doc, None).unwrap();
        let probed = pipeline.render_meshes_hash(&q, &doc).unwrap();
        assert_eq!(built.hash(), probed);
    }

    #[test]
    fn test_idempotence() {
        let (doc, object_id) = document_with_quad();
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(CountingProvider::new(0xA))).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        let q = query(object_id, QueryFlags::empty());
        let first = pipeline.render_meshes(&q, &doc, None).unwrap();
        let second = pipeline.render_meshes(&q, &doc, None).unwrap();
        assert_eq!(first.hash(), second.hash());
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_flag_isolation() {
        let (doc, object_id) = document_with_quad();
        let counting = Arc::new(CountingProvider::new(0xA));
        let mut registry = ProviderRegistry::new();
        registry.register(counting.clone()).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        // Caching enabled: repeat calls hit the cache after one build
        let cached_q = query(object_id, QueryFlags::empty());
        let cached_a = pipeline.render_meshes(&cached_q, &doc, None).unwrap();
        let cached_b = pipeline.render_meshes(&cached_q, &doc, None).unwrap();
        assert_eq!(counting.count(), 1);

        // Caching disabled: every call rebuilds
        let uncached_q = query(object_id, QueryFlags::DISABLE_CACHING);
        let uncached_a = pipeline.render_meshes(&uncached_q, &doc, None).unwrap();
        let uncached_b = pipeline.render_meshes(&uncached_q, &doc, None).unwrap();
        assert_eq!(counting.count(), 3);

        // Output identical either way
        for coll in [&cached_b, &uncached_a, &uncached_b] {
            assert_eq!(coll.hash(), cached_a.hash());
            assert_eq!(coll.len(), cached_a.len());
        }
    }

    #[test]
    fn test_document_mutation_invalidates_cache() {
        let (mut doc, object_id) = document_with_quad();
        let counting = Arc::new(CountingProvider::new(0xA));
        let mut registry = ProviderRegistry::new();
        registry.register(counting.clone()).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        let q = query(object_id, QueryFlags::empty());
        pipeline.render_meshes(&q, &doc, None).unwrap();
        pipeline.render_meshes(&q, &doc, None).unwrap();
        assert_eq!(counting.count(), 1);

        doc.touch();
        pipeline.render_meshes(&q, &doc, None).unwrap();
        assert_eq!(counting.count(), 2);
    }

    #[test]
    fn test_initial_primitives_seed_the_chain() {
        let (doc, object_id) = document_with_quad();
        let registry = ProviderRegistry::new();
        let pipeline = MeshPipeline::new(&registry);

        let mut seed = PrimitiveCollection::seeded(doc.id(), object_id, QueryFlags::empty());
        for _ in 0..3 {
            seed.add_instance(RenderInstance::new(
                object_id,
                GeometryUnit::new(Arc::new(unit_quad())),
            ));
        }
        let seed_hash = seed.hash();

        let coll = pipeline
            .render_meshes(&query(object_id, QueryFlags::empty()), &doc, Some(seed))
            .unwrap();
        assert_eq!(coll.len(), 3);
        assert_eq!(coll.hash(), seed_hash);
    }

    #[test]
    fn test_synthetic_id_seeds_empty() {
        let (doc, _) = document_with_quad();
        let synthetic = ObjectId::new();
        let counting = Arc::new(CountingProvider::new(0xF).claiming(vec![synthetic]));
        let mut registry = ProviderRegistry::new();
        registry.register(counting.clone()).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        let coll = pipeline
            .render_meshes(
                &query(synthetic, QueryFlags::IS_NON_DOCUMENT_OBJECT),
                &doc,
                None,
            )
            .unwrap();
        // Only the provider's instance, no document seed
        assert_eq!(coll.len(), 1);
        assert_eq!(counting.count(), 1);
    }

    #[test]
    fn test_return_null_for_standard_material() {
        let (doc, object_id) = document_with_quad();
        let registry = ProviderRegistry::new();
        let pipeline = MeshPipeline::new(&registry);

        let coll = pipeline
            .render_meshes(
                &query(object_id, QueryFlags::RETURN_NULL_FOR_STANDARD_MATERIAL),
                &doc,
                None,
            )
            .unwrap();
        assert!(coll.iter().next().unwrap().material().is_none());
    }

    #[test]
    fn test_always_copy_document_content_detaches_geometry() {
        let (doc, object_id) = document_with_quad();
        let registry = ProviderRegistry::new();
        let pipeline = MeshPipeline::new(&registry);

        let coll = pipeline
            .render_meshes(
                &query(object_id, QueryFlags::ALWAYS_COPY_DOCUMENT_CONTENT),
                &doc,
                None,
            )
            .unwrap();
        let doc_mesh = doc.render_geometry(object_id).unwrap().mesh();
        let coll_mesh = coll.iter().next().unwrap().geometry().mesh();
        assert!(!Arc::ptr_eq(doc_mesh, coll_mesh));
        assert_eq!(doc_mesh.content_hash(), coll_mesh.content_hash());
    }

    #[test]
    fn test_incomplete_results_surface_and_skip_cache() {
        let (doc, object_id) = document_with_quad();
        let counting = Arc::new(CountingProvider::new(0xA).incomplete());
        let mut registry = ProviderRegistry::new();
        registry.register(counting.clone()).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        let q = query(object_id, QueryFlags::empty());
        let coll = pipeline.render_meshes(&q, &doc, None).unwrap();
        assert!(coll.flags().contains(QueryFlags::INCOMPLETE));

        // Partial results are never cached; the caller polls by re-issuing
        let q2 = query(object_id, QueryFlags::empty());
        pipeline.render_meshes(&q2, &doc, None).unwrap();
        assert_eq!(counting.count(), 2);
    }

    #[test]
    fn test_canceled_chain_stops_and_surfaces() {
        let (doc, object_id) = document_with_quad();
        let counting = Arc::new(CountingProvider::new(0xA));
        let mut registry = ProviderRegistry::new();
        registry.register(counting.clone()).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        let q = query(object_id, QueryFlags::CANCELED);
        let coll = pipeline.render_meshes(&q, &doc, None).unwrap();
        assert!(coll.flags().contains(QueryFlags::CANCELED));
        assert_eq!(counting.count(), 0);
    }

    #[test]
    fn test_wrong_object_id_is_an_error() {
        let (doc, object_id) = document_with_quad();
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(MisbehavingProvider { id: ProviderId::new() }))
            .unwrap();
        let pipeline = MeshPipeline::new(&registry);

        let result = pipeline.render_meshes(&query(object_id, QueryFlags::empty()), &doc, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_has_custom_primitives_any_provider() {
        let (doc, object_id) = document_with_quad();
        let claimed = ObjectId::new();
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(NoopProvider { id: ProviderId::new() }))
            .unwrap();
        registry
            .register(Arc::new(CountingProvider::new(1).claiming(vec![claimed])))
            .unwrap();
        let pipeline = MeshPipeline::new(&registry);

        assert!(pipeline.has_custom_primitives(&query(claimed, QueryFlags::empty()), &doc));
        assert!(!pipeline.has_custom_primitives(&query(object_id, QueryFlags::empty()), &doc));
    }

    #[test]
    fn test_bounding_box_from_full_build() {
        let (doc, object_id) = document_with_quad();
        let registry = ProviderRegistry::new();
        let pipeline = MeshPipeline::new(&registry);

        let bbox = pipeline
            .bounding_box(&query(object_id, QueryFlags::empty()), &doc)
            .unwrap();
        assert!(!bbox.is_empty());
    }

    #[test]
    fn test_close_document_drops_cache() {
        let (doc, object_id) = document_with_quad();
        let counting = Arc::new(CountingProvider::new(0xA));
        let mut registry = ProviderRegistry::new();
        registry.register(counting.clone()).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        let q = query(object_id, QueryFlags::empty());
        pipeline.render_meshes(&q, &doc, None).unwrap();
        assert!(pipeline.close_document(doc.id()));
        pipeline.render_meshes(&q, &doc, None).unwrap();
        assert_eq!(counting.count(), 2);
    }

    #[test]
    fn test_preview_and_render_kinds_share_nothing() {
        let (doc, object_id) = document_with_quad();
        let counting = Arc::new(CountingProvider::new(0xA));
        let mut registry = ProviderRegistry::new();
        registry.register(counting.clone()).unwrap();
        let pipeline = MeshPipeline::new(&registry);

        // Different flag variants cache independently
        let full = query(object_id, QueryFlags::IS_DOCUMENT_OBJECT);
        let recursive = query(
            object_id,
            QueryFlags::IS_DOCUMENT_OBJECT | QueryFlags::RECURSIVE,
        );
        pipeline.render_meshes(&full, &doc, None).unwrap();
        pipeline.render_meshes(&recursive, &doc, None).unwrap();
        pipeline.render_meshes(&full, &doc, None).unwrap();
        pipeline.render_meshes(&recursive, &doc, None).unwrap();
        assert_eq!(counting.count(), 2);
        // MeshKind is part of the query surface, defaulting to Render
        assert_eq!(full.kind, MeshKind::Render);
    }
}
