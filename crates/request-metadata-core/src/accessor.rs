use crate::context::ContextStore;

/// Read-only view of the value bound to the caller's scope.
///
/// Cheap to clone; hand one to any code that needs request metadata.
pub struct MetadataAccessor<M> {
    store: ContextStore<M>,
}

impl<M> MetadataAccessor<M>
where
    M: Clone + Send + Sync + 'static,
{
    pub fn new(store: ContextStore<M>) -> Self {
        Self { store }
    }

    /// Value for the calling chain, or `None` outside any scope.
    pub fn current(&self) -> Option<M> {
        self.store.current()
    }

    pub fn is_active(&self) -> bool {
        self.store.is_active()
    }

    pub fn store(&self) -> &ContextStore<M> {
        &self.store
    }
}

impl<M> MetadataAccessor<M>
where
    M: Clone + Default + Send + Sync + 'static,
{
    /// Value for the calling chain, falling back to `M::default()`.
    pub fn current_or_default(&self) -> M {
        self.current().unwrap_or_default()
    }
}

impl<M> Clone for MetadataAccessor<M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<M> std::fmt::Debug for MetadataAccessor<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataAccessor")
            .field("store", &self.store.id())
            .finish()
    }
}
