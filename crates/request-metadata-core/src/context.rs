//! Continuation-local scope storage.
//!
//! All stores share one task-local slot holding an immutable [`Bindings`]
//! map keyed by store id. Entering a scope copies the caller's bindings,
//! adds the store's own entry and runs the body with the new map installed.
//! Tokio restores the previous map when the body finishes, so nested scopes
//! unwind on their own and each store only ever sees its own entry.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tokio::task::futures::TaskLocalFuture;

tokio::task_local! {
    static BINDINGS: Bindings;
}

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

type Slot = Arc<dyn Any + Send + Sync>;

/// Snapshot of every store's binding visible to the running task.
#[derive(Clone, Default)]
pub struct Bindings {
    slots: Arc<HashMap<u64, Slot>>,
}

impl Bindings {
    /// Bindings of the calling task, or an empty set outside any scope.
    pub fn current() -> Self {
        BINDINGS.try_with(Clone::clone).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn bind(&self, store: u64, value: Slot) -> Self {
        let mut slots = (*self.slots).clone();
        slots.insert(store, value);
        Self {
            slots: Arc::new(slots),
        }
    }

    fn get(&self, store: u64) -> Option<&Slot> {
        self.slots.get(&store)
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stores: Vec<_> = self.slots.keys().collect();
        stores.sort();
        f.debug_struct("Bindings").field("stores", &stores).finish()
    }
}

/// A future running with a fixed set of [`Bindings`] installed.
pub type ScopedFuture<F> = TaskLocalFuture<Bindings, F>;

/// Holds at most one value of type `M` per logical call chain.
///
/// Cloning yields a handle to the same store. Separately constructed stores
/// never observe each other's values.
pub struct ContextStore<M> {
    id: u64,
    _marker: PhantomData<fn() -> M>,
}

impl<M> ContextStore<M>
where
    M: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let id = NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(store = id, "Created context store");
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Run `body` synchronously with `value` bound.
    ///
    /// If `body` returns a future, only the code that builds it runs inside
    /// the scope. Use [`ContextStore::scope`] or [`ContextStore::scope_with`]
    /// for asynchronous bodies.
    pub fn run_with_scope<R>(&self, value: M, body: impl FnOnce() -> R) -> R {
        BINDINGS.sync_scope(self.enter(value), body)
    }

    /// Bind `value` for the whole asynchronous extent of `fut`.
    ///
    /// # Example
    /// ```rust
    /// use request_metadata_core::ContextStore;
    ///
    /// # tokio_test::block_on(async {
    /// let store = ContextStore::new();
    /// let seen = store
    ///     .scope("req-1".to_string(), async {
    ///         tokio::task::yield_now().await;
    ///         store.current()
    ///     })
    ///     .await;
    /// assert_eq!(seen.as_deref(), Some("req-1"));
    /// assert_eq!(store.current(), None);
    /// # });
    /// ```
    pub fn scope<F: Future>(&self, value: M, fut: F) -> ScopedFuture<F> {
        BINDINGS.scope(self.enter(value), fut)
    }

    /// Like [`ContextStore::scope`], but `make` also runs inside the scope,
    /// covering work a target does before handing back its future.
    pub fn scope_with<F: Future>(&self, value: M, make: impl FnOnce() -> F) -> ScopedFuture<F> {
        let bindings = self.enter(value);
        let fut = BINDINGS.sync_scope(bindings.clone(), make);
        BINDINGS.scope(bindings, fut)
    }

    /// Value bound by the innermost enclosing scope of this store, if any.
    pub fn current(&self) -> Option<M> {
        BINDINGS
            .try_with(|bindings| {
                bindings
                    .get(self.id)
                    .and_then(|slot| slot.downcast_ref::<M>())
                    .cloned()
            })
            .ok()
            .flatten()
    }

    pub fn is_active(&self) -> bool {
        BINDINGS
            .try_with(|bindings| bindings.get(self.id).is_some())
            .unwrap_or(false)
    }

    fn enter(&self, value: M) -> Bindings {
        tracing::trace!(store = self.id, "Entering scope");
        Bindings::current().bind(self.id, Arc::new(value))
    }
}

impl<M> ContextStore<M> {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<M> Clone for ContextStore<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            _marker: PhantomData,
        }
    }
}

impl<M> Default for ContextStore<M>
where
    M: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for ContextStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextStore").field("id", &self.id).finish()
    }
}

/// Carry the caller's bindings into `fut`, wherever it ends up running.
///
/// Tasks handed to an executor do not inherit task-locals; wrap them with
/// this before `spawn_local` or any other executor entry point.
pub fn propagate<F: Future>(fut: F) -> ScopedFuture<F> {
    let bindings = Bindings::current();
    tracing::trace!(stores = bindings.len(), "Propagating bindings");
    BINDINGS.scope(bindings, fut)
}

/// `tokio::spawn` that keeps the caller's scopes visible inside the task.
pub fn spawn<F>(fut: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(propagate(fut))
}

/// `tokio::task::spawn_blocking` that keeps the caller's scopes visible.
pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let bindings = Bindings::current();
    tokio::task::spawn_blocking(move || BINDINGS.sync_scope(bindings, f))
}
