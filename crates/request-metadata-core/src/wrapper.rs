//! Wrapping target functions so every call runs in its own scope.

use crate::accessor::MetadataAccessor;
use crate::context::{ContextStore, ScopedFuture, propagate};
use crate::error::Result;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Computes the value to bind from a call's arguments.
pub enum Preparer<A, M> {
    Infallible(Arc<dyn Fn(&A) -> M + Send + Sync>),
    Fallible(Arc<dyn Fn(&A) -> Result<M> + Send + Sync>),
}

impl<A, M> Preparer<A, M> {
    pub fn infallible<P>(prepare: P) -> Self
    where
        P: Fn(&A) -> M + Send + Sync + 'static,
    {
        Self::Infallible(Arc::new(prepare))
    }

    pub fn fallible<P>(prepare: P) -> Self
    where
        P: Fn(&A) -> Result<M> + Send + Sync + 'static,
    {
        Self::Fallible(Arc::new(prepare))
    }

    pub fn prepare(&self, args: &A) -> Result<M> {
        match self {
            Self::Infallible(prepare) => Ok(prepare(args)),
            Self::Fallible(prepare) => prepare(args),
        }
    }
}

impl<A, M> Clone for Preparer<A, M> {
    fn clone(&self) -> Self {
        match self {
            Self::Infallible(prepare) => Self::Infallible(Arc::clone(prepare)),
            Self::Fallible(prepare) => Self::Fallible(Arc::clone(prepare)),
        }
    }
}

/// Binds a store and a default preparer; produces [`Wrapped`] functions.
///
/// # Example
/// ```rust
/// use request_metadata_core::{ContextStore, ScopeWrapper};
///
/// let wrapper = ScopeWrapper::new(ContextStore::new(), |user: &u32| format!("user-{user}"));
/// let accessor = wrapper.accessor();
/// let greet = wrapper.wrap(move |_user: u32| accessor.current());
///
/// assert_eq!(greet.call(7).unwrap().as_deref(), Some("user-7"));
/// ```
pub struct ScopeWrapper<A, M> {
    store: ContextStore<M>,
    prepare: Preparer<A, M>,
    enabled: bool,
}

impl<A, M> ScopeWrapper<A, M>
where
    M: Clone + Send + Sync + 'static,
{
    pub fn new<P>(store: ContextStore<M>, prepare: P) -> Self
    where
        P: Fn(&A) -> M + Send + Sync + 'static,
    {
        Self::from_preparer(store, Preparer::infallible(prepare))
    }

    /// Like [`ScopeWrapper::new`] with a preparer that may fail.
    pub fn try_new<P>(store: ContextStore<M>, prepare: P) -> Self
    where
        P: Fn(&A) -> Result<M> + Send + Sync + 'static,
    {
        Self::from_preparer(store, Preparer::fallible(prepare))
    }

    pub fn from_preparer(store: ContextStore<M>, prepare: Preparer<A, M>) -> Self {
        Self {
            store,
            prepare,
            enabled: true,
        }
    }

    /// Disabled wrappers call targets directly: nothing is prepared or bound.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn store(&self) -> &ContextStore<M> {
        &self.store
    }

    pub fn accessor(&self) -> MetadataAccessor<M> {
        MetadataAccessor::new(self.store.clone())
    }

    /// Wrap `target` using the default preparer.
    pub fn wrap<F>(&self, target: F) -> Wrapped<F, A, M> {
        self.wrapped(target, self.prepare.clone())
    }

    /// Wrap `target`, overriding the default preparer for this target only.
    pub fn wrap_with<F, P>(&self, target: F, prepare: P) -> Wrapped<F, A, M>
    where
        P: Fn(&A) -> M + Send + Sync + 'static,
    {
        self.wrapped(target, Preparer::infallible(prepare))
    }

    pub fn try_wrap_with<F, P>(&self, target: F, prepare: P) -> Wrapped<F, A, M>
    where
        P: Fn(&A) -> Result<M> + Send + Sync + 'static,
    {
        self.wrapped(target, Preparer::fallible(prepare))
    }

    fn wrapped<F>(&self, target: F, prepare: Preparer<A, M>) -> Wrapped<F, A, M> {
        Wrapped {
            target,
            prepare,
            store: self.store.clone(),
            enabled: self.enabled,
        }
    }
}

impl<A, M> Clone for ScopeWrapper<A, M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            prepare: self.prepare.clone(),
            enabled: self.enabled,
        }
    }
}

impl<A, M> fmt::Debug for ScopeWrapper<A, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeWrapper")
            .field("store", &self.store.id())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// A target function that opens a fresh scope on every call.
///
/// A preparation failure is returned before the target runs and before any
/// scope is opened.
pub struct Wrapped<F, A, M> {
    target: F,
    prepare: Preparer<A, M>,
    store: ContextStore<M>,
    enabled: bool,
}

impl<F, A, M> Wrapped<F, A, M>
where
    M: Clone + Send + Sync + 'static,
{
    /// Invoke a synchronous target.
    ///
    /// The scope closes when the target returns. A future returned from here
    /// is polled outside the scope and reads no value; use
    /// [`Wrapped::call_async`] for asynchronous targets.
    pub fn call<R>(&self, args: A) -> Result<R>
    where
        F: Fn(A) -> R,
    {
        if !self.enabled {
            return Ok((self.target)(args));
        }
        let value = self.prepare_for(&args)?;
        Ok(self.store.run_with_scope(value, || (self.target)(args)))
    }

    /// Invoke an asynchronous target.
    ///
    /// Preparation happens eagerly, so failures surface here rather than
    /// when the returned future is polled.
    pub fn call_async<Fut>(&self, args: A) -> Result<ScopedFuture<Fut>>
    where
        F: Fn(A) -> Fut,
        Fut: Future,
    {
        if !self.enabled {
            return Ok(propagate((self.target)(args)));
        }
        let value = self.prepare_for(&args)?;
        Ok(self.store.scope_with(value, || (self.target)(args)))
    }

    pub fn target(&self) -> &F {
        &self.target
    }

    fn prepare_for(&self, args: &A) -> Result<M> {
        self.prepare.prepare(args).inspect_err(|err| {
            tracing::debug!(
                store = self.store.id(),
                error = %err,
                "Metadata preparation failed, target not invoked"
            );
        })
    }
}

impl<F: Clone, A, M> Clone for Wrapped<F, A, M> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            prepare: self.prepare.clone(),
            store: self.store.clone(),
            enabled: self.enabled,
        }
    }
}
