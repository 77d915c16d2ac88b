//! Request-scoped metadata propagation.
//!
//! A [`ContextStore`] binds one value to a logical call chain. The binding
//! follows the chain across `.await` points, so code deep in the call graph
//! can read it through a [`MetadataAccessor`] without threading it through
//! every signature. A [`ScopeWrapper`] opens one scope per invocation of a
//! wrapped function, computing the bound value from the call arguments.

pub mod accessor;
pub mod context;
pub mod error;
pub mod ids;
pub mod metadata;
pub mod wrapper;

pub use accessor::MetadataAccessor;
pub use context::{Bindings, ContextStore, ScopedFuture, propagate, spawn, spawn_blocking};
pub use error::{ContextError, Result};
pub use ids::{REQUEST_ID_HEADER, RequestId};
pub use metadata::{Metadata, MetadataValue};
pub use wrapper::{Preparer, ScopeWrapper, Wrapped};
