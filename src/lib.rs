//! Request-scoped metadata for handler functions.
//!
//! Wrap a handler with [`setup`] and every invocation gets its own
//! correlation id, readable anywhere below the handler through the
//! wrapper's [`MetadataAccessor`], including after `.await` points.

pub mod args;
pub mod config;
pub mod handlers;
pub mod presets;

pub use args::{ArgShape, HandlerArgs, RequestContext, RequestLike, ResponseHeaders, ResponseLike};
pub use config::RequestMetadataConfig;
pub use handlers::{setup, setup_default};
pub use presets::{REQUEST_ID_HEADER, RequestIdPreset, prepare_request_id_metadata};

pub use request_metadata_core::{
    ContextError, ContextStore, Metadata, MetadataAccessor, MetadataValue, RequestId, Result,
    ScopeWrapper, Wrapped, propagate, spawn, spawn_blocking,
};
pub use request_metadata_observability::{spans, tracing_setup};
