//! Span helpers for request-scoped work.
//!
//! Span names use the `request_metadata.` prefix. Every span records the
//! request id bound to the caller's scope, or `"none"` outside one, so log
//! lines emitted anywhere in a handler's call graph carry the id.

pub use request_metadata_core::REQUEST_ID_HEADER;
use request_metadata_core::{Metadata, MetadataAccessor};
use tracing::Span;

/// Request id bound to the caller's scope, if any.
pub fn current_request_id(accessor: &MetadataAccessor<Metadata>) -> Option<String> {
    accessor
        .current()
        .and_then(|metadata| metadata.get_str(REQUEST_ID_HEADER).map(str::to_string))
}

fn request_id_field(accessor: &MetadataAccessor<Metadata>) -> String {
    current_request_id(accessor).unwrap_or_else(|| "none".to_string())
}

/// Create span for one incoming request.
///
/// Children: handler
#[inline]
pub fn request(accessor: &MetadataAccessor<Metadata>, route: &str) -> Span {
    tracing::info_span!(
        "request_metadata.request",
        route = route,
        request_id = request_id_field(accessor),
    )
}

/// Create span for a helper invoked while handling a request.
///
/// Parent: request
#[inline]
pub fn handler(accessor: &MetadataAccessor<Metadata>, name: &str) -> Span {
    tracing::debug_span!(
        "request_metadata.handler",
        handler = name,
        request_id = request_id_field(accessor),
    )
}
