//! Correlation-id preset.
//!
//! Reads `x-request-id` from the incoming request, generating a UUID when
//! the header is missing, echoes it on the response and binds it as
//! `{ "x-request-id": <id> }`.

use crate::args::{HandlerArgs, RequestLike};
use crate::config::RequestMetadataConfig;
pub use request_metadata_core::REQUEST_ID_HEADER;
use request_metadata_core::{ContextError, Metadata, RequestId, Result};

/// Prepare correlation-id metadata, falling back to empty metadata when the
/// arguments follow neither calling convention.
///
/// Side effect: calls `set_header("x-request-id", id)` on the response.
pub fn prepare_request_id_metadata<A: HandlerArgs + ?Sized>(args: &A) -> Metadata {
    RequestIdPreset::new()
        .prepare_matched(args)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct RequestIdPreset {
    strict_shapes: bool,
}

impl RequestIdPreset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RequestMetadataConfig) -> Self {
        Self::new().with_strict_shapes(config.strict_shapes)
    }

    /// Reject unrecognized arguments instead of returning empty metadata.
    pub fn with_strict_shapes(mut self, strict: bool) -> Self {
        self.strict_shapes = strict;
        self
    }

    pub fn prepare<A: HandlerArgs + ?Sized>(&self, args: &A) -> Result<Metadata> {
        match self.prepare_matched(args) {
            Some(metadata) => Ok(metadata),
            None if self.strict_shapes => Err(ContextError::ShapeMismatch(format!(
                "expected a request context or a (request, response) pair, got `{}`",
                std::any::type_name::<A>()
            ))),
            None => {
                tracing::debug!(
                    args = std::any::type_name::<A>(),
                    "Arguments match no calling convention, binding empty metadata"
                );
                Ok(Metadata::new())
            }
        }
    }

    fn prepare_matched<A: HandlerArgs + ?Sized>(&self, args: &A) -> Option<Metadata> {
        let shape = args.shape();
        let (request, response) = shape.parts()?;
        let request_id = request_id_from(request, shape.convention());

        response.set_header(REQUEST_ID_HEADER, request_id.as_str());

        Some(Metadata::new().with(REQUEST_ID_HEADER, request_id.into_string()))
    }
}

fn request_id_from(request: &dyn RequestLike, convention: &str) -> RequestId {
    match request.header(REQUEST_ID_HEADER) {
        Some(id) => {
            tracing::debug!(request_id = id, convention, "Reusing incoming request id");
            RequestId::from(id)
        }
        None => {
            let id = RequestId::generate();
            tracing::debug!(request_id = %id, convention, "Generated request id");
            id
        }
    }
}
