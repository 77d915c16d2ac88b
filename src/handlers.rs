//! Handler factory wiring a fresh store to the correlation-id preset.

use crate::args::HandlerArgs;
use crate::config::RequestMetadataConfig;
use crate::presets::RequestIdPreset;
use request_metadata_core::{ContextStore, Metadata, ScopeWrapper};

/// Create an isolated wrapper whose default preparer is [`RequestIdPreset`].
///
/// Every call creates a new store, so wrappers from separate `setup` calls
/// never see each other's metadata. With `enabled = false` the returned
/// wrapper passes calls straight through and binds nothing.
///
/// # Example
/// ```rust
/// use request_metadata::{ResponseHeaders, RequestMetadataConfig, setup};
/// use std::collections::HashMap;
///
/// type Args = (HashMap<String, String>, ResponseHeaders);
///
/// let wrapper = setup::<Args>(&RequestMetadataConfig::default());
/// let metadata = wrapper.accessor();
/// let handler = wrapper.wrap(move |(_req, res): Args| {
///     (metadata.current(), res.get("x-request-id"))
/// });
///
/// let request = HashMap::from([("x-request-id".to_string(), "abc".to_string())]);
/// let (bound, echoed) = handler.call((request, ResponseHeaders::new())).unwrap();
/// assert_eq!(bound.unwrap().get_str("x-request-id"), Some("abc"));
/// assert_eq!(echoed.as_deref(), Some("abc"));
/// ```
pub fn setup<A>(config: &RequestMetadataConfig) -> ScopeWrapper<A, Metadata>
where
    A: HandlerArgs,
{
    let preset = RequestIdPreset::from_config(config);
    tracing::debug!(
        enabled = config.enabled,
        strict_shapes = config.strict_shapes,
        "Setting up request metadata handlers"
    );
    ScopeWrapper::try_new(ContextStore::new(), move |args: &A| preset.prepare(args))
        .with_enabled(config.enabled)
}

pub fn setup_default<A>() -> ScopeWrapper<A, Metadata>
where
    A: HandlerArgs,
{
    setup(&RequestMetadataConfig::default())
}
