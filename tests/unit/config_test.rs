//! Tests for configuration-driven handler setup

#[path = "../support/mod.rs"]
mod support;

use request_metadata::{ContextError, RequestMetadataConfig, config, setup};
use serde_json::json;
use std::collections::HashMap;
use support::{FakeResponse, NotAContext, headers};

type SplitArgs = (serde_json::Map<String, serde_json::Value>, FakeResponse);

#[test]
fn test_from_lookup_reads_both_flags() {
    let vars = HashMap::from([
        (config::ENV_ENABLED, "false"),
        (config::ENV_STRICT_SHAPES, "1"),
    ]);
    let config = RequestMetadataConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("valid config");

    assert!(!config.enabled);
    assert!(config.strict_shapes);
}

#[test]
fn test_disabled_setup_passes_calls_through() {
    let wrapper = setup::<SplitArgs>(&RequestMetadataConfig::new().with_enabled(false));
    let metadata = wrapper.accessor();
    let handler = wrapper.wrap(move |(_request, response): SplitArgs| {
        (metadata.current(), metadata.current_or_default(), response.calls())
    });

    let (bound, fallback, calls) = handler
        .call((headers(json!({"x-request-id": "abc"})), FakeResponse::new()))
        .expect("passthrough never fails");

    assert_eq!(bound, None);
    assert!(fallback.is_empty());
    assert!(calls.is_empty(), "disabled handlers must not touch the response");
}

#[test]
fn test_strict_setup_rejects_unrecognized_arguments() {
    let wrapper = setup::<NotAContext>(&RequestMetadataConfig::new().with_strict_shapes(true));
    let handler = wrapper.wrap(|args: NotAContext| args.value);

    let err = handler.call(NotAContext { value: 3 }).unwrap_err();
    assert!(matches!(err, ContextError::ShapeMismatch(_)));
}

#[test]
fn test_lenient_setup_binds_empty_metadata_for_unrecognized_arguments() {
    let wrapper = setup::<NotAContext>(&RequestMetadataConfig::default());
    let metadata = wrapper.accessor();
    let handler = wrapper.wrap(move |args: NotAContext| (args.value, metadata.current()));

    let (value, bound) = handler.call(NotAContext { value: 3 }).expect("lenient");
    assert_eq!(value, 3);
    assert_eq!(bound.map(|m| m.is_empty()), Some(true));
}
