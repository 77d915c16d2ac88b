//! Tests for the correlation-id preset

#[path = "../support/mod.rs"]
mod support;

use request_metadata::{
    ContextError, ContextStore, MetadataAccessor, REQUEST_ID_HEADER, RequestContext,
    RequestIdPreset, prepare_request_id_metadata, spans,
};
use serde_json::json;
use support::{FakeResponse, NotAContext, headers};

#[test]
fn test_reuses_incoming_request_id_split_form() {
    let request = headers(json!({"x-request-id": "abc"}));
    let response = FakeResponse::new();

    let metadata = prepare_request_id_metadata(&(&request, &response));

    assert_eq!(metadata.get_str(REQUEST_ID_HEADER), Some("abc"));
    assert_eq!(metadata.len(), 1);
    assert_eq!(
        response.calls(),
        vec![("x-request-id".to_string(), "abc".to_string())]
    );
}

#[test]
fn test_reuses_incoming_request_id_combined_form() {
    let ctx = RequestContext::new(
        headers(json!({"x-request-id": "test-request-id"})),
        FakeResponse::new(),
    );

    let metadata = prepare_request_id_metadata(&ctx);

    assert_eq!(metadata.get_str(REQUEST_ID_HEADER), Some("test-request-id"));
    assert_eq!(
        ctx.response.calls(),
        vec![("x-request-id".to_string(), "test-request-id".to_string())]
    );
}

#[test]
fn test_generates_request_id_when_header_missing() {
    for combined in [false, true] {
        let request = headers(json!({}));
        let response = FakeResponse::new();

        let metadata = if combined {
            prepare_request_id_metadata(&RequestContext::new(&request, &response))
        } else {
            prepare_request_id_metadata(&(&request, &response))
        };

        let id = metadata
            .get_str(REQUEST_ID_HEADER)
            .expect("generated id")
            .to_string();
        assert!(!id.is_empty());
        assert_eq!(response.calls(), vec![("x-request-id".to_string(), id)]);
    }
}

#[test]
fn test_generates_request_id_when_header_not_a_string() {
    let request = headers(json!({"x-request-id": ["a", "b"]}));
    let response = FakeResponse::new();

    let metadata = prepare_request_id_metadata(&(&request, &response));

    let id = metadata.get_str(REQUEST_ID_HEADER).expect("generated id");
    assert_ne!(id, "a");
    assert_eq!(response.calls().len(), 1);
}

#[test]
fn test_generated_ids_differ_between_calls() {
    let request = headers(json!({}));
    let first = prepare_request_id_metadata(&(&request, &FakeResponse::new()));
    let second = prepare_request_id_metadata(&(&request, &FakeResponse::new()));

    assert_ne!(
        first.get_str(REQUEST_ID_HEADER),
        second.get_str(REQUEST_ID_HEADER)
    );
}

#[test]
fn test_unrecognized_shape_returns_empty_metadata() {
    let metadata = prepare_request_id_metadata(&NotAContext { value: 1 });
    assert!(metadata.is_empty());

    let metadata = prepare_request_id_metadata(&30_u64);
    assert!(metadata.is_empty());
}

#[test]
fn test_strict_preset_reports_shape_mismatch() {
    let preset = RequestIdPreset::new().with_strict_shapes(true);

    let err = preset.prepare(&NotAContext { value: 1 }).unwrap_err();
    assert!(matches!(err, ContextError::ShapeMismatch(_)));
    assert!(err.to_string().contains("NotAContext"));

    let request = headers(json!({"x-request-id": "ok"}));
    let response = FakeResponse::new();
    let metadata = preset.prepare(&(&request, &response)).expect("recognized");
    assert_eq!(metadata.get_str(REQUEST_ID_HEADER), Some("ok"));
}

#[test]
fn test_span_helpers_read_preset_key() {
    let request = headers(json!({"x-request-id": "span-id"}));
    let metadata = prepare_request_id_metadata(&(&request, &FakeResponse::new()));
    let store = ContextStore::new();
    let accessor = MetadataAccessor::new(store.clone());

    let seen = store.run_with_scope(metadata, || spans::current_request_id(&accessor));

    assert_eq!(spans::REQUEST_ID_HEADER, REQUEST_ID_HEADER);
    assert_eq!(seen.as_deref(), Some("span-id"));
}
