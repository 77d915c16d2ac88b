//! Request and response fakes shared by the integration tests.

#![allow(dead_code)]

use request_metadata::{HandlerArgs, ResponseLike};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Request headers as a JSON object, so tests can include non-string values.
pub fn headers(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("headers must be a JSON object, got {other}"),
    }
}

/// Response that records every `set_header` call.
#[derive(Debug, Default)]
pub struct FakeResponse {
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl ResponseLike for FakeResponse {
    fn set_header(&self, name: &str, value: &str) {
        self.calls
            .lock()
            .expect("calls lock")
            .push((name.to_string(), value.to_string()));
    }
}

/// A single argument that is neither a context nor a request.
#[derive(Debug, Clone)]
pub struct NotAContext {
    pub value: u32,
}

impl HandlerArgs for NotAContext {}
