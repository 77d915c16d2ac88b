//! Log lines emitted below a wrapped handler carry its request id

use request_metadata::{REQUEST_ID_HEADER, ResponseHeaders, setup_default, spans};
use std::collections::HashMap;
use std::time::Duration;
use tracing::Instrument;
use tracing_test::traced_test;

type Args = (HashMap<String, String>, ResponseHeaders);

fn args(id: &str) -> Args {
    (
        HashMap::from([(REQUEST_ID_HEADER.to_string(), id.to_string())]),
        ResponseHeaders::new(),
    )
}

#[tokio::test]
#[traced_test]
async fn test_nested_helper_logs_carry_request_id() {
    let wrapper = setup_default::<Args>();
    let metadata = wrapper.accessor();
    let handler = wrapper.wrap(move |_: Args| {
        let metadata = metadata.clone();
        async move {
            let span = spans::request(&metadata, "/api/hello");
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                let _guard = spans::handler(&metadata, "nested_function").entered();
                tracing::info!("log from a nested function");
            }
            .instrument(span)
            .await;
        }
    });

    tokio::join!(
        handler.call_async(args("log-req-a")).expect("prepare"),
        handler.call_async(args("log-req-b")).expect("prepare"),
    );

    assert!(logs_contain("log from a nested function"));
    assert!(logs_contain("log-req-a"));
    assert!(logs_contain("log-req-b"));
    assert!(logs_contain("Reusing incoming request id"));
}

#[tokio::test]
#[traced_test]
async fn test_span_outside_scope_records_none() {
    let wrapper = setup_default::<Args>();
    let metadata = wrapper.accessor();

    let span = spans::handler(&metadata, "startup");
    let _guard = span.enter();
    tracing::info!("outside any request");

    assert!(logs_contain("outside any request"));
    assert!(logs_contain("request_id=\"none\"") || logs_contain("request_id=none"));
}
